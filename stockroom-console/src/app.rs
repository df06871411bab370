//! Console application state and key handling
//!
//! [`App`] never touches the network. Keys and worker messages are turned
//! into state changes plus at most one [`Command`] for the worker to run.

use std::collections::HashMap;

use chrono::NaiveDate;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use shared::{Availability, Metric, Page, Product, ProductDraft, SortField};
use stockroom_client::{ClientError, ClientResult, FetchTicket, InventoryState};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;
use tui_logger::{TuiWidgetEvent, TuiWidgetState};
use validator::Validate;

/// Step used by `+`/`-`
const PAGE_SIZE_STEP: u32 = 5;

/// Work for the background worker
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// List fetch only
    Fetch(FetchTicket),
    /// List fetch plus metrics and categories
    Reload(FetchTicket),
    Create(ProductDraft),
    Update(Product),
    ToggleStock(Product),
    Delete(i64),
}

/// Results reported back by the worker
#[derive(Debug)]
pub enum Message {
    Listed(FetchTicket, ClientResult<Page<Product>>),
    Metrics(ClientResult<Vec<Metric>>),
    Categories(ClientResult<Vec<String>>),
    Mutated {
        action: &'static str,
        result: ClientResult<()>,
    },
    StockChanged {
        id: i64,
        result: ClientResult<()>,
    },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    EditingName,
}

/// Filter edits not yet committed with Enter
#[derive(Debug, Default)]
pub struct FilterForm {
    pub name: Input,
    pub categories: Vec<String>,
    /// Index into the known categories
    pub cursor: usize,
    pub availability: Availability,
}

impl FilterForm {
    pub fn is_selected(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    fn toggle_category(&mut self, category: &str) {
        match self.categories.iter().position(|c| c == category) {
            Some(index) => {
                self.categories.remove(index);
            }
            None => self.categories.push(category.to_string()),
        }
    }
}

// ========== Product form ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Category,
    UnitPrice,
    ExpirationDate,
    InStock,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Name,
        FormField::Category,
        FormField::UnitPrice,
        FormField::ExpirationDate,
        FormField::InStock,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Category => "Category",
            Self::UnitPrice => "Unit price",
            Self::ExpirationDate => "Expiration date (YYYY-MM-DD)",
            Self::InStock => "In stock",
        }
    }
}

/// Create/edit form; one text input per [`FormField`]
#[derive(Debug, Clone)]
pub struct ProductForm {
    inputs: [Input; 5],
    focus: usize,
    pub error: Option<String>,
}

impl ProductForm {
    pub fn from_draft(draft: &ProductDraft) -> Self {
        let expiration = draft
            .expiration_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        Self {
            inputs: [
                Input::new(draft.name.clone()),
                Input::new(draft.category.clone()),
                Input::new(draft.unit_price.to_string()),
                Input::new(expiration),
                Input::new(draft.in_stock.to_string()),
            ],
            focus: 0,
            error: None,
        }
    }

    pub fn input(&self, field: FormField) -> &Input {
        &self.inputs[field as usize]
    }

    pub fn value(&self, field: FormField) -> &str {
        self.input(field).value()
    }

    pub fn focused(&self) -> FormField {
        FormField::ALL[self.focus]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % FormField::ALL.len();
    }

    pub fn focus_previous(&mut self) {
        self.focus = (self.focus + FormField::ALL.len() - 1) % FormField::ALL.len();
    }

    fn handle_event(&mut self, event: &Event) {
        self.inputs[self.focus].handle_event(event);
    }

    /// Parse and validate the form. Nothing is sent when this fails.
    pub fn to_draft(&self) -> Result<ProductDraft, String> {
        let unit_price = self
            .value(FormField::UnitPrice)
            .trim()
            .parse::<f64>()
            .map_err(|_| "unit price: enter a number".to_string())?;
        let in_stock = self
            .value(FormField::InStock)
            .trim()
            .parse::<u32>()
            .map_err(|_| "in stock: enter a whole number".to_string())?;
        let expiration_date = match self.value(FormField::ExpirationDate).trim() {
            "" => None,
            raw => Some(
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|_| "expiration date: use YYYY-MM-DD".to_string())?,
            ),
        };

        let draft = ProductDraft {
            name: self.value(FormField::Name).trim().to_string(),
            category: self.value(FormField::Category).trim().to_string(),
            unit_price,
            expiration_date,
            in_stock,
        };
        draft
            .validate()
            .map_err(|e| ClientError::from(e).to_string())?;
        Ok(draft)
    }
}

impl Default for ProductForm {
    fn default() -> Self {
        Self::from_draft(&ProductDraft::default())
    }
}

/// Open dialog
#[derive(Debug, Clone)]
pub enum Modal {
    Create(ProductForm),
    Update(i64, ProductForm),
    Delete(Product),
}

// ========== App ==========

pub struct App {
    pub inventory: InventoryState,
    pub filters: FilterForm,
    pub input_mode: InputMode,
    /// Selected row on the current page
    pub selected: usize,
    pub modal: Option<Modal>,
    /// Stock toggles not yet visible in the list, keyed by product id.
    /// `None` while the request runs, then the seq of the refetch that shows it.
    pub stock_pending: HashMap<i64, Option<u64>>,
    pub logger_state: TuiWidgetState,
    pub should_quit: bool,
}

impl App {
    pub fn new(page_size: u32) -> Self {
        Self {
            inventory: InventoryState::new(page_size),
            filters: FilterForm::default(),
            input_mode: InputMode::default(),
            selected: 0,
            modal: None,
            stock_pending: HashMap::new(),
            logger_state: TuiWidgetState::new(),
            should_quit: false,
        }
    }

    /// Initial load
    pub fn start(&mut self) -> Command {
        tracing::info!("Press 'n' to add a product, 'q' to quit");
        tracing::info!("Use PgUp/PgDown to scroll logs");
        Command::Reload(self.inventory.refresh())
    }

    pub fn selected_product(&self) -> Option<&Product> {
        self.inventory.products().get(self.selected)
    }

    // ========== Keys ==========

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        if self.modal.is_some() {
            return self.handle_modal_key(key);
        }
        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::EditingName => self.handle_name_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                None
            }
            KeyCode::Char('/') => {
                self.input_mode = InputMode::EditingName;
                None
            }
            KeyCode::Char('c') => {
                let known = self.inventory.categories().len();
                if known > 0 {
                    self.filters.cursor = (self.filters.cursor + 1) % known;
                }
                None
            }
            KeyCode::Char('C') => {
                if let Some(category) = self.inventory.categories().get(self.filters.cursor) {
                    let category = category.clone();
                    self.filters.toggle_category(&category);
                }
                None
            }
            KeyCode::Char('a') => {
                self.filters.availability = self.filters.availability.next();
                None
            }
            KeyCode::Enter => Some(self.search()),
            KeyCode::Char(digit @ '1'..='5') => {
                let index = digit as usize - '1' as usize;
                let field = SortField::ALL[index];
                Some(Command::Fetch(self.inventory.toggle_sort(field)))
            }
            KeyCode::Left => Some(Command::Fetch(self.inventory.previous_page())),
            KeyCode::Right => Some(Command::Fetch(self.inventory.next_page())),
            KeyCode::Home => Some(Command::Fetch(self.inventory.first_page())),
            KeyCode::End => Some(Command::Fetch(self.inventory.last_page())),
            KeyCode::Char('+') => {
                let size = self
                    .inventory
                    .working_query()
                    .page_size()
                    .saturating_add(PAGE_SIZE_STEP);
                Some(Command::Fetch(self.inventory.resize(size)))
            }
            KeyCode::Char('-') => {
                let size = self
                    .inventory
                    .working_query()
                    .page_size()
                    .saturating_sub(PAGE_SIZE_STEP)
                    .max(1);
                Some(Command::Fetch(self.inventory.resize(size)))
            }
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Down => {
                if self.selected + 1 < self.inventory.products().len() {
                    self.selected += 1;
                }
                None
            }
            KeyCode::Char(' ') => {
                let product = self.selected_product()?.clone();
                if self.stock_pending.contains_key(&product.id) {
                    tracing::debug!(id = product.id, "stock change already in flight");
                    return None;
                }
                self.stock_pending.insert(product.id, None);
                Some(Command::ToggleStock(product))
            }
            KeyCode::Char('n') => {
                self.modal = Some(Modal::Create(ProductForm::default()));
                None
            }
            KeyCode::Char('e') => {
                if let Some(product) = self.selected_product() {
                    let form = ProductForm::from_draft(&product.draft());
                    self.modal = Some(Modal::Update(product.id, form));
                }
                None
            }
            KeyCode::Char('d') => {
                self.modal = self.selected_product().cloned().map(Modal::Delete);
                None
            }
            KeyCode::Char('r') => Some(Command::Reload(self.inventory.refresh())),
            KeyCode::PageUp => {
                self.logger_state.transition(TuiWidgetEvent::PrevPageKey);
                None
            }
            KeyCode::PageDown => {
                self.logger_state.transition(TuiWidgetEvent::NextPageKey);
                None
            }
            _ => None,
        }
    }

    fn handle_name_key(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                Some(self.search())
            }
            // Leaves the edit in place, uncommitted
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                None
            }
            _ => {
                self.filters.name.handle_event(&Event::Key(key));
                None
            }
        }
    }

    fn handle_modal_key(&mut self, key: KeyEvent) -> Option<Command> {
        let modal = self.modal.take()?;
        match modal {
            Modal::Delete(product) => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => Some(Command::Delete(product.id)),
                KeyCode::Char('n') | KeyCode::Esc => None,
                _ => {
                    self.modal = Some(Modal::Delete(product));
                    None
                }
            },
            Modal::Create(mut form) => match Self::edit_form(&mut form, key) {
                FormAction::Submit(draft) => Some(Command::Create(draft)),
                FormAction::Cancel => None,
                FormAction::Continue => {
                    self.modal = Some(Modal::Create(form));
                    None
                }
            },
            Modal::Update(id, mut form) => match Self::edit_form(&mut form, key) {
                FormAction::Submit(draft) => Some(Command::Update(self.product_with(id, draft))),
                FormAction::Cancel => None,
                FormAction::Continue => {
                    self.modal = Some(Modal::Update(id, form));
                    None
                }
            },
        }
    }

    fn edit_form(form: &mut ProductForm, key: KeyEvent) -> FormAction {
        match key.code {
            KeyCode::Esc => FormAction::Cancel,
            KeyCode::Tab => {
                form.focus_next();
                FormAction::Continue
            }
            KeyCode::BackTab => {
                form.focus_previous();
                FormAction::Continue
            }
            KeyCode::Up if key.modifiers.contains(KeyModifiers::SHIFT) => {
                form.focus_previous();
                FormAction::Continue
            }
            KeyCode::Enter => match form.to_draft() {
                Ok(draft) => FormAction::Submit(draft),
                Err(reason) => {
                    tracing::warn!(%reason, "product form rejected");
                    form.error = Some(reason);
                    FormAction::Continue
                }
            },
            _ => {
                form.handle_event(&Event::Key(key));
                FormAction::Continue
            }
        }
    }

    /// Edited product: keeps server-maintained fields when the row is still shown
    fn product_with(&self, id: i64, draft: ProductDraft) -> Product {
        match self.inventory.products().iter().find(|p| p.id == id) {
            Some(product) => product.with_draft(draft),
            None => Product {
                id,
                name: draft.name,
                category: draft.category,
                unit_price: draft.unit_price,
                expiration_date: draft.expiration_date,
                in_stock: draft.in_stock,
                created_at: None,
                updated_at: None,
            },
        }
    }

    fn search(&mut self) -> Command {
        let ticket = self.inventory.apply_filters(
            self.filters.name.value(),
            self.filters.categories.clone(),
            self.filters.availability,
        );
        Command::Fetch(ticket)
    }

    // ========== Worker messages ==========

    pub fn handle_message(&mut self, message: Message) -> Option<Command> {
        match message {
            Message::Listed(ticket, result) => {
                let seq = ticket.seq();
                let settlement = self.inventory.settle(ticket, result);
                if settlement.is_stale() {
                    return None;
                }
                self.stock_pending
                    .retain(|_, refetch| refetch.is_none_or(|pending| pending > seq));
                if !settlement.is_applied() {
                    return None;
                }
                let rows = self.inventory.products().len();
                self.selected = self.selected.min(rows.saturating_sub(1));
                self.inventory.reclamp().map(Command::Fetch)
            }
            Message::Metrics(result) => {
                match result {
                    Ok(metrics) => self.inventory.set_metrics(metrics),
                    Err(e) => self.inventory.record_failure("load metrics", &e),
                }
                None
            }
            Message::Categories(result) => {
                match result {
                    Ok(categories) => {
                        let known = categories.len();
                        self.inventory.set_categories(categories);
                        if self.filters.cursor >= known {
                            self.filters.cursor = 0;
                        }
                    }
                    Err(e) => self.inventory.record_failure("load categories", &e),
                }
                None
            }
            Message::Mutated { action, result } => match result {
                Ok(()) => {
                    tracing::info!("{action}: done");
                    Some(Command::Reload(self.inventory.refresh()))
                }
                Err(e) => {
                    self.inventory.record_failure(action, &e);
                    None
                }
            },
            Message::StockChanged { id, result } => {
                let command = self.handle_message(Message::Mutated {
                    action: "change stock",
                    result,
                });
                match &command {
                    Some(Command::Reload(ticket)) => {
                        self.stock_pending.insert(id, Some(ticket.seq()));
                    }
                    _ => {
                        self.stock_pending.remove(&id);
                    }
                }
                command
            }
        }
    }
}

enum FormAction {
    Submit(ProductDraft),
    Cancel,
    Continue,
}
