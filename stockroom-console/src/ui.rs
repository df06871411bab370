//! Rendering

use ratatui::{prelude::*, widgets::*};
use shared::{Product, SortField};
use tui_logger::{TuiLoggerLevelOutput, TuiLoggerWidget};

use crate::app::{App, FormField, InputMode, Modal, ProductForm};
use crate::format;

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Filters
            Constraint::Min(8),    // Products + Metrics
            Constraint::Length(8), // Logs
            Constraint::Length(1), // Help
        ])
        .split(f.area());

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(chunks[2]);

    draw_header(f, app, chunks[0]);
    draw_filters(f, app, chunks[1]);
    draw_products(f, app, main_chunks[0]);
    draw_metrics(f, app, main_chunks[1]);
    draw_logs(f, app, chunks[3]);

    let help = match (&app.modal, app.input_mode) {
        (Some(Modal::Delete(_)), _) => "y confirm | n cancel",
        (Some(_), _) => "Tab/Shift-Tab field | Enter save | Esc cancel",
        (None, InputMode::EditingName) => "Enter search | Esc stop editing",
        (None, InputMode::Normal) => {
            "/ name | c/C category | a availability | Enter search | 1-5 sort | \u{2190}\u{2192} page | \
             space stock | n new | e edit | d delete | r refresh | +/- size | q quit"
        }
    };
    f.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        chunks[4],
    );

    if let Some(modal) = &app.modal {
        draw_modal(f, modal);
    }
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let inventory = &app.inventory;
    let status = if inventory.is_loading() {
        Span::styled(
            " LOADING... ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(
            " Ready ",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
    };

    let mut spans = vec![
        Span::raw(" Stockroom "),
        Span::styled(" Inventory ", Style::default().fg(Color::Yellow)),
        Span::raw(" | "),
        status,
    ];
    if let Some(error) = inventory.last_error() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(error, Style::default().fg(Color::Red)));
    }

    let title = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(title, area);
}

fn draw_filters(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(50),
            Constraint::Percentage(20),
        ])
        .split(area);

    // Name
    let editing = app.input_mode == InputMode::EditingName && app.modal.is_none();
    let style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let width = chunks[0].width.max(3) - 3;
    let scroll = app.filters.name.visual_scroll(width as usize);
    let name = Paragraph::new(app.filters.name.value())
        .style(style)
        .scroll((0, scroll as u16))
        .block(Block::default().borders(Borders::ALL).title(" Name "));
    f.render_widget(name, chunks[0]);

    if editing {
        f.set_cursor_position((
            chunks[0].x + ((app.filters.name.visual_cursor().max(scroll) - scroll) as u16) + 1,
            chunks[0].y + 1,
        ));
    }

    // Categories
    let mut spans = Vec::new();
    for (index, category) in app.inventory.categories().iter().enumerate() {
        let mark = if app.filters.is_selected(category) { "[x]" } else { "[ ]" };
        let mut style = Style::default();
        if index == app.filters.cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }
        spans.push(Span::styled(format!("{mark} {category}"), style));
        spans.push(Span::raw(" "));
    }
    let categories = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(" Categories "));
    f.render_widget(categories, chunks[1]);

    // Availability
    let availability = Paragraph::new(app.filters.availability.label())
        .block(Block::default().borders(Borders::ALL).title(" Availability "));
    f.render_widget(availability, chunks[2]);
}

fn draw_products(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let query = app.inventory.query();
    let header_cells = std::iter::once(Cell::from("STOCK")).chain(
        SortField::ALL
            .iter()
            .map(|field| Cell::from(format::column_header(query.sort(), *field))),
    );
    let header = Row::new(header_cells).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    let rows = app.inventory.products().iter().map(|product| {
        let style = if product.is_in_stock() {
            Style::default()
        } else {
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::CROSSED_OUT)
        };
        Row::new(vec![
            Cell::from(stock_mark(app, product)),
            Cell::from(product.name.clone()),
            Cell::from(product.category.clone()),
            Cell::from(format::price(product.unit_price)),
            Cell::from(format::date(product.expiration_date)),
            Cell::from(product.in_stock.to_string()),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(6),
        Constraint::Percentage(25),
        Constraint::Percentage(18),
        Constraint::Length(16),
        Constraint::Length(20),
        Constraint::Length(12),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(" Products ({}) ", app.inventory.page().total_elements))
                .borders(Borders::ALL),
        )
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

    let mut state = TableState::default();
    if !app.inventory.products().is_empty() {
        state.select(Some(app.selected));
    }
    f.render_stateful_widget(table, chunks[0], &mut state);

    let pager = Paragraph::new(format!(
        "{}  ({} per page)",
        format::pager(app.inventory.page()),
        query.page_size()
    ))
    .alignment(Alignment::Center);
    f.render_widget(pager, chunks[1]);
}

/// `[~]` while a stock change for the row is not yet reflected
fn stock_mark(app: &App, product: &Product) -> &'static str {
    if app.stock_pending.contains_key(&product.id) {
        "[~]"
    } else if product.is_in_stock() {
        "[x]"
    } else {
        "[ ]"
    }
}

fn draw_metrics(f: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(["", "Products", "Total value", "Avg price"]).style(
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
    );
    let rows = app.inventory.metrics().iter().map(|metric| {
        let style = if metric.is_overall() {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Row::new(vec![
            metric.category.clone(),
            metric.product_count.to_string(),
            format::price(metric.total_value),
            format::price(metric.average_price),
        ])
        .style(style)
    });
    let widths = [
        Constraint::Percentage(28),
        Constraint::Percentage(18),
        Constraint::Percentage(28),
        Constraint::Percentage(26),
    ];
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(" Metrics ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta)),
    );
    f.render_widget(table, area);
}

fn draw_logs(f: &mut Frame, app: &App, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(
            Block::default()
                .title(" Logs ")
                .border_style(
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::DIM),
                )
                .borders(Borders::ALL),
        )
        .output_separator('|')
        .output_timestamp(Some("%H:%M:%S".to_string()))
        .output_level(Some(TuiLoggerLevelOutput::Abbreviated))
        .output_target(false)
        .output_file(false)
        .output_line(false)
        .style(Style::default().fg(Color::White))
        .state(&app.logger_state);
    f.render_widget(logs, area);
}

fn draw_modal(f: &mut Frame, modal: &Modal) {
    match modal {
        Modal::Create(form) => draw_form(f, " New product ", form),
        Modal::Update(id, form) => draw_form(f, &format!(" Edit product #{id} "), form),
        Modal::Delete(product) => {
            let area = centered_rect(50, 5, f.area());
            let text = vec![
                Line::from(format!("Delete \"{}\"?", product.name)),
                Line::from(Span::styled(
                    "This cannot be undone. (y/n)",
                    Style::default().fg(Color::Red),
                )),
            ];
            f.render_widget(Clear, area);
            f.render_widget(
                Paragraph::new(text).alignment(Alignment::Center).block(
                    Block::default()
                        .title(" Delete product ")
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Red)),
                ),
                area,
            );
        }
    }
}

fn draw_form(f: &mut Frame, title: &str, form: &ProductForm) {
    let fields = FormField::ALL.len() as u16;
    let area = centered_rect(60, fields * 3 + 3, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut constraints = vec![Constraint::Length(3); FormField::ALL.len()];
    constraints.push(Constraint::Length(1));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (index, field) in FormField::ALL.iter().enumerate() {
        let focused = form.focused() == *field;
        let style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        };
        let input = form.input(*field);
        let area = rows[index];
        let width = area.width.max(3) - 3;
        let scroll = input.visual_scroll(width as usize);
        f.render_widget(
            Paragraph::new(input.value())
                .style(style)
                .scroll((0, scroll as u16))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!(" {} ", field.label())),
                ),
            area,
        );
        if focused {
            f.set_cursor_position((
                area.x + ((input.visual_cursor().max(scroll) - scroll) as u16) + 1,
                area.y + 1,
            ));
        }
    }

    if let Some(error) = &form.error {
        f.render_widget(
            Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red)),
            rows[FormField::ALL.len()],
        );
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
