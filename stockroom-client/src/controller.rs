//! Sequential inventory controller
//!
//! Drives [`InventoryState`] through a [`ProductService`] one request at a
//! time. Every mutation is followed by a refetch of the list, metrics and
//! categories. Failures are logged and recorded in the state; they are
//! reported through [`Settlement`] and never returned as `Err`.

use shared::{Availability, Product, ProductDraft, Query, SortField};

use crate::state::{FetchTicket, InventoryState, Settlement};
use crate::{ClientError, HttpClient, ProductService};

pub struct InventoryController<H> {
    service: ProductService<H>,
    state: InventoryState,
}

impl<H: HttpClient> InventoryController<H> {
    pub fn new(service: ProductService<H>, page_size: u32) -> Self {
        Self {
            service,
            state: InventoryState::new(page_size),
        }
    }

    pub fn state(&self) -> &InventoryState {
        &self.state
    }

    // ========== Reads ==========

    /// Load the list, metrics and categories for the working query
    pub async fn load(&mut self) -> Settlement {
        let ticket = self.state.refresh();
        self.fetch_all(ticket).await
    }

    /// Replace the working query with `query` and load everything for it
    pub async fn open(&mut self, query: Query) -> Settlement {
        let ticket = self.state.begin(query);
        self.fetch_all(ticket).await
    }

    pub async fn apply_filters(
        &mut self,
        name: &str,
        categories: Vec<String>,
        availability: Availability,
    ) -> Settlement {
        let ticket = self.state.apply_filters(name, categories, availability);
        self.fetch(ticket).await
    }

    pub async fn toggle_sort(&mut self, field: SortField) -> Settlement {
        let ticket = self.state.toggle_sort(field);
        self.fetch(ticket).await
    }

    pub async fn go_to_page(&mut self, page: u32) -> Settlement {
        let ticket = self.state.go_to_page(page);
        self.fetch(ticket).await
    }

    pub async fn first_page(&mut self) -> Settlement {
        let ticket = self.state.first_page();
        self.fetch(ticket).await
    }

    pub async fn previous_page(&mut self) -> Settlement {
        let ticket = self.state.previous_page();
        self.fetch(ticket).await
    }

    pub async fn next_page(&mut self) -> Settlement {
        let ticket = self.state.next_page();
        self.fetch(ticket).await
    }

    pub async fn last_page(&mut self) -> Settlement {
        let ticket = self.state.last_page();
        self.fetch(ticket).await
    }

    pub async fn resize(&mut self, page_size: u32) -> Settlement {
        let ticket = self.state.resize(page_size);
        self.fetch(ticket).await
    }

    // ========== Mutations ==========

    pub async fn create(&mut self, draft: &ProductDraft) -> Settlement {
        let result = self.service.create(draft).await.map(|_| ());
        self.after_mutation("create product", result).await
    }

    pub async fn update(&mut self, product: &Product) -> Settlement {
        let result = self.service.update(product).await.map(|_| ());
        self.after_mutation("update product", result).await
    }

    pub async fn toggle_stock(&mut self, product: &Product) -> Settlement {
        let result = self.service.set_stock(product).await.map(|_| ());
        self.after_mutation("change stock", result).await
    }

    pub async fn delete(&mut self, id: i64) -> Settlement {
        let result = self.service.remove(id).await;
        self.after_mutation("delete product", result).await
    }

    // ========== Internals ==========

    async fn fetch(&mut self, ticket: FetchTicket) -> Settlement {
        let result = self.service.list(ticket.query()).await;
        self.state.settle(ticket, result)
    }

    async fn fetch_all(&mut self, ticket: FetchTicket) -> Settlement {
        let (list, metrics, categories) = tokio::join!(
            self.service.list(ticket.query()),
            self.service.metrics(),
            self.service.categories(),
        );

        // settle first so an aggregate failure stays visible
        let settlement = self.state.settle(ticket, list);
        match metrics {
            Ok(metrics) => self.state.set_metrics(metrics),
            Err(e) => self.state.record_failure("load metrics", &e),
        }
        match categories {
            Ok(categories) => self.state.set_categories(categories),
            Err(e) => self.state.record_failure("load categories", &e),
        }

        if !settlement.is_applied() {
            return settlement;
        }
        match self.state.reclamp() {
            Some(ticket) => self.fetch(ticket).await,
            None => settlement,
        }
    }

    async fn after_mutation(
        &mut self,
        action: &str,
        result: Result<(), ClientError>,
    ) -> Settlement {
        match result {
            Ok(()) => {
                let ticket = self.state.refresh();
                self.fetch_all(ticket).await
            }
            Err(e) => {
                self.state.record_failure(action, &e);
                Settlement::Failed(e)
            }
        }
    }
}
