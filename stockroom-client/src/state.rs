//! Fenced fetch state
//!
//! Owns the committed [`Query`] and the last displayed [`Page`]. Every list
//! fetch is tagged with a monotonically increasing sequence number; a
//! response whose ticket is older than the latest issued one is discarded,
//! so overlapping requests can never overwrite newer state.

use shared::{Availability, Metric, Page, Product, Query, QueryEvent, SortField};

use crate::{ClientError, ClientResult};

/// Handle for one in-flight list fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    query: Query,
}

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Query the fetch was issued for
    pub fn query(&self) -> &Query {
        &self.query
    }
}

/// What happened to a settled fetch or mutation
#[derive(Debug)]
pub enum Settlement {
    /// Result committed
    Applied,
    /// A newer request was issued meanwhile; result dropped
    Stale,
    /// Request failed; previous query and page kept
    Failed(ClientError),
}

impl Settlement {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale)
    }

    pub fn error(&self) -> Option<&ClientError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Client-side inventory state: committed query, displayed page, aggregates
#[derive(Debug, Clone)]
pub struct InventoryState {
    committed: Query,
    pending: Option<FetchTicket>,
    page: Page<Product>,
    metrics: Vec<Metric>,
    categories: Vec<String>,
    latest_seq: u64,
    loaded: bool,
    last_error: Option<String>,
}

impl InventoryState {
    pub fn new(page_size: u32) -> Self {
        let committed = Query::new(page_size);
        let page = Page::empty(committed.page_size());
        Self {
            committed,
            pending: None,
            page,
            metrics: Vec::new(),
            categories: Vec::new(),
            latest_seq: 0,
            loaded: false,
            last_error: None,
        }
    }

    // ========== Accessors ==========

    /// Query of the page currently displayed
    pub fn query(&self) -> &Query {
        &self.committed
    }

    /// Query new control events build on: the in-flight one if any
    pub fn working_query(&self) -> &Query {
        self.pending
            .as_ref()
            .map(FetchTicket::query)
            .unwrap_or(&self.committed)
    }

    pub fn page(&self) -> &Page<Product> {
        &self.page
    }

    pub fn products(&self) -> &[Product] {
        &self.page.items
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether at least one list fetch succeeded
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    // ========== Fetch lifecycle ==========

    /// Issue a ticket for fetching `query`; supersedes any in-flight fetch.
    pub fn begin(&mut self, query: Query) -> FetchTicket {
        self.latest_seq += 1;
        let ticket = FetchTicket {
            seq: self.latest_seq,
            query,
        };
        tracing::debug!(seq = ticket.seq, "list fetch issued");
        self.pending = Some(ticket.clone());
        ticket
    }

    /// Settle a list fetch.
    ///
    /// Stale tickets are dropped. On success the ticket's query and the page
    /// are committed together; on failure both stay as they were.
    pub fn settle(
        &mut self,
        ticket: FetchTicket,
        result: ClientResult<Page<Product>>,
    ) -> Settlement {
        if ticket.seq != self.latest_seq {
            tracing::warn!(
                seq = ticket.seq,
                latest = self.latest_seq,
                "discarding stale list response"
            );
            return Settlement::Stale;
        }
        self.pending = None;

        match result {
            Ok(page) => {
                tracing::info!(
                    seq = ticket.seq,
                    page = page.page_number,
                    items = page.items.len(),
                    total = page.total_elements,
                    "product page loaded"
                );
                self.committed = ticket.query;
                self.page = page;
                self.loaded = true;
                self.last_error = None;
                Settlement::Applied
            }
            Err(e) => {
                self.record_failure("load products", &e);
                Settlement::Failed(e)
            }
        }
    }

    /// Log a failed operation and keep its message for display
    pub fn record_failure(&mut self, action: &str, error: &ClientError) {
        tracing::error!(action, error = %error, "request failed");
        self.last_error = Some(format!("Failed to {action}: {error}"));
    }

    pub fn set_metrics(&mut self, metrics: Vec<Metric>) {
        self.metrics = metrics;
    }

    pub fn set_categories(&mut self, categories: Vec<String>) {
        self.categories = categories;
    }

    // ========== Control events ==========

    /// Refetch the working query unchanged
    pub fn refresh(&mut self) -> FetchTicket {
        let query = self.working_query().clone();
        self.begin(query)
    }

    /// Apply `event` to the working query and issue a fetch for the result
    pub fn apply(&mut self, event: QueryEvent) -> FetchTicket {
        let query = self.working_query().reduce(event);
        self.begin(query)
    }

    pub fn apply_filters(
        &mut self,
        name: &str,
        categories: Vec<String>,
        availability: Availability,
    ) -> FetchTicket {
        self.apply(QueryEvent::SetFilters {
            name: name.to_string(),
            categories,
            availability,
        })
    }

    pub fn toggle_sort(&mut self, field: SortField) -> FetchTicket {
        self.apply(QueryEvent::ToggleSort(field))
    }

    /// Go to page `page`, clamped against the last known total
    pub fn go_to_page(&mut self, page: u32) -> FetchTicket {
        let total_elements = self.page.total_elements;
        self.apply(QueryEvent::SetPage {
            page,
            total_elements,
        })
    }

    pub fn first_page(&mut self) -> FetchTicket {
        self.go_to_page(0)
    }

    pub fn previous_page(&mut self) -> FetchTicket {
        let page = self.working_query().page().saturating_sub(1);
        self.go_to_page(page)
    }

    pub fn next_page(&mut self) -> FetchTicket {
        let page = self.working_query().page().saturating_add(1);
        self.go_to_page(page)
    }

    pub fn last_page(&mut self) -> FetchTicket {
        self.go_to_page(u32::MAX)
    }

    /// Change the page size; returns to the first page
    pub fn resize(&mut self, page_size: u32) -> FetchTicket {
        self.apply(QueryEvent::SetPageSize(page_size))
    }

    /// Ticket for pulling the committed page back into range.
    ///
    /// Needed when the page shown lies beyond the last page, e.g. after the
    /// only product on the last page was deleted.
    pub fn reclamp(&mut self) -> Option<FetchTicket> {
        let last = self.page.total_pages().saturating_sub(1);
        if self.pending.is_none() && self.page.is_empty() && self.committed.page() > last {
            Some(self.go_to_page(last))
        } else {
            None
        }
    }
}

impl Default for InventoryState {
    fn default() -> Self {
        Self::new(shared::DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_product;

    fn page_of(count: usize, page_number: u32, total: u64) -> Page<Product> {
        let items = (0..count)
            .map(|i| sample_product(i as i64 + 1, "item", 1))
            .collect();
        Page::new(items, page_number, 10, total)
    }

    fn loaded_state(total: u64) -> InventoryState {
        let mut state = InventoryState::new(10);
        let ticket = state.refresh();
        assert!(state.settle(ticket, Ok(page_of(10, 0, total))).is_applied());
        state
    }

    #[test]
    fn test_successful_fetch_commits_query_and_page() {
        let mut state = InventoryState::new(10);
        let ticket = state.toggle_sort(SortField::Name);
        assert!(state.is_loading());
        assert!(state.query().sort().is_empty());

        let settlement = state.settle(ticket, Ok(page_of(3, 0, 3)));
        assert!(settlement.is_applied());
        assert!(!state.is_loading());
        assert!(state.is_loaded());
        assert_eq!(state.products().len(), 3);
        assert_eq!(state.query().sort().len(), 1);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut state = loaded_state(50);

        let first = state.go_to_page(1);
        let second = state.go_to_page(2);
        assert!(second.seq() > first.seq());

        // newer response arrives first
        assert!(state.settle(second, Ok(page_of(10, 2, 50))).is_applied());
        // the older one must not overwrite it
        assert!(state.settle(first, Ok(page_of(10, 1, 50))).is_stale());

        assert_eq!(state.query().page(), 2);
        assert_eq!(state.page().page_number, 2);
    }

    #[test]
    fn test_stale_error_is_discarded_too() {
        let mut state = loaded_state(50);
        let first = state.go_to_page(1);
        let second = state.go_to_page(2);

        let settlement = state.settle(first, Err(ClientError::api(500, "boom")));
        assert!(settlement.is_stale());
        assert!(state.last_error().is_none());
        assert!(state.is_loading());

        assert!(state.settle(second, Ok(page_of(10, 2, 50))).is_applied());
    }

    #[test]
    fn test_failed_fetch_keeps_previous_state() {
        let mut state = loaded_state(30);
        let before_query = state.query().clone();
        let before_page = state.page().clone();

        let ticket = state.apply_filters("milk", vec!["dairy".into()], Availability::InStock);
        let settlement = state.settle(ticket, Err(ClientError::api(503, "unavailable")));

        assert!(settlement.error().is_some());
        assert_eq!(state.query(), &before_query);
        assert_eq!(state.page(), &before_page);
        assert!(!state.is_loading());
        assert!(state.last_error().unwrap().contains("unavailable"));
    }

    #[test]
    fn test_events_build_on_pending_query() {
        let mut state = loaded_state(100);
        let _first = state.toggle_sort(SortField::Name);
        let second = state.toggle_sort(SortField::Category);

        let keys = second.query().sort().keys();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].field, SortField::Category);
        assert_eq!(keys[1].field, SortField::Name);
    }

    #[test]
    fn test_page_navigation_clamps_to_known_total() {
        let mut state = loaded_state(25);

        let ticket = state.last_page();
        assert_eq!(ticket.query().page(), 2);

        let ticket = state.next_page();
        assert_eq!(ticket.query().page(), 2);

        let ticket = state.go_to_page(40);
        assert_eq!(ticket.query().page(), 2);
    }

    #[test]
    fn test_previous_page_on_first_page_stays() {
        let mut state = loaded_state(25);
        let ticket = state.previous_page();
        assert_eq!(ticket.query().page(), 0);
    }

    #[test]
    fn test_filters_reset_page() {
        let mut state = loaded_state(100);
        let ticket = state.go_to_page(5);
        state.settle(ticket, Ok(page_of(10, 5, 100)));

        let ticket = state.apply_filters("tea", Vec::new(), Availability::Any);
        assert_eq!(ticket.query().page(), 0);
    }

    #[test]
    fn test_resize_resets_page() {
        let mut state = loaded_state(100);
        let ticket = state.go_to_page(3);
        state.settle(ticket, Ok(page_of(10, 3, 100)));

        let ticket = state.resize(25);
        assert_eq!(ticket.query().page_size(), 25);
        assert_eq!(ticket.query().page(), 0);

        let ticket = state.resize(0);
        assert_eq!(ticket.query().page_size(), 1);
    }

    #[test]
    fn test_reclamp_after_last_page_emptied() {
        let mut state = loaded_state(21);
        let ticket = state.last_page();
        state.settle(ticket, Ok(page_of(1, 2, 21)));
        assert!(state.reclamp().is_none());

        // the only item on page 2 was deleted
        let ticket = state.refresh();
        state.settle(ticket, Ok(page_of(0, 2, 20)));

        let ticket = state.reclamp().expect("page beyond range");
        assert_eq!(ticket.query().page(), 1);
    }
}
