//! Query-state model
//!
//! Holds the committed filter, sort and pagination parameters that drive the
//! product list fetch. Every operation is a pure, synchronous transition; the
//! fetch itself belongs to the caller.

pub mod params;
pub mod sort;

use std::fmt;
use std::str::FromStr;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::page::total_pages;

// Re-exports
pub use params::QueryParams;
pub use sort::{MAX_SORT_KEYS, SortDirection, SortField, SortKey, SortSpec};

/// Page size used when nothing else is configured
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Stock availability filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    #[default]
    Any,
    InStock,
    OutOfStock,
}

impl Availability {
    pub const ALL: [Availability; 3] = [
        Availability::Any,
        Availability::InStock,
        Availability::OutOfStock,
    ];

    /// Wire value; `Any` is never sent
    pub fn as_param(&self) -> Option<&'static str> {
        match self {
            Self::Any => None,
            Self::InStock => Some("in_stock"),
            Self::OutOfStock => Some("out_of_stock"),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Any => "All",
            Self::InStock => "In stock",
            Self::OutOfStock => "Out of stock",
        }
    }

    /// Next option in selector order, wrapping around
    pub fn next(self) -> Self {
        match self {
            Self::Any => Self::InStock,
            Self::InStock => Self::OutOfStock,
            Self::OutOfStock => Self::Any,
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Availability {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "any" => Ok(Self::Any),
            "in_stock" => Ok(Self::InStock),
            "out_of_stock" => Ok(Self::OutOfStock),
            other => Err(ParseError::Availability(other.to_string())),
        }
    }
}

/// Control event applied to a [`Query`]
#[derive(Debug, Clone, PartialEq)]
pub enum QueryEvent {
    SetFilters {
        name: String,
        categories: Vec<String>,
        availability: Availability,
    },
    ToggleSort(SortField),
    SetPage {
        page: u32,
        total_elements: u64,
    },
    SetPageSize(u32),
}

/// Committed filter, sort and pagination parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    name: String,
    categories: IndexSet<String>,
    availability: Availability,
    sort: SortSpec,
    page: u32,
    page_size: u32,
}

impl Default for Query {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Query {
    /// Unfiltered, unsorted first page
    pub fn new(page_size: u32) -> Self {
        Self {
            name: String::new(),
            categories: IndexSet::new(),
            availability: Availability::Any,
            sort: SortSpec::new(),
            page: 0,
            page_size: page_size.max(1),
        }
    }

    // ========== Accessors ==========

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(String::as_str)
    }

    pub fn availability(&self) -> Availability {
        self.availability
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Whether any filter narrows the result set
    pub fn is_filtered(&self) -> bool {
        !self.name.is_empty()
            || !self.categories.is_empty()
            || self.availability != Availability::Any
    }

    // ========== Transitions ==========

    /// Replaces the filters and returns to the first page; sort is kept.
    pub fn set_filters<I, S>(&mut self, name: &str, categories: I, availability: Availability)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.name = name.trim().to_string();
        self.categories = categories
            .into_iter()
            .map(|category| Into::<String>::into(category).trim().to_string())
            .filter(|category| !category.is_empty())
            .collect();
        self.availability = availability;
        self.page = 0;
    }

    /// Cycles the sort state of `field` and returns to the first page.
    pub fn toggle_sort(&mut self, field: SortField) {
        self.sort.toggle(field);
        self.page = 0;
    }

    /// Moves to page `page`, clamped to the pages available for
    /// `total_elements` items.
    pub fn set_page(&mut self, page: u32, total_elements: u64) {
        let pages = total_pages(total_elements, self.page_size);
        self.page = page.min(pages.saturating_sub(1));
    }

    pub fn first_page(&mut self) {
        self.page = 0;
    }

    pub fn previous_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    pub fn next_page(&mut self, total_elements: u64) {
        self.set_page(self.page.saturating_add(1), total_elements);
    }

    pub fn last_page(&mut self, total_elements: u64) {
        self.set_page(u32::MAX, total_elements);
    }

    /// Changes the page size (minimum 1) and returns to the first page.
    pub fn set_page_size(&mut self, page_size: u32) {
        self.page_size = page_size.max(1);
        self.page = 0;
    }

    /// Applies `event` in place.
    pub fn apply(&mut self, event: QueryEvent) {
        tracing::trace!(?event, "applying query event");
        match event {
            QueryEvent::SetFilters {
                name,
                categories,
                availability,
            } => self.set_filters(&name, categories, availability),
            QueryEvent::ToggleSort(field) => self.toggle_sort(field),
            QueryEvent::SetPage {
                page,
                total_elements,
            } => self.set_page(page, total_elements),
            QueryEvent::SetPageSize(size) => self.set_page_size(size),
        }
    }

    /// Pure transition: returns the query that results from `event`.
    pub fn reduce(&self, event: QueryEvent) -> Self {
        let mut next = self.clone();
        next.apply(event);
        next
    }

    // ========== Snapshot ==========

    /// Exact ordered parameter list for the list request.
    ///
    /// `page`, `size`, then `name`, each `category`, `availability`,
    /// `sortBy1`/`sortDirection1`, `sortBy2`/`sortDirection2`. Absent or empty
    /// values are omitted.
    pub fn request_snapshot(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push("page", self.page.to_string());
        params.push("size", self.page_size.to_string());
        params.push("name", self.name.as_str());
        for category in &self.categories {
            params.push("category", category.as_str());
        }
        if let Some(availability) = self.availability.as_param() {
            params.push("availability", availability);
        }
        if let Some(primary) = self.sort.primary() {
            params.push("sortBy1", primary.field.as_param());
            params.push("sortDirection1", primary.direction.as_param());
            if let Some(secondary) = self.sort.secondary() {
                params.push("sortBy2", secondary.field.as_param());
                params.push("sortDirection2", secondary.direction.as_param());
            }
        }
        params
    }
}
