//! Shared types for Stockroom
//!
//! Wire models, the paginated response type and the query-state model used
//! by both the HTTP client and the console front end.

pub mod error;
pub mod models;
pub mod page;
pub mod query;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{ApiErrorBody, ParseError};
pub use models::{Metric, OVERALL_CATEGORY, Product, ProductDraft};
pub use page::Page;
pub use query::{
    Availability, DEFAULT_PAGE_SIZE, Query, QueryEvent, QueryParams, SortDirection, SortField,
    SortKey, SortSpec,
};
