//! Stockroom Client - HTTP client for the inventory backend
//!
//! Provides the product service, fenced fetch state and a sequential
//! controller on top of a reqwest-based HTTP client.

pub mod config;
pub mod controller;
pub mod error;
pub mod http;
pub mod service;
pub mod state;

#[cfg(test)]
mod testing;

pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use controller::InventoryController;
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, NetworkHttpClient};
pub use service::{ProductService, StockAction};
pub use state::{FetchTicket, InventoryState, Settlement};

// Re-export shared types for convenience
pub use shared::{Availability, Metric, Page, Product, ProductDraft, Query, SortField};
