//! Data models
//!
//! Wire types exchanged with the inventory backend. Field names follow the
//! backend's camelCase JSON.

pub mod metric;
pub mod product;

// Re-exports
pub use metric::*;
pub use product::*;
