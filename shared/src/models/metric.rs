//! Inventory Metric Model

use serde::{Deserialize, Serialize};

/// Category name the backend uses for the all-categories row
pub const OVERALL_CATEGORY: &str = "Overall";

/// Aggregate stock figures for one category, computed by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    pub category: String,
    pub product_count: u64,
    pub total_value: f64,
    pub average_price: f64,
}

impl Metric {
    /// Whether this row aggregates every category
    pub fn is_overall(&self) -> bool {
        self.category == OVERALL_CATEGORY
    }
}
