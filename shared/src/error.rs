//! Error types for the shared crate

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body the backend returns with every non-2xx response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub status: u16,
    pub message: String,
}

impl ApiErrorBody {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// Failure to parse a wire value into a typed enum
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown sort field: {0}")]
    SortField(String),

    #[error("unknown sort direction: {0}")]
    SortDirection(String),

    #[error("unknown availability: {0}")]
    Availability(String),
}
