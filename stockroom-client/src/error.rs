//! Client error types

use http::StatusCode;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure: connect, timeout, TLS, broken body
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Rejected on the client before any request was made
    #[error("Validation error: {0}")]
    Validation(String),

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Client could not be configured
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// HTTP status for `Api` errors
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => StatusCode::from_u16(*status).ok(),
            Self::Network(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let reason = errs
                    .iter()
                    .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| "invalid".to_string());
                format!("{field}: {reason}")
            })
            .collect();
        fields.sort();
        Self::Validation(fields.join(", "))
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ProductDraft;
    use validator::Validate;

    #[test]
    fn test_not_found_detection() {
        assert!(ClientError::api(404, "Product not found").is_not_found());
        assert!(!ClientError::api(500, "boom").is_not_found());
        assert!(!ClientError::Validation("x".into()).is_not_found());
    }

    #[test]
    fn test_validation_errors_are_flattened() {
        let draft = ProductDraft {
            unit_price: 1.0,
            ..Default::default()
        };
        let err: ClientError = draft.validate().unwrap_err().into();

        match err {
            ClientError::Validation(msg) => {
                assert_eq!(msg, "category: category is required, name: name is required");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
