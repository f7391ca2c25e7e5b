//! Error taxonomy for the contact record engine.
//!
//! Every variant is recoverable: local validation and permission failures
//! never touch the network, and network failures never mutate in-memory
//! state, so the session always stays editable.

use reqwest::StatusCode;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    /// A required field is empty
    #[error("{0}")]
    Validation(String),

    /// Phone number contains characters other than digits, spaces, dashes,
    /// parentheses and a leading '+'
    #[error("Invalid phone number format: {0}")]
    Format(String),

    /// Phone digit count outside the accepted range
    #[error("Phone number must have between {min} and {max} digits (got {digits})")]
    Length { digits: usize, min: usize, max: usize },

    /// Phone number already present in the shared list
    #[error("Phone number already added: {0}")]
    Duplicate(String),

    /// Shared-field or phone edit attempted from a non-canonical locale
    #[error("{0}")]
    Permission(String),

    /// Operation not valid in the record's current lifecycle state
    #[error("{0}")]
    State(String),

    /// Request failed, timed out, or returned a non-success status
    #[error("{message}")]
    Network {
        message: String,
        status: Option<u16>,
        transient: bool,
    },
}

impl SyncError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn permission(msg: impl Into<String>) -> Self {
        Self::Permission(msg.into())
    }

    pub fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }

    /// Non-success HTTP response. 429 and 5xx are considered transient.
    pub fn http_status(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            status: Some(status.as_u16()),
            transient: status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error(),
        }
    }

    /// Transport-level failure (connection, timeout, body decoding).
    pub fn transport(err: anyhow::Error) -> Self {
        let transient = err
            .downcast_ref::<reqwest::Error>()
            .map(|e| e.is_timeout() || e.is_connect() || e.is_request())
            .unwrap_or(false);
        Self::Network {
            message: format!("{:#}", err),
            status: None,
            transient,
        }
    }

    /// Only transient network failures are worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network { transient: true, .. })
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_message() {
        let err = SyncError::Length {
            digits: 6,
            min: 7,
            max: 15,
        };
        assert_eq!(
            err.to_string(),
            "Phone number must have between 7 and 15 digits (got 6)"
        );
    }

    #[test]
    fn test_http_status_transient_classification() {
        assert!(SyncError::http_status(StatusCode::SERVICE_UNAVAILABLE, "down").is_retryable());
        assert!(SyncError::http_status(StatusCode::TOO_MANY_REQUESTS, "slow down").is_retryable());
        assert!(!SyncError::http_status(StatusCode::BAD_REQUEST, "bad").is_retryable());
        assert!(!SyncError::http_status(StatusCode::NOT_FOUND, "missing").is_retryable());
    }

    #[test]
    fn test_local_errors_are_not_retryable() {
        let errors = vec![
            SyncError::validation("Country is required"),
            SyncError::Format("abc".to_string()),
            SyncError::Duplicate("123".to_string()),
            SyncError::permission("nope"),
            SyncError::state("not yet"),
        ];
        for err in errors {
            assert!(!err.is_retryable());
        }
    }

    #[test]
    fn test_transport_error_keeps_context_chain() {
        let err = SyncError::transport(anyhow::anyhow!("refused").context("Failed to load"));
        assert_eq!(err.to_string(), "Failed to load: refused");
        assert!(matches!(err, SyncError::Network { status: None, .. }));
        assert!(!err.is_retryable());
    }
}
