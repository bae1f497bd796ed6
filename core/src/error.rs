//! Error types for the todo API client.
//!
//! # Design
//! Every failure a caller can see is one `ClientError`. Callers that need to
//! branch on the cause use `ClientError::kind`, which collapses the variants to
//! the four categories the client distinguishes. For HTTP failures the
//! `Display` output is the resolved diagnostic alone, so it can be shown to a
//! user as is.

use thiserror::Error;

/// Coarse classification of a `ClientError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The backend base URL is not configured.
    ConfigMissing,
    /// The server answered with a non-2xx status.
    HttpError,
    /// A successful response body was not valid JSON.
    ParseError,
    /// The request never produced a response.
    TransportError,
}

/// Errors returned by `TodoClient`.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The base URL is empty; `var` names the environment variable to set.
    #[error("backend base URL not configured: set {var}")]
    ConfigMissing { var: &'static str },

    /// Non-2xx response. `message` is taken from the error body when the
    /// server supplied one, otherwise it is the status line.
    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("invalid JSON in response body: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::ConfigMissing { .. } => ErrorKind::ConfigMissing,
            ClientError::Http { .. } => ErrorKind::HttpError,
            ClientError::Parse(_) => ErrorKind::ParseError,
            ClientError::Transport(_) => ErrorKind::TransportError,
        }
    }

    /// HTTP status for `Http` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        ClientError::Transport(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_displays_message_only() {
        let err = ClientError::Http {
            status: 404,
            message: "Todo not found".to_string(),
        };
        assert_eq!(err.to_string(), "Todo not found");
        assert_eq!(err.kind(), ErrorKind::HttpError);
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn config_missing_names_the_variable() {
        let err = ClientError::ConfigMissing {
            var: "TODO_BACKEND_BASE_URL",
        };
        assert!(err.to_string().contains("TODO_BACKEND_BASE_URL"));
        assert_eq!(err.kind(), ErrorKind::ConfigMissing);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn json_errors_convert_to_parse_kind() {
        let json_err = serde_json::from_str::<serde_json::Value>("nope").unwrap_err();
        let err: ClientError = json_err.into();
        assert_eq!(err.kind(), ErrorKind::ParseError);
    }

    #[test]
    fn transport_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = ClientError::transport(io);
        assert_eq!(err.kind(), ErrorKind::TransportError);
        assert!(std::error::Error::source(&err).is_some());
    }
}
