//! Error types for the cleaning client.
//!
//! # Design
//! A missing field in a well-formed response is not an error: it surfaces as
//! `None` in the projected output. Only failures that abort the whole call
//! land here, each carrying the code and message reported by the layer that
//! produced it.

use thiserror::Error;

/// Errors returned by `DaDataClient` and `Api` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP round trip failed (connect, timeout, I/O).
    #[error("transport error ({code}): {message}")]
    Transport { code: String, message: String },

    /// The response body is not valid JSON.
    #[error("invalid JSON at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    /// The service answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    pub(crate) fn parse(err: serde_json::Error) -> Self {
        ApiError::Parse {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_keeps_position() {
        let err = serde_json::from_str::<serde_json::Value>("{\n  oops").unwrap_err();
        match ApiError::parse(err) {
            ApiError::Parse { line, column, .. } => {
                assert_eq!(line, 2);
                assert!(column > 0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn display_includes_transport_code() {
        let err = ApiError::Transport {
            code: "timeout".to_string(),
            message: "timed out after 5s".to_string(),
        };
        assert_eq!(err.to_string(), "transport error (timeout): timed out after 5s");
    }
}
