//! Unified error types for the zcreator workspace.
//!
//! Two shapes coexist on purpose: [`CallError`] is the *data* record the
//! untyped call hands back for remote-side failures, while [`ZohoError`] is
//! the hard failure raised by construction, token refresh and the typed path.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Category tag shared by [`CallError`] and [`ZohoError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    MissingConfiguration,
    AuthRefreshFailed,
    HttpError,
    TransportError,
    DecodeError,
    SchemaMismatch,
    UnknownEndpoint,
    RemoteCallFailed,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MissingConfiguration => "MissingConfiguration",
            Self::AuthRefreshFailed => "AuthRefreshFailed",
            Self::HttpError => "HttpError",
            Self::TransportError => "TransportError",
            Self::DecodeError => "DecodeError",
            Self::SchemaMismatch => "SchemaMismatch",
            Self::UnknownEndpoint => "UnknownEndpoint",
            Self::RemoteCallFailed => "RemoteCallFailed",
        };
        f.write_str(s)
    }
}

/// Uniform record for a failed business call, returned as data on the
/// untyped path.
///
/// Serializes as `{"kind": "...", "detail": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail")]
pub enum CallError {
    /// The server answered with a 4xx/5xx status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The request never produced a response (timeout, refused connection, ...).
    #[error("request failed: {0}")]
    TransportError(String),

    /// The response body was not valid JSON; carries the raw body.
    #[error("invalid JSON response: {0}")]
    DecodeError(String),
}

impl CallError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::HttpError { .. } => ErrorKind::HttpError,
            Self::TransportError(_) => ErrorKind::TransportError,
            Self::DecodeError(_) => ErrorKind::DecodeError,
        }
    }
}

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for CallError {
    fn from(e: reqwest::Error) -> Self {
        Self::TransportError(e.to_string())
    }
}

/// Enumerates every hard failure a zcreator operation can raise.
#[derive(Debug, Error)]
pub enum ZohoError {
    /// A required credential is absent; the client cannot be built.
    #[error("missing configuration: {0}")]
    MissingConfiguration(String),

    /// The configuration source itself could not be read or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// The refresh-token exchange failed; the triggering call was aborted.
    #[error("access token refresh failed: {0}")]
    AuthRefreshFailed(String),

    /// A typed request or response does not conform to its registered shape.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// The name does not belong to the endpoint registry.
    #[error("unknown endpoint: {0}")]
    UnknownEndpoint(String),

    /// A business call failed on the typed path.
    #[error("remote call failed: {0}")]
    RemoteCallFailed(CallError),
}

impl ZohoError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingConfiguration(_) | Self::Config(_) => ErrorKind::MissingConfiguration,
            Self::AuthRefreshFailed(_) => ErrorKind::AuthRefreshFailed,
            Self::SchemaMismatch(_) => ErrorKind::SchemaMismatch,
            Self::UnknownEndpoint(_) => ErrorKind::UnknownEndpoint,
            Self::RemoteCallFailed(_) => ErrorKind::RemoteCallFailed,
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, ZohoError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_error_record_shape() {
        let err = CallError::HttpError {
            status: 500,
            body: "server error".into(),
        };
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"kind": "HttpError", "detail": {"status": 500, "body": "server error"}})
        );
    }

    #[test]
    fn test_transport_error_record_shape() {
        let err = CallError::TransportError("connection refused".into());
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"kind": "TransportError", "detail": "connection refused"})
        );
    }

    #[test]
    fn test_call_error_kind() {
        assert_eq!(
            CallError::DecodeError("<html>".into()).kind(),
            ErrorKind::DecodeError
        );
        assert_eq!(
            CallError::TransportError(String::new()).kind(),
            ErrorKind::TransportError
        );
    }

    #[test]
    fn test_remote_call_failed_wraps_record() {
        let inner = CallError::HttpError {
            status: 404,
            body: "not found".into(),
        };
        let err = ZohoError::RemoteCallFailed(inner.clone());
        assert_eq!(err.kind(), ErrorKind::RemoteCallFailed);
        let s = err.to_string();
        assert!(s.contains("404"));
        assert!(s.contains("not found"));
        assert!(matches!(err, ZohoError::RemoteCallFailed(e) if e == inner));
    }

    #[test]
    fn test_error_display_missing_configuration() {
        let err = ZohoError::MissingConfiguration("client_id".into());
        assert_eq!(err.to_string(), "missing configuration: client_id");
    }
}
