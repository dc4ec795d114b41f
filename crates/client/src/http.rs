//! Business-call transport: send → status check → JSON decode, with every
//! remote-side failure folded into a [`CallError`] record.

use reqwest::RequestBuilder;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::debug;
use zcreator_types::{CallError, ZohoError};

/// Timeout for one business-call round-trip.
pub const CALL_TIMEOUT: Duration = Duration::from_secs(15);

/// Outcome of an untyped call: the decoded JSON or a uniform error record.
pub type CallResult = std::result::Result<Value, CallError>;

/// HTTP methods supported by Creator custom functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    /// Parameters travel in the query string.
    Get,
    /// Parameters travel as a JSON body.
    #[default]
    Post,
}

impl Method {
    #[must_use]
    pub fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.write_str("GET"),
            Self::Post => f.write_str("POST"),
        }
    }
}

impl std::str::FromStr for Method {
    type Err = ZohoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("get") {
            Ok(Self::Get)
        } else if s.eq_ignore_ascii_case("post") {
            Ok(Self::Post)
        } else {
            Err(ZohoError::Config(format!(
                "unsupported HTTP method '{s}' (expected GET or POST)"
            )))
        }
    }
}

/// Sends a prepared business request and classifies the outcome.
///
/// - transport failure → [`CallError::TransportError`]
/// - 4xx/5xx → [`CallError::HttpError`] with the raw body
/// - body that is not JSON → [`CallError::DecodeError`] with the raw body
pub async fn send(builder: RequestBuilder) -> CallResult {
    let resp = builder.timeout(CALL_TIMEOUT).send().await?;
    let status = resp.status();
    debug!(%status, url = %resp.url(), "received business response");

    let body = resp.text().await?;
    if status.is_client_error() || status.is_server_error() {
        return Err(CallError::HttpError {
            status: status.as_u16(),
            body,
        });
    }
    serde_json::from_str(&body).map_err(|_| CallError::DecodeError(body))
}
