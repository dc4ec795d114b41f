//! Refresh-token grant against the Zoho accounts service.
//!
//! `POST {accounts}/oauth/v2/token?grant_type=refresh_token&...`; the
//! response must carry `access_token` and may carry `expires_in` (seconds,
//! default 3600).

use reqwest::Client;
use secrecy::ExposeSecret as _;
use serde_json::Value;
use std::time::Duration;
use zcreator_config::Credentials;
use zcreator_types::{Result, ZohoError};

/// Timeout for the token exchange round-trip.
pub const REFRESH_TIMEOUT: Duration = Duration::from_secs(10);

/// Lifetime assumed when the server omits `expires_in`.
pub const DEFAULT_EXPIRES_IN: i64 = 3600;

/// A newly issued access token and its server-declared lifetime.
#[derive(Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in: i64,
}

impl std::fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedToken")
            .field("access_token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Build the query parameters for the refresh-token grant.
#[must_use]
pub fn build_refresh_params(creds: &Credentials) -> [(&'static str, &str); 4] {
    [
        ("grant_type", "refresh_token"),
        ("refresh_token", creds.refresh_token().expose_secret()),
        ("client_id", creds.client_id()),
        ("client_secret", creds.client_secret().expose_secret()),
    ]
}

/// Read `expires_in`, accepting either a JSON number or a numeric string.
pub(crate) fn expires_in(json: &Value) -> Option<i64> {
    match json.get("expires_in")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parse the token endpoint JSON response into an [`IssuedToken`].
///
/// # Errors
///
/// Returns [`ZohoError::AuthRefreshFailed`] if `access_token` is missing.
/// The error text carries the server's `error` field when present, never
/// the full body.
pub fn parse_token_response(json: &Value) -> Result<IssuedToken> {
    let Some(access_token) = json.get("access_token").and_then(Value::as_str) else {
        let reason = json
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("missing access_token in response");
        return Err(ZohoError::AuthRefreshFailed(reason.to_string()));
    };
    Ok(IssuedToken {
        access_token: access_token.to_string(),
        expires_in: expires_in(json).unwrap_or(DEFAULT_EXPIRES_IN),
    })
}

/// Perform the refresh-token exchange.
///
/// # Errors
///
/// Every failure (transport, non-success status, non-JSON body, missing
/// token) is reported as [`ZohoError::AuthRefreshFailed`].
pub async fn refresh(http: &Client, creds: &Credentials) -> Result<IssuedToken> {
    let resp = http
        .post(creds.token_url())
        .query(&build_refresh_params(creds))
        .timeout(REFRESH_TIMEOUT)
        .send()
        .await
        .map_err(|e| ZohoError::AuthRefreshFailed(format!("token request failed: {e}")))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ZohoError::AuthRefreshFailed(format!(
            "token endpoint returned {status}: {body}"
        )));
    }

    let json: Value = resp
        .json()
        .await
        .map_err(|e| ZohoError::AuthRefreshFailed(format!("failed to parse token response: {e}")))?;

    parse_token_response(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn creds() -> Credentials {
        Credentials::new("cid", "csecret", "rtok", "https://accounts", "https://api").unwrap()
    }

    #[test]
    fn test_build_refresh_params_fields() {
        let c = creds();
        let params = build_refresh_params(&c);
        assert!(params.contains(&("grant_type", "refresh_token")));
        assert!(params.contains(&("refresh_token", "rtok")));
        assert!(params.contains(&("client_id", "cid")));
        assert!(params.contains(&("client_secret", "csecret")));
    }

    #[test]
    fn test_parse_token_response_full() {
        let tok = parse_token_response(&json!({
            "access_token": "abc",
            "expires_in": 100,
            "api_domain": "https://www.zohoapis.com",
            "token_type": "Bearer"
        }))
        .unwrap();
        assert_eq!(tok.access_token, "abc");
        assert_eq!(tok.expires_in, 100);
    }

    #[test]
    fn test_parse_token_response_default_lifetime() {
        let tok = parse_token_response(&json!({"access_token": "abc"})).unwrap();
        assert_eq!(tok.expires_in, DEFAULT_EXPIRES_IN);
    }

    #[test]
    fn test_parse_token_response_string_lifetime() {
        let tok = parse_token_response(&json!({"access_token": "abc", "expires_in": "1800"}))
            .unwrap();
        assert_eq!(tok.expires_in, 1800);
    }

    #[test]
    fn test_parse_token_response_missing_access_token() {
        let err = parse_token_response(&json!({"error": "invalid_code"})).unwrap_err();
        assert!(matches!(err, ZohoError::AuthRefreshFailed(ref m) if m == "invalid_code"));
    }

    #[test]
    fn test_issued_token_debug_redacted() {
        let tok = IssuedToken {
            access_token: "very-secret".into(),
            expires_in: 3600,
        };
        assert!(!format!("{tok:?}").contains("very-secret"));
    }
}
