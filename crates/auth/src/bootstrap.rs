//! One-time authorization-code grant that yields the long-lived refresh
//! token. Run by an operator (see the `exchange-code` CLI command), never by
//! the client at runtime.

use crate::refresh::{REFRESH_TIMEOUT, expires_in};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use zcreator_types::{Result, ZohoError};

/// Inputs of the authorization-code grant.
pub struct CodeGrant<'a> {
    pub accounts_url: &'a str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub redirect_uri: &'a str,
    pub code: &'a str,
}

impl CodeGrant<'_> {
    #[must_use]
    pub fn params(&self) -> [(&'static str, &str); 5] {
        [
            ("grant_type", "authorization_code"),
            ("client_id", self.client_id),
            ("client_secret", self.client_secret),
            ("redirect_uri", self.redirect_uri),
            ("code", self.code),
        ]
    }
}

/// Tokens returned by the authorization-code grant.
#[derive(Debug, Clone, Serialize)]
pub struct CodeExchange {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_domain: Option<String>,
}

/// Parse the token endpoint response of an authorization-code grant.
///
/// # Errors
///
/// Returns [`ZohoError::AuthRefreshFailed`] if `access_token` is missing.
pub fn parse_code_response(json: &Value) -> Result<CodeExchange> {
    let text = |key: &str| json.get(key).and_then(Value::as_str).map(str::to_string);
    let access_token = text("access_token").ok_or_else(|| {
        ZohoError::AuthRefreshFailed(format!("unexpected token response: {json}"))
    })?;
    Ok(CodeExchange {
        access_token,
        refresh_token: text("refresh_token"),
        expires_in: expires_in(json),
        api_domain: text("api_domain"),
    })
}

/// Exchange an authorization code for access and refresh tokens.
///
/// # Errors
///
/// Returns [`ZohoError::AuthRefreshFailed`] on transport failure, a
/// non-success status, a non-JSON body or a missing `access_token`.
pub async fn exchange_code(http: &Client, grant: &CodeGrant<'_>) -> Result<CodeExchange> {
    let url = format!("{}/oauth/v2/token", grant.accounts_url.trim_end_matches('/'));
    let resp = http
        .post(&url)
        .query(&grant.params())
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
    parse_code_response(&json)
}
