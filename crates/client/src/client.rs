//! Token-aware client for Creator custom API functions.

use crate::http::{self, CallResult, Method};
use reqwest::{
    Client,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use tracing::{debug, warn};
use zcreator_auth::TokenManager;
use zcreator_config::{Config, Credentials};
use zcreator_types::{
    Clock, Endpoint, EndpointRequest, Result, SystemClock, TokenSnapshot, ZohoError, to_query_pairs,
};

/// Client-side settings that are not credentials.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Creator application namespace under `/creator/custom/`.
    pub namespace: String,
    /// Safety margin subtracted from the server-declared token lifetime.
    pub refresh_margin: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            namespace: "bcxcrm".to_string(),
            refresh_margin: Duration::from_secs(300),
        }
    }
}

/// Authenticated client for `{api}/creator/custom/{namespace}/{function}`.
///
/// Each instance owns exactly one access token. Share the instance (e.g.
/// behind an `Arc`) rather than building one per call.
pub struct CreatorClient {
    http: Client,
    tokens: TokenManager,
    base_url: String,
}

impl CreatorClient {
    #[must_use]
    pub fn new(credentials: Credentials, options: ClientOptions) -> Self {
        Self::with_clock(credentials, options, Arc::new(SystemClock))
    }

    /// Like [`CreatorClient::new`], reading time from `clock`.
    #[must_use]
    pub fn with_clock(
        credentials: Credentials,
        options: ClientOptions,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let http = Client::new();
        let base_url = format!(
            "{}/creator/custom/{}",
            credentials.api_domain(),
            options.namespace.trim_matches('/')
        );
        let tokens = TokenManager::with_clock(
            http.clone(),
            Arc::new(credentials),
            options.refresh_margin,
            clock,
        );
        Self {
            http,
            tokens,
            base_url,
        }
    }

    /// Build a client from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ZohoError::MissingConfiguration`] if a required credential
    /// is absent.
    pub fn from_config(config: &Config) -> Result<Self> {
        let credentials = config.credentials()?;
        Ok(Self::new(
            credentials,
            ClientOptions {
                namespace: config.namespace.clone(),
                refresh_margin: config.refresh_margin(),
            },
        ))
    }

    /// Full URL of a custom function.
    #[must_use]
    pub fn function_url(&self, name: &str) -> String {
        format!("{}/{name}", self.base_url)
    }

    /// Return a valid access token, refreshing first if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ZohoError::AuthRefreshFailed`] if the refresh exchange fails.
    pub async fn ensure_valid_token(&self) -> Result<String> {
        self.tokens.ensure_valid_token().await
    }

    /// Refresh the access token now, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns [`ZohoError::AuthRefreshFailed`] if the refresh exchange fails.
    pub async fn refresh_token(&self) -> Result<TokenSnapshot> {
        self.tokens.force_refresh().await?;
        Ok(self.tokens.snapshot().await)
    }

    pub async fn token_state(&self) -> TokenSnapshot {
        self.tokens.snapshot().await
    }

    /// Call any custom function by name.
    ///
    /// `GET` sends `query` as the query string; `POST` sends `body` as JSON.
    /// The other input is ignored, never both are sent.
    ///
    /// Remote-side failures (HTTP status, transport, undecodable body) come
    /// back as the inner [`CallResult`] error and must be inspected by the
    /// caller.
    ///
    /// # Errors
    ///
    /// Only [`ZohoError::AuthRefreshFailed`], when a needed refresh fails; no
    /// business request is sent in that case.
    pub async fn call(
        &self,
        name: &str,
        method: Method,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<CallResult> {
        let token = self.tokens.ensure_valid_token().await?;
        let url = self.function_url(name);
        debug!(%method, %url, "calling custom function");

        let mut builder = self
            .http
            .request(method.as_reqwest(), &url)
            .header(AUTHORIZATION, format!("Zoho-oauthtoken {token}"))
            .header(CONTENT_TYPE, "application/json");
        builder = match method {
            Method::Get => builder.query(query),
            Method::Post => match body {
                Some(body) => builder.json(body),
                None => builder,
            },
        };

        let outcome = http::send(builder).await;
        if let Err(e) = &outcome {
            debug!(function = name, error = %e, "custom function call failed");
        }
        Ok(outcome)
    }

    /// Call a registered endpoint with a statically typed request.
    ///
    /// # Errors
    ///
    /// - [`ZohoError::SchemaMismatch`] if the request or the response does
    ///   not match the endpoint's registered shapes
    /// - [`ZohoError::RemoteCallFailed`] wrapping the untyped error record
    /// - [`ZohoError::AuthRefreshFailed`] if a needed refresh fails
    pub async fn call_typed<R: EndpointRequest>(
        &self,
        request: &R,
        method: Method,
    ) -> Result<R::Response> {
        let value = serde_json::to_value(request).map_err(|e| {
            ZohoError::SchemaMismatch(format!("{}: cannot serialize request: {e}", R::ENDPOINT))
        })?;
        let result = self.call_endpoint(R::ENDPOINT, &value, method).await?;
        serde_json::from_value(result)
            .map_err(|e| ZohoError::SchemaMismatch(format!("{}: {e}", R::ENDPOINT)))
    }

    /// Call a registered endpoint with a JSON request checked against its
    /// registered shapes. Returns the validated response JSON.
    ///
    /// The request is validated before any HTTP traffic, including the token
    /// refresh.
    ///
    /// # Errors
    ///
    /// Same as [`CreatorClient::call_typed`].
    pub async fn call_endpoint(
        &self,
        endpoint: Endpoint,
        request: &Value,
        method: Method,
    ) -> Result<Value> {
        let (request_shape, response_shape) = endpoint.shapes();
        if let Err(e) = request_shape.validate(request) {
            warn!(%endpoint, error = %e, "request rejected before sending");
            return Err(e);
        }

        let outcome = match method {
            Method::Get => {
                let query = to_query_pairs(request)?;
                self.call(endpoint.name(), method, &query, None).await?
            }
            Method::Post => self.call(endpoint.name(), method, &[], Some(request)).await?,
        };

        let value = outcome.map_err(ZohoError::RemoteCallFailed)?;
        if let Err(e) = response_shape.validate(&value) {
            warn!(%endpoint, error = %e, "response does not match registered shape");
            return Err(e);
        }
        Ok(value)
    }
}
