//! Owner of the single access token's lifecycle.
//!
//! Responsibilities:
//! - Hand out the current token while it is valid.
//! - Refresh synchronously, right before the call that needs it, once the
//!   token is absent or inside the refresh margin.
//! - Serialize refreshes so one staleness window triggers one exchange.
//!
//! There is no background refresh, no cooldown and no retry: a failed
//! refresh aborts the triggering call and leaves the state untouched.
use crate::refresh;
use reqwest::Client;
use std::{sync::Arc, time::Duration};
use tokio::sync::RwLock;
use tracing::{info, warn};
use zcreator_config::Credentials;
use zcreator_types::{Clock, Result, SystemClock, TokenSnapshot, TokenState};

pub struct TokenManager {
    http: Client,
    credentials: Arc<Credentials>,
    clock: Arc<dyn Clock>,
    state: RwLock<TokenState>,
}

impl TokenManager {
    pub fn new(http: Client, credentials: Arc<Credentials>, refresh_margin: Duration) -> Self {
        Self::with_clock(http, credentials, refresh_margin, Arc::new(SystemClock))
    }

    pub fn with_clock(
        http: Client,
        credentials: Arc<Credentials>,
        refresh_margin: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            http,
            credentials,
            clock,
            state: RwLock::new(TokenState::new(refresh_margin)),
        }
    }

    /// Return a valid access token, refreshing first if it is absent or stale.
    ///
    /// Callers that find a valid token only take the read lock, so they do
    /// not block each other.
    ///
    /// # Errors
    ///
    /// Returns [`zcreator_types::ZohoError::AuthRefreshFailed`] if the
    /// exchange fails; the token state is left as it was.
    pub async fn ensure_valid_token(&self) -> Result<String> {
        if let Some(token) = self.state.read().await.valid_token(self.clock.now_secs()) {
            return Ok(token.to_string());
        }

        let mut state = self.state.write().await;
        // Another caller may have refreshed while we waited for the lock.
        if let Some(token) = state.valid_token(self.clock.now_secs()) {
            return Ok(token.to_string());
        }
        self.refresh_locked(&mut state).await
    }

    /// Refresh unconditionally, regardless of the current status.
    ///
    /// # Errors
    ///
    /// Returns [`zcreator_types::ZohoError::AuthRefreshFailed`] if the exchange fails.
    pub async fn force_refresh(&self) -> Result<String> {
        let mut state = self.state.write().await;
        self.refresh_locked(&mut state).await
    }

    /// Diagnostic view of the current token state.
    pub async fn snapshot(&self) -> TokenSnapshot {
        TokenSnapshot::of(&*self.state.read().await, self.clock.now_secs())
    }

    async fn refresh_locked(&self, state: &mut TokenState) -> Result<String> {
        info!(client_id = %self.credentials.client_id(), "refreshing access token");
        let issued = match refresh::refresh(&self.http, &self.credentials).await {
            Ok(issued) => issued,
            Err(e) => {
                warn!(error = %e, "access token refresh failed");
                return Err(e);
            }
        };

        state.set(
            issued.access_token.as_str(),
            self.clock.now_secs(),
            issued.expires_in,
        );
        info!(
            expires_in = issued.expires_in,
            refresh_at = state.refresh_at(),
            "access token refreshed"
        );
        if state.valid_token(self.clock.now_secs()).is_none() {
            warn!(
                expires_in = issued.expires_in,
                "token lifetime is shorter than the refresh margin; next call will refresh again"
            );
        }
        Ok(issued.access_token)
    }
}
