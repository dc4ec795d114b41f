//! Access-token state and expiry logic.

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Source of "now" as UNIX seconds.
pub trait Clock: Send + Sync {
    fn now_secs(&self) -> i64;
}

/// Wall-clock [`Clock`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> i64 {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_secs();
        i64::try_from(secs).unwrap_or(i64::MAX)
    }
}

/// A [`Clock`] that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock(AtomicI64);

impl ManualClock {
    #[must_use]
    pub fn new(secs: i64) -> Self {
        Self(AtomicI64::new(secs))
    }

    pub fn set(&self, secs: i64) {
        self.0.store(secs, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: i64) {
        self.0.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_secs(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Usability of the current access token at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenStatus {
    /// No token has been obtained yet.
    Absent,
    /// `now < expires_at - refresh_margin`; calls proceed without refreshing.
    Valid,
    /// `now >= expires_at - refresh_margin`; the next call must refresh first.
    Stale,
}

/// The single access token owned by a client instance.
///
/// Only the refresh path writes it. The effective deadline is
/// `expires_at - refresh_margin` and is *not* clamped: a server lifetime
/// shorter than the margin yields a token that is stale on arrival.
#[derive(Clone)]
pub struct TokenState {
    access_token: Option<String>,
    expires_at: i64,
    refresh_margin: i64,
}

impl TokenState {
    /// An empty state with the given refresh margin.
    #[must_use]
    pub fn new(refresh_margin: Duration) -> Self {
        Self {
            access_token: None,
            expires_at: 0,
            refresh_margin: i64::try_from(refresh_margin.as_secs()).unwrap_or(i64::MAX),
        }
    }

    /// Record a freshly issued token valid for `expires_in` seconds from `now`.
    pub fn set(&mut self, access_token: impl Into<String>, now: i64, expires_in: i64) {
        self.access_token = Some(access_token.into());
        self.expires_at = now.saturating_add(expires_in);
    }

    /// Instant (UNIX seconds) from which the token is considered stale.
    #[must_use]
    pub fn refresh_at(&self) -> i64 {
        self.expires_at.saturating_sub(self.refresh_margin)
    }

    /// Server-declared expiry, without the margin applied.
    #[must_use]
    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    #[must_use]
    pub fn status(&self, now: i64) -> TokenStatus {
        match self.access_token {
            None => TokenStatus::Absent,
            Some(_) if now < self.refresh_at() => TokenStatus::Valid,
            Some(_) => TokenStatus::Stale,
        }
    }

    /// The token, only if it is [`TokenStatus::Valid`] at `now`.
    #[must_use]
    pub fn valid_token(&self, now: i64) -> Option<&str> {
        match self.status(now) {
            TokenStatus::Valid => self.access_token.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Debug for TokenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenState")
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("expires_at", &self.expires_at)
            .field("refresh_margin", &self.refresh_margin)
            .finish()
    }
}

/// Diagnostic view of a [`TokenState`] that never carries the token itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenSnapshot {
    pub status: TokenStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_at: Option<i64>,
}

impl TokenSnapshot {
    #[must_use]
    pub fn of(state: &TokenState, now: i64) -> Self {
        let status = state.status(now);
        Self {
            status,
            refresh_at: (status != TokenStatus::Absent).then(|| state.refresh_at()),
        }
    }
}
