//! Token-aware HTTP client for Zoho Creator custom API functions.
//!
//! [`CreatorClient::call`] reaches any function by name and returns remote
//! failures as data; [`CreatorClient::call_typed`] and
//! [`CreatorClient::call_endpoint`] go through the endpoint registry and
//! fail loudly on every error category.

pub mod client;
pub mod http;

pub use client::{ClientOptions, CreatorClient};
pub use http::{CALL_TIMEOUT, CallResult, Method};
