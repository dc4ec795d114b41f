//! OAuth token handling for the Zoho accounts service.
//!
//! [`refresh`] implements the refresh-token grant, [`bootstrap`] the one-time
//! authorization-code grant, and the [`TokenManager`] runs the
//! ensure-valid-token state machine on top of them.

pub mod bootstrap;
pub mod manager;
pub mod refresh;

pub use manager::TokenManager;
