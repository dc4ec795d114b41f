//! Configuration loading for the zcreator client.
//!
//! Uses figment to layer serialized defaults, an optional YAML file and the
//! process environment, then narrows the result to immutable [`Credentials`].

pub mod credentials;
pub mod schema;

pub use credentials::Credentials;
pub use schema::Config;
