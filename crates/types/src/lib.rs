//! Core types for the zcreator workspace.
//!
//! This crate defines the shared vocabulary used by every other layer: the
//! error taxonomy, the access-token state machine, the closed registry of
//! Creator custom functions and the typed request/response pairs bound to
//! each of them.

pub mod endpoint;
pub mod error;
pub mod schema;
pub mod token;

pub use endpoint::{Endpoint, Field, FieldType, Shape, name_of, shapes_for};
pub use error::{CallError, ErrorKind, Result, ZohoError};
pub use schema::{
    CreateCashOrderRequest, CreateCashOrderResponse, CreateTransactionRequest,
    CreateTransactionResponse, EndpointRequest, FunctionResponse, GetChatClientAccountsRequest,
    GetChatClientAccountsResponse, GetFavRoutesRequest, GetFavRoutesResponse, OrderToJsonRequest,
    OrderToJsonResponse, to_query_pairs,
};
pub use token::{Clock, ManualClock, SystemClock, TokenSnapshot, TokenState, TokenStatus};
