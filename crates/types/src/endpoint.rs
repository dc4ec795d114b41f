//! The closed registry of Creator custom API functions and their shapes.

use crate::error::{Result, ZohoError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Identifies a registered custom API function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Endpoint {
    CreateTransaction,
    CreateCashOrder,
    GetChatClientAccounts,
    GetFavRoutes,
    #[serde(rename = "OrderToJSON")]
    OrderToJson,
}

impl Endpoint {
    /// Returns all registered endpoints.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[
            Self::CreateTransaction,
            Self::CreateCashOrder,
            Self::GetChatClientAccounts,
            Self::GetFavRoutes,
            Self::OrderToJson,
        ]
    }

    /// Canonical function name, used verbatim as the last URL path segment.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::CreateTransaction => "CreateTransaction",
            Self::CreateCashOrder => "CreateCashOrder",
            Self::GetChatClientAccounts => "GetChatClientAccounts",
            Self::GetFavRoutes => "GetFavRoutes",
            Self::OrderToJson => "OrderToJSON",
        }
    }

    /// The `(request, response)` shapes registered for this endpoint.
    #[must_use]
    pub fn shapes(self) -> (&'static Shape, &'static Shape) {
        let request = match self {
            Self::CreateTransaction => &CREATE_TRANSACTION_REQUEST,
            Self::CreateCashOrder => &CREATE_CASH_ORDER_REQUEST,
            Self::GetChatClientAccounts => &GET_CHAT_CLIENT_ACCOUNTS_REQUEST,
            Self::GetFavRoutes => &GET_FAV_ROUTES_REQUEST,
            Self::OrderToJson => &ORDER_TO_JSON_REQUEST,
        };
        (request, &FUNCTION_RESPONSE)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Endpoint {
    type Err = ZohoError;

    /// Parse a canonical function name into an [`Endpoint`].
    ///
    /// # Errors
    ///
    /// Returns [`ZohoError::UnknownEndpoint`] if the name is not registered.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|e| e.name() == s)
            .ok_or_else(|| ZohoError::UnknownEndpoint(s.to_string()))
    }
}

/// Free-function form of [`Endpoint::shapes`].
#[must_use]
pub fn shapes_for(endpoint: Endpoint) -> (&'static Shape, &'static Shape) {
    endpoint.shapes()
}

/// Free-function form of [`Endpoint::name`].
#[must_use]
pub fn name_of(endpoint: Endpoint) -> &'static str {
    endpoint.name()
}

/// Wire type of a single shape field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Integer,
    Float,
    /// A string that may be absent or `null`.
    OptionalString,
    /// Any JSON value, including `null`, but the key must be present.
    Json,
}

impl FieldType {
    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Float => value.is_number(),
            Self::OptionalString => value.is_string() || value.is_null(),
            Self::Json => true,
        }
    }

    fn required(self) -> bool {
        !matches!(self, Self::OptionalString)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::OptionalString => "string?",
            Self::Json => "json",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub ty: FieldType,
}

const fn field(name: &'static str, ty: FieldType) -> Field {
    Field { name, ty }
}

/// Structural schema of a request or response object.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Shape {
    pub name: &'static str,
    pub fields: &'static [Field],
}

impl Shape {
    /// Check that `value` is an object carrying every required field with
    /// the declared type. Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ZohoError::SchemaMismatch`] naming the first offending field.
    pub fn validate(&self, value: &Value) -> Result<()> {
        let Some(obj) = value.as_object() else {
            return Err(ZohoError::SchemaMismatch(format!(
                "{}: expected a JSON object",
                self.name
            )));
        };
        for f in self.fields {
            match obj.get(f.name) {
                None if f.ty.required() => {
                    return Err(ZohoError::SchemaMismatch(format!(
                        "{}: missing required field `{}`",
                        self.name, f.name
                    )));
                }
                Some(v) if !f.ty.accepts(v) => {
                    return Err(ZohoError::SchemaMismatch(format!(
                        "{}: field `{}` expected {}, got {v}",
                        self.name, f.name, f.ty
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

use FieldType::{Float, Integer, Json, OptionalString, String as Str};

static CREATE_TRANSACTION_REQUEST: Shape = Shape {
    name: "CreateTransactionRequest",
    fields: &[
        field("branch", Str),
        field("agent", Str),
        field("trType", Str),
        field("clientAcc", Str),
        field("status", Str),
        field("trDesc", Str),
        field("notes", OptionalString),
    ],
};

static CREATE_CASH_ORDER_REQUEST: Shape = Shape {
    name: "CreateCashOrderRequest",
    fields: &[
        field("Order_Type_ID", Str),
        field("Client_Account_ID", Str),
        field("From_sum", Float),
        field("To_sum", Float),
        field("Client_Quote_Math", Float),
        field("Client_Quote_PC", Float),
        field("agent", Str),
    ],
};

static GET_CHAT_CLIENT_ACCOUNTS_REQUEST: Shape = Shape {
    name: "GetChatClientAccountsRequest",
    fields: &[field("Telegram_Group_ID", Str)],
};

static GET_FAV_ROUTES_REQUEST: Shape = Shape {
    name: "GetFavRoutesRequest",
    fields: &[field("route_category", Str)],
};

static ORDER_TO_JSON_REQUEST: Shape = Shape {
    name: "OrderToJSONRequest",
    fields: &[field("orderID", Integer)],
};

// Every registered function answers with the same envelope.
static FUNCTION_RESPONSE: Shape = Shape {
    name: "FunctionResponse",
    fields: &[field("code", Integer), field("result", Json)],
};
