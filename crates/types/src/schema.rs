//! Statically typed request/response pairs for the endpoint registry.

use crate::endpoint::Endpoint;
use crate::error::{Result, ZohoError};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

/// Binds a request type to its registered endpoint and response type.
pub trait EndpointRequest: Serialize {
    const ENDPOINT: Endpoint;
    type Response: DeserializeOwned;
}

/// Envelope returned by every registered custom function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    pub code: i64,
    pub result: Value,
}

pub type CreateTransactionResponse = FunctionResponse;
pub type CreateCashOrderResponse = FunctionResponse;
pub type GetChatClientAccountsResponse = FunctionResponse;
pub type GetFavRoutesResponse = FunctionResponse;
pub type OrderToJsonResponse = FunctionResponse;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub branch: String,
    pub agent: String,
    pub tr_type: String,
    pub client_acc: String,
    pub status: String,
    pub tr_desc: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl EndpointRequest for CreateTransactionRequest {
    const ENDPOINT: Endpoint = Endpoint::CreateTransaction;
    type Response = CreateTransactionResponse;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCashOrderRequest {
    #[serde(rename = "Order_Type_ID")]
    pub order_type_id: String,
    #[serde(rename = "Client_Account_ID")]
    pub client_account_id: String,
    #[serde(rename = "From_sum")]
    pub from_sum: f64,
    #[serde(rename = "To_sum")]
    pub to_sum: f64,
    #[serde(rename = "Client_Quote_Math")]
    pub client_quote_math: f64,
    #[serde(rename = "Client_Quote_PC")]
    pub client_quote_pc: f64,
    pub agent: String,
}

impl EndpointRequest for CreateCashOrderRequest {
    const ENDPOINT: Endpoint = Endpoint::CreateCashOrder;
    type Response = CreateCashOrderResponse;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetChatClientAccountsRequest {
    #[serde(rename = "Telegram_Group_ID")]
    pub telegram_group_id: String,
}

impl EndpointRequest for GetChatClientAccountsRequest {
    const ENDPOINT: Endpoint = Endpoint::GetChatClientAccounts;
    type Response = GetChatClientAccountsResponse;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetFavRoutesRequest {
    pub route_category: String,
}

impl EndpointRequest for GetFavRoutesRequest {
    const ENDPOINT: Endpoint = Endpoint::GetFavRoutes;
    type Response = GetFavRoutesResponse;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderToJsonRequest {
    #[serde(rename = "orderID")]
    pub order_id: i64,
}

impl EndpointRequest for OrderToJsonRequest {
    const ENDPOINT: Endpoint = Endpoint::OrderToJson;
    type Response = OrderToJsonResponse;
}

/// Flatten a request object into query-string pairs for GET calls.
///
/// Strings are passed verbatim, other scalars as their JSON text, nested
/// values as compact JSON; `null` fields are omitted.
///
/// # Errors
///
/// Returns [`ZohoError::SchemaMismatch`] if `value` is not a JSON object.
pub fn to_query_pairs(value: &Value) -> Result<Vec<(String, String)>> {
    let obj = value.as_object().ok_or_else(|| {
        ZohoError::SchemaMismatch("query parameters must be a JSON object".into())
    })?;
    Ok(obj
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| {
            let s = match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (k.clone(), s)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_transaction() -> CreateTransactionRequest {
        CreateTransactionRequest {
            branch: "HQ".into(),
            agent: "bot".into(),
            tr_type: "deposit".into(),
            client_acc: "ACC-1".into(),
            status: "new".into(),
            tr_desc: "first".into(),
            notes: None,
        }
    }

    #[test]
    fn test_transaction_wire_names_match_shape() {
        let value = serde_json::to_value(sample_transaction()).unwrap();
        let (req, _) = CreateTransactionRequest::ENDPOINT.shapes();
        assert!(req.validate(&value).is_ok());
        assert_eq!(value["trType"], "deposit");
        assert_eq!(value["clientAcc"], "ACC-1");
    }

    /// Serialize, check against the registered request shape, decode back.
    fn assert_wire_roundtrip<R>(request: &R)
    where
        R: EndpointRequest + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let value = serde_json::to_value(request).unwrap();
        let (shape, _) = R::ENDPOINT.shapes();
        assert!(shape.validate(&value).is_ok(), "{}: {value}", R::ENDPOINT);
        let back: R = serde_json::from_value(value).unwrap();
        assert_eq!(&back, request);
    }

    #[test]
    fn test_every_typed_request_roundtrips_field_for_field() {
        assert_wire_roundtrip(&sample_transaction());
        assert_wire_roundtrip(&CreateTransactionRequest {
            notes: Some("call back after 5pm".into()),
            ..sample_transaction()
        });
        assert_wire_roundtrip(&CreateCashOrderRequest {
            order_type_id: "7".into(),
            client_account_id: "42".into(),
            from_sum: 1000.0,
            to_sum: 995.5,
            client_quote_math: 0.9955,
            client_quote_pc: 0.45,
            agent: "desk".into(),
        });
        assert_wire_roundtrip(&GetChatClientAccountsRequest {
            telegram_group_id: "-100123".into(),
        });
        assert_wire_roundtrip(&GetFavRoutesRequest {
            route_category: "cash".into(),
        });
        assert_wire_roundtrip(&OrderToJsonRequest {
            order_id: 3_541_189_000_008_268_029,
        });
    }

    #[test]
    fn test_transaction_notes_default_to_none() {
        let decoded: CreateTransactionRequest = serde_json::from_value(json!({
            "branch": "HQ",
            "agent": "bot",
            "trType": "deposit",
            "clientAcc": "ACC-1",
            "status": "new",
            "trDesc": "first"
        }))
        .unwrap();
        assert_eq!(decoded, sample_transaction());
    }

    #[test]
    fn test_response_decodes_equal_to_direct_construction() {
        let raw = json!({"code": 3000, "result": {"routes": ["a", "b"]}});
        let decoded: GetFavRoutesResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(
            decoded,
            FunctionResponse {
                code: 3000,
                result: json!({"routes": ["a", "b"]}),
            }
        );
    }

    #[test]
    fn test_query_pairs_flatten_scalars() {
        let pairs = to_query_pairs(&json!({
            "orderID": 3_541_189_000_008_268_029_i64,
            "name": "x y",
            "notes": null,
            "nested": {"a": 1}
        }))
        .unwrap();
        assert!(pairs.contains(&("orderID".into(), "3541189000008268029".into())));
        assert!(pairs.contains(&("name".into(), "x y".into())));
        assert!(pairs.contains(&("nested".into(), r#"{"a":1}"#.into())));
        assert!(!pairs.iter().any(|(k, _)| k == "notes"));
    }

    #[test]
    fn test_query_pairs_reject_non_object() {
        assert!(matches!(
            to_query_pairs(&json!([1])),
            Err(ZohoError::SchemaMismatch(_))
        ));
    }
}
