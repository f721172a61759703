//! JSON-RPC 2.0 envelope helpers for the gateway

use crate::GroceryError;
use serde::Serialize;
use serde_json::{json, Value};

/// Invalid JSON was received
pub const PARSE_ERROR: i64 = -32700;
/// The JSON sent is not a valid request object
pub const INVALID_REQUEST: i64 = -32600;
/// The method does not exist
pub const METHOD_NOT_FOUND: i64 = -32601;
/// Invalid method parameters
pub const INVALID_PARAMS: i64 = -32602;
/// Implementation-defined server error
pub const SERVER_ERROR: i64 = -32000;

/// A JSON-RPC error object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcError {
    /// Error code
    pub code: i64,
    /// Short description
    pub message: String,
    /// `{ "ok": false, "error": <message> }`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    /// Create an error whose data mirrors the message
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            code,
            data: Some(json!({ "ok": false, "error": message })),
            message,
        }
    }

    /// A line that is not JSON
    pub fn parse_error(detail: impl std::fmt::Display) -> Self {
        Self::new(PARSE_ERROR, format!("Parse error: {detail}"))
    }

    /// JSON that is not a request object
    pub fn invalid_request(detail: impl std::fmt::Display) -> Self {
        Self::new(INVALID_REQUEST, format!("Invalid request: {detail}"))
    }

    /// A method outside the registry
    pub fn method_not_found(method: &str) -> Self {
        Self::new(METHOD_NOT_FOUND, format!("Method not found: {method}"))
    }
}

impl From<&GroceryError> for RpcError {
    fn from(error: &GroceryError) -> Self {
        let code = if error.is_caller_error() {
            INVALID_PARAMS
        } else {
            SERVER_ERROR
        };
        Self::new(code, error.to_string())
    }
}

impl From<GroceryError> for RpcError {
    fn from(error: GroceryError) -> Self {
        Self::from(&error)
    }
}

/// A decoded request line
#[derive(Debug, Clone, PartialEq)]
pub struct RpcRequest {
    /// Method name
    pub method: String,
    /// Raw parameters, if any
    pub params: Option<Value>,
    /// Request id; `None` marks a notification
    pub id: Option<Value>,
}

impl RpcRequest {
    /// Decode a request object
    ///
    /// On failure the id, when one could be read, is returned with the error
    /// so the reply can still be correlated.
    pub fn from_value(value: Value) -> std::result::Result<Self, (Option<Value>, RpcError)> {
        let Value::Object(mut object) = value else {
            return Err((
                Some(Value::Null),
                RpcError::invalid_request("expected an object"),
            ));
        };

        let id = object.remove("id");
        let method = match object.remove("method") {
            Some(Value::String(method)) => method,
            _ => {
                return Err((
                    id.or(Some(Value::Null)),
                    RpcError::invalid_request("missing method"),
                ))
            }
        };

        Ok(Self {
            method,
            params: object.remove("params").filter(|p| !p.is_null()),
            id,
        })
    }
}

/// Build a success response
pub fn success_response(id: Value, result: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result
    })
}

/// Build an error response
pub fn error_response(id: Value, error: RpcError) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": error
    })
}
