//! Remote methods exposed by the gateway
//!
//! Only `grocery.list`, `grocery.add` and `grocery.done` are published;
//! remove and clear stay on the CLI and tool surfaces.

use super::protocol::RpcError;
use crate::dstask::ItemId;
use crate::grocery::{GroceryAction, GroceryList, GroceryOutcome};
use crate::{GroceryError, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// A named remote method that decodes its parameters into a grocery action
pub trait GatewayMethod: Send + Sync {
    /// Method name as called over the wire
    fn name(&self) -> &'static str;

    /// Decode the raw parameters
    fn decode(&self, params: Option<Value>) -> Result<GroceryAction>;
}

fn decode_params<T: DeserializeOwned + Default>(params: Option<Value>) -> Result<T> {
    match params {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => serde_json::from_value(value)
            .map_err(|e| GroceryError::validation(format!("Invalid params: {e}"))),
    }
}

/// `grocery.list`, no parameters
pub struct ListMethod;

impl GatewayMethod for ListMethod {
    fn name(&self) -> &'static str {
        "grocery.list"
    }

    fn decode(&self, _params: Option<Value>) -> Result<GroceryAction> {
        Ok(GroceryAction::List)
    }
}

#[derive(Debug, Default, Deserialize)]
struct AddParams {
    #[serde(default)]
    item: Option<String>,
}

/// `grocery.add { item }`
pub struct AddMethod;

impl GatewayMethod for AddMethod {
    fn name(&self) -> &'static str {
        "grocery.add"
    }

    fn decode(&self, params: Option<Value>) -> Result<GroceryAction> {
        let params: AddParams = decode_params(params)?;
        GroceryAction::from_request("add", params.item.as_deref(), None)
    }
}

#[derive(Debug, Default, Deserialize)]
struct DoneParams {
    #[serde(default)]
    id: Option<ItemId>,
}

/// `grocery.done { id }`, where the id may be a string or a number
pub struct DoneMethod;

impl GatewayMethod for DoneMethod {
    fn name(&self) -> &'static str {
        "grocery.done"
    }

    fn decode(&self, params: Option<Value>) -> Result<GroceryAction> {
        let params: DoneParams = decode_params(params)?;
        GroceryAction::from_request("done", None, params.id.as_ref().map(ItemId::as_str))
    }
}

/// Registry of remote methods bound to a grocery list
pub struct GatewayMethods {
    grocery: Arc<GroceryList>,
    methods: HashMap<&'static str, Box<dyn GatewayMethod>>,
}

impl GatewayMethods {
    /// Create a registry with the published grocery methods
    pub fn new(grocery: Arc<GroceryList>) -> Self {
        let mut methods = Self {
            grocery,
            methods: HashMap::new(),
        };
        methods.register(ListMethod);
        methods.register(AddMethod);
        methods.register(DoneMethod);
        methods
    }

    /// Register a method under its name
    pub fn register<M: GatewayMethod + 'static>(&mut self, method: M) {
        self.methods.insert(method.name(), Box::new(method));
    }

    /// Registered method names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.methods.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Call a method and encode its result
    pub async fn call(
        &self,
        method: &str,
        params: Option<Value>,
    ) -> std::result::Result<Value, RpcError> {
        let handler = self
            .methods
            .get(method)
            .ok_or_else(|| RpcError::method_not_found(method))?;

        let action = handler.decode(params).map_err(|e| {
            tracing::debug!("Rejected {} params: {}", method, e);
            RpcError::from(e)
        })?;

        match self.grocery.clone().execute_blocking(action).await {
            Ok(outcome) => Ok(encode_outcome(outcome)),
            Err(e) => {
                tracing::error!("Gateway method '{}' failed: {}", method, e);
                Err(RpcError::from(e))
            }
        }
    }
}

/// `{ ok: true, items }` for listings, `{ ok: true, message }` otherwise
pub fn encode_outcome(outcome: GroceryOutcome) -> Value {
    match outcome {
        GroceryOutcome::Items(items) => json!({ "ok": true, "items": items }),
        GroceryOutcome::Message(message) => json!({ "ok": true, "message": message }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dstask::DstaskVerb;
    use crate::gateway::protocol::{INVALID_PARAMS, METHOD_NOT_FOUND, SERVER_ERROR};
    use crate::test_utils::{test_list, MockRunner};

    fn methods(runner: Arc<MockRunner>) -> GatewayMethods {
        GatewayMethods::new(Arc::new(test_list(runner)))
    }

    #[test]
    fn test_published_methods() {
        let methods = methods(Arc::new(MockRunner::new()));
        assert_eq!(
            methods.names(),
            vec!["grocery.add", "grocery.done", "grocery.list"]
        );
    }

    #[tokio::test]
    async fn test_list_returns_items() {
        let runner = Arc::new(MockRunner::new().respond(
            DstaskVerb::Next,
            r#"[{"id": 3, "summary": "milk", "status": "pending", "tags": ["grocery"], "priority": "P2"}]"#,
        ));
        let result = methods(runner).call("grocery.list", None).await.unwrap();

        assert_eq!(result["ok"], true);
        assert_eq!(result["items"][0]["id"], "3");
        assert_eq!(result["items"][0]["summary"], "milk");
        assert_eq!(result["items"][0]["priority"], "P2");
    }

    #[tokio::test]
    async fn test_add_returns_message() {
        let runner = Arc::new(MockRunner::new());
        let result = methods(runner.clone())
            .call("grocery.add", Some(json!({"item": "apples"})))
            .await
            .unwrap();

        assert_eq!(
            result,
            json!({"ok": true, "message": "Added \"apples\" to grocery list"})
        );
        assert_eq!(runner.calls(), vec![vec!["add", "apples", "+grocery"]]);
    }

    #[tokio::test]
    async fn test_add_without_item_is_invalid_params() {
        let runner = Arc::new(MockRunner::new());
        let err = methods(runner.clone())
            .call("grocery.add", Some(json!({})))
            .await
            .unwrap_err();

        assert_eq!(err.code, INVALID_PARAMS);
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_done_accepts_numeric_id() {
        let runner = Arc::new(MockRunner::new());
        let result = methods(runner.clone())
            .call("grocery.done", Some(json!({"id": 5})))
            .await
            .unwrap();

        assert_eq!(result["message"], "Marked item 5 as bought");
        assert_eq!(runner.calls(), vec![vec!["done", "5"]]);
    }

    #[tokio::test]
    async fn test_done_with_wrong_param_type_is_invalid_params() {
        let err = methods(Arc::new(MockRunner::new()))
            .call("grocery.done", Some(json!({"id": [1]})))
            .await
            .unwrap_err();
        assert_eq!(err.code, INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_remove_is_not_published() {
        let err = methods(Arc::new(MockRunner::new()))
            .call("grocery.remove", Some(json!({"id": "1"})))
            .await
            .unwrap_err();
        assert_eq!(err.code, METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_tool_failure_is_server_error() {
        let runner = Arc::new(MockRunner::new().fail(DstaskVerb::Done, "no such task"));
        let err = methods(runner)
            .call("grocery.done", Some(json!({"id": "9"})))
            .await
            .unwrap_err();

        assert_eq!(err.code, SERVER_ERROR);
        assert_eq!(
            err.data,
            Some(json!({"ok": false, "error": "dstask command failed: no such task"}))
        );
    }
}
