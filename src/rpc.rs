//! `tools/list` and `tools/execute` dispatch plus the two response envelopes.

use std::str::FromStr;

use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::tools::ToolRegistry;

pub const METHOD_LIST: &str = "tools/list";
pub const METHOD_EXECUTE: &str = "tools/execute";
pub const SUPPORTED_METHODS: [&str; 2] = [METHOD_LIST, METHOD_EXECUTE];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseMode {
    Rpc,
    #[default]
    Simple,
}

impl ResponseMode {
    /// `?mode=` value; anything unrecognised gets the simple envelope.
    pub fn from_query(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.parse().ok()).unwrap_or_default()
    }
}

#[derive(Debug, Error)]
#[error("unknown response mode: {0}")]
pub struct ResponseModeParseError(pub String);

impl FromStr for ResponseMode {
    type Err = ResponseModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "rpc" => Ok(Self::Rpc),
            "simple" => Ok(Self::Simple),
            _ => Err(ResponseModeParseError(s.to_string())),
        }
    }
}

/// A request body, read leniently: any JSON value is accepted and missing
/// fields read as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RpcRequest {
    pub method: String,
    pub params: Option<Value>,
    pub id: Option<Value>,
}

impl RpcRequest {
    pub fn from_value(body: &Value) -> Self {
        Self {
            method: body
                .get("method")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            params: body.get("params").cloned(),
            id: body
                .get("id")
                .filter(|id| id.is_string() || id.is_number())
                .cloned(),
        }
    }

    pub fn parse(bytes: &[u8]) -> Result<Self, DispatchError> {
        let body: Value = serde_json::from_slice(bytes).map_err(|_| DispatchError::InvalidBody)?;
        Ok(Self::from_value(&body))
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Invalid or empty JSON body")]
    InvalidBody,
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Unknown method")]
    UnknownMethod,
    #[error("{0}")]
    ToolFailed(String),
}

impl DispatchError {
    /// Whether the caller is at fault (HTTP 400) rather than the tool (500).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::ToolFailed(_))
    }
}

pub async fn dispatch(registry: &ToolRegistry, request: &RpcRequest) -> Result<Value, DispatchError> {
    match request.method.as_str() {
        METHOD_LIST => Ok(json!(registry.descriptors())),
        METHOD_EXECUTE => {
            let params = request.params.as_ref();
            let name = params
                .and_then(|params| params.get("name"))
                .and_then(Value::as_str)
                .unwrap_or_default();
            let tool = registry
                .by_name(name)
                .ok_or_else(|| DispatchError::UnknownTool(name.to_string()))?;
            let args = params.and_then(|params| params.get("arguments"));
            debug!("executing tool {name}");
            tool.execute(args).await.map_err(|error| {
                warn!("tool {name} failed: {error:#}");
                DispatchError::ToolFailed(error.to_string())
            })
        }
        _ => Err(DispatchError::UnknownMethod),
    }
}

/// Wraps a dispatch outcome in the envelope for `mode`.
pub fn make_response(
    mode: ResponseMode,
    id: Option<&Value>,
    outcome: Result<Value, &DispatchError>,
) -> Value {
    let id = id.cloned().unwrap_or(Value::Null);
    match (mode, outcome) {
        (ResponseMode::Rpc, Ok(result)) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        (ResponseMode::Rpc, Err(error)) => {
            json!({ "jsonrpc": "2.0", "id": id, "error": { "message": error.to_string() } })
        }
        (ResponseMode::Simple, Ok(result)) => json!({ "result": result }),
        (ResponseMode::Simple, Err(error)) => json!({ "error": error.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use tokio_test::{assert_err, assert_ok};

    use crate::recipes::fixtures::kitchen;
    use crate::recipes::store::StaticRecipeStore;
    use crate::rpc::{dispatch, make_response, DispatchError, ResponseMode, RpcRequest};
    use crate::tools::{Tool, ToolRegistry};

    fn registry() -> ToolRegistry {
        ToolRegistry::with_defaults(Arc::new(StaticRecipeStore::new(kitchen())))
    }

    #[test]
    fn mode_falls_back_to_simple() {
        assert_eq!(ResponseMode::from_query(Some("rpc")), ResponseMode::Rpc);
        assert_eq!(ResponseMode::from_query(Some("simple")), ResponseMode::Simple);
        assert_eq!(ResponseMode::from_query(Some("xml")), ResponseMode::Simple);
        assert_eq!(ResponseMode::from_query(None), ResponseMode::Simple);
        assert!("xml".parse::<ResponseMode>().is_err());
    }

    #[test]
    fn request_reading_is_lenient() {
        assert_eq!(RpcRequest::parse(b""), Err(DispatchError::InvalidBody));
        assert_eq!(RpcRequest::parse(b"{nope"), Err(DispatchError::InvalidBody));

        let request = RpcRequest::parse(br#"{"method":"tools/list","id":7}"#).expect("parse");
        assert_eq!(request.method, "tools/list");
        assert_eq!(request.id, Some(json!(7)));

        let request = RpcRequest::from_value(&json!({ "id": { "nested": true } }));
        assert_eq!(request.method, "");
        assert!(request.id.is_none());
    }

    #[test]
    fn envelopes_per_mode() {
        let id = json!("abc");
        assert_eq!(
            make_response(ResponseMode::Simple, Some(&id), Ok(json!(1))),
            json!({ "result": 1 })
        );
        assert_eq!(
            make_response(ResponseMode::Rpc, Some(&id), Ok(json!(1))),
            json!({ "jsonrpc": "2.0", "id": "abc", "result": 1 })
        );
        let error = DispatchError::UnknownTool("nope".to_string());
        assert_eq!(
            make_response(ResponseMode::Simple, None, Err(&error)),
            json!({ "error": "Unknown tool: nope" })
        );
        assert_eq!(
            make_response(ResponseMode::Rpc, None, Err(&error)),
            json!({ "jsonrpc": "2.0", "id": null, "error": { "message": "Unknown tool: nope" } })
        );
    }

    #[tokio::test]
    async fn lists_and_executes_tools() {
        let registry = registry();
        let listed = assert_ok!(
            dispatch(&registry, &RpcRequest::from_value(&json!({ "method": "tools/list" }))).await
        );
        assert_eq!(listed.as_array().map(Vec::len), Some(8));
        assert_eq!(listed[2]["name"], "searchRecipes");

        let request = RpcRequest::from_value(&json!({
            "method": "tools/execute",
            "params": { "name": "getRecipeDetail", "arguments": { "recipeId": "meat-1" } }
        }));
        let value = assert_ok!(dispatch(&registry, &request).await);
        assert_eq!(value["recipe"]["name"], "红烧肉");
    }

    #[tokio::test]
    async fn reports_unknown_tool_and_method() {
        let registry = registry();
        let request = RpcRequest::from_value(&json!({
            "method": "tools/execute",
            "params": { "name": "getAllWebsites" }
        }));
        let error = assert_err!(dispatch(&registry, &request).await);
        assert_eq!(error.to_string(), "Unknown tool: getAllWebsites");
        assert!(error.is_client_error());

        let request = RpcRequest::from_value(&json!({ "method": "tools/call" }));
        let error = assert_err!(dispatch(&registry, &request).await);
        assert_eq!(error, DispatchError::UnknownMethod);
    }

    struct BrokenTool;

    #[async_trait]
    impl Tool for BrokenTool {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn description(&self) -> &'static str {
            "always fails"
        }

        fn default_args(&self) -> Value {
            json!({})
        }

        async fn execute(&self, _args: Option<&Value>) -> Result<Value> {
            Err(anyhow!("kitchen on fire"))
        }
    }

    #[tokio::test]
    async fn tool_faults_are_server_errors() {
        let tools: Vec<Arc<dyn Tool>> = vec![Arc::new(BrokenTool)];
        let registry = ToolRegistry::from_tools(tools);
        let request = RpcRequest::from_value(&json!({
            "method": "tools/execute",
            "params": { "name": "broken" }
        }));
        let error = dispatch(&registry, &request).await.expect_err("fault");
        assert_eq!(error, DispatchError::ToolFailed("kitchen on fire".to_string()));
        assert!(!error.is_client_error());
    }
}
