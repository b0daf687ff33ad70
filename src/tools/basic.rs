use anyhow::Result;
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::tools::args::parse_string_param;
use crate::tools::Tool;

const DEFAULT_GREETING_NAME: &str = "MCP 用户";

pub struct HelloTool;

#[async_trait]
impl Tool for HelloTool {
    fn name(&self) -> &'static str {
        "hello"
    }

    fn description(&self) -> &'static str {
        "返回一段问候语"
    }

    fn default_args(&self) -> Value {
        json!({ "name": DEFAULT_GREETING_NAME })
    }

    async fn execute(&self, args: Option<&Value>) -> Result<Value> {
        let name = parse_string_param(args, "name", DEFAULT_GREETING_NAME);
        let echoed = serde_json::to_string(args.unwrap_or(&json!({})))?;
        Ok(json!({ "message": format!("Hello {name}! 你传入的内容是: {echoed}") }))
    }
}

pub struct TimeTool;

#[async_trait]
impl Tool for TimeTool {
    fn name(&self) -> &'static str {
        "time"
    }

    fn description(&self) -> &'static str {
        "返回当前时间"
    }

    fn default_args(&self) -> Value {
        json!({})
    }

    async fn execute(&self, _args: Option<&Value>) -> Result<Value> {
        Ok(json!({ "now": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true) }))
    }
}
