pub mod args;
pub mod basic;
pub mod recipes;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::recipes::store::RecipeSource;
use crate::tools::basic::{HelloTool, TimeTool};
use crate::tools::recipes::{
    FindRecipesByIngredientsTool, GetRecipeCategoriesTool, GetRecipeDetailTool,
    RandomRecipeTool, SearchRecipesTool, WhatToEatTool,
};

/// A named operation callable through `tools/execute`.
///
/// Arguments arrive as loosely typed JSON; every tool tolerates missing or
/// mistyped fields and falls back to its defaults. Expected failures are
/// reported inside the returned value, `Err` is reserved for faults.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn default_args(&self) -> Value;
    async fn execute(&self, args: Option<&Value>) -> Result<Value>;
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "defaultArgs")]
    pub default_args: Value,
}

#[derive(Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn with_defaults(source: Arc<dyn RecipeSource>) -> Self {
        let tools: Vec<Arc<dyn Tool>> = vec![
            Arc::new(HelloTool),
            Arc::new(TimeTool),
            Arc::new(SearchRecipesTool::new(source.clone())),
            Arc::new(RandomRecipeTool::new(source.clone())),
            Arc::new(WhatToEatTool::new(source.clone())),
            Arc::new(FindRecipesByIngredientsTool::new(source.clone())),
            Arc::new(GetRecipeDetailTool::new(source.clone())),
            Arc::new(GetRecipeCategoriesTool::new(source)),
        ];
        Self { tools }
    }

    pub fn from_tools(tools: Vec<Arc<dyn Tool>>) -> Self {
        Self { tools }
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn by_name(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|tool| tool.name() == name).cloned()
    }

    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools
            .iter()
            .map(|tool| ToolDescriptor {
                name: tool.name(),
                description: tool.description(),
                default_args: tool.default_args(),
            })
            .collect()
    }
}
