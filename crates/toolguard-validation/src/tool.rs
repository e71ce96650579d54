//! Guarded tools: a handler bound to its name, schema and guard.
//!
//! `GuardedTool` is what a tool registry holds. Every `execute` runs the
//! full pipeline at the level the config assigns to this tool's name.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use toolguard_core::ToolResult;

use crate::handler::ToolHandler;
use crate::orchestrator::ToolGuard;
use crate::schema::JsonArgumentSchema;

/// Trait that all invocable tools implement.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name for this tool (e.g. "run_script").
    fn name(&self) -> &str;
    /// Human-readable description of what this tool does.
    fn description(&self) -> &str;
    /// JSON Schema for the tool's input parameters.
    fn input_schema(&self) -> serde_json::Value;
    /// Execute the tool with the given raw input.
    async fn execute(&self, input: serde_json::Value) -> ToolResult;
}

/// Advertised shape of a tool, as listed to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

pub struct GuardedTool<A, H> {
    name: String,
    description: String,
    schema: JsonArgumentSchema<A>,
    handler: H,
    guard: Arc<ToolGuard>,
}

impl<A, H> GuardedTool<A, H> {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: JsonArgumentSchema<A>,
        handler: H,
        guard: Arc<ToolGuard>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            schema,
            handler,
            guard,
        }
    }
}

#[async_trait]
impl<A, H> Tool for GuardedTool<A, H>
where
    A: DeserializeOwned + Send + 'static,
    H: ToolHandler<A>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn input_schema(&self) -> serde_json::Value {
        self.schema.document().clone()
    }

    async fn execute(&self, input: serde_json::Value) -> ToolResult {
        let level = self.guard.config().intelligence_for(&self.name);
        self.guard
            .run(&self.name, input, &self.schema, &self.handler, level)
            .await
    }
}

/// Convert a slice of tools to their advertised definitions.
pub fn to_definitions(tools: &[Box<dyn Tool>]) -> Vec<ToolDefinition> {
    tools
        .iter()
        .map(|t| ToolDefinition {
            name: t.name().to_string(),
            description: t.description().to_string(),
            input_schema: t.input_schema(),
        })
        .collect()
}
