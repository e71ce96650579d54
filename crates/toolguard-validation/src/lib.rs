//! toolguard-validation — schema checking and sanitization in front of tool handlers.
//!
//! The orchestrator ([`ToolGuard`]) rejects malformed input before a handler
//! sees it, rewrites injection spans in command-candidate fields, and turns
//! handler failures into error results instead of propagating them.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use serde_json::{json, Value};
//! use toolguard_core::{IntelligenceLevel, ToolResult};
//! use toolguard_validation::{handler_fn, validate, HandlerError, JsonArgumentSchema};
//!
//! #[tokio::main]
//! async fn main() {
//!     let schema = JsonArgumentSchema::<Value>::new(json!({
//!         "type": "object",
//!         "properties": { "command": { "type": "string" } },
//!         "required": ["command"]
//!     }))
//!     .unwrap();
//!     let run = handler_fn(|args: Value| async move {
//!         Ok::<_, HandlerError>(ToolResult::success(format!("would run: {}", args["command"])))
//!     });
//!
//!     let result = validate(
//!         json!({ "command": "make && rm -rf /" }),
//!         &schema,
//!         &run,
//!         IntelligenceLevel::Smart,
//!     )
//!     .await;
//!     println!("{}", result.text());
//! }
//! ```

pub mod handler;
pub mod orchestrator;
pub mod outcome;
pub mod schema;
pub mod tool;

pub use handler::{handler_fn, FnHandler, HandlerError, ToolHandler};
pub use orchestrator::{validate, ToolGuard};
pub use outcome::{error_result, Accepted, ValidationOutcome};
pub use schema::{ArgumentSchema, JsonArgumentSchema, Violations, EXECUTABLE_KEYWORD};
pub use tool::{to_definitions, GuardedTool, Tool, ToolDefinition};
