//! toolguard-core — shared types, configuration and errors for toolguard.
//!
//! Everything here is plain data: the sanitizer and the validation
//! orchestrator both depend on it, nothing in it depends on them.

pub mod config;
pub mod error;
pub mod types;

pub use config::{GuardConfig, ToolPolicy};
pub use error::{GuardError, Result};
pub use types::{ContentBlock, IntelligenceLevel, ToolResult};
