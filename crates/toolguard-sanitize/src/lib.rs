//! toolguard-sanitize — role-aware command-injection sanitization for tool arguments.
//!
//! Pipeline per field:
//!   1. [`classify`] assigns a role from the key name (content and structural
//!      keys are never inspected, whatever their value says);
//!   2. [`detect`] scans command-candidate strings for operators,
//!      substitutions and invoked dangerous commands;
//!   3. [`assess`] turns findings into a risk level;
//!   4. [`redact`] replaces only the `High` spans with a fixed marker.
//!
//! Nothing here rejects input: the worst outcome is a rewritten string.
//!
//! # Quick start
//!
//! ```rust
//! use std::collections::BTreeSet;
//! use toolguard_core::IntelligenceLevel;
//! use toolguard_sanitize::inspect_arguments;
//!
//! let args = serde_json::json!({
//!     "query": "how do I undo rm -rf",
//!     "command": "npm run build && rm -rf dist",
//! });
//! let out = inspect_arguments(
//!     args.as_object().unwrap(),
//!     IntelligenceLevel::Smart,
//!     &BTreeSet::new(),
//! );
//! assert_eq!(out.arguments["query"], "how do I undo rm -rf");
//! assert_eq!(out.arguments["command"], "npm run build && [BLOCKED] -rf dist");
//! ```

pub mod arguments;
pub mod classify;
pub mod detect;
pub mod patterns;
pub mod redact;
pub mod risk;
pub mod shell;
pub mod types;

pub use arguments::{inspect_arguments, Inspection};
pub use classify::classify;
pub use detect::detect;
pub use patterns::{BLOCKED_MARKER, SUBSTITUTION_MARKER};
pub use redact::redact;
pub use risk::assess;
pub use types::{
    DecisionAction, FieldRole, Finding, FindingCategory, RiskLevel, SanitizationDecision,
};
