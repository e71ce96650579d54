use thiserror::Error;

#[derive(Debug, Error)]
pub enum GuardError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Top-level arguments were null, a scalar, or an array.
    #[error("Invalid input structure: expected an object of named arguments, got {found}")]
    InputStructure { found: String },

    /// `shown` is already capped; `total` counts every violation.
    #[error("{}", render_violations(.shown, .total))]
    SchemaViolation { shown: Vec<String>, total: usize },

    #[error("Invalid tool schema: {0}")]
    InvalidSchema(String),

    #[error("Tool execution failed: {0}")]
    HandlerExecution(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GuardError {
    /// Short error code placed in `structuredContent` of error results.
    pub fn code(&self) -> &'static str {
        match self {
            GuardError::Config(_) => "CONFIG_ERROR",
            GuardError::InputStructure { .. } => "INVALID_INPUT_STRUCTURE",
            GuardError::SchemaViolation { .. } => "SCHEMA_VIOLATION",
            GuardError::InvalidSchema(_) => "INVALID_SCHEMA",
            GuardError::HandlerExecution(_) => "HANDLER_EXECUTION_ERROR",
            GuardError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Build a `SchemaViolation` from the full list, keeping at most `cap` messages.
    pub fn schema_violation(mut violations: Vec<String>, cap: usize) -> Self {
        let total = violations.len();
        violations.truncate(cap);
        GuardError::SchemaViolation {
            shown: violations,
            total,
        }
    }
}

fn render_violations(shown: &[String], total: &usize) -> String {
    let mut out = format!("Validation failed: {}", shown.join("; "));
    let hidden = total.saturating_sub(shown.len());
    if hidden > 0 {
        out.push_str(&format!(" (and {hidden} more)"));
    }
    out
}

pub type Result<T> = std::result::Result<T, GuardError>;
