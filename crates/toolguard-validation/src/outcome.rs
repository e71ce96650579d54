use serde_json::{json, Map, Value};
use toolguard_core::{GuardError, ToolResult};
use toolguard_sanitize::{Finding, SanitizationDecision};

/// Result of the validation stages, before the handler runs.
#[derive(Debug)]
pub enum ValidationOutcome<A> {
    /// Input structure or schema failure. The handler must not run.
    Rejected(GuardError),
    Accepted(Accepted<A>),
}

/// Arguments cleared for the handler.
#[derive(Debug)]
pub struct Accepted<A> {
    /// Typed arguments, built from the sanitized object.
    pub args: A,
    pub sanitized_arguments: Map<String, Value>,
    /// Empty at `Minimal`.
    pub decisions: Vec<SanitizationDecision>,
    pub findings: Vec<Finding>,
}

impl<A> Accepted<A> {
    pub fn sanitized_count(&self) -> usize {
        self.decisions.iter().filter(|d| d.is_sanitized()).count()
    }
}

impl<A> ValidationOutcome<A> {
    pub fn is_rejected(&self) -> bool {
        matches!(self, ValidationOutcome::Rejected(_))
    }

    /// Violations listed in a rejection (already capped). Empty when accepted.
    pub fn violations(&self) -> Vec<String> {
        match self {
            ValidationOutcome::Rejected(GuardError::SchemaViolation { shown, .. }) => shown.clone(),
            ValidationOutcome::Rejected(err) => vec![err.to_string()],
            ValidationOutcome::Accepted(_) => Vec::new(),
        }
    }
}

/// Error-flagged `ToolResult` for a rejection or a caught handler failure.
///
/// `structuredContent` carries the stable error code, plus the violation
/// list and total count for schema rejections.
pub fn error_result(err: &GuardError) -> ToolResult {
    let structured = match err {
        GuardError::SchemaViolation { shown, total } => json!({
            "code": err.code(),
            "violations": shown,
            "total": total,
        }),
        _ => json!({ "code": err.code() }),
    };
    ToolResult::error(err.to_string()).with_structured(structured)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_rejection_result_carries_violations() {
        let err = GuardError::schema_violation(
            vec!["a: bad".into(), "b: bad".into(), "c: bad".into(), "d: bad".into()],
            3,
        );
        let res = error_result(&err);

        assert!(res.is_error);
        let structured = res.structured_content.unwrap();
        assert_eq!(structured["code"], "SCHEMA_VIOLATION");
        assert_eq!(structured["violations"].as_array().unwrap().len(), 3);
        assert_eq!(structured["total"], 4);
    }

    #[test]
    fn input_structure_rejection_lists_itself() {
        let outcome: ValidationOutcome<()> =
            ValidationOutcome::Rejected(GuardError::InputStructure {
                found: "null".into(),
            });
        assert!(outcome.is_rejected());
        assert_eq!(outcome.violations().len(), 1);
        assert!(outcome.violations()[0].starts_with("Invalid input structure"));
    }
}
