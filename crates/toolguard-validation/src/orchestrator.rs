//! Validation orchestrator — the public entry point around a tool handler.
//!
//! Flow:
//!   input → structure check → schema check ─┬─ rejected (handler never runs)
//!                                            └─ classify → detect → assess →
//!                                               sanitize → invoke handler
//!
//! At `Minimal` the classify..sanitize stages are skipped. Handler errors
//! and panics are caught once and returned as error results; nothing is
//! retried and no timeout is imposed here.

use std::panic::AssertUnwindSafe;

use futures_util::FutureExt;
use serde_json::Value;
use toolguard_core::{GuardConfig, GuardError, IntelligenceLevel, ToolResult};
use toolguard_sanitize::inspect_arguments;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::handler::ToolHandler;
use crate::outcome::{error_result, Accepted, ValidationOutcome};
use crate::schema::ArgumentSchema;

/// Runs the validation pipeline for any number of tool calls.
///
/// Holds only read-only configuration; one instance can be shared by every
/// concurrent call.
#[derive(Debug, Clone, Default)]
pub struct ToolGuard {
    config: GuardConfig,
}

impl ToolGuard {
    pub fn new(config: GuardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Validation stages only: structure, schema and (unless `Minimal`)
    /// sanitization. Never calls a handler.
    pub fn inspect<S: ArgumentSchema>(
        &self,
        raw: &Value,
        schema: &S,
        level: IntelligenceLevel,
    ) -> ValidationOutcome<S::Args> {
        let cap = self.config.max_violations_shown;

        let Some(object) = raw.as_object() else {
            return ValidationOutcome::Rejected(GuardError::InputStructure {
                found: json_kind(raw).to_string(),
            });
        };

        let args = match schema.validate(raw) {
            Ok(args) => args,
            Err(violations) => return ValidationOutcome::Rejected(violations.into_error(cap)),
        };

        let inspection = inspect_arguments(object, level, schema.executable_fields());
        if self.config.debug_decisions {
            for decision in &inspection.decisions {
                debug!(
                    key = %decision.key,
                    action = decision.action.as_str(),
                    reason = %decision.reason,
                    "sanitization decision"
                );
            }
        }

        // Typed arguments must reflect the redacted values, so re-derive them.
        let args = if inspection.changed() {
            let sanitized = Value::Object(inspection.arguments.clone());
            match schema.validate(&sanitized) {
                Ok(args) => args,
                Err(violations) => {
                    return ValidationOutcome::Rejected(violations.into_error(cap))
                }
            }
        } else {
            args
        };

        ValidationOutcome::Accepted(Accepted {
            args,
            sanitized_arguments: inspection.arguments,
            decisions: inspection.decisions,
            findings: inspection.findings,
        })
    }

    /// Validate `raw`, then invoke `handler` with the sanitized typed arguments.
    ///
    /// Always returns a `ToolResult`; rejections and handler failures come
    /// back with `is_error` set.
    pub async fn run<S, H>(
        &self,
        tool: &str,
        raw: Value,
        schema: &S,
        handler: &H,
        level: IntelligenceLevel,
    ) -> ToolResult
    where
        S: ArgumentSchema,
        H: ToolHandler<S::Args> + ?Sized,
    {
        let span = info_span!("tool_call", tool, invocation_id = %Uuid::now_v7(), %level);

        async move {
            let accepted = match self.inspect(&raw, schema, level) {
                ValidationOutcome::Rejected(err) => {
                    info!(code = err.code(), "tool call rejected");
                    return error_result(&err);
                }
                ValidationOutcome::Accepted(accepted) => accepted,
            };

            let sanitized = accepted.sanitized_count();
            if sanitized > 0 {
                warn!(fields = sanitized, "tool arguments sanitized before invocation");
            }

            invoke(handler, accepted.args).await
        }
        .instrument(span)
        .await
    }
}

/// `validate` with default configuration.
pub async fn validate<S, H>(
    raw: Value,
    schema: &S,
    handler: &H,
    intelligence: IntelligenceLevel,
) -> ToolResult
where
    S: ArgumentSchema,
    H: ToolHandler<S::Args> + ?Sized,
{
    ToolGuard::default()
        .run("anonymous", raw, schema, handler, intelligence)
        .await
}

/// Call the handler once, converting an `Err` or a panic into an error result.
async fn invoke<A, H>(handler: &H, args: A) -> ToolResult
where
    A: Send + 'static,
    H: ToolHandler<A> + ?Sized,
{
    let err = match AssertUnwindSafe(handler.call(args)).catch_unwind().await {
        Ok(Ok(result)) => return result,
        Ok(Err(e)) => GuardError::HandlerExecution(e.to_string()),
        Err(panic) => GuardError::HandlerExecution(format!(
            "handler panicked: {}",
            panic_message(panic.as_ref())
        )),
    };

    warn!(error = %err, "tool handler failed");
    error_result(&err)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::JsonArgumentSchema;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn open_schema() -> JsonArgumentSchema<Value> {
        JsonArgumentSchema::new(json!({ "type": "object" })).unwrap()
    }

    #[test]
    fn non_object_inputs_are_structure_errors() {
        let guard = ToolGuard::default();
        for raw in [json!(null), json!([1, 2]), json!("rm -rf /"), json!(7)] {
            match guard.inspect(&raw, &open_schema(), IntelligenceLevel::Smart) {
                ValidationOutcome::Rejected(err) => {
                    assert_eq!(err.code(), "INVALID_INPUT_STRUCTURE")
                }
                ValidationOutcome::Accepted(_) => panic!("accepted {raw}"),
            }
        }
    }

    #[test]
    fn accepted_typed_args_reflect_sanitization() {
        let guard = ToolGuard::default();
        let outcome = guard.inspect(
            &json!({ "command": "echo test; rm -rf dangerous" }),
            &open_schema(),
            IntelligenceLevel::Smart,
        );
        let ValidationOutcome::Accepted(accepted) = outcome else {
            panic!("expected acceptance");
        };
        assert_eq!(accepted.args["command"], "echo test; [BLOCKED] -rf dangerous");
        assert_eq!(accepted.sanitized_count(), 1);
    }

    #[test]
    fn sanitized_value_that_breaks_the_schema_is_rejected() {
        let schema = JsonArgumentSchema::<Value>::new(json!({
            "type": "object",
            "properties": { "command": { "type": "string", "maxLength": 10 } }
        }))
        .unwrap();
        let outcome = ToolGuard::default().inspect(
            &json!({ "command": "rm -rf /" }),
            &schema,
            IntelligenceLevel::Smart,
        );
        assert!(outcome.is_rejected());
    }

    #[test]
    fn violation_cap_follows_config() {
        let guard = ToolGuard::new(GuardConfig {
            max_violations_shown: 1,
            ..GuardConfig::default()
        });
        let schema = JsonArgumentSchema::<Value>::new(json!({
            "type": "object",
            "required": ["a", "b"]
        }))
        .unwrap();
        let outcome = guard.inspect(&json!({}), &schema, IntelligenceLevel::Smart);
        assert_eq!(outcome.violations().len(), 1);
    }

    // --- Decision logs ---

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn logs_for(config: GuardConfig) -> String {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            ToolGuard::new(config).inspect(
                &json!({ "command": "ls; rm -rf /", "query": "x" }),
                &open_schema(),
                IntelligenceLevel::Smart,
            );
        });

        let bytes = logs.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn decisions_are_logged_only_when_enabled() {
        let quiet = logs_for(GuardConfig::default());
        assert!(quiet.contains("sanitized command-candidate field"));
        assert!(!quiet.contains("sanitization decision"));

        let verbose = logs_for(GuardConfig {
            debug_decisions: true,
            ..GuardConfig::default()
        });
        assert_eq!(verbose.matches("sanitization decision").count(), 2);
        assert!(verbose.contains("content field, not inspected"));
    }

    #[test]
    fn panic_messages_are_extracted() {
        let boxed: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(boxed.as_ref()), "boom");
        let boxed: Box<dyn std::any::Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(boxed.as_ref()), "bang");
    }
}
