//! Per-argument pipeline: classify → detect → assess → redact.
//!
//! Walks an argument object field by field. Nested objects are walked with
//! dotted paths; each nested key is classified by its own name. Only
//! command-candidate strings are scanned, and only `High` spans inside them
//! are rewritten.

use std::collections::BTreeSet;

use serde_json::{Map, Value};
use toolguard_core::IntelligenceLevel;
use tracing::{debug, warn};

use crate::classify::classify;
use crate::detect::detect;
use crate::redact::redact;
use crate::risk::assess;
use crate::types::{FieldRole, Finding, SanitizationDecision};

/// Result of inspecting one argument object.
#[derive(Debug, Clone, Default)]
pub struct Inspection {
    /// The arguments after redaction (a copy of the input when nothing matched).
    pub arguments: Map<String, Value>,
    /// One entry per inspected field.
    pub decisions: Vec<SanitizationDecision>,
    /// Every finding, including ones that did not lead to redaction.
    pub findings: Vec<Finding>,
}

impl Inspection {
    pub fn sanitized_fields(&self) -> impl Iterator<Item = &SanitizationDecision> {
        self.decisions.iter().filter(|d| d.is_sanitized())
    }

    /// True when at least one field was rewritten.
    pub fn changed(&self) -> bool {
        self.sanitized_fields().next().is_some()
    }
}

/// Inspect and sanitize `args` at `level`.
///
/// `executable` holds dotted paths the schema explicitly declares executable.
/// At `Minimal` the arguments are returned untouched with no decisions.
pub fn inspect_arguments(
    args: &Map<String, Value>,
    level: IntelligenceLevel,
    executable: &BTreeSet<String>,
) -> Inspection {
    if !level.inspects_fields() {
        return Inspection {
            arguments: args.clone(),
            ..Default::default()
        };
    }

    let mut walker = Walker {
        strict: level == IntelligenceLevel::Strict,
        executable,
        decisions: Vec::new(),
        findings: Vec::new(),
    };
    let arguments = walker.object(None, args);

    Inspection {
        arguments,
        decisions: walker.decisions,
        findings: walker.findings,
    }
}

struct Walker<'a> {
    strict: bool,
    executable: &'a BTreeSet<String>,
    decisions: Vec<SanitizationDecision>,
    findings: Vec<Finding>,
}

impl Walker<'_> {
    /// `prefix` is `(reported path, schema path)`. The schema path writes
    /// array elements as `[]` so it lines up with `x-executable` markings.
    fn object(
        &mut self,
        prefix: Option<(&str, &str)>,
        map: &Map<String, Value>,
    ) -> Map<String, Value> {
        map.iter()
            .map(|(key, value)| {
                let (path, schema_path) = match prefix {
                    Some((p, s)) => (format!("{p}.{key}"), format!("{s}.{key}")),
                    None => (key.clone(), key.clone()),
                };
                (key.clone(), self.field(&path, &schema_path, key, value))
            })
            .collect()
    }

    fn field(&mut self, path: &str, schema_path: &str, key: &str, value: &Value) -> Value {
        let declared = self.executable.contains(schema_path);

        match value {
            Value::Object(inner) => Value::Object(self.object(Some((path, schema_path)), inner)),
            Value::String(s) => {
                let role = if self.strict {
                    FieldRole::CommandCandidate
                } else {
                    classify(key, value, declared)
                };
                match role {
                    FieldRole::CommandCandidate => Value::String(self.string(path, s)),
                    FieldRole::Content | FieldRole::Structural => {
                        self.decisions.push(SanitizationDecision::allowed(
                            path,
                            format!("{role} field, not inspected"),
                        ));
                        value.clone()
                    }
                }
            }
            Value::Array(items) => {
                let item_schema = format!("{schema_path}[]");
                let inspect_strings =
                    self.strict || declared || self.executable.contains(&item_schema);
                // Objects inside get decisions of their own.
                if !inspect_strings && !items.iter().any(Value::is_object) {
                    let role = classify(key, value, false);
                    self.decisions.push(SanitizationDecision::allowed(
                        path,
                        format!("{role} list, not inspected"),
                    ));
                }
                let items = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        let item_path = format!("{path}[{i}]");
                        match item {
                            Value::String(s) if inspect_strings => {
                                Value::String(self.string(&item_path, s))
                            }
                            Value::Object(inner) => Value::Object(
                                self.object(Some((item_path.as_str(), item_schema.as_str())), inner),
                            ),
                            other => other.clone(),
                        }
                    })
                    .collect();
                Value::Array(items)
            }
            other => {
                let role = classify(key, other, declared);
                self.decisions.push(SanitizationDecision::allowed(
                    path,
                    format!("{role} value, not a string"),
                ));
                other.clone()
            }
        }
    }

    /// Detect, assess and, at `High`, redact one command-candidate string.
    fn string(&mut self, path: &str, value: &str) -> String {
        let findings = detect(path, value);
        let risk = assess(&findings);

        let out = if risk.requires_sanitization() {
            let (sanitized, applied) = redact(value, &findings);
            let patterns = pattern_list(applied.iter().copied());
            warn!(
                key = path,
                spans = applied.len(),
                patterns = %patterns,
                "sanitized command-candidate field"
            );
            self.decisions.push(SanitizationDecision::sanitized(
                path,
                format!("risk {risk}: redacted {} span(s) [{patterns}]", applied.len()),
            ));
            sanitized
        } else {
            let reason = if findings.is_empty() {
                "command-candidate field, no findings".to_string()
            } else {
                format!(
                    "command-candidate field, risk {risk} [{}] passed through",
                    pattern_list(findings.iter())
                )
            };
            debug!(key = path, %risk, "command-candidate field allowed");
            self.decisions.push(SanitizationDecision::allowed(path, reason));
            value.to_string()
        };

        self.findings.extend(findings);
        out
    }
}

fn pattern_list<'f>(findings: impl Iterator<Item = &'f Finding>) -> String {
    findings
        .map(|f| f.matched_pattern.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn inspect(value: Value, level: IntelligenceLevel) -> Inspection {
        inspect_arguments(&object(value), level, &BTreeSet::new())
    }

    #[test]
    fn content_field_untouched_command_field_sanitized() {
        let out = inspect(
            json!({
                "query": "find dangerous rm -rf examples",
                "command": "ls files; rm -rf /"
            }),
            IntelligenceLevel::Smart,
        );

        assert_eq!(out.arguments["query"], "find dangerous rm -rf examples");
        assert_eq!(out.arguments["command"], "ls files; [BLOCKED] -rf /");
        assert_eq!(out.decisions.len(), 2);
        assert!(!out.decisions[0].is_sanitized());
        assert!(out.decisions[1].is_sanitized());
        assert!(out.changed());
    }

    #[test]
    fn structural_field_untouched() {
        let out = inspect(
            json!({ "owner": "facebook/react-rm-dangerous" }),
            IntelligenceLevel::Smart,
        );
        assert_eq!(out.arguments["owner"], "facebook/react-rm-dangerous");
        assert!(!out.changed());
        assert!(out.findings.is_empty());
    }

    #[test]
    fn key_order_is_preserved() {
        let out = inspect(
            json!({ "zeta": 1, "command": "rm x", "alpha": "a" }),
            IntelligenceLevel::Smart,
        );
        let keys: Vec<&String> = out.arguments.keys().collect();
        assert_eq!(keys, vec!["zeta", "command", "alpha"]);
    }

    #[test]
    fn minimal_level_skips_everything() {
        let out = inspect(json!({ "command": "rm -rf /" }), IntelligenceLevel::Minimal);
        assert_eq!(out.arguments["command"], "rm -rf /");
        assert!(out.decisions.is_empty());
        assert!(out.findings.is_empty());
    }

    #[test]
    fn strict_level_inspects_every_string() {
        let out = inspect(
            json!({
                "query": "x; rm -rf /",
                "args": ["--force", "`whoami`"],
                "count": 3
            }),
            IntelligenceLevel::Strict,
        );
        assert_eq!(out.arguments["query"], "x; [BLOCKED] -rf /");
        assert_eq!(out.arguments["args"], json!(["--force", "[BLOCKED_SUBSTITUTION]"]));
        assert_eq!(out.arguments["count"], 3);
        assert!(out.decisions.iter().any(|d| d.key == "args[1]" && d.is_sanitized()));
    }

    #[test]
    fn nested_objects_use_dotted_paths() {
        let out = inspect(
            json!({
                "options": {
                    "script": "make && reboot",
                    "description": "reboot the box; rm -rf /"
                }
            }),
            IntelligenceLevel::Smart,
        );
        assert_eq!(out.arguments["options"]["script"], "make && [BLOCKED]");
        assert_eq!(out.arguments["options"]["description"], "reboot the box; rm -rf /");
        let keys: Vec<&str> = out.decisions.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, vec!["options.script", "options.description"]);
    }

    #[test]
    fn arrays_are_listing_unless_declared_executable() {
        let args = object(json!({ "commands": ["ls", "sudo reboot"] }));

        let plain = inspect_arguments(&args, IntelligenceLevel::Smart, &BTreeSet::new());
        assert_eq!(plain.arguments["commands"][1], "sudo reboot");

        let declared: BTreeSet<String> = ["commands".to_string()].into_iter().collect();
        let marked = inspect_arguments(&args, IntelligenceLevel::Smart, &declared);
        assert_eq!(marked.arguments["commands"][1], "[BLOCKED] [BLOCKED]");
    }

    #[test]
    fn objects_inside_arrays_are_walked() {
        let out = inspect(
            json!({ "steps": [{ "run": "ok", "shellCommand": "ls; kill -9 1" }] }),
            IntelligenceLevel::Smart,
        );
        assert_eq!(out.arguments["steps"][0]["shellCommand"], "ls; [BLOCKED] -9 1");
        assert!(out.decisions.iter().any(|d| d.key == "steps[0].shellCommand"));
        // The list itself gets no "not inspected" entry when its objects are walked.
        assert!(out.decisions.iter().all(|d| d.key != "steps"));
    }

    #[test]
    fn array_item_markings_use_the_schema_path() {
        let args = object(json!({
            "steps": [{ "hook": "make; halt", "label": "build; reboot" }],
            "lines": ["ls", "pkill node"]
        }));
        let declared: BTreeSet<String> = ["steps[].hook".to_string(), "lines[]".to_string()]
            .into_iter()
            .collect();

        let out = inspect_arguments(&args, IntelligenceLevel::Smart, &declared);
        assert_eq!(out.arguments["steps"][0]["hook"], "make; [BLOCKED]");
        assert_eq!(out.arguments["steps"][0]["label"], "build; reboot");
        assert_eq!(out.arguments["lines"][1], "[BLOCKED] node");
        assert!(out.decisions.iter().any(|d| d.key == "steps[0].hook" && d.is_sanitized()));
    }

    #[test]
    fn passed_through_findings_are_explained() {
        let out = inspect(json!({ "command": "pwd && date" }), IntelligenceLevel::Smart);
        assert_eq!(out.arguments["command"], "pwd && date");
        assert!(out.decisions[0].reason.contains("risk low"));
        assert_eq!(out.findings.len(), 1);
    }
}
