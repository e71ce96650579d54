//! Schema capability consumed by the orchestrator, plus a JSON Schema backend.
//!
//! The orchestrator only needs `validate(raw) -> Result<Args, Violations>`.
//! [`JsonArgumentSchema`] provides it from a JSON Schema document (the same
//! `input_schema` a tool advertises), using `jsonschema` for constraints and
//! `serde` for the typed arguments.

use std::collections::BTreeSet;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;
use toolguard_core::GuardError;

/// Schema keyword marking a property as passed to a shell.
pub const EXECUTABLE_KEYWORD: &str = "x-executable";

static NO_EXECUTABLE_FIELDS: BTreeSet<String> = BTreeSet::new();

// ---------------------------------------------------------------------------
// Violations
// ---------------------------------------------------------------------------

/// Every field-level failure found for one input, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations(Vec<String>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: impl Into<String>) {
        self.0.push(violation.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Convert into a rejection listing at most `cap` violations.
    pub fn into_error(self, cap: usize) -> GuardError {
        GuardError::schema_violation(self.0, cap)
    }
}

impl From<Vec<String>> for Violations {
    fn from(v: Vec<String>) -> Self {
        Self(v)
    }
}

impl FromIterator<String> for Violations {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// ArgumentSchema
// ---------------------------------------------------------------------------

/// A tool's declared argument shape.
pub trait ArgumentSchema: Send + Sync {
    /// Typed arguments handed to the tool handler.
    type Args: Send + 'static;

    /// Check `raw` and produce typed arguments, or every violation found.
    fn validate(&self, raw: &Value) -> Result<Self::Args, Violations>;

    /// Dotted paths the schema explicitly declares executable.
    fn executable_fields(&self) -> &BTreeSet<String> {
        &NO_EXECUTABLE_FIELDS
    }
}

// ---------------------------------------------------------------------------
// JsonArgumentSchema
// ---------------------------------------------------------------------------

/// JSON Schema backed [`ArgumentSchema`] producing a `serde` type `A`.
///
/// Use `A = serde_json::Value` for handlers that want the raw object.
pub struct JsonArgumentSchema<A> {
    document: Value,
    validator: jsonschema::Validator,
    executable: BTreeSet<String>,
    _args: PhantomData<fn() -> A>,
}

impl<A> JsonArgumentSchema<A> {
    /// Compile `document`. Fails if it is not a valid JSON Schema.
    pub fn new(document: Value) -> toolguard_core::Result<Self> {
        let validator = jsonschema::validator_for(&document)
            .map_err(|e| GuardError::InvalidSchema(e.to_string()))?;
        let mut executable = BTreeSet::new();
        collect_executable(&document, None, &mut executable);

        Ok(Self {
            document,
            validator,
            executable,
            _args: PhantomData,
        })
    }

    /// The schema document, as advertised to callers.
    pub fn document(&self) -> &Value {
        &self.document
    }
}

impl<A> ArgumentSchema for JsonArgumentSchema<A>
where
    A: DeserializeOwned + Send + 'static,
{
    type Args = A;

    fn validate(&self, raw: &Value) -> Result<A, Violations> {
        let violations: Violations = self.validator.iter_errors(raw).map(|e| describe(&e)).collect();
        if !violations.is_empty() {
            return Err(violations);
        }

        serde_json::from_value(raw.clone()).map_err(|e| Violations::from(vec![e.to_string()]))
    }

    fn executable_fields(&self) -> &BTreeSet<String> {
        &self.executable
    }
}

/// `path: message`, with the JSON pointer rendered as a dotted path.
fn describe(err: &jsonschema::ValidationError<'_>) -> String {
    let pointer = err.instance_path.to_string();
    let path = pointer.trim_start_matches('/').replace('/', ".");
    if path.is_empty() {
        err.to_string()
    } else {
        format!("{path}: {err}")
    }
}

/// Record every property path carrying `"x-executable": true`.
///
/// Array elements are written `name[]`, so a marking under
/// `steps.items.properties.hook` is recorded as `steps[].hook`.
fn collect_executable(schema: &Value, prefix: Option<&str>, out: &mut BTreeSet<String>) {
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return;
    };

    for (name, property) in properties {
        let path = match prefix {
            Some(p) => format!("{p}.{name}"),
            None => name.clone(),
        };
        collect_node(property, path, out);
    }
}

fn collect_node(node: &Value, path: String, out: &mut BTreeSet<String>) {
    if node.get(EXECUTABLE_KEYWORD).and_then(Value::as_bool) == Some(true) {
        out.insert(path.clone());
    }
    if let Some(items) = node.get("items").filter(|items| items.is_object()) {
        collect_node(items, format!("{path}[]"), out);
    }
    collect_executable(node, Some(&path), out);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct SearchArgs {
        owner: String,
        #[serde(default)]
        limit: Option<u32>,
    }

    fn search_schema() -> JsonArgumentSchema<SearchArgs> {
        JsonArgumentSchema::new(json!({
            "type": "object",
            "properties": {
                "owner": { "type": "string", "minLength": 1 },
                "limit": { "type": "integer", "minimum": 1 }
            },
            "required": ["owner"]
        }))
        .unwrap()
    }

    #[test]
    fn valid_input_produces_typed_args() {
        let args = search_schema()
            .validate(&json!({ "owner": "rust-lang", "limit": 5 }))
            .unwrap();
        assert_eq!(args.owner, "rust-lang");
        assert_eq!(args.limit, Some(5));
    }

    #[test]
    fn field_violations_name_the_field() {
        let violations = search_schema()
            .validate(&json!({ "owner": "", "limit": 0 }))
            .unwrap_err();
        assert_eq!(violations.len(), 2);
        assert!(violations.iter().any(|v| v.starts_with("owner: ")));
        assert!(violations.iter().any(|v| v.starts_with("limit: ")));
    }

    #[test]
    fn missing_required_field_is_reported() {
        let violations = search_schema().validate(&json!({})).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert!(violations.iter().next().unwrap().contains("owner"));
    }

    #[test]
    fn invalid_schema_document_is_an_error() {
        let err = JsonArgumentSchema::<Value>::new(json!({ "type": "not-a-type" }))
            .err()
            .unwrap();
        assert_eq!(err.code(), "INVALID_SCHEMA");
    }

    #[test]
    fn executable_keyword_collected_with_nested_paths() {
        let schema = JsonArgumentSchema::<Value>::new(json!({
            "type": "object",
            "properties": {
                "steps": { "type": "array", "items": { "type": "string" }, "x-executable": true },
                "options": {
                    "type": "object",
                    "properties": {
                        "hook": { "type": "string", "x-executable": true },
                        "label": { "type": "string" }
                    }
                }
            }
        }))
        .unwrap();

        let fields: Vec<&String> = schema.executable_fields().iter().collect();
        assert_eq!(fields, vec!["options.hook", "steps"]);
    }

    #[test]
    fn executable_keyword_inside_array_items() {
        let schema = JsonArgumentSchema::<Value>::new(json!({
            "type": "object",
            "properties": {
                "steps": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "hook": { "type": "string", "x-executable": true },
                            "label": { "type": "string" }
                        }
                    }
                },
                "lines": {
                    "type": "array",
                    "items": { "type": "string", "x-executable": true }
                }
            }
        }))
        .unwrap();

        let fields: Vec<&String> = schema.executable_fields().iter().collect();
        assert_eq!(fields, vec!["lines[]", "steps[].hook"]);
    }

    #[test]
    fn violations_cap_into_error() {
        let violations: Violations = (0..5).map(|i| format!("f{i}: bad")).collect();
        let msg = violations.into_error(3).to_string();
        assert!(msg.contains("f2: bad"));
        assert!(!msg.contains("f3: bad"));
        assert!(msg.contains("(and 2 more)"));
    }
}
