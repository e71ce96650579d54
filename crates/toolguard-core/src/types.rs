//! Data types shared by the sanitizer and the orchestrator.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// IntelligenceLevel
// ---------------------------------------------------------------------------

/// How aggressively tool arguments are inspected before the handler runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntelligenceLevel {
    /// Schema validation only; no classification or sanitization.
    Minimal,
    /// Role-aware inspection: only command-candidate fields are scanned.
    #[default]
    Smart,
    /// Every string field is treated as a command candidate.
    ///
    /// Meant for tools that have no safe fields at all.
    Strict,
}

impl IntelligenceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntelligenceLevel::Minimal => "minimal",
            IntelligenceLevel::Smart => "smart",
            IntelligenceLevel::Strict => "strict",
        }
    }

    /// Whether classification and sanitization run at all.
    pub fn inspects_fields(&self) -> bool {
        !matches!(self, IntelligenceLevel::Minimal)
    }
}

impl fmt::Display for IntelligenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ToolResult
// ---------------------------------------------------------------------------

/// One block of tool output. Only text is produced by this subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }
}

/// Result of a guarded tool call, in the shape the transport layer serializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<ContentBlock>,
    /// Whether the call failed (rejected input or handler failure).
    #[serde(default)]
    pub is_error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<serde_json::Value>,
}

impl ToolResult {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
            is_error: false,
            structured_content: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(message)],
            is_error: true,
            structured_content: None,
        }
    }

    pub fn with_structured(mut self, value: serde_json::Value) -> Self {
        self.structured_content = Some(value);
        self
    }

    /// Concatenated text of all content blocks, newline separated.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(|block| match block {
                ContentBlock::Text { text } => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_result_serializes_in_transport_shape() {
        let res = ToolResult::error("nope").with_structured(serde_json::json!({"code": "X"}));
        let json = serde_json::to_string(&res).unwrap();

        assert!(json.contains(r#""type":"text""#));
        assert!(json.contains(r#""isError":true"#));
        assert!(json.contains(r#""structuredContent":{"code":"X"}"#));
    }

    #[test]
    fn structured_content_absent_when_unset() {
        let json = serde_json::to_string(&ToolResult::success("ok")).unwrap();
        assert!(!json.contains("structuredContent"));
        assert!(json.contains(r#""isError":false"#));
    }

    #[test]
    fn intelligence_level_parses_lowercase() {
        let level: IntelligenceLevel = serde_json::from_str(r#""strict""#).unwrap();
        assert_eq!(level, IntelligenceLevel::Strict);
        assert_eq!(IntelligenceLevel::default(), IntelligenceLevel::Smart);
        assert!(!IntelligenceLevel::Minimal.inspects_fields());
    }
}
