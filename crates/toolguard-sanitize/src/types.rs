//! Shared data types for toolguard-sanitize.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

// ---------------------------------------------------------------------------
// FieldRole
// ---------------------------------------------------------------------------

/// Semantic role of one argument, derived from its key (and the schema).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRole {
    /// Identifiers, paths, file names, owners. Never inspected.
    Structural,
    /// Search terms, free text, documentation. Never inspected.
    Content,
    /// The value may reach a shell or interpreter. Inspected.
    CommandCandidate,
}

impl FieldRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldRole::Structural => "structural",
            FieldRole::Content => "content",
            FieldRole::CommandCandidate => "command-candidate",
        }
    }
}

impl fmt::Display for FieldRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Finding
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FindingCategory {
    /// `;`, `&&`, `||`, background `&`, newline.
    Chaining,
    /// `|`.
    Piping,
    /// Backtick or `$( ... )` span.
    Substitution,
    /// A high-risk command word with invocation evidence.
    DangerousToken,
}

impl FindingCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingCategory::Chaining => "chaining",
            FindingCategory::Piping => "piping",
            FindingCategory::Substitution => "substitution",
            FindingCategory::DangerousToken => "dangerous-token",
        }
    }
}

impl fmt::Display for FindingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detected span inside one string value.
///
/// `span_start..span_end` is a byte range into the original, unsanitized value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub key: String,
    pub matched_pattern: String,
    pub span_start: usize,
    pub span_end: usize,
    pub category: FindingCategory,
}

impl Finding {
    pub fn new(
        key: &str,
        matched_pattern: impl Into<String>,
        span: Range<usize>,
        category: FindingCategory,
    ) -> Self {
        Self {
            key: key.to_string(),
            matched_pattern: matched_pattern.into(),
            span_start: span.start,
            span_end: span.end,
            category,
        }
    }

    pub fn span(&self) -> Range<usize> {
        self.span_start..self.span_end
    }

    /// The matched text within `value`.
    pub fn text<'a>(&self, value: &'a str) -> &'a str {
        &value[self.span()]
    }
}

// ---------------------------------------------------------------------------
// RiskLevel
// ---------------------------------------------------------------------------

/// Ordered risk: `None < Low < Medium < High`. Only `High` is redacted.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::None => "none",
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    pub fn requires_sanitization(&self) -> bool {
        matches!(self, RiskLevel::High)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SanitizationDecision
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionAction {
    Allowed,
    Sanitized,
}

impl DecisionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionAction::Allowed => "allowed",
            DecisionAction::Sanitized => "sanitized",
        }
    }
}

/// What happened to one field, for decision logs and audit output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizationDecision {
    /// Dotted path for nested fields (`options.script`), `[i]` for array items.
    pub key: String,
    pub action: DecisionAction,
    pub reason: String,
}

impl SanitizationDecision {
    pub fn allowed(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            action: DecisionAction::Allowed,
            reason: reason.into(),
        }
    }

    pub fn sanitized(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            action: DecisionAction::Sanitized,
            reason: reason.into(),
        }
    }

    pub fn is_sanitized(&self) -> bool {
        self.action == DecisionAction::Sanitized
    }
}
