//! Parameter classifier: assigns a [`FieldRole`] to each argument.
//!
//! Rules run top to bottom and the first match wins:
//!   1. Declared executable by the schema → command candidate.
//!   2. Non-string value → content or structural (never inspected).
//!   3. Key has a content fragment → content.
//!   4. Key has a structural fragment → structural.
//!   5. Key has a command fragment → command candidate.
//!   6. Anything else → structural.
//!
//! Content and structural fragments are checked strictly before command
//! fragments, so `commandDescription` is content and `scriptPath` is
//! structural.

use serde_json::Value;

use crate::patterns::{
    COMMAND_FRAGMENTS, CONTENT_FRAGMENTS, MIN_SUBSTRING_FRAGMENT_LEN, STRUCTURAL_FRAGMENTS,
};
use crate::types::FieldRole;

/// Classify one argument by key and value.
///
/// `declared_executable` is the schema's explicit marking for this field.
pub fn classify(key: &str, value: &Value, declared_executable: bool) -> FieldRole {
    if declared_executable {
        return FieldRole::CommandCandidate;
    }

    let lower = key.to_ascii_lowercase();
    let segments = key_segments(key);

    if !value.is_string() {
        return if has_fragment(&lower, &segments, CONTENT_FRAGMENTS) {
            FieldRole::Content
        } else {
            FieldRole::Structural
        };
    }

    if has_fragment(&lower, &segments, CONTENT_FRAGMENTS) {
        return FieldRole::Content;
    }
    if has_fragment(&lower, &segments, STRUCTURAL_FRAGMENTS) {
        return FieldRole::Structural;
    }
    if COMMAND_FRAGMENTS.iter().any(|frag| lower.contains(frag)) {
        return FieldRole::CommandCandidate;
    }

    FieldRole::Structural
}

// ---------------------------------------------------------------------------
// Key segmentation
// ---------------------------------------------------------------------------

/// Split a key into lowercase words on `_`, `-`, `.`, spaces and camelCase
/// humps: `buildCommand` → `["build", "command"]`, `repo_id` → `["repo", "id"]`.
fn key_segments(key: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut prev_lower_or_digit = false;

    for c in key.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
            prev_lower_or_digit = false;
            continue;
        }
        if c.is_uppercase() && prev_lower_or_digit && !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
        prev_lower_or_digit = c.is_lowercase() || c.is_ascii_digit();
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

/// Substring match on the lowercased key, except for short fragments,
/// which must equal a whole segment.
fn has_fragment(lower: &str, segments: &[String], fragments: &[&str]) -> bool {
    fragments.iter().any(|frag| {
        if frag.len() >= MIN_SUBSTRING_FRAGMENT_LEN {
            lower.contains(frag)
        } else {
            segments.iter().any(|seg| seg == frag)
        }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
