//! Span-local redaction.
//!
//! Only `High` findings are rewritten and only their exact span changes.
//! Everything else in the string, including safe commands chained before
//! or after, stays byte-identical.

use crate::patterns::{BLOCKED_MARKER, SUBSTITUTION_MARKER};
use crate::risk::severity;
use crate::types::{Finding, FindingCategory, RiskLevel};

/// Marker that replaces a finding's span.
pub fn marker_for(category: FindingCategory) -> &'static str {
    match category {
        FindingCategory::Substitution => SUBSTITUTION_MARKER,
        FindingCategory::DangerousToken | FindingCategory::Chaining | FindingCategory::Piping => {
            BLOCKED_MARKER
        }
    }
}

/// Rewrite every `High` finding in `value`, left to right.
///
/// Returns the new string and the findings that were actually redacted.
/// A finding nested in an already-redacted span (a token inside a
/// substitution) is dropped; the outer span wins.
pub fn redact<'f>(value: &str, findings: &'f [Finding]) -> (String, Vec<&'f Finding>) {
    let mut targets: Vec<&Finding> = findings
        .iter()
        .filter(|f| severity(f) == RiskLevel::High)
        .collect();
    // Earliest first; on equal starts the wider span first.
    targets.sort_by_key(|f| (f.span_start, std::cmp::Reverse(f.span_end)));

    let mut out = value.to_string();
    let mut applied = Vec::new();
    let mut covered_until = 0usize;
    let mut shift: isize = 0;

    for finding in targets {
        if finding.span_start < covered_until {
            continue;
        }
        let marker = marker_for(finding.category);
        let start = offset(finding.span_start, shift);
        let end = offset(finding.span_end, shift);

        out.replace_range(start..end, marker);

        shift += marker.len() as isize - (finding.span_end - finding.span_start) as isize;
        covered_until = finding.span_end;
        applied.push(finding);
    }

    (out, applied)
}

fn offset(pos: usize, shift: isize) -> usize {
    (pos as isize + shift) as usize
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
