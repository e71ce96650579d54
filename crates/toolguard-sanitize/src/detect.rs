//! Injection detector for command-candidate strings.
//!
//! Three independent rules, each reporting exact byte spans:
//!   - chaining/piping: `;` `&&` `||` `|` (plus background `&` and newline)
//!     outside quoted literals;
//!   - substitution: backtick or `$( ... )` spans, anywhere;
//!   - dangerous token: a dangerous command word with invocation evidence,
//!     i.e. the first word of the string or the first word after an operator.
//!
//! Mentioning a dangerous word is not invoking it. `find rm -rf examples`
//! and `/rm.*-rf/` produce no token findings because `rm` is never at a
//! command position.

use crate::patterns::{
    dangerous_command, is_env_assignment, is_lookup_wrapper, is_pipe_target_interpreter,
    is_wrapper_command, MAX_WRAPPER_DEPTH,
};
use crate::shell::{self, Operator};
use crate::types::{Finding, FindingCategory};

/// All findings for `value`, ordered by span start.
pub fn detect(key: &str, value: &str) -> Vec<Finding> {
    let ops = shell::operators(value);
    let mut findings: Vec<Finding> = ops.iter().map(|op| operator_finding(key, op)).collect();

    for (pattern, span) in shell::substitutions(value) {
        findings.push(Finding::new(key, pattern, span, FindingCategory::Substitution));
    }

    for (pos, after_pipe) in shell::command_positions(&ops) {
        invoked_tokens(key, value, pos, after_pipe, &mut findings);
    }

    findings.sort_by_key(|f| (f.span_start, f.span_end));
    findings
}

fn operator_finding(key: &str, op: &Operator) -> Finding {
    let category = if op.is_pipe() {
        FindingCategory::Piping
    } else {
        FindingCategory::Chaining
    };
    let pattern = if op.op == "\n" { "newline" } else { op.op };
    Finding::new(key, pattern, op.span.clone(), category)
}

/// Walk the words at one command position and record every dangerous
/// command actually invoked there.
///
/// Assignments (`FOO=1`) and wrappers (`xargs`, `nohup`, ...) with their
/// flags are looked through. Privilege escalation is flagged and then
/// looked through as well, so `sudo rm -rf /` flags both words.
fn invoked_tokens(
    key: &str,
    value: &str,
    pos: usize,
    after_pipe: bool,
    findings: &mut Vec<Finding>,
) {
    let mut from = pos;
    let mut in_wrapper = false;
    let mut lookup_capable = false;

    for _ in 0..MAX_WRAPPER_DEPTH {
        let Some(range) = shell::word_at(value, from) else {
            return;
        };
        let word = &value[range.clone()];
        from = range.end;

        // Globs and patterns are data, never a command name.
        if word.contains(&['*', '?', '['][..]) {
            return;
        }
        if in_wrapper && word.starts_with('-') {
            // `command -v rm` only looks `rm` up.
            if lookup_capable && word[1..].contains(&['v', 'V'][..]) {
                return;
            }
            continue;
        }
        if is_env_assignment(word) {
            continue;
        }

        let name = shell::command_name(word);
        if is_wrapper_command(&name) {
            in_wrapper = true;
            lookup_capable = is_lookup_wrapper(&name);
            continue;
        }

        if let Some(family) = dangerous_command(&name) {
            findings.push(Finding::new(
                key,
                name.to_ascii_lowercase(),
                range,
                FindingCategory::DangerousToken,
            ));
            if family == "privilege escalation" {
                in_wrapper = true;
                lookup_capable = false;
                continue;
            }
            return;
        }

        if after_pipe && !in_wrapper && is_pipe_target_interpreter(&name) {
            findings.push(Finding::new(
                key,
                format!("| {}", name.to_ascii_lowercase()),
                range,
                FindingCategory::DangerousToken,
            ));
        }
        return;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
