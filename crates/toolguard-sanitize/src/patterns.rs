//! Read-only pattern tables.
//!
//! Everything here is `static`: fragment lists are plain slices and the two
//! token regexes compile once on first use. Nothing is ever mutated, so any
//! number of concurrent inspections can read these without locking.

use std::sync::LazyLock;

use regex::Regex;

/// Replaces an invoked dangerous command word.
pub const BLOCKED_MARKER: &str = "[BLOCKED]";
/// Replaces a whole backtick or `$( ... )` span.
pub const SUBSTITUTION_MARKER: &str = "[BLOCKED_SUBSTITUTION]";

// ---------------------------------------------------------------------------
// Key-name fragments
// ---------------------------------------------------------------------------

/// Keys carrying free text. Matched before every other rule.
pub const CONTENT_FRAGMENTS: &[&str] = &[
    "query",
    "search",
    "description",
    "text",
    "content",
    "comment",
    "message",
    "title",
    "body",
    "documentation",
    "note",
    "instructions",
];

/// Keys carrying identifiers and locations. Matched after content, before command.
pub const STRUCTURAL_FRAGMENTS: &[&str] = &[
    "owner",
    "repo",
    "path",
    "file",
    "branch",
    "tag",
    "id",
    "name",
    "classname",
    "methodname",
    "variablename",
];

/// Keys whose values may be handed to a shell. Plain substring match.
pub const COMMAND_FRAGMENTS: &[&str] = &["command", "script", "exec", "shell", "bash"];

/// Override fragments at least this long match anywhere in the lowercased
/// key. Shorter ones (`id`, `tag`) must equal a whole key segment, so `id`
/// matches `repo_id` but not `provider` or `idle_command`.
pub const MIN_SUBSTRING_FRAGMENT_LEN: usize = 4;

// ---------------------------------------------------------------------------
// Command words
// ---------------------------------------------------------------------------

/// `(command word, family)` pairs flagged when invoked.
///
/// Matched against the basename of the word with quotes and backslashes
/// removed, so `/bin/rm`, `"rm"` and `\rm` all count as `rm`.
pub const DANGEROUS_COMMANDS: &[(&str, &str)] = &[
    // File and disk destruction.
    ("rm", "deletion"),
    ("rmdir", "deletion"),
    ("unlink", "deletion"),
    ("shred", "deletion"),
    ("srm", "deletion"),
    ("wipefs", "deletion"),
    ("dd", "raw disk write"),
    ("mkfs", "filesystem format"),
    ("fdisk", "partition edit"),
    // Privilege escalation.
    ("sudo", "privilege escalation"),
    ("su", "privilege escalation"),
    ("doas", "privilege escalation"),
    ("pkexec", "privilege escalation"),
    // Process termination and system state.
    ("kill", "process termination"),
    ("killall", "process termination"),
    ("pkill", "process termination"),
    ("shutdown", "system shutdown"),
    ("reboot", "system shutdown"),
    ("halt", "system shutdown"),
    ("poweroff", "system shutdown"),
    // Evaluates its arguments as a new command line.
    ("eval", "dynamic evaluation"),
];

/// Interpreters that turn a pipeline into fetch-and-execute (`curl ... | sh`).
/// Only flagged directly after `|`.
pub const PIPE_TARGET_INTERPRETERS: &[&str] = &[
    "sh", "bash", "zsh", "dash", "ksh", "fish", "python", "python3", "perl", "ruby", "node",
];

/// Words that run the following word as a command (`xargs rm`, `nohup rm`).
/// The detector looks through these, and their flags, to the real command.
pub const WRAPPER_COMMANDS: &[&str] = &[
    "env", "nohup", "nice", "time", "xargs", "exec", "command", "builtin", "stdbuf",
];

/// Wrappers whose `-v`/`-V` flag prints what a name resolves to instead of
/// running it.
pub const LOOKUP_WRAPPERS: &[&str] = &["command"];

/// Upper bound on wrapper/assignment words skipped at one command position.
pub const MAX_WRAPPER_DEPTH: usize = 8;

static DANGEROUS_COMMAND_RE: LazyLock<Regex> = LazyLock::new(|| {
    let names: Vec<&str> = DANGEROUS_COMMANDS
        .iter()
        .map(|(name, _)| *name)
        .filter(|name| *name != "mkfs")
        .collect();
    // mkfs ships as mkfs.ext4, mkfs.xfs, ... on most systems.
    let pattern = format!(r"(?i)^(?:{}|mkfs(?:\.[a-z0-9]+)?)$", names.join("|"));
    Regex::new(&pattern).expect("dangerous command table is a valid regex")
});

static PIPE_TARGET_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"(?i)^(?:{})$", PIPE_TARGET_INTERPRETERS.join("|"));
    Regex::new(&pattern).expect("interpreter table is a valid regex")
});

static ASSIGNMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*=").expect("assignment pattern is a valid regex")
});

/// Family of `word` if it is a dangerous command, `None` otherwise.
pub fn dangerous_command(word: &str) -> Option<&'static str> {
    if !DANGEROUS_COMMAND_RE.is_match(word) {
        return None;
    }
    let lower = word.to_ascii_lowercase();
    let name = if lower.starts_with("mkfs") { "mkfs" } else { lower.as_str() };
    DANGEROUS_COMMANDS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, family)| *family)
}

pub fn is_pipe_target_interpreter(word: &str) -> bool {
    PIPE_TARGET_RE.is_match(word)
}

pub fn is_wrapper_command(word: &str) -> bool {
    WRAPPER_COMMANDS
        .iter()
        .any(|wrapper| word.eq_ignore_ascii_case(wrapper))
}

pub fn is_lookup_wrapper(word: &str) -> bool {
    LOOKUP_WRAPPERS
        .iter()
        .any(|wrapper| word.eq_ignore_ascii_case(wrapper))
}

/// `FOO=bar` style prefix assignment.
pub fn is_env_assignment(word: &str) -> bool {
    ASSIGNMENT_RE.is_match(word)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
