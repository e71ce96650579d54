//! Minimal quote-aware scanning of a command line.
//!
//! This is not a shell parser. It answers three questions the detector needs:
//! where the control operators are (outside quotes), where command
//! substitutions start and end, and which word sits at each command position.
//!
//! All delimiters are ASCII, so scanning bytes never splits a UTF-8 sequence
//! and every returned offset is a char boundary.

use std::ops::Range;

/// A control operator found outside quoted literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator {
    pub op: &'static str,
    pub span: Range<usize>,
}

impl Operator {
    pub fn is_pipe(&self) -> bool {
        self.op == "|"
    }
}

/// Control operators outside single/double quotes, left to right.
///
/// `&` is only an operator when it is not part of a redirection (`2>&1`, `&>`).
pub fn operators(input: &str) -> Vec<Operator> {
    let bytes = input.as_bytes();
    let mut found = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\'' => i = skip_single_quoted(bytes, i),
            b'"' => i = skip_double_quoted(bytes, i),
            b';' => {
                found.push(Operator { op: ";", span: i..i + 1 });
                i += 1;
            }
            b'\n' => {
                found.push(Operator { op: "\n", span: i..i + 1 });
                i += 1;
            }
            b'|' => {
                if bytes.get(i + 1) == Some(&b'|') {
                    found.push(Operator { op: "||", span: i..i + 2 });
                    i += 2;
                } else {
                    found.push(Operator { op: "|", span: i..i + 1 });
                    i += 1;
                }
            }
            b'&' => {
                if bytes.get(i + 1) == Some(&b'&') {
                    found.push(Operator { op: "&&", span: i..i + 2 });
                    i += 2;
                } else {
                    let redirect = (i > 0 && matches!(bytes[i - 1], b'>' | b'<'))
                        || bytes.get(i + 1) == Some(&b'>');
                    if !redirect {
                        found.push(Operator { op: "&", span: i..i + 1 });
                    }
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }

    found
}

/// Backtick and `$( ... )` spans, including their delimiters.
///
/// Quotes are ignored: the shell still expands `"$(...)"`. Unterminated
/// spans run to the end of the input.
pub fn substitutions(input: &str) -> Vec<(&'static str, Range<usize>)> {
    let bytes = input.as_bytes();
    let mut found = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => {
                let end = find_unescaped(bytes, i + 1, b'`').map_or(bytes.len(), |j| j + 1);
                found.push(("`", i..end));
                i = end;
            }
            b'$' if bytes.get(i + 1) == Some(&b'(') => {
                let end = matching_paren(bytes, i + 2);
                found.push(("$(", i..end));
                i = end;
            }
            _ => i += 1,
        }
    }

    found
}

/// Byte offsets where a command word may start: 0 and the end of each operator.
/// The flag is `true` when the position follows a pipe.
pub fn command_positions(ops: &[Operator]) -> Vec<(usize, bool)> {
    std::iter::once((0, false))
        .chain(ops.iter().map(|op| (op.span.end, op.is_pipe())))
        .collect()
}

/// The word starting at or after `from`, skipping blanks and grouping `(` / `{`.
///
/// A word ends at unquoted whitespace, an operator character, a redirection,
/// a parenthesis or a backtick. Quoted parts belong to the word.
pub fn word_at(input: &str, from: usize) -> Option<Range<usize>> {
    let bytes = input.as_bytes();
    let mut start = from;
    while start < bytes.len() && matches!(bytes[start], b' ' | b'\t' | b'\r' | b'(' | b'{') {
        start += 1;
    }

    let mut end = start;
    while end < bytes.len() {
        match bytes[end] {
            b' ' | b'\t' | b'\r' | b'\n' | b';' | b'|' | b'&' | b'<' | b'>' | b'(' | b')'
            | b'`' => break,
            b'\\' => end = (end + 2).min(bytes.len()),
            b'\'' => end = skip_single_quoted(bytes, end),
            b'"' => end = skip_double_quoted(bytes, end),
            _ => end += 1,
        }
    }

    (end > start).then_some(start..end)
}

/// The word with quotes and escapes removed and any directory prefix dropped:
/// `"/usr/bin/rm"` → `rm`.
pub fn command_name(word: &str) -> String {
    let unquoted: String = word
        .chars()
        .filter(|c| !matches!(c, '\'' | '"' | '\\'))
        .collect();
    match unquoted.rsplit_once('/') {
        Some((_, base)) => base.to_string(),
        None => unquoted,
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Index just past the closing `'` (or the end of input).
fn skip_single_quoted(bytes: &[u8], open: usize) -> usize {
    find_byte(bytes, open + 1, b'\'').map_or(bytes.len(), |j| j + 1)
}

/// Index just past the closing `"` (or the end of input), honouring `\"`.
fn skip_double_quoted(bytes: &[u8], open: usize) -> usize {
    find_unescaped(bytes, open + 1, b'"').map_or(bytes.len(), |j| j + 1)
}

fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes
        .get(from..)?
        .iter()
        .position(|&b| b == needle)
        .map(|p| from + p)
}

fn find_unescaped(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    let mut i = from;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            i += 2;
            continue;
        }
        if bytes[i] == needle {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Index just past the `)` closing a `$(` whose body starts at `from`.
fn matching_paren(bytes: &[u8], from: usize) -> usize {
    let mut depth = 1usize;
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                i += 2;
                continue;
            }
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    bytes.len()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ops(input: &str) -> Vec<&'static str> {
        operators(input).into_iter().map(|o| o.op).collect()
    }

    #[test]
    fn finds_chaining_and_piping() {
        assert_eq!(ops("a; b && c || d | e"), vec![";", "&&", "||", "|"]);
    }

    #[test]
    fn quoted_operators_are_ignored() {
        assert!(ops(r#"echo "a; b && c""#).is_empty());
        assert!(ops("grep 'x|y' file").is_empty());
        assert_eq!(ops(r#"echo "say \"hi\"; ok" ; ls"#), vec![";"]);
    }

    #[test]
    fn escaped_operators_are_ignored() {
        assert!(ops(r"find . -exec ls {} \;").is_empty());
    }

    #[test]
    fn redirection_ampersand_is_not_an_operator() {
        assert!(ops("make 2>&1").is_empty());
        assert!(ops("make &> log").is_empty());
        assert_eq!(ops("sleep 5 & ls"), vec!["&"]);
    }

    #[test]
    fn substitution_spans() {
        let input = "ls `whoami` $(date +%s) done";
        let subs = substitutions(input);
        assert_eq!(subs.len(), 2);
        assert_eq!(&input[subs[0].1.clone()], "`whoami`");
        assert_eq!(&input[subs[1].1.clone()], "$(date +%s)");
    }

    #[test]
    fn nested_and_unterminated_substitution() {
        let input = "echo $(cat $(ls))";
        let subs = substitutions(input);
        assert_eq!(subs.len(), 1);
        assert_eq!(&input[subs[0].1.clone()], "$(cat $(ls))");

        let open = "echo `rm x";
        assert_eq!(substitutions(open)[0].1, 5..open.len());
    }

    #[test]
    fn words_at_command_positions() {
        let input = "ls files;  rm -rf /";
        let ops = operators(input);
        let words: Vec<&str> = command_positions(&ops)
            .into_iter()
            .filter_map(|(pos, _)| word_at(input, pos))
            .map(|r| &input[r])
            .collect();
        assert_eq!(words, vec!["ls", "rm"]);
    }

    #[test]
    fn command_name_strips_quotes_and_directories() {
        assert_eq!(command_name("/usr/bin/rm"), "rm");
        assert_eq!(command_name(r#""rm""#), "rm");
        assert_eq!(command_name(r"\rm"), "rm");
        assert_eq!(command_name("npm"), "npm");
    }
}
