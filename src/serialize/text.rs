// Text helpers — escaping, whitespace folding, and line normalization.
//
// These are the string-level rules the per-tag handlers agree on: backtick
// escaping outside code contexts, folding runs of whitespace to one space,
// collapsing blank-line runs, blockquote line prefixing, and the final
// normalization pass applied to the complete document.

use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static BLANK_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Backslash-escape every occurrence of the given characters.
pub(crate) fn escape(text: &str, characters: &[char]) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if characters.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// An element's text or tail field as a string, escaping backticks unless
/// escaping is suppressed (code contexts).
pub(crate) fn el_text(text: Option<&str>, escape_text: bool) -> String {
    let text = text.unwrap_or("");
    if escape_text {
        escape(text, &['`'])
    } else {
        text.to_string()
    }
}

/// Fold every run of whitespace, including embedded newlines, to one space.
pub(crate) fn fold(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").into_owned()
}

/// Collapse runs of blank lines to a single blank line. Used inside lists.
pub(crate) fn collapse_newlines(text: &str) -> String {
    BLANK_RUN_RE.replace_all(text, "\n\n").into_owned()
}

/// Whether `rest` begins with a heading marker: an ATX `#`, or a line of
/// text followed by a Setext underline character.
fn heading_follows(rest: &str) -> bool {
    if rest.starts_with('#') {
        return true;
    }
    match rest.split_once('\n') {
        Some((line, below)) => !line.is_empty() && below.starts_with(['-', '=']),
        None => false,
    }
}

/// Collapse runs of three or more newlines to exactly two, preserving one
/// extra newline when a heading marker follows the run (headings carry their
/// own leading newline; no blank line is forced against the marker).
fn collapse_blank_runs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('\n') {
        out.push_str(&rest[..pos]);
        let bytes = rest.as_bytes();
        let mut end = pos;
        while end < bytes.len() && bytes[end] == b'\n' {
            end += 1;
        }
        let run = end - pos;
        let keep = if run >= 3 && heading_follows(&rest[end..]) {
            3
        } else {
            run.min(2)
        };
        for _ in 0..keep {
            out.push('\n');
        }
        rest = &rest[end..];
    }
    out.push_str(rest);
    out
}

/// Final document normalization: collapse blank-line runs, then trim
/// trailing whitespace from every line. Idempotent.
pub(crate) fn normalize(text: &str) -> String {
    collapse_blank_runs(text)
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escape `[` and `]` in link text: `[` unless preceded by `!`, `]` unless
/// followed by `(`.
pub(crate) fn escape_link_text(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    for (i, &c) in chars.iter().enumerate() {
        match c {
            '[' if i == 0 || chars[i - 1] != '!' => out.push('\\'),
            ']' if chars.get(i + 1) != Some(&'(') => out.push('\\'),
            _ => {}
        }
        out.push(c);
    }
    out
}

/// Prefix every line of blockquote content with `> `, collapsing bare quote
/// lines at the edges and runs of bare quote lines adjacent to content. An
/// empty blockquote renders as a single `>`.
pub(crate) fn quote_lines(content: &str) -> String {
    let body = content.trim_end();
    if body.trim().is_empty() {
        return ">".to_string();
    }

    let mut lines: Vec<String> = body.lines().map(|line| format!("> {line}")).collect();
    if let Some(first) = lines.first_mut() {
        if first.trim() == ">" {
            first.clear();
        }
    }
    if let Some(last) = lines.last_mut() {
        if last.trim() == ">" {
            last.clear();
        }
    }

    let lines = drop_runs_after_plain(lines);
    let lines = collapse_trailing_runs(lines);

    let text = lines.join("\n");
    let text = text.trim_end();
    if text.is_empty() {
        ">".to_string()
    } else {
        text.to_string()
    }
}

fn is_bare_quote(line: &str) -> bool {
    line.trim() == ">"
}

/// A line of only spaces and a single `>` followed by at least one space.
fn is_bare_spaced_quote(line: &str) -> bool {
    let rest = line.trim_start_matches(' ');
    match rest.strip_prefix('>') {
        Some(after) => !after.is_empty() && after.chars().all(|c| c == ' '),
        None => false,
    }
}

/// Remove runs of bare quote lines that directly follow a line without any
/// `>` (the collapsed edges), so an emptied edge does not leave separators.
fn drop_runs_after_plain(lines: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len());
    let mut i = 0;
    while i < lines.len() {
        let plain = !lines[i].contains('>');
        out.push(lines[i].clone());
        i += 1;
        if plain {
            while i < lines.len() && is_bare_quote(&lines[i]) {
                i += 1;
            }
        }
    }
    out
}

/// Collapse runs of bare quote lines not followed by more quoted content
/// into a single empty line.
fn collapse_trailing_runs(lines: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len());
    let mut i = 0;
    while i < lines.len() {
        if is_bare_spaced_quote(&lines[i]) {
            let mut end = i;
            while end < lines.len() && is_bare_spaced_quote(&lines[end]) {
                end += 1;
            }
            let followed_by_quote = end < lines.len() && lines[end].trim_start().starts_with('>');
            if followed_by_quote {
                out.extend(lines[i..end].iter().cloned());
            } else {
                out.push(String::new());
            }
            i = end;
        } else {
            out.push(lines[i].clone());
            i += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_backticks() {
        assert_eq!(el_text(Some("a ` b"), true), "a \\` b");
        assert_eq!(el_text(Some("a ` b"), false), "a ` b");
        assert_eq!(el_text(None, true), "");
    }

    #[test]
    fn test_fold_whitespace() {
        assert_eq!(fold("a\n  b\t\tc"), "a b c");
        assert_eq!(fold("  x  "), " x ");
    }

    #[test]
    fn test_collapse_newlines() {
        assert_eq!(collapse_newlines("a\n\n\n\nb"), "a\n\nb");
        assert_eq!(collapse_newlines("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_normalize_collapses_runs() {
        assert_eq!(normalize("a\n\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_normalize_keeps_extra_newline_before_headings() {
        // Headings carry their own leading newline; the run stays at three.
        assert_eq!(normalize("intro\n\n\nSec\n---\nbody"), "intro\n\n\nSec\n---\nbody");
        assert_eq!(normalize("intro\n\n\n\n# Sec #"), "intro\n\n\n# Sec #");
    }

    #[test]
    fn test_normalize_trims_line_trailing_whitespace() {
        assert_eq!(normalize("a  \n>  \nb\t"), "a\n>\nb");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let input = "a\n\n\n\nSec\n---\n\n\n\nb   \n\nc";
        let once = normalize(input);
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_escape_link_text() {
        assert_eq!(escape_link_text("a[x]b"), "a\\[x\\]b");
        assert_eq!(escape_link_text("![img]"), "![img\\]");
        assert_eq!(escape_link_text("a](b"), "a](b");
    }

    #[test]
    fn test_quote_lines_prefixes_content() {
        assert_eq!(quote_lines("a\n\nb"), "> a\n> \n> b");
    }

    #[test]
    fn test_quote_lines_collapses_edges() {
        assert_eq!(quote_lines("\n# T #"), "\n> # T #");
        assert_eq!(quote_lines("a\n\n"), "> a");
    }

    #[test]
    fn test_quote_lines_empty() {
        assert_eq!(quote_lines(""), ">");
        assert_eq!(quote_lines("   \n  "), ">");
    }
}
