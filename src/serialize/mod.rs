// Render tree → Markdown string serializer.
//
// Each node produces its inner text (own leading text plus concatenated
// children) followed by its tail text. Cross-node state that tree locality
// cannot express — the ancestor tag chain, code-block mode, active list
// marker style, list-item spacing flags — lives on a Blackboard created
// fresh for each conversion and threaded mutably through the traversal.
// Every push has a matching pop on every exit path; balance is asserted in
// debug builds.

pub(crate) mod handlers;
pub(crate) mod text;

use crate::tree::Root;
use crate::Options;

/// A list marker generator, one per open list. The ordered counter restarts
/// for every list and advances once per item.
#[derive(Debug)]
pub(crate) enum Marker {
    Bullet,
    Numbered(u32),
}

impl Marker {
    pub(crate) fn numbered() -> Self {
        Self::Numbered(1)
    }

    /// Produce the next marker, padded with spaces to a minimum width of 4
    /// so continuation lines align.
    pub(crate) fn pull(&mut self) -> String {
        match self {
            Self::Bullet => "*   ".to_string(),
            Self::Numbered(n) => {
                let marker = format!("{n}.");
                *n += 1;
                format!("{marker:<4}")
            }
        }
    }
}

/// Shared mutable render-time context, scoped to one conversion call.
#[derive(Debug, Default)]
pub(crate) struct Blackboard<'a> {
    /// Ancestor tag names, including the node being rendered.
    pub env: Vec<&'a str>,
    /// Inside a code block: no escaping, no folding, 4-space indent.
    pub pre: bool,
    /// Inside a code span: no backtick escaping.
    pub code: bool,
    /// Marker generators for the open lists, innermost last.
    pub li_style: Vec<Marker>,
    /// One flag per open list item; true once a spacing block rendered.
    pub li_nested_block: Vec<bool>,
}

impl<'a> Blackboard<'a> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Whether inline escaping applies in the current context.
    pub(crate) fn escaping(&self) -> bool {
        !(self.pre || self.code)
    }
}

/// Serialize a render tree to the final Markdown string.
pub(crate) fn serialize<'a>(root: &Root<'a>, options: &Options) -> String {
    let mut blackboard = Blackboard::new();
    let mut out = String::new();
    for node in &root.children {
        out.push_str(&handlers::render(node, &mut blackboard, options));
    }

    debug_assert!(blackboard.env.is_empty(), "env stack not restored");
    debug_assert!(blackboard.li_style.is_empty(), "li_style stack not restored");
    debug_assert!(
        blackboard.li_nested_block.is_empty(),
        "li_nested_block stack not restored"
    );
    debug_assert!(!blackboard.pre && !blackboard.code, "mode flags not cleared");

    let normalized = text::normalize(&out);
    // Strip leading blank lines (headings open with a newline) and trailing
    // blank space, then normalize once more; the pass is idempotent.
    let body = normalized.trim_end().trim_start_matches('\n');
    text::normalize(body)
}
