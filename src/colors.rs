// Styled-span color detection.
//
// A span whose `style` attribute carries a `background-color` with a hex
// value renders as a highlight: `%[text](colorname)`. The hex-to-name table
// is supplied by the caller through `Options::colors`; absent entries
// resolve to the literal name `none`.

use std::sync::LazyLock;

use regex::Regex;

static BACKGROUND_COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"background-color\s*:\s*(#[a-f0-9]+);").unwrap());

/// Extract the hex background color from a `style` attribute value.
pub(crate) fn background_hex(style: &str) -> Option<String> {
    BACKGROUND_COLOR_RE
        .captures(style)
        .map(|caps| caps[1].to_string())
}
