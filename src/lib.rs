// antimark — HTML to Markdown downgrader.
//
// Architecture:
//   HTML string → html5ever parse → Element trees → sanitize (allow-list)
//   → render tree → serialize (Blackboard) → normalize → Markdown
//
// The conversion is intentionally lossy: anything Markdown cannot express
// degrades to plain text rather than erroring, so the converter is total
// over any sanitized input.

mod colors;
mod element;
mod error;
mod parse;
mod sanitize;
mod serialize;
mod tree;

use std::collections::{BTreeMap, BTreeSet};

pub use element::Element;
pub use error::RenderError;

/// Conversion options.
#[derive(Debug, Clone)]
pub struct Options {
    /// Maximum element nesting depth accepted by the render-tree builder.
    pub max_depth: usize,
    /// Hex color → human-readable name table for highlighted spans.
    /// Unknown colors resolve to `none`.
    pub colors: BTreeMap<String, String>,
    /// Tag allow-list override for the sanitizer. `None` uses the default.
    pub safe_tags: Option<BTreeSet<String>>,
    /// Attribute allow-list override for the sanitizer. `None` uses the default.
    pub safe_attrs: Option<BTreeSet<String>>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_depth: 256,
            colors: BTreeMap::new(),
            safe_tags: None,
            safe_attrs: None,
        }
    }
}

impl Options {
    /// Create a new Options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum element nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Register one hex color → name mapping for highlighted spans.
    pub fn with_color(mut self, hex: impl Into<String>, name: impl Into<String>) -> Self {
        self.colors.insert(hex.into(), name.into());
        self
    }

    /// Replace the whole color table.
    pub fn with_colors(mut self, colors: BTreeMap<String, String>) -> Self {
        self.colors = colors;
        self
    }

    /// Override the sanitizer's tag allow-list.
    pub fn with_safe_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.safe_tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Override the sanitizer's attribute allow-list.
    pub fn with_safe_attrs<I, S>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.safe_attrs = Some(attrs.into_iter().map(Into::into).collect());
        self
    }
}

/// Convert an HTML fragment string to Markdown using default options.
///
/// # Examples
///
/// ```
/// let md = antimark::convert("<p>Hello <strong>world</strong></p>").unwrap();
/// assert_eq!(md, "Hello **world**");
/// ```
pub fn convert(html: &str) -> Result<String, RenderError> {
    convert_with(html, &Options::default())
}

/// Convert an HTML fragment string to Markdown with custom options.
pub fn convert_with(html: &str, options: &Options) -> Result<String, RenderError> {
    let fragments = parse_fragments(html, options);
    #[cfg(feature = "tracing")]
    tracing::trace!(fragments = fragments.len(), "sanitized element fragments");
    render(&fragments, options)
}

/// Parse an HTML string into sanitized top-level element trees.
pub fn parse_fragments(html: &str, options: &Options) -> Vec<Element> {
    parse::fragments(html)
        .into_iter()
        .filter_map(|fragment| sanitize::clean_fragment(fragment, options))
        .collect()
}

/// Render pre-built, sanitized element trees to Markdown.
pub fn render(fragments: &[Element], options: &Options) -> Result<String, RenderError> {
    let mut root = tree::Root::default();
    for fragment in fragments {
        tree::build(&mut root, fragment, options.max_depth)?;
    }
    Ok(serialize::serialize(&root, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_empty() {
        assert_eq!(convert("").unwrap(), "");
    }

    #[test]
    fn test_convert_simple_paragraph() {
        assert_eq!(convert("<p>Hello, world!</p>").unwrap(), "Hello, world!");
    }

    #[test]
    fn test_bare_text_is_implicit_paragraph() {
        assert_eq!(convert("Hello, world!").unwrap(), "Hello, world!");
    }

    #[test]
    fn test_options_builder() {
        let options = Options::new()
            .with_max_depth(32)
            .with_color("#ff0000", "red")
            .with_safe_tags(["p", "em"]);
        assert_eq!(options.max_depth, 32);
        assert_eq!(options.colors.get("#ff0000").map(String::as_str), Some("red"));
        assert!(options.safe_tags.as_ref().unwrap().contains("em"));
    }

    #[test]
    fn test_default_options() {
        let options = Options::default();
        assert_eq!(options.max_depth, 256);
        assert!(options.colors.is_empty());
        assert!(options.safe_tags.is_none());
    }

    #[test]
    fn test_render_over_hand_built_elements() {
        let mut p = Element::new("p");
        p.text = Some("plain".into());
        let md = render(&[p], &Options::default()).unwrap();
        assert_eq!(md, "plain");
    }

    #[test]
    fn test_unknown_tag_degrades_to_text() {
        let mut widget = Element::new("widget");
        widget.text = Some("w".into());
        let md = render(&[widget], &Options::default()).unwrap();
        assert_eq!(md, "w");
    }
}
