// Sanitized element model — the input shape consumed by the render tree.
//
// An Element is a tag, an attribute map, `text` (content before the first
// child), `tail` (content after the element's closing tag, before the next
// sibling), and ordered children. Keeping trailing text on the element it
// follows, rather than as sibling text nodes, lets every per-tag rule own
// the text around it.
// Comments and processing instructions are carried as pseudo-elements with
// reserved `#`-prefixed tags so their tail text survives sanitization.

use std::collections::BTreeMap;

/// Reserved tag for comment pseudo-elements.
pub(crate) const COMMENT_TAG: &str = "#comment";
/// Reserved tag for processing-instruction pseudo-elements.
pub(crate) const PI_TAG: &str = "#pi";
/// Reserved tag for bare top-level text awaiting implicit paragraph wrapping.
pub(crate) const TEXT_TAG: &str = "#text";

/// A node in a sanitized HTML element tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Tag name, lowercase for parsed input.
    pub tag: String,
    /// Attributes surviving the sanitizer's allow-list.
    pub attrs: BTreeMap<String, String>,
    /// Text content preceding the first child.
    pub text: Option<String>,
    /// Text following this element's closing tag, before the next sibling.
    pub tail: Option<String>,
    /// Child elements, in document order.
    pub children: Vec<Element>,
}

impl Element {
    /// Create an empty element with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Look up an attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Whether this is a comment pseudo-element.
    pub fn is_comment(&self) -> bool {
        self.tag == COMMENT_TAG
    }

    /// Whether this is a processing-instruction pseudo-element.
    pub fn is_pi(&self) -> bool {
        self.tag == PI_TAG
    }

    /// Bare text at the top level of a document, before any element.
    /// The sanitizer turns this into an implicit paragraph.
    pub(crate) fn text_fragment(text: String) -> Self {
        let mut el = Self::new(TEXT_TAG);
        el.text = Some(text);
        el
    }
}
