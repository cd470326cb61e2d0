// Render tree — one rendering node per sanitized element.
//
// The builder mirrors the element tree structurally: each non-comment
// element gets a RenderNode carrying a tag-derived NodeKind that decides its
// formatting behavior during serialization. No text is produced here.
// Unknown tags map to GenericInline, so the converter is total over any
// sanitized input. Recursion depth is bounded by `Options::max_depth`; the
// builder fails explicitly instead of overflowing the stack.

use crate::element::Element;
use crate::error::RenderError;

/// Ordered vs. unordered list container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListKind {
    Ordered,
    Unordered,
}

/// Tag-derived formatting behavior of a render node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeKind {
    Paragraph,
    Blockquote,
    Heading(u8),
    List(ListKind),
    ListItem,
    CodeBlock,
    CodeSpan,
    Emphasis,
    Strong,
    Underline,
    Span,
    Link,
    Image,
    HorizontalRule,
    RawBlock,
    GenericInline,
}

impl NodeKind {
    /// Map a tag name (case-insensitive) to its rendering behavior.
    pub(crate) fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "p" => Self::Paragraph,
            "blockquote" => Self::Blockquote,
            "h1" => Self::Heading(1),
            "h2" => Self::Heading(2),
            "h3" => Self::Heading(3),
            "h4" => Self::Heading(4),
            "h5" => Self::Heading(5),
            "h6" => Self::Heading(6),
            "ol" => Self::List(ListKind::Ordered),
            "ul" => Self::List(ListKind::Unordered),
            "li" => Self::ListItem,
            "pre" => Self::CodeBlock,
            "code" => Self::CodeSpan,
            "em" | "i" => Self::Emphasis,
            "strong" | "b" => Self::Strong,
            "u" => Self::Underline,
            "span" => Self::Span,
            "a" => Self::Link,
            "img" => Self::Image,
            "hr" => Self::HorizontalRule,
            "div" => Self::RawBlock,
            _ => Self::GenericInline,
        }
    }

    /// Block-level nodes get a newline before them inside list items.
    pub(crate) fn is_block(&self) -> bool {
        matches!(
            self,
            Self::Paragraph
                | Self::Blockquote
                | Self::Heading(_)
                | Self::List(_)
                | Self::ListItem
                | Self::CodeBlock
                | Self::HorizontalRule
                | Self::RawBlock
        )
    }

    /// Blocks that force blank-line spacing around the enclosing list item.
    pub(crate) fn is_spacing_block(&self) -> bool {
        matches!(self, Self::Paragraph | Self::Blockquote | Self::CodeBlock)
    }
}

/// A node of the render tree; borrows its source element.
#[derive(Debug)]
pub(crate) struct RenderNode<'a> {
    pub el: &'a Element,
    pub kind: NodeKind,
    pub children: Vec<RenderNode<'a>>,
}

/// Root of the render tree; holds top-level fragments as siblings.
#[derive(Debug, Default)]
pub(crate) struct Root<'a> {
    pub children: Vec<RenderNode<'a>>,
}

/// Build the render tree for one fragment, appending it to `root`. May be
/// called repeatedly on one root to concatenate independently parsed
/// fragments.
pub(crate) fn build<'a>(
    root: &mut Root<'a>,
    element: &'a Element,
    max_depth: usize,
) -> Result<(), RenderError> {
    if let Some(node) = build_node(element, max_depth, 0)? {
        root.children.push(node);
    }
    Ok(())
}

fn build_node<'a>(
    element: &'a Element,
    limit: usize,
    depth: usize,
) -> Result<Option<RenderNode<'a>>, RenderError> {
    // Comment/PI pseudo-elements get no render node.
    if element.is_comment() || element.is_pi() {
        return Ok(None);
    }
    if depth >= limit {
        return Err(RenderError::TooDeep { depth, limit });
    }

    let mut children = Vec::with_capacity(element.children.len());
    for child in &element.children {
        if let Some(node) = build_node(child, limit, depth + 1)? {
            children.push(node);
        }
    }

    Ok(Some(RenderNode {
        el: element,
        kind: NodeKind::from_tag(&element.tag),
        children,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping_case_insensitive() {
        assert_eq!(NodeKind::from_tag("P"), NodeKind::Paragraph);
        assert_eq!(NodeKind::from_tag("Em"), NodeKind::Emphasis);
        assert_eq!(NodeKind::from_tag("h3"), NodeKind::Heading(3));
    }

    #[test]
    fn test_unknown_tag_falls_back_to_generic_inline() {
        assert_eq!(NodeKind::from_tag("widget"), NodeKind::GenericInline);
        assert_eq!(NodeKind::from_tag("br"), NodeKind::GenericInline);
    }

    #[test]
    fn test_comment_skipped() {
        let mut p = Element::new("p");
        p.children.push(Element::new(crate::element::COMMENT_TAG));
        let mut root = Root::default();
        build(&mut root, &p, 16).unwrap();
        assert!(root.children[0].children.is_empty());
    }

    #[test]
    fn test_depth_limit_enforced() {
        let mut el = Element::new("div");
        for _ in 0..8 {
            let mut outer = Element::new("div");
            outer.children.push(el);
            el = outer;
        }
        let mut root = Root::default();
        let err = build(&mut root, &el, 4).unwrap_err();
        assert!(matches!(err, RenderError::TooDeep { limit: 4, .. }));
    }

    #[test]
    fn test_multiple_fragments_append_as_siblings() {
        let a = Element::new("p");
        let b = Element::new("ul");
        let mut root = Root::default();
        build(&mut root, &a, 16).unwrap();
        build(&mut root, &b, 16).unwrap();
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[1].kind, NodeKind::List(ListKind::Unordered));
    }
}
