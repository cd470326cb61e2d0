// HTML fragment parsing — html5ever DOM folded into the Element model.
//
// html5ever error-corrects arbitrary markup into a full document; the
// fragments of interest are the children of `<body>`. DOM text nodes are
// folded into the Element text/tail fields: text before the first sibling
// element becomes the parent's `text`, text after an element becomes that
// element's `tail`. Comments become `#comment` pseudo-elements so their tail
// text is preserved until the sanitizer drops them.

use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::element::{Element, COMMENT_TAG, PI_TAG};

/// Parse an HTML string into an ordered sequence of top-level element trees.
pub(crate) fn fragments(html: &str) -> Vec<Element> {
    let dom = parse_html(html);
    let Some(body) = find_body(&dom.document) else {
        return Vec::new();
    };

    let (leading, children) = convert_children(&body);
    let mut out = Vec::with_capacity(children.len() + 1);
    if let Some(text) = leading {
        if !text.trim().is_empty() {
            out.push(Element::text_fragment(text));
        }
    }
    out.extend(children);
    out
}

fn parse_html(html: &str) -> RcDom {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: true,
            ..Default::default()
        },
        ..Default::default()
    };
    parse_document(RcDom::default(), opts)
        .from_utf8()
        .one(html.as_bytes())
}

/// Locate the `<body>` element of the error-corrected document.
fn find_body(document: &Handle) -> Option<Handle> {
    let html = document
        .children
        .borrow()
        .iter()
        .find(|child| is_element(child, "html"))
        .cloned()?;
    let body = html
        .children
        .borrow()
        .iter()
        .find(|child| is_element(child, "body"))
        .cloned();
    body
}

fn is_element(handle: &Handle, tag: &str) -> bool {
    matches!(&handle.data, NodeData::Element { name, .. } if name.local.as_ref() == tag)
}

/// Convert the DOM children of `handle`, returning the leading text (text
/// before the first child element) and the converted child elements with
/// tails attached.
fn convert_children(handle: &Handle) -> (Option<String>, Vec<Element>) {
    let mut text: Option<String> = None;
    let mut children: Vec<Element> = Vec::new();

    for child in handle.children.borrow().iter() {
        match &child.data {
            NodeData::Text { contents } => {
                let chunk = contents.borrow().to_string();
                match children.last_mut() {
                    Some(last) => append(&mut last.tail, &chunk),
                    None => append(&mut text, &chunk),
                }
            }
            NodeData::Element { name, attrs, .. } => {
                let mut el = Element::new(name.local.as_ref());
                for attr in attrs.borrow().iter() {
                    el.attrs
                        .insert(attr.name.local.as_ref().to_string(), attr.value.to_string());
                }
                let (own_text, own_children) = convert_children(child);
                el.text = own_text;
                el.children = own_children;
                children.push(el);
            }
            NodeData::Comment { contents } => {
                let mut el = Element::new(COMMENT_TAG);
                el.text = Some(contents.to_string());
                children.push(el);
            }
            NodeData::ProcessingInstruction { .. } => {
                children.push(Element::new(PI_TAG));
            }
            _ => {}
        }
    }

    (text, children)
}

fn append(slot: &mut Option<String>, chunk: &str) {
    match slot {
        Some(existing) => existing.push_str(chunk),
        None => *slot = Some(chunk.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_and_tail_assignment() {
        let frags = fragments("<p>before<em>mid</em>after</p>");
        assert_eq!(frags.len(), 1);
        let p = &frags[0];
        assert_eq!(p.tag, "p");
        assert_eq!(p.text.as_deref(), Some("before"));
        assert_eq!(p.children.len(), 1);
        assert_eq!(p.children[0].tag, "em");
        assert_eq!(p.children[0].text.as_deref(), Some("mid"));
        assert_eq!(p.children[0].tail.as_deref(), Some("after"));
    }

    #[test]
    fn test_sibling_fragments() {
        let frags = fragments("<p>a</p><ul><li>b</li></ul>");
        let tags: Vec<&str> = frags.iter().map(|f| f.tag.as_str()).collect();
        assert_eq!(tags, ["p", "ul"]);
    }

    #[test]
    fn test_bare_leading_text_becomes_text_fragment() {
        let frags = fragments("hello <p>world</p>");
        assert_eq!(frags[0].tag, crate::element::TEXT_TAG);
        assert_eq!(frags[0].text.as_deref(), Some("hello "));
        assert_eq!(frags[1].tag, "p");
    }

    #[test]
    fn test_comment_preserved_as_pseudo_element() {
        let frags = fragments("<p>a<!-- note -->b</p>");
        let p = &frags[0];
        assert_eq!(p.children[0].tag, COMMENT_TAG);
        assert_eq!(p.children[0].tail.as_deref(), Some("b"));
    }

    #[test]
    fn test_attributes_collected() {
        let frags = fragments(r#"<a href="http://x.com" title="T">x</a>"#);
        // A bare inline element still parses into body.
        let a = &frags[0];
        assert_eq!(a.attr("href"), Some("http://x.com"));
        assert_eq!(a.attr("title"), Some("T"));
    }

    #[test]
    fn test_empty_input() {
        assert!(fragments("").is_empty());
    }
}
