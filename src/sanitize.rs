// Allow-list sanitization of parsed element trees.
//
// Disallowed tags are unwrapped in place: their children are promoted and
// their text/tail content merges into the surrounding text, so dropping a
// wrapper never loses prose. Comments and processing instructions are
// removed entirely (content dropped, tail kept). Disallowed attributes are
// stripped. Bare top-level text becomes an implicit paragraph, and a
// disallowed top-level element is wrapped in a paragraph before unwrapping.

use std::collections::BTreeSet;

use crate::element::{Element, TEXT_TAG};
use crate::Options;

/// Default tag allow-list.
pub(crate) const DEFAULT_SAFE_TAGS: &[&str] = &[
    "p", "blockquote", "i", "em", "strong", "b", "u", "a", "h1", "h2", "h3", "h4", "h5", "h6",
    "hr", "pre", "code", "div", "br", "img", "ul", "ol", "li", "span",
];

/// Default attribute allow-list.
pub(crate) const DEFAULT_SAFE_ATTRS: &[&str] = &["href", "src", "alt", "style", "title"];

/// Clean one top-level fragment. Returns `None` for top-level comments and
/// processing instructions.
pub(crate) fn clean_fragment(fragment: Element, options: &Options) -> Option<Element> {
    let tags: BTreeSet<&str> = match &options.safe_tags {
        Some(tags) => tags.iter().map(String::as_str).collect(),
        None => DEFAULT_SAFE_TAGS.iter().copied().collect(),
    };
    let attrs: BTreeSet<&str> = match &options.safe_attrs {
        Some(attrs) => attrs.iter().map(String::as_str).collect(),
        None => DEFAULT_SAFE_ATTRS.iter().copied().collect(),
    };

    if fragment.is_comment() || fragment.is_pi() {
        return None;
    }

    let mut fragment = if fragment.tag == TEXT_TAG {
        let mut p = Element::new("p");
        p.text = fragment.text;
        p.tail = fragment.tail;
        p
    } else if !allowed(&fragment.tag, &tags) {
        let mut p = Element::new("p");
        p.children.push(fragment);
        p
    } else {
        fragment
    };

    clean(&mut fragment, &tags, &attrs);
    Some(fragment)
}

fn allowed(tag: &str, tags: &BTreeSet<&str>) -> bool {
    tags.contains(tag.to_ascii_lowercase().as_str())
}

fn clean(el: &mut Element, tags: &BTreeSet<&str>, attrs: &BTreeSet<&str>) {
    el.attrs
        .retain(|name, _| attrs.contains(name.to_ascii_lowercase().as_str()));

    let mut i = 0;
    while i < el.children.len() {
        if allowed(&el.children[i].tag, tags) {
            clean(&mut el.children[i], tags, attrs);
            i += 1;
        } else {
            // Unwrap in place; the promoted children are examined next.
            unwrap_child(el, i);
        }
    }
}

/// Remove `parent.children[i]`, promoting its children into its place and
/// merging its text/tail into the surrounding content. Comment/PI content
/// is discarded, only the tail survives.
fn unwrap_child(parent: &mut Element, i: usize) {
    let mut child = parent.children.remove(i);

    let text = if child.is_comment() || child.is_pi() {
        None
    } else {
        child.text.take()
    };
    let tail = child.tail.take();

    if let Some(t) = text {
        if i == 0 {
            push_text(&mut parent.text, &t);
        } else {
            push_text(&mut parent.children[i - 1].tail, &t);
        }
    }

    let grandchildren = std::mem::take(&mut child.children);
    let promoted = grandchildren.len();
    parent.children.splice(i..i, grandchildren);

    if let Some(t) = tail {
        if promoted > 0 {
            push_text(&mut parent.children[i + promoted - 1].tail, &t);
        } else if i == 0 {
            push_text(&mut parent.text, &t);
        } else {
            push_text(&mut parent.children[i - 1].tail, &t);
        }
    }
}

fn push_text(slot: &mut Option<String>, chunk: &str) {
    match slot {
        Some(existing) => existing.push_str(chunk),
        None => *slot = Some(chunk.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn clean_all(html: &str) -> Vec<Element> {
        let options = Options::default();
        parse::fragments(html)
            .into_iter()
            .filter_map(|f| clean_fragment(f, &options))
            .collect()
    }

    #[test]
    fn test_disallowed_tag_unwrapped_with_text_merge() {
        let frags = clean_all("<p>a <font>styled</font> text</p>");
        let p = &frags[0];
        assert!(p.children.is_empty());
        assert_eq!(p.text.as_deref(), Some("a styled text"));
    }

    #[test]
    fn test_comment_dropped_tail_kept() {
        let frags = clean_all("<p>a<!-- secret -->b</p>");
        let p = &frags[0];
        assert!(p.children.is_empty());
        assert_eq!(p.text.as_deref(), Some("ab"));
    }

    #[test]
    fn test_disallowed_attrs_stripped() {
        let frags = clean_all(r#"<a href="u" onclick="x()" title="T">t</a>"#);
        let a = &frags[0];
        assert_eq!(a.attr("href"), Some("u"));
        assert_eq!(a.attr("title"), Some("T"));
        assert_eq!(a.attr("onclick"), None);
    }

    #[test]
    fn test_bare_text_becomes_paragraph() {
        let frags = clean_all("just text");
        assert_eq!(frags[0].tag, "p");
        assert_eq!(frags[0].text.as_deref(), Some("just text"));
    }

    #[test]
    fn test_unwrap_promotes_children() {
        let frags = clean_all("<p><font>a <em>b</em> c</font>done</p>");
        let p = &frags[0];
        assert_eq!(p.text.as_deref(), Some("a "));
        assert_eq!(p.children.len(), 1);
        assert_eq!(p.children[0].tag, "em");
        assert_eq!(p.children[0].tail.as_deref(), Some(" cdone"));
    }

    #[test]
    fn test_custom_allow_list() {
        let options = Options::default().with_safe_tags(["p"]);
        let frags: Vec<Element> = parse::fragments("<p>a <em>b</em></p>")
            .into_iter()
            .filter_map(|f| clean_fragment(f, &options))
            .collect();
        let p = &frags[0];
        assert!(p.children.is_empty());
        assert_eq!(p.text.as_deref(), Some("a b"));
    }
}
