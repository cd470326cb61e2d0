// Per-variant rendering rules — one inner-text and one tail rule per kind.
//
// A node's full string is inner text followed by tail text, with its tag on
// the env stack while both are produced. Children render in document order
// exactly once, inside the parent's inner text. All stack pushes here are
// paired with pops on the same path.

use super::text::{collapse_newlines, el_text, escape, escape_link_text, fold, quote_lines};
use super::{Blackboard, Marker};
use crate::colors;
use crate::tree::{ListKind, NodeKind, RenderNode};
use crate::Options;

/// Render one node: inner text plus tail text.
pub(crate) fn render<'a>(
    node: &RenderNode<'a>,
    bb: &mut Blackboard<'a>,
    options: &Options,
) -> String {
    // Spacing blocks mark the enclosing list item before anything renders,
    // so the item knows to spread itself.
    if node.kind.is_spacing_block() {
        if let Some(flag) = bb.li_nested_block.last_mut() {
            *flag = true;
        }
    }

    bb.env.push(node.el.tag.as_str());
    let inner = inner_text(node, bb, options);
    let tail = tail_text(node, bb);
    bb.env.pop();

    inner + &tail
}

/// Concatenate the rendered children in document order.
fn children_text<'a>(
    node: &RenderNode<'a>,
    bb: &mut Blackboard<'a>,
    options: &Options,
) -> String {
    let mut out = String::new();
    for child in &node.children {
        out.push_str(&render(child, bb, options));
    }
    out
}

/// Own leading text (folded and left-trimmed outside code contexts) plus
/// children. The default inner rule shared by most inline variants.
fn inner_generic<'a>(
    node: &RenderNode<'a>,
    bb: &mut Blackboard<'a>,
    options: &Options,
) -> String {
    let own = if bb.pre {
        el_text(node.el.text.as_deref(), false)
    } else {
        fold(&el_text(node.el.text.as_deref(), bb.escaping()))
            .trim_start()
            .to_string()
    };
    own + &children_text(node, bb, options)
}

// ---------------------------------------------------------------------------
// Inner text
// ---------------------------------------------------------------------------

fn inner_text<'a>(node: &RenderNode<'a>, bb: &mut Blackboard<'a>, options: &Options) -> String {
    match node.kind {
        NodeKind::Paragraph => inner_paragraph(node, bb, options),
        NodeKind::Heading(depth) => inner_heading(node, bb, options, depth),
        NodeKind::Blockquote => quote_lines(&inner_generic(node, bb, options)),
        NodeKind::List(kind) => inner_list(node, bb, options, kind),
        NodeKind::ListItem => inner_list_item(node, bb, options),
        NodeKind::CodeBlock => inner_code_block(node, bb, options),
        NodeKind::CodeSpan => inner_code_span(node, bb, options),
        NodeKind::Emphasis => format!("*{}*", inner_generic(node, bb, options)),
        NodeKind::Strong => format!("**{}**", inner_generic(node, bb, options)),
        NodeKind::Underline => format!("<u>{}</u>", inner_generic(node, bb, options)),
        NodeKind::Span => inner_span(node, bb, options),
        NodeKind::Link => inner_link(node, bb, options),
        NodeKind::Image => inner_image(node, bb, options),
        NodeKind::HorizontalRule => "---".to_string(),
        NodeKind::RawBlock => format!(
            "<div>{}{}</div>",
            el_text(node.el.text.as_deref(), true),
            children_text(node, bb, options)
        ),
        NodeKind::GenericInline => inner_generic(node, bb, options),
    }
}

fn inner_paragraph<'a>(
    node: &RenderNode<'a>,
    bb: &mut Blackboard<'a>,
    options: &Options,
) -> String {
    // Inside a list item, a paragraph opens with a blank line; the item's
    // own indentation pass absorbs it for the first child.
    let spacer = if bb.li_nested_block.is_empty() { "" } else { "\n\n" };
    format!("{spacer}{}", inner_generic(node, bb, options))
}

fn inner_heading<'a>(
    node: &RenderNode<'a>,
    bb: &mut Blackboard<'a>,
    options: &Options,
    depth: u8,
) -> String {
    let content = inner_generic(node, bb, options);
    // Setext only for h1/h2 at document top level; nested headings (inside
    // list items, blockquotes) use ATX so the underline cannot misparse.
    if depth <= 2 && bb.env.len() == 1 {
        let underline: String = std::iter::repeat(if depth == 1 { '=' } else { '-' })
            .take(content.chars().count())
            .collect();
        format!("\n{content}\n{underline}")
    } else {
        let hashes = "#".repeat(depth as usize);
        format!("\n{hashes} {content} {hashes}")
    }
}

fn inner_list<'a>(
    node: &RenderNode<'a>,
    bb: &mut Blackboard<'a>,
    options: &Options,
    kind: ListKind,
) -> String {
    bb.li_style.push(match kind {
        ListKind::Ordered => Marker::numbered(),
        ListKind::Unordered => Marker::Bullet,
    });
    let result = collapse_newlines(&inner_generic(node, bb, options));
    let popped = bb.li_style.pop();
    debug_assert!(popped.is_some());
    result
}

fn inner_list_item<'a>(
    node: &RenderNode<'a>,
    bb: &mut Blackboard<'a>,
    options: &Options,
) -> String {
    bb.li_nested_block.push(false);
    let marker = match bb.li_style.last_mut() {
        Some(style) => style.pull(),
        None => "*   ".to_string(),
    };

    let own = fold(&el_text(node.el.text.as_deref(), bb.escaping()))
        .trim_start()
        .to_string();

    // Block-level children get a newline before them; inline children run on.
    let mut body = String::new();
    for child in &node.children {
        if child.kind.is_block() {
            body.push('\n');
        }
        body.push_str(&render(child, bb, options));
    }
    let body = collapse_newlines(&body);

    // Continuation lines align under the marker.
    let indent = " ".repeat(marker.chars().count());
    let mut lines: Vec<String> = body.lines().map(String::from).collect();
    for line in lines.iter_mut().skip(1) {
        *line = format!("{indent}{line}");
    }
    let mut rest = lines.join("\n");
    if own.is_empty() {
        rest = rest.trim_start().to_string();
    }

    let nested = bb.li_nested_block.last().copied().unwrap_or(false);
    let first_spreads = node
        .children
        .first()
        .is_some_and(|child| child.kind.is_spacing_block());
    let spacer = if nested && first_spreads { "\n\n" } else { "" };

    format!("{spacer}{}", collapse_newlines(&format!("{marker}{own}{rest}")))
}

fn inner_code_block<'a>(
    node: &RenderNode<'a>,
    bb: &mut Blackboard<'a>,
    options: &Options,
) -> String {
    bb.pre = true;
    let raw = format!(
        "{}{}",
        el_text(node.el.text.as_deref(), false),
        children_text(node, bb, options)
    );
    bb.pre = false;

    raw.lines()
        .map(|line| format!("    {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn inner_code_span<'a>(
    node: &RenderNode<'a>,
    bb: &mut Blackboard<'a>,
    options: &Options,
) -> String {
    let outer = bb.code;
    bb.code = true;
    let raw = format!(
        "{}{}",
        el_text(node.el.text.as_deref(), false),
        children_text(node, bb, options)
    );
    bb.code = outer;

    if bb.pre {
        raw
    } else if raw.contains('`') {
        format!("`` {raw} ``")
    } else {
        format!("`{raw}`")
    }
}

fn inner_span<'a>(node: &RenderNode<'a>, bb: &mut Blackboard<'a>, options: &Options) -> String {
    let hex = node.el.attr("style").and_then(colors::background_hex);
    match hex {
        Some(hex) => {
            let name = options
                .colors
                .get(&hex)
                .map(String::as_str)
                .unwrap_or("none");
            format!("%[{}]({name})", inner_generic(node, bb, options))
        }
        None => inner_generic(node, bb, options),
    }
}

fn inner_link<'a>(node: &RenderNode<'a>, bb: &mut Blackboard<'a>, options: &Options) -> String {
    let href = node.el.attr("href");
    let target = href.map(|h| h.strip_prefix("mailto:").unwrap_or(h));

    // Autolink when the visible text is exactly the target (mailto: scheme
    // stripped for the comparison).
    if let Some(target) = target {
        if !target.is_empty() && Some(target) == node.el.text.as_deref() {
            return format!("<{target}>");
        }
    }

    let content = escape_link_text(&inner_generic(node, bb, options));
    let content = content.trim_end();
    let href_part = match href {
        Some(h) if !h.is_empty() => format!("<{}>", escape(h, &['(', ')'])),
        _ => String::new(),
    };
    let title_part = match node.el.attr("title") {
        Some(title) => format!(" \"{}\"", escape(title, &['(', ')'])),
        None => String::new(),
    };
    format!("[{content}]({href_part}{title_part})")
}

fn inner_image<'a>(node: &RenderNode<'a>, bb: &mut Blackboard<'a>, options: &Options) -> String {
    let alt = escape(node.el.attr("alt").unwrap_or(""), &['[', ']']);
    let src = escape(node.el.attr("src").unwrap_or(""), &['(', ')']);
    let title_part = match node.el.attr("title") {
        Some(title) => format!(" \"{}\"", escape(title, &['"'])),
        None => String::new(),
    };
    format!(
        "![{alt}](<{src}>{title_part}){}",
        inner_generic(node, bb, options)
    )
}

// ---------------------------------------------------------------------------
// Tail text
// ---------------------------------------------------------------------------

fn tail_text(node: &RenderNode<'_>, bb: &mut Blackboard<'_>) -> String {
    match node.kind {
        NodeKind::Paragraph
        | NodeKind::Blockquote
        | NodeKind::CodeBlock
        | NodeKind::HorizontalRule => tail_block(node, bb),
        NodeKind::Heading(_) => tail_heading(node, bb),
        NodeKind::List(_) => tail_list(node, bb),
        NodeKind::ListItem => tail_list_item(node, bb),
        NodeKind::Image => tail_image(node, bb),
        NodeKind::RawBlock => el_text(node.el.tail.as_deref(), true),
        _ => tail_generic(node, bb),
    }
}

/// Default tail: folded tail text, no block separation.
fn tail_generic(node: &RenderNode<'_>, bb: &Blackboard<'_>) -> String {
    let tail = el_text(node.el.tail.as_deref(), bb.escaping());
    if bb.pre || tail.is_empty() {
        tail
    } else {
        fold(&tail)
    }
}

/// Block tail: two blank lines, then the folded, left-trimmed tail.
fn tail_block(node: &RenderNode<'_>, bb: &Blackboard<'_>) -> String {
    format!(
        "\n\n{}",
        fold(&el_text(node.el.tail.as_deref(), bb.escaping()))
            .trim_start()
            .to_string()
    )
}

fn tail_heading(node: &RenderNode<'_>, bb: &Blackboard<'_>) -> String {
    // No separator inside a list item; the item controls its own spacing.
    let spacer = if bb.li_nested_block.is_empty() { "\n" } else { "" };
    format!("{spacer}{}", el_text(node.el.tail.as_deref(), true))
}

fn tail_list(node: &RenderNode<'_>, bb: &Blackboard<'_>) -> String {
    // A nested list is separated by its parent item, not by itself.
    if bb.env.len() > 1 {
        fold(&el_text(node.el.tail.as_deref(), bb.escaping()))
            .trim_start()
            .to_string()
    } else {
        tail_block(node, bb)
    }
}

fn tail_list_item(node: &RenderNode<'_>, bb: &mut Blackboard<'_>) -> String {
    let nested = bb.li_nested_block.pop();
    debug_assert!(nested.is_some(), "list item without spacing flag");
    let spacer = if nested.unwrap_or(false) { "\n\n" } else { "\n" };
    format!(
        "{spacer}{}",
        fold(&el_text(node.el.tail.as_deref(), bb.escaping()))
            .trim_start()
            .to_string()
    )
}

/// Images never glue to following text: the tail always begins with a space.
fn tail_image(node: &RenderNode<'_>, bb: &Blackboard<'_>) -> String {
    let tail = tail_generic(node, bb);
    if tail.is_empty() {
        " ".to_string()
    } else if tail.starts_with(' ') {
        tail
    } else {
        format!(" {tail}")
    }
}
