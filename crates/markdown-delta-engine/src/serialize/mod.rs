//! Serializes document trees back to markdown.
//!
//! Output follows the conventions of the mdast markdown writer with its GFM
//! extensions, so a node the converter cannot interpret reads the same way it
//! would have in the source.

mod table;

use crate::tree::{Node, NodeKind};

/// Serializes a node and everything below it. Non-empty output always ends
/// with a single newline.
pub fn to_markdown(node: &Node) -> String {
    let mut out = serialize(node);
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

fn serialize(node: &Node) -> String {
    match &node.kind {
        NodeKind::Root => flow(&node.children, "\n\n"),
        NodeKind::Paragraph | NodeKind::TableCell => phrasing(&node.children),
        NodeKind::Heading { depth } => {
            let marker = "#".repeat(usize::from((*depth).clamp(1, 6)));
            let content = phrasing(&node.children);
            if content.is_empty() {
                marker
            } else {
                format!("{marker} {content}")
            }
        }
        NodeKind::ThematicBreak => "***".to_string(),
        NodeKind::Blockquote => quote(&flow(&node.children, "\n\n")),
        NodeKind::List { ordered, start, spread } => list(node, *ordered, *start, *spread),
        NodeKind::ListItem { checked, spread } => {
            list_item("*", *checked, &node.children, *spread)
        }
        NodeKind::Code { lang, meta, value } => code(lang.as_deref(), meta.as_deref(), value),
        NodeKind::Html { value } => value.clone(),
        NodeKind::Text { value } => escape(value),
        NodeKind::Emphasis => format!("*{}*", phrasing(&node.children)),
        NodeKind::Strong => format!("**{}**", phrasing(&node.children)),
        NodeKind::Delete => format!("~~{}~~", phrasing(&node.children)),
        NodeKind::InlineCode { value } => inline_code(value),
        NodeKind::Break => "\\\n".to_string(),
        NodeKind::Link { url, title } => {
            format!("[{}]({})", phrasing(&node.children), destination(url, title.as_deref()))
        }
        NodeKind::Image { url, title, alt } => {
            format!("![{}]({})", escape(alt), destination(url, title.as_deref()))
        }
        NodeKind::Table { align } => table::table(node, align),
        NodeKind::TableRow => table::row(node),
        NodeKind::Custom { fields, .. } => match fields.get("value").and_then(|v| v.as_str()) {
            Some(value) => value.to_string(),
            None => phrasing(&node.children),
        },
    }
}

fn flow(children: &[Node], separator: &str) -> String {
    children
        .iter()
        .map(serialize)
        .collect::<Vec<_>>()
        .join(separator)
}

fn phrasing(children: &[Node]) -> String {
    children.iter().map(serialize).collect()
}

fn quote(content: &str) -> String {
    content
        .split('\n')
        .map(|line| {
            if line.is_empty() {
                ">".to_string()
            } else {
                format!("> {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn list(node: &Node, ordered: bool, start: Option<u64>, spread: bool) -> String {
    let loose = spread
        || node
            .children
            .iter()
            .any(|item| matches!(item.kind, NodeKind::ListItem { spread: true, .. }));
    let first = start.unwrap_or(1);

    let items: Vec<String> = node
        .children
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let marker = if ordered {
                format!("{}.", first + index as u64)
            } else {
                "*".to_string()
            };
            match item.kind {
                NodeKind::ListItem { checked, spread } => {
                    list_item(&marker, checked, &item.children, spread)
                }
                _ => serialize(item),
            }
        })
        .collect();

    items.join(if loose { "\n\n" } else { "\n" })
}

/// One item: the marker, a space, then the content with continuation lines
/// indented to line up after the marker.
fn list_item(marker: &str, checked: Option<bool>, children: &[Node], spread: bool) -> String {
    let mut content = flow(children, if spread { "\n\n" } else { "\n" });
    match checked {
        Some(true) => content.insert_str(0, "[x] "),
        Some(false) => content.insert_str(0, "[ ] "),
        None => {}
    }

    let indent = " ".repeat(marker.len() + 1);
    let mut out = String::with_capacity(content.len() + marker.len() + 1);
    for (index, line) in content.split('\n').enumerate() {
        if index == 0 {
            out.push_str(marker);
            if !line.is_empty() {
                out.push(' ');
            }
        } else {
            out.push('\n');
            if !line.is_empty() {
                out.push_str(&indent);
            }
        }
        out.push_str(line);
    }
    out
}

fn code(lang: Option<&str>, meta: Option<&str>, value: &str) -> String {
    let fence = "`".repeat(longest_run(value, '`').max(2) + 1);
    let mut info = lang.unwrap_or_default().to_string();
    if let Some(meta) = meta.filter(|_| !info.is_empty()) {
        info.push(' ');
        info.push_str(meta);
    }
    format!("{fence}{info}\n{value}\n{fence}")
}

fn inline_code(value: &str) -> String {
    let mut size = 1;
    while contains_run(value, '`', size) {
        size += 1;
    }
    let fence = "`".repeat(size);
    let pad = value.starts_with('`') || value.ends_with('`');
    if pad {
        format!("{fence} {value} {fence}")
    } else {
        format!("{fence}{value}{fence}")
    }
}

fn destination(url: &str, title: Option<&str>) -> String {
    let mut out = if url.is_empty() || url.contains(char::is_whitespace) {
        format!("<{url}>")
    } else {
        url.to_string()
    };
    if let Some(title) = title {
        out.push_str(&format!(" \"{}\"", title.replace('"', "\\\"")));
    }
    out
}

/// Backslash-escapes characters that would otherwise start markup.
fn escape(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    for (index, &ch) in chars.iter().enumerate() {
        let escaped = match ch {
            '\\' | '*' | '`' | '[' | ']' => true,
            '_' => {
                let before = index.checked_sub(1).and_then(|i| chars.get(i));
                let after = chars.get(index + 1);
                !(before.is_some_and(|c| c.is_alphanumeric())
                    && after.is_some_and(|c| c.is_alphanumeric()))
            }
            _ => false,
        };
        if escaped {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn longest_run(text: &str, ch: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == ch {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Whether `text` has a run of exactly `size` consecutive `ch`.
fn contains_run(text: &str, ch: char, size: usize) -> bool {
    let mut current = 0;
    for c in text.chars().chain(std::iter::once('\0')) {
        if c == ch {
            current += 1;
        } else {
            if current == size {
                return true;
            }
            current = 0;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Node::thematic_break(), "***\n")]
    #[case(Node::heading(2, vec![Node::text("Title")]), "## Title\n")]
    #[case(
        Node::paragraph(vec![
            Node::text("a "),
            Node::strong(vec![Node::text("b")]),
            Node::text(" "),
            Node::emphasis(vec![Node::text("c")]),
            Node::text(" "),
            Node::delete(vec![Node::text("d")]),
        ]),
        "a **b** *c* ~~d~~\n"
    )]
    #[case(Node::paragraph(vec![Node::inline_code("a`b")]), "``a`b``\n")]
    #[case(Node::paragraph(vec![Node::text("snake_case and *star*")]), "snake_case and \\*star\\*\n")]
    #[case(
        Node::paragraph(vec![Node::text("a"), Node::hard_break(), Node::text("b")]),
        "a\\\nb\n"
    )]
    #[case(
        Node::paragraph(vec![Node::link("https://x.dev", vec![Node::text("x")])]),
        "[x](https://x.dev)\n"
    )]
    #[case(Node::paragraph(vec![Node::image("i.png", "alt")]), "![alt](i.png)\n")]
    #[case(Node::code(Some("rust"), "fn main() {}"), "```rust\nfn main() {}\n```\n")]
    #[case(
        Node::blockquote(vec![
            Node::paragraph(vec![Node::text("one")]),
            Node::paragraph(vec![Node::text("two")]),
        ]),
        "> one\n>\n> two\n"
    )]
    fn serializes_nodes(#[case] node: Node, #[case] expected: &str) {
        assert_eq!(to_markdown(&node), expected);
    }

    #[test]
    fn serializes_lists_with_tasks_and_nesting() {
        let tree = Node::root(vec![
            Node::list(
                false,
                vec![
                    Node::list_item(
                        Some(true),
                        vec![
                            Node::paragraph(vec![Node::text("done")]),
                            Node::list(true, vec![Node::list_item(None, vec![Node::paragraph(vec![Node::text("sub")])])]),
                        ],
                    ),
                    Node::list_item(Some(false), vec![Node::paragraph(vec![Node::text("todo")])]),
                ],
            ),
            Node::paragraph(vec![Node::text("after")]),
        ]);

        assert_eq!(
            to_markdown(&tree),
            "* [x] done\n  1. sub\n* [ ] todo\n\nafter\n"
        );
    }

    #[test]
    fn code_fence_grows_past_inner_fences() {
        let node = Node::code(None, "```\ninner\n```");
        assert_eq!(to_markdown(&node), "````\n```\ninner\n```\n````\n");
    }

    #[test]
    fn custom_node_without_value_uses_children() {
        let node = Node::custom("span", serde_json::Map::new(), vec![Node::text("inner")]);
        assert_eq!(to_markdown(&node), "inner\n");
    }

    #[test]
    fn empty_node_stays_empty() {
        assert_eq!(to_markdown(&Node::root(vec![])), "");
    }
}
