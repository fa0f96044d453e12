//! Block-level handlers. Each structural unit ends with exactly one newline
//! operation carrying the unit's attributes.

use super::{Context, Handler, Outcome, Visit};
use crate::delta::Op;
use crate::tree::NodeKind;

pub struct Root;

impl Handler for Root {
    fn handle(&self, visit: Visit<'_>, cx: &mut Context<'_>) -> Outcome {
        if visit.node.kind != NodeKind::Root {
            return Outcome::Declined;
        }
        cx.process_children(visit);
        Outcome::Done
    }
}

pub struct Paragraph;

impl Handler for Paragraph {
    fn handle(&self, visit: Visit<'_>, cx: &mut Context<'_>) -> Outcome {
        if visit.node.kind != NodeKind::Paragraph {
            return Outcome::Declined;
        }
        cx.process_children(visit);
        cx.push(Op::newline());
        Outcome::Done
    }
}

pub struct Heading;

impl Handler for Heading {
    fn handle(&self, visit: Visit<'_>, cx: &mut Context<'_>) -> Outcome {
        let NodeKind::Heading { depth } = visit.node.kind else {
            return Outcome::Declined;
        };
        cx.process_children(visit);
        cx.push(Op::newline().attr("header", depth));
        Outcome::Done
    }
}

pub struct Blockquote;

impl Handler for Blockquote {
    fn handle(&self, visit: Visit<'_>, cx: &mut Context<'_>) -> Outcome {
        if visit.node.kind != NodeKind::Blockquote {
            return Outcome::Declined;
        }
        cx.process_children(visit);
        cx.pop_bare_newline();
        cx.push(Op::newline().attr("blockquote", true));
        Outcome::Done
    }
}

pub struct Code;

impl Handler for Code {
    fn handle(&self, visit: Visit<'_>, cx: &mut Context<'_>) -> Outcome {
        let NodeKind::Code { value, .. } = &visit.node.kind else {
            return Outcome::Declined;
        };
        cx.push(Op::text(value.as_str()));
        cx.push(Op::newline().attr("code-block", true));
        Outcome::Done
    }
}

/// Lists emit nothing themselves; their items carry the structure.
pub struct List;

impl Handler for List {
    fn handle(&self, visit: Visit<'_>, cx: &mut Context<'_>) -> Outcome {
        if !visit.node.is_list() {
            return Outcome::Declined;
        }
        cx.process_children(visit);
        Outcome::Done
    }
}

pub struct ListItem;

impl Handler for ListItem {
    fn handle(&self, visit: Visit<'_>, cx: &mut Context<'_>) -> Outcome {
        let NodeKind::ListItem { checked, .. } = visit.node.kind else {
            return Outcome::Declined;
        };

        cx.process_children_where(visit, |child| !child.is_list());
        cx.pop_bare_newline();

        let lists: Vec<bool> = visit
            .ancestors
            .iter()
            .filter_map(|ancestor| match ancestor.kind {
                NodeKind::List { ordered, .. } => Some(ordered),
                _ => None,
            })
            .collect();
        let ordered = lists.last().copied().unwrap_or(false);

        let marker = match checked {
            Some(true) => "checked",
            Some(false) => "unchecked",
            None if ordered => "ordered",
            None => "bullet",
        };
        let mut terminator = Op::newline().attr("list", marker);
        if lists.len() > 1 {
            terminator = terminator.attr("indent", lists.len() - 1);
        }
        cx.push(terminator);

        cx.process_children_where(visit, |child| child.is_list());
        Outcome::Done
    }
}

#[cfg(test)]
mod tests {
    use crate::convert::tree_to_delta;
    use crate::delta::Op;
    use crate::tree::Node;
    use pretty_assertions::assert_eq;

    fn item(checked: Option<bool>, text: &str, nested: Vec<Node>) -> Node {
        let mut children = vec![Node::paragraph(vec![Node::text(text)])];
        children.extend(nested);
        Node::list_item(checked, children)
    }

    #[test]
    fn paragraph_ends_with_bare_newline() {
        let ops = tree_to_delta(Node::root(vec![
            Node::paragraph(vec![Node::text("a")]),
            Node::paragraph(vec![Node::text("b")]),
        ]));
        assert_eq!(
            ops,
            vec![Op::text("a"), Op::newline(), Op::text("b"), Op::newline()]
        );
    }

    #[test]
    fn heading_carries_depth() {
        let ops = tree_to_delta(Node::root(vec![Node::heading(4, vec![Node::text("h")])]));
        assert_eq!(ops, vec![Op::text("h"), Op::newline().attr("header", 4)]);
    }

    #[test]
    fn blockquote_replaces_paragraph_terminator() {
        let ops = tree_to_delta(Node::root(vec![Node::blockquote(vec![
            Node::paragraph(vec![Node::text("one")]),
            Node::paragraph(vec![Node::text("two")]),
        ])]));
        assert_eq!(
            ops,
            vec![
                Op::text("one"),
                Op::newline(),
                Op::text("two"),
                Op::newline().attr("blockquote", true),
            ]
        );
    }

    #[test]
    fn code_block_keeps_literal_text() {
        let ops = tree_to_delta(Node::root(vec![Node::code(Some("rust"), "let a = 1;\nlet b = 2;")]));
        assert_eq!(
            ops,
            vec![
                Op::text("let a = 1;\nlet b = 2;"),
                Op::newline().attr("code-block", true),
            ]
        );
    }

    #[test]
    fn nested_items_follow_their_parent_with_indent() {
        let tree = Node::root(vec![Node::list(
            false,
            vec![
                item(
                    None,
                    "parent",
                    vec![Node::list(
                        true,
                        vec![item(
                            None,
                            "child",
                            vec![Node::list(false, vec![item(Some(true), "grandchild", vec![])])],
                        )],
                    )],
                ),
                item(None, "sibling", vec![]),
            ],
        )]);

        assert_eq!(
            tree_to_delta(tree),
            vec![
                Op::text("parent"),
                Op::newline().attr("list", "bullet"),
                Op::text("child"),
                Op::newline().attr("list", "ordered").attr("indent", 1),
                Op::text("grandchild"),
                Op::newline().attr("list", "checked").attr("indent", 2),
                Op::text("sibling"),
                Op::newline().attr("list", "bullet"),
            ]
        );
    }

    #[test]
    fn checked_state_wins_over_ordered() {
        let tree = Node::root(vec![Node::list(
            true,
            vec![item(Some(false), "todo", vec![]), item(Some(true), "done", vec![])],
        )]);
        assert_eq!(
            tree_to_delta(tree),
            vec![
                Op::text("todo"),
                Op::newline().attr("list", "unchecked"),
                Op::text("done"),
                Op::newline().attr("list", "checked"),
            ]
        );
    }

    #[test]
    fn item_keeps_inner_block_terminators() {
        let tree = Node::root(vec![Node::list(
            false,
            vec![Node::list_item(
                None,
                vec![
                    Node::paragraph(vec![Node::text("intro")]),
                    Node::code(None, "x"),
                ],
            )],
        )]);
        assert_eq!(
            tree_to_delta(tree),
            vec![
                Op::text("intro"),
                Op::newline(),
                Op::text("x"),
                Op::newline().attr("code-block", true),
                Op::newline().attr("list", "bullet"),
            ]
        );
    }
}
