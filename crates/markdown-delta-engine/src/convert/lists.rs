use crate::tree::{Node, NodeKind};

/// Joins the ordered lists of a root's top-level children into logical lists.
///
/// Every ordered list continues the currently open ordered list, if any: it
/// stays where it is and its `start` picks up the open list's count. Bullet
/// lists pass through without closing it, so ordered items separated only by
/// bullet lists keep counting as one list while every item keeps its place in
/// the document. Any other node closes the open list. Nested lists are left
/// alone, and non-root nodes are returned unchanged.
pub fn merge_ordered_lists(tree: Node) -> Node {
    let Node { kind, children } = tree;
    if kind != NodeKind::Root {
        return Node { kind, children };
    }

    // Number of the next item in the open ordered list.
    let mut next: Option<u64> = None;
    let mut merged: Vec<Node> = Vec::with_capacity(children.len());

    for mut child in children {
        let count = child.children.len() as u64;
        match &mut child.kind {
            NodeKind::List {
                ordered: true,
                start,
                ..
            } => {
                let first = match next {
                    Some(number) => {
                        log::debug!("continuing ordered list at item {number}");
                        *start = Some(number);
                        number
                    }
                    None => *start.get_or_insert(1),
                };
                next = Some(first + count);
            }
            NodeKind::List { ordered: false, .. } => {}
            _ => next = None,
        }
        merged.push(child);
    }

    Node::root(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delta::Op;
    use pretty_assertions::assert_eq;

    fn item(text: &str) -> Node {
        Node::list_item(None, vec![Node::paragraph(vec![Node::text(text)])])
    }

    fn ordered_from(start: u64, items: Vec<Node>) -> Node {
        let mut list = Node::list(true, items);
        if let NodeKind::List { start: at, .. } = &mut list.kind {
            *at = Some(start);
        }
        list
    }

    #[test]
    fn continues_ordered_lists_across_bullet_lists_in_place() {
        let tree = Node::root(vec![
            Node::list(true, vec![item("1"), item("2")]),
            Node::list(false, vec![item("a")]),
            Node::list(true, vec![item("3")]),
            Node::list(false, vec![item("b")]),
        ]);

        assert_eq!(
            merge_ordered_lists(tree),
            Node::root(vec![
                Node::list(true, vec![item("1"), item("2")]),
                Node::list(false, vec![item("a")]),
                ordered_from(3, vec![item("3")]),
                Node::list(false, vec![item("b")]),
            ])
        );
    }

    #[test]
    fn interleaved_lists_convert_in_document_order() {
        let tree = Node::root(vec![
            Node::list(true, vec![item("one")]),
            Node::list(false, vec![item("a")]),
            Node::list(true, vec![item("two")]),
            Node::list(false, vec![item("b")]),
        ]);

        assert_eq!(
            crate::convert::tree_to_delta(tree),
            vec![
                Op::text("one"),
                Op::newline().attr("list", "ordered"),
                Op::text("a"),
                Op::newline().attr("list", "bullet"),
                Op::text("two"),
                Op::newline().attr("list", "ordered"),
                Op::text("b"),
                Op::newline().attr("list", "bullet"),
            ]
        );
    }

    #[test]
    fn first_list_keeps_its_own_start() {
        let tree = Node::root(vec![
            ordered_from(5, vec![item("5")]),
            Node::list(true, vec![item("6")]),
        ]);
        assert_eq!(
            merge_ordered_lists(tree),
            Node::root(vec![
                ordered_from(5, vec![item("5")]),
                ordered_from(6, vec![item("6")]),
            ])
        );
    }

    #[test]
    fn non_list_node_closes_the_group() {
        let tree = Node::root(vec![
            Node::list(true, vec![item("1")]),
            Node::paragraph(vec![Node::text("break")]),
            Node::list(true, vec![item("2")]),
            Node::list(true, vec![item("3")]),
        ]);

        assert_eq!(
            merge_ordered_lists(tree),
            Node::root(vec![
                Node::list(true, vec![item("1")]),
                Node::paragraph(vec![Node::text("break")]),
                Node::list(true, vec![item("2")]),
                ordered_from(2, vec![item("3")]),
            ])
        );
    }

    #[test]
    fn bullet_lists_never_merge() {
        let tree = Node::root(vec![
            Node::list(false, vec![item("a")]),
            Node::list(false, vec![item("b")]),
        ]);
        assert_eq!(merge_ordered_lists(tree.clone()), tree);
    }

    #[test]
    fn nested_lists_are_untouched() {
        let nested = Node::list_item(
            None,
            vec![
                Node::paragraph(vec![Node::text("parent")]),
                Node::list(true, vec![item("x")]),
                Node::list(false, vec![item("y")]),
                Node::list(true, vec![item("z")]),
            ],
        );
        let tree = Node::root(vec![Node::list(false, vec![nested])]);
        assert_eq!(merge_ordered_lists(tree.clone()), tree);
    }

    #[test]
    fn non_root_input_is_returned_unchanged() {
        let list = Node::list(true, vec![item("1")]);
        assert_eq!(merge_ordered_lists(list.clone()), list);
    }
}
