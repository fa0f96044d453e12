use super::{Context, Handler, Outcome, Visit};
use crate::delta::{Insert, Op};
use crate::tree::NodeKind;

/// Hard line breaks.
///
/// A break between two plain text siblings is folded into the text: the
/// newline and the next sibling's text are appended to the operation emitted
/// for the previous sibling, and the next sibling is skipped. A skipped
/// sibling no longer counts as text, so a second break right after it is a
/// bare newline, as is a break anywhere else.
pub struct Break;

impl Handler for Break {
    fn handle(&self, visit: Visit<'_>, cx: &mut Context<'_>) -> Outcome {
        if visit.node.kind != NodeKind::Break {
            return Outcome::Declined;
        }

        let between_text = visit.previous_sibling().is_some_and(|n| n.is_text());
        let next_text = visit.next_sibling().and_then(|n| n.text_value());

        if let (true, Some(next)) = (between_text, next_text)
            && let Some(Op {
                insert: Insert::Text(previous),
                ..
            }) = cx.last_mut()
        {
            log::debug!("folding line break into surrounding text");
            previous.push('\n');
            previous.push_str(next);
            return Outcome::SkipNext;
        }

        cx.push(Op::newline());
        Outcome::Done
    }
}

#[cfg(test)]
mod tests {
    use crate::convert::{Converter, Outcome, handler_fn, tree_to_delta};
    use crate::delta::Op;
    use crate::tree::Node;
    use pretty_assertions::assert_eq;

    fn paragraph(children: Vec<Node>) -> Node {
        Node::root(vec![Node::paragraph(children)])
    }

    #[test]
    fn break_between_text_merges() {
        let ops = tree_to_delta(paragraph(vec![
            Node::text("first"),
            Node::hard_break(),
            Node::text("second"),
        ]));
        assert_eq!(ops, vec![Op::text("first\nsecond"), Op::newline()]);
    }

    #[test]
    fn merged_text_keeps_formatting() {
        let ops = tree_to_delta(paragraph(vec![Node::strong(vec![
            Node::text("a"),
            Node::hard_break(),
            Node::text("b"),
        ])]));
        assert_eq!(ops, vec![Op::text("a\nb").attr("bold", true), Op::newline()]);
    }

    #[test]
    fn break_after_merged_text_is_a_bare_newline() {
        let ops = tree_to_delta(paragraph(vec![
            Node::text("a"),
            Node::hard_break(),
            Node::text("b"),
            Node::hard_break(),
            Node::text("c"),
        ]));
        assert_eq!(
            ops,
            vec![
                Op::text("a\nb"),
                Op::newline(),
                Op::text("c"),
                Op::newline(),
            ]
        );
    }

    #[test]
    fn every_other_break_merges() {
        let ops = tree_to_delta(paragraph(vec![
            Node::text("a"),
            Node::hard_break(),
            Node::text("b"),
            Node::hard_break(),
            Node::text("c"),
            Node::hard_break(),
            Node::text("d"),
        ]));
        assert_eq!(
            ops,
            vec![
                Op::text("a\nb"),
                Op::newline(),
                Op::text("c\nd"),
                Op::newline(),
            ]
        );
    }

    #[test]
    fn break_next_to_formatting_is_a_bare_newline() {
        let ops = tree_to_delta(paragraph(vec![
            Node::text("a"),
            Node::hard_break(),
            Node::emphasis(vec![Node::text("b")]),
        ]));
        assert_eq!(
            ops,
            vec![
                Op::text("a"),
                Op::newline(),
                Op::text("b").attr("italic", true),
                Op::newline(),
            ]
        );
    }

    #[test]
    fn break_at_boundary_is_a_bare_newline() {
        let ops = tree_to_delta(paragraph(vec![Node::hard_break(), Node::text("x")]));
        assert_eq!(ops, vec![Op::newline(), Op::text("x"), Op::newline()]);
    }

    #[test]
    fn break_after_replaced_text_does_not_merge_into_embed() {
        let converter = Converter::new().with_handler(handler_fn(|visit, cx| {
            if visit.node.text_value() != Some("emoji") {
                return Outcome::Declined;
            }
            cx.push(Op::embed(serde_json::json!({ "emoji": "smile" })));
            Outcome::Done
        }));

        let ops = converter.convert_tree(paragraph(vec![
            Node::text("emoji"),
            Node::hard_break(),
            Node::text("after"),
        ]));
        assert_eq!(
            ops,
            vec![
                Op::embed(serde_json::json!({ "emoji": "smile" })),
                Op::newline(),
                Op::text("after"),
                Op::newline(),
            ]
        );
    }
}
