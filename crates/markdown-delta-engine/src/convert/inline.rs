//! Inline handlers. Inline content never emits a structural newline.

use serde_json::json;

use super::{Context, Handler, Outcome, Visit, inline_attributes};
use crate::delta::Op;
use crate::tree::NodeKind;

pub struct Text;

impl Handler for Text {
    fn handle(&self, visit: Visit<'_>, cx: &mut Context<'_>) -> Outcome {
        let Some(value) = visit.node.text_value() else {
            return Outcome::Declined;
        };
        let op = Op::text(value);
        cx.push(match inline_attributes(visit.ancestors) {
            Some(attrs) => op.with_attributes(attrs),
            None => op,
        });
        Outcome::Done
    }
}

/// Strong, emphasis and delete only contribute attributes to the text below
/// them, which [`Text`] reads from the ancestor chain.
pub struct Formatting;

impl Handler for Formatting {
    fn handle(&self, visit: Visit<'_>, cx: &mut Context<'_>) -> Outcome {
        if !matches!(
            visit.node.kind,
            NodeKind::Strong | NodeKind::Emphasis | NodeKind::Delete
        ) {
            return Outcome::Declined;
        }
        cx.process_children(visit);
        Outcome::Done
    }
}

/// Emits each literal text child with the link attribute. Children are not
/// dispatched; anything other than plain text inside a link is dropped.
pub struct Link;

impl Handler for Link {
    fn handle(&self, visit: Visit<'_>, cx: &mut Context<'_>) -> Outcome {
        let NodeKind::Link { url, .. } = &visit.node.kind else {
            return Outcome::Declined;
        };
        for text in visit.node.children.iter().filter_map(|child| child.text_value()) {
            cx.push(Op::text(text).attr("link", url.as_str()));
        }
        Outcome::Done
    }
}

pub struct Image;

impl Handler for Image {
    fn handle(&self, visit: Visit<'_>, cx: &mut Context<'_>) -> Outcome {
        let NodeKind::Image { url, alt, .. } = &visit.node.kind else {
            return Outcome::Declined;
        };
        cx.push(Op::embed(json!({ "image": url })).attr("alt", alt.as_str()));
        Outcome::Done
    }
}

pub struct InlineCode;

impl Handler for InlineCode {
    fn handle(&self, visit: Visit<'_>, cx: &mut Context<'_>) -> Outcome {
        let NodeKind::InlineCode { value } = &visit.node.kind else {
            return Outcome::Declined;
        };
        cx.push(Op::text(value.as_str()).attr("code", true));
        Outcome::Done
    }
}
