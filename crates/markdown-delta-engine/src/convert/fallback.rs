use super::{Context, Handler, Outcome, Visit};
use crate::delta::Op;
use crate::serialize::to_markdown;

/// Last resort: re-serializes the node to markdown and inserts it verbatim,
/// without attributes or a structural terminator. Accepts every node.
pub struct Serialize;

impl Handler for Serialize {
    fn handle(&self, visit: Visit<'_>, cx: &mut Context<'_>) -> Outcome {
        log::debug!("serializing unsupported {} node as markdown", visit.node.name());
        cx.push(Op::text(to_markdown(visit.node)));
        Outcome::Done
    }
}
