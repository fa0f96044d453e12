use crate::delta::Attributes;
use crate::tree::{Node, NodeKind};

/// Inline formatting implied by a text node's ancestors, at any depth.
/// `None` when no formatting ancestor is present.
pub fn inline_attributes(ancestors: &[&Node]) -> Option<Attributes> {
    let mut attrs = Attributes::new();
    for ancestor in ancestors {
        let key = match ancestor.kind {
            NodeKind::Strong => "bold",
            NodeKind::Emphasis => "italic",
            NodeKind::Delete => "strike",
            _ => continue,
        };
        attrs.insert(key.to_string(), true.into());
    }
    (!attrs.is_empty()).then_some(attrs)
}
