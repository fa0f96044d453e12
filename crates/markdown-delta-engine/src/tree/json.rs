use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Node, NodeKind};
use crate::error::Result;

/// mdast JSON shape of a node: `type`, optional `children`, and every other
/// field flattened alongside.
#[doc(hidden)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawNode {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<Node>,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl TryFrom<RawNode> for Node {
    type Error = serde_json::Error;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        let RawNode {
            kind,
            children,
            mut fields,
        } = raw;

        let kind = if NodeKind::is_builtin(&kind) {
            fields.insert("type".to_string(), Value::String(kind));
            serde_json::from_value(Value::Object(fields))?
        } else {
            NodeKind::Custom { name: kind, fields }
        };

        Ok(Node { kind, children })
    }
}

impl From<Node> for RawNode {
    fn from(node: Node) -> Self {
        let Node { kind, children } = node;
        match kind {
            NodeKind::Custom { name, fields } => RawNode {
                kind: name,
                children,
                fields,
            },
            builtin => {
                let name = builtin.name().to_string();
                let mut fields = match serde_json::to_value(&builtin) {
                    Ok(Value::Object(map)) => map,
                    _ => Map::new(),
                };
                fields.remove("type");
                RawNode {
                    kind: name,
                    children,
                    fields,
                }
            }
        }
    }
}

/// Reads a tree from its mdast JSON form.
pub fn tree_from_json(json: &str) -> Result<Node> {
    Ok(serde_json::from_str(json)?)
}

pub fn tree_to_json(node: &Node) -> Result<String> {
    Ok(serde_json::to_string(node)?)
}
