//! Document tree consumed by the converter.
//!
//! The shape follows mdast: every node has a kind with its own fields plus an
//! ordered list of owned children. Kinds the engine does not know about are
//! carried as [`NodeKind::Custom`] with their fields kept as opaque JSON.

mod json;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub use json::{tree_from_json, tree_to_json};

/// Column alignment of a GFM table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Right,
    Center,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeKind {
    Root,
    Paragraph,
    Heading {
        depth: u8,
    },
    ThematicBreak,
    Blockquote,
    List {
        #[serde(default)]
        ordered: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start: Option<u64>,
        #[serde(default)]
        spread: bool,
    },
    ListItem {
        /// `None` when the item is not a task item.
        #[serde(default)]
        checked: Option<bool>,
        #[serde(default)]
        spread: bool,
    },
    Code {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        lang: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        meta: Option<String>,
        value: String,
    },
    Html {
        value: String,
    },
    Text {
        value: String,
    },
    Emphasis,
    Strong,
    Delete,
    InlineCode {
        value: String,
    },
    Break,
    Link {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    Image {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, deserialize_with = "null_as_default")]
        alt: String,
    },
    Table {
        #[serde(default)]
        align: Vec<Option<Align>>,
    },
    TableRow,
    TableCell,
    /// A caller-defined kind. `fields` holds everything except `type` and
    /// `children`.
    #[serde(skip)]
    Custom {
        name: String,
        fields: Map<String, Value>,
    },
}

impl NodeKind {
    const BUILTIN: &'static [&'static str] = &[
        "root",
        "paragraph",
        "heading",
        "thematicBreak",
        "blockquote",
        "list",
        "listItem",
        "code",
        "html",
        "text",
        "emphasis",
        "strong",
        "delete",
        "inlineCode",
        "break",
        "link",
        "image",
        "table",
        "tableRow",
        "tableCell",
    ];

    pub fn is_builtin(name: &str) -> bool {
        Self::BUILTIN.contains(&name)
    }

    /// The mdast `type` tag of this kind.
    pub fn name(&self) -> &str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Heading { .. } => "heading",
            NodeKind::ThematicBreak => "thematicBreak",
            NodeKind::Blockquote => "blockquote",
            NodeKind::List { .. } => "list",
            NodeKind::ListItem { .. } => "listItem",
            NodeKind::Code { .. } => "code",
            NodeKind::Html { .. } => "html",
            NodeKind::Text { .. } => "text",
            NodeKind::Emphasis => "emphasis",
            NodeKind::Strong => "strong",
            NodeKind::Delete => "delete",
            NodeKind::InlineCode { .. } => "inlineCode",
            NodeKind::Break => "break",
            NodeKind::Link { .. } => "link",
            NodeKind::Image { .. } => "image",
            NodeKind::Table { .. } => "table",
            NodeKind::TableRow => "tableRow",
            NodeKind::TableCell => "tableCell",
            NodeKind::Custom { name, .. } => name,
        }
    }
}

/// mdast allows `null` wherever an optional string may be absent.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A node of the document tree. Parents own their children; there are no
/// back references, the converter tracks ancestry itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "json::RawNode", into = "json::RawNode")]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind, children: Vec<Node>) -> Self {
        Self { kind, children }
    }

    pub fn leaf(kind: NodeKind) -> Self {
        Self::new(kind, Vec::new())
    }

    pub fn root(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Root, children)
    }

    pub fn paragraph(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Paragraph, children)
    }

    pub fn heading(depth: u8, children: Vec<Node>) -> Self {
        Self::new(NodeKind::Heading { depth }, children)
    }

    pub fn blockquote(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Blockquote, children)
    }

    pub fn list(ordered: bool, children: Vec<Node>) -> Self {
        let start = ordered.then_some(1);
        Self::new(
            NodeKind::List {
                ordered,
                start,
                spread: false,
            },
            children,
        )
    }

    pub fn list_item(checked: Option<bool>, children: Vec<Node>) -> Self {
        Self::new(
            NodeKind::ListItem {
                checked,
                spread: false,
            },
            children,
        )
    }

    pub fn code(lang: Option<&str>, value: impl Into<String>) -> Self {
        Self::leaf(NodeKind::Code {
            lang: lang.map(str::to_string),
            meta: None,
            value: value.into(),
        })
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::leaf(NodeKind::Text {
            value: value.into(),
        })
    }

    pub fn strong(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Strong, children)
    }

    pub fn emphasis(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Emphasis, children)
    }

    pub fn delete(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Delete, children)
    }

    pub fn inline_code(value: impl Into<String>) -> Self {
        Self::leaf(NodeKind::InlineCode {
            value: value.into(),
        })
    }

    pub fn hard_break() -> Self {
        Self::leaf(NodeKind::Break)
    }

    pub fn thematic_break() -> Self {
        Self::leaf(NodeKind::ThematicBreak)
    }

    pub fn link(url: impl Into<String>, children: Vec<Node>) -> Self {
        Self::new(
            NodeKind::Link {
                url: url.into(),
                title: None,
            },
            children,
        )
    }

    pub fn image(url: impl Into<String>, alt: impl Into<String>) -> Self {
        Self::leaf(NodeKind::Image {
            url: url.into(),
            title: None,
            alt: alt.into(),
        })
    }

    pub fn custom(name: impl Into<String>, fields: Map<String, Value>, children: Vec<Node>) -> Self {
        Self::new(
            NodeKind::Custom {
                name: name.into(),
                fields,
            },
            children,
        )
    }

    /// The mdast `type` tag of this node.
    pub fn name(&self) -> &str {
        self.kind.name()
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text { .. })
    }

    pub fn is_list(&self) -> bool {
        matches!(self.kind, NodeKind::List { .. })
    }

    /// Literal value of a text node.
    pub fn text_value(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text { value } => Some(value),
            _ => None,
        }
    }

    /// Field of a custom node, e.g. `value` or `data`.
    pub fn field(&self, key: &str) -> Option<&Value> {
        match &self.kind {
            NodeKind::Custom { fields, .. } => fields.get(key),
            _ => None,
        }
    }

    /// Concatenated text of all descendant text-like nodes.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.kind {
            NodeKind::Text { value } | NodeKind::InlineCode { value } => out.push_str(value),
            NodeKind::Image { alt, .. } => out.push_str(alt),
            _ => self.children.iter().for_each(|child| child.collect_text(out)),
        }
    }
}
