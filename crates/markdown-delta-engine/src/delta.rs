//! Flat rich-text output: a sequence of insert operations.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Formatting attributes of an operation. Open-ended: handlers may add any key.
pub type Attributes = Map<String, Value>;

/// Content carried by an operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Insert {
    Text(String),
    /// Handler-defined object such as `{"image": url}`.
    Embed(Value),
}

impl Insert {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Insert::Text(text) => Some(text),
            Insert::Embed(_) => None,
        }
    }
}

/// One insert operation. `attributes` is absent rather than empty when there
/// is no formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Op {
    pub insert: Insert,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Attributes>,
}

impl Op {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            insert: Insert::Text(text.into()),
            attributes: None,
        }
    }

    pub fn embed(value: Value) -> Self {
        Self {
            insert: Insert::Embed(value),
            attributes: None,
        }
    }

    /// A bare newline: the terminator of a plain paragraph.
    pub fn newline() -> Self {
        Self::text("\n")
    }

    /// Adds one attribute.
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Replaces the attributes; an empty mapping clears them.
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = (!attributes.is_empty()).then_some(attributes);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.as_ref().and_then(|attrs| attrs.get(key))
    }

    pub fn is_bare_newline(&self) -> bool {
        self.attributes.is_none() && self.insert.as_text() == Some("\n")
    }
}

/// Concatenated text of a delta, embeds skipped.
pub fn plain_text(ops: &[Op]) -> String {
    ops.iter().filter_map(|op| op.insert.as_text()).collect()
}
