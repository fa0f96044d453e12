//! Converts markdown document trees into flat rich-text deltas.
//!
//! Input is either markdown source, parsed with GFM extensions, or an
//! already built [`Node`] tree. Output is an ordered list of [`Op`]s, each
//! inserting text or an embed with optional formatting attributes. Structure
//! is carried by newline operations whose attributes describe the block they
//! terminate.

pub mod convert;
pub mod delta;
pub mod error;
pub mod parsing;
pub mod serialize;
pub mod tree;

// Re-export key types for easier usage
pub use convert::{
    Context, Converter, Handler, Outcome, Visit, handler_fn, markdown_to_delta, tree_to_delta,
};
pub use delta::{Attributes, Insert, Op, plain_text};
pub use error::{Error, Result};
pub use parsing::{ParseOptions, parse_markdown};
pub use serialize::to_markdown;
pub use tree::{Align, Node, NodeKind, tree_from_json, tree_to_json};
