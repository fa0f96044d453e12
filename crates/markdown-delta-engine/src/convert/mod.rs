//! Tree-to-delta conversion.
//!
//! A [`Converter`] walks the document depth first and offers every node to an
//! ordered chain of [`Handler`]s. The first handler that does not decline owns
//! the node: it emits operations into the [`Context`] and recurses into
//! children through [`Context::process_children`] when it needs to.
//!
//! An optional custom handler is tried before the built-in chain, so callers
//! can override any kind or teach the converter about their own. Handlers may
//! also build a synthetic node and [`Context::process`] it, which is how a
//! custom kind delegates to a built-in one.

mod attributes;
mod blocks;
mod breaks;
mod fallback;
mod inline;
mod lists;

use crate::delta::Op;
use crate::parsing::{ParseOptions, parse_markdown};
use crate::tree::Node;

pub use attributes::inline_attributes;
pub use lists::merge_ordered_lists;

/// Result of offering a node to a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The node is not for this handler; try the next one.
    Declined,
    /// The node was fully handled.
    Done,
    /// Handled, and the node's next sibling was consumed with it.
    SkipNext,
}

/// A node being visited together with where it sits in the tree.
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a> {
    pub node: &'a Node,
    /// Proper ancestors, root first.
    pub ancestors: &'a [&'a Node],
    /// Position among the parent's children. `None` for synthetic nodes.
    pub index: Option<usize>,
    /// The previous sibling was consumed by a [`Outcome::SkipNext`] and no
    /// longer counts as a sibling.
    pub after_skip: bool,
}

impl<'a> Visit<'a> {
    pub fn parent(&self) -> Option<&'a Node> {
        self.ancestors.last().copied()
    }

    pub fn previous_sibling(&self) -> Option<&'a Node> {
        if self.after_skip {
            return None;
        }
        let index = self.index?.checked_sub(1)?;
        self.parent()?.children.get(index)
    }

    pub fn next_sibling(&self) -> Option<&'a Node> {
        let index = self.index? + 1;
        self.parent()?.children.get(index)
    }

    /// Ancestor chain for this node's children.
    pub fn descend(&self) -> Vec<&'a Node> {
        let mut chain = Vec::with_capacity(self.ancestors.len() + 1);
        chain.extend_from_slice(self.ancestors);
        chain.push(self.node);
        chain
    }
}

/// One unit of dispatch logic.
pub trait Handler {
    fn handle(&self, visit: Visit<'_>, cx: &mut Context<'_>) -> Outcome;
}

/// Pins a closure to the [`Handler`] signature so it can be passed to
/// [`Converter::with_handler`].
pub fn handler_fn<F>(f: F) -> F
where
    F: Fn(Visit<'_>, &mut Context<'_>) -> Outcome,
{
    f
}

impl<F> Handler for F
where
    F: Fn(Visit<'_>, &mut Context<'_>) -> Outcome,
{
    fn handle(&self, visit: Visit<'_>, cx: &mut Context<'_>) -> Outcome {
        self(visit, cx)
    }
}

/// Output accumulator and re-entry point handed to every handler.
pub struct Context<'c> {
    converter: &'c Converter,
    ops: Vec<Op>,
}

impl<'c> Context<'c> {
    fn new(converter: &'c Converter) -> Self {
        Self {
            converter,
            ops: Vec::new(),
        }
    }

    pub fn push(&mut self, op: Op) {
        self.ops.push(op);
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn last(&self) -> Option<&Op> {
        self.ops.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut Op> {
        self.ops.last_mut()
    }

    /// Drops the trailing operation if it is an unattributed newline.
    pub fn pop_bare_newline(&mut self) -> bool {
        if self.ops.last().is_some_and(Op::is_bare_newline) {
            self.ops.pop();
            return true;
        }
        false
    }

    /// Dispatches a node that is not part of the tree being walked, with the
    /// given ancestors. Sibling-aware handlers see it as having no siblings.
    pub fn process(&mut self, node: &Node, ancestors: &[&Node]) {
        self.dispatch(Visit {
            node,
            ancestors,
            index: None,
            after_skip: false,
        });
    }

    /// Dispatches every child of `visit.node` in order.
    pub fn process_children(&mut self, visit: Visit<'_>) {
        self.process_children_where(visit, |_| true);
    }

    /// Dispatches the children of `visit.node` accepted by `filter`, in order.
    pub fn process_children_where(&mut self, visit: Visit<'_>, filter: impl Fn(&Node) -> bool) {
        let chain = visit.descend();
        let mut skip_next = false;
        let mut after_skip = false;
        for (index, child) in visit.node.children.iter().enumerate() {
            if std::mem::take(&mut skip_next) {
                after_skip = true;
                continue;
            }
            if !filter(child) {
                continue;
            }
            let outcome = self.dispatch(Visit {
                node: child,
                ancestors: &chain,
                index: Some(index),
                after_skip: std::mem::take(&mut after_skip),
            });
            skip_next = outcome == Outcome::SkipNext;
        }
    }

    fn dispatch(&mut self, visit: Visit<'_>) -> Outcome {
        log::trace!(
            "visit {} at depth {}",
            visit.node.name(),
            visit.ancestors.len()
        );
        let converter = self.converter;
        for handler in converter.chain() {
            let outcome = handler.handle(visit, self);
            if outcome != Outcome::Declined {
                return outcome;
            }
        }
        log::warn!("no handler accepted {}", visit.node.name());
        Outcome::Declined
    }

    fn finish(self) -> Vec<Op> {
        self.ops
    }
}

/// Converts document trees into deltas.
pub struct Converter {
    custom: Option<Box<dyn Handler>>,
    builtin: Vec<Box<dyn Handler>>,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter {
    pub fn new() -> Self {
        Self {
            custom: None,
            builtin: builtin_handlers(),
        }
    }

    /// Installs a handler tried before all built-in ones. Replaces any
    /// previously installed custom handler.
    pub fn with_handler(mut self, handler: impl Handler + 'static) -> Self {
        self.custom = Some(Box::new(handler));
        self
    }

    fn chain(&self) -> impl Iterator<Item = &dyn Handler> {
        self.custom
            .iter()
            .chain(self.builtin.iter())
            .map(|handler| &**handler)
    }

    pub fn convert_markdown(&self, source: &str) -> Vec<Op> {
        self.convert_markdown_with(source, &ParseOptions::default())
    }

    pub fn convert_markdown_with(&self, source: &str, options: &ParseOptions) -> Vec<Op> {
        self.convert_tree(parse_markdown(source, options))
    }

    /// Converts an already built tree. A root's top-level lists are merged
    /// first; any other node is converted as is.
    pub fn convert_tree(&self, tree: Node) -> Vec<Op> {
        let tree = merge_ordered_lists(tree);
        let mut cx = Context::new(self);
        cx.process(&tree, &[]);
        cx.finish()
    }
}

/// Built-in handlers in priority order. The fallback serializer accepts
/// everything and must stay last.
fn builtin_handlers() -> Vec<Box<dyn Handler>> {
    vec![
        Box::new(blocks::Root),
        Box::new(blocks::Paragraph),
        Box::new(inline::Text),
        Box::new(inline::Formatting),
        Box::new(blocks::Heading),
        Box::new(blocks::List),
        Box::new(blocks::ListItem),
        Box::new(blocks::Blockquote),
        Box::new(inline::Link),
        Box::new(inline::Image),
        Box::new(blocks::Code),
        Box::new(inline::InlineCode),
        Box::new(breaks::Break),
        Box::new(fallback::Serialize),
    ]
}

/// Converts markdown source with default parse options.
pub fn markdown_to_delta(source: &str) -> Vec<Op> {
    Converter::new().convert_markdown(source)
}

pub fn tree_to_delta(tree: Node) -> Vec<Op> {
    Converter::new().convert_tree(tree)
}
