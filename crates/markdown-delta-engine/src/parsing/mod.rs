//! Markdown front-end: builds an mdast-shaped tree from pulldown-cmark events.
//!
//! The converter works on trees, so raw markdown is parsed here first. The
//! builder reproduces the mdast conventions the handlers rely on:
//!
//! - Adjacent text events are merged into one text node, and soft line breaks
//!   become a `\n` inside that text.
//! - Hard line breaks are separate `break` nodes.
//! - Code blocks drop the final newline of their content.
//! - Tight list items get their inline content wrapped in a paragraph, as
//!   loose items already have.
//! - A task list marker sets `checked` on its item.
//! - An image's inline children collapse into its `alt` text.
//! - A table's head row becomes its first `tableRow`.

use pulldown_cmark::{Alignment, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::tree::{Align, Node, NodeKind};

/// Which GFM extensions the parser recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub tables: bool,
    pub strikethrough: bool,
    pub tasklists: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            tasklists: true,
        }
    }
}

impl ParseOptions {
    fn to_pulldown(self) -> Options {
        let mut options = Options::empty();
        options.set(Options::ENABLE_TABLES, self.tables);
        options.set(Options::ENABLE_STRIKETHROUGH, self.strikethrough);
        options.set(Options::ENABLE_TASKLISTS, self.tasklists);
        options
    }
}

/// Parses markdown into a `root` node.
pub fn parse_markdown(content: &str, options: &ParseOptions) -> Node {
    let mut builder = TreeBuilder::new();
    for event in Parser::new_ext(content, options.to_pulldown()) {
        builder.process_event(event);
    }
    builder.finish()
}

/// A node under construction.
struct Frame {
    node: Node,
    /// Paragraph opened by the builder for tight list item content.
    implicit: bool,
    /// List item holding explicit paragraphs, i.e. part of a loose list.
    loose: bool,
}

impl Frame {
    fn new(node: Node) -> Self {
        Self {
            node,
            implicit: false,
            loose: false,
        }
    }
}

/// Turns the flat event stream into a tree.
///
/// Every `Start` pushes a frame, every `End` pops the top frame and attaches
/// it to the frame below. Leaf events attach directly to the top frame.
struct TreeBuilder {
    stack: Vec<Frame>,
    /// Set after a task marker so the item text loses its leading space.
    after_task_marker: bool,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Frame::new(Node::root(Vec::new()))],
            after_task_marker: false,
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_leaf(Node::inline_code(code.to_string())),
            Event::InlineHtml(html) => self.inline_leaf(Node::leaf(NodeKind::Html {
                value: html.to_string(),
            })),
            Event::Html(html) => self.text(&html),
            Event::SoftBreak => self.text("\n"),
            Event::HardBreak => self.inline_leaf(Node::hard_break()),
            Event::Rule => {
                self.close_implicit();
                self.attach(Node::thematic_break());
            }
            Event::TaskListMarker(checked) => self.mark_task(checked),
            // Footnotes and math are not enabled.
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let kind = match tag {
            Tag::Paragraph => NodeKind::Paragraph,
            Tag::Heading { level, .. } => NodeKind::Heading { depth: level as u8 },
            Tag::BlockQuote(_) => NodeKind::Blockquote,
            Tag::CodeBlock(kind) => {
                let (lang, meta) = match kind {
                    CodeBlockKind::Fenced(info) => split_info(&info),
                    CodeBlockKind::Indented => (None, None),
                };
                NodeKind::Code {
                    lang,
                    meta,
                    value: String::new(),
                }
            }
            Tag::HtmlBlock => NodeKind::Html {
                value: String::new(),
            },
            Tag::List(start) => NodeKind::List {
                ordered: start.is_some(),
                start,
                spread: false,
            },
            Tag::Item => NodeKind::ListItem {
                checked: None,
                spread: false,
            },
            Tag::Table(alignments) => NodeKind::Table {
                align: alignments.into_iter().map(align).collect(),
            },
            Tag::TableHead | Tag::TableRow => NodeKind::TableRow,
            Tag::TableCell => NodeKind::TableCell,
            Tag::Emphasis => NodeKind::Emphasis,
            Tag::Strong => NodeKind::Strong,
            Tag::Strikethrough => NodeKind::Delete,
            Tag::Link {
                dest_url, title, ..
            } => NodeKind::Link {
                url: dest_url.to_string(),
                title: non_empty(&title),
            },
            Tag::Image {
                dest_url, title, ..
            } => NodeKind::Image {
                url: dest_url.to_string(),
                title: non_empty(&title),
                alt: String::new(),
            },
            other => NodeKind::Custom {
                name: format!("{other:?}"),
                fields: Default::default(),
            },
        };

        if is_phrasing(&kind) {
            self.open_implicit();
        } else {
            self.close_implicit();
        }
        if kind == NodeKind::Paragraph
            && let Some(frame) = self.stack.last_mut()
            && matches!(frame.node.kind, NodeKind::ListItem { .. })
        {
            frame.loose = true;
        }
        self.stack.push(Frame::new(Node::leaf(kind)));
    }

    fn end(&mut self, tag: TagEnd) {
        if tag != TagEnd::Paragraph {
            self.close_implicit();
        }
        if self.stack.len() <= 1 {
            log::warn!("unbalanced end event {tag:?}");
            return;
        }
        if let Some(frame) = self.stack.pop() {
            let mut node = finish_node(frame.node);
            if let NodeKind::ListItem { spread, .. } = &mut node.kind {
                *spread = frame.loose;
            }
            self.attach(node);
        }
    }

    fn text(&mut self, text: &str) {
        let text = if std::mem::take(&mut self.after_task_marker) {
            text.trim_start()
        } else {
            text
        };

        if let NodeKind::Code { value, .. } | NodeKind::Html { value } = &mut self.top().kind {
            value.push_str(text);
            return;
        }
        if !text.is_empty() {
            self.inline_leaf(Node::text(text));
        }
    }

    fn inline_leaf(&mut self, node: Node) {
        self.open_implicit();
        self.attach(node);
    }

    fn mark_task(&mut self, state: bool) {
        let item = self
            .stack
            .iter_mut()
            .rev()
            .find_map(|frame| match &mut frame.node.kind {
                NodeKind::ListItem { checked, .. } => Some(checked),
                _ => None,
            });
        if let Some(checked) = item {
            *checked = Some(state);
            self.after_task_marker = true;
        }
    }

    fn top(&mut self) -> &mut Node {
        let last = self.stack.len() - 1;
        &mut self.stack[last].node
    }

    /// Appends a finished node to the top frame, merging adjacent text.
    fn attach(&mut self, node: Node) {
        let parent = self.top();
        if let (NodeKind::Text { value: addition }, Some(Node {
            kind: NodeKind::Text { value },
            ..
        })) = (&node.kind, parent.children.last_mut())
        {
            value.push_str(addition);
            return;
        }
        parent.children.push(node);
    }

    /// Inline content directly inside a list item goes into a paragraph.
    fn open_implicit(&mut self) {
        if matches!(self.top().kind, NodeKind::ListItem { .. }) {
            self.stack.push(Frame {
                implicit: true,
                ..Frame::new(Node::paragraph(Vec::new()))
            });
        }
    }

    fn close_implicit(&mut self) {
        if self.stack.last().is_some_and(|frame| frame.implicit)
            && let Some(frame) = self.stack.pop()
        {
            self.attach(frame.node);
        }
    }

    fn finish(mut self) -> Node {
        self.close_implicit();
        while self.stack.len() > 1 {
            if let Some(frame) = self.stack.pop() {
                let node = finish_node(frame.node);
                self.attach(node);
            }
        }
        self.stack
            .pop()
            .map(|frame| frame.node)
            .unwrap_or_else(|| Node::root(Vec::new()))
    }
}

/// Applies mdast conventions to a node whose content is complete.
fn finish_node(mut node: Node) -> Node {
    match &mut node.kind {
        NodeKind::Code { value, .. } => {
            if value.ends_with('\n') {
                value.pop();
            }
        }
        NodeKind::Html { value } => {
            while value.ends_with('\n') {
                value.pop();
            }
        }
        NodeKind::Image { alt, .. } => {
            *alt = node.children.iter().map(Node::plain_text).collect();
            node.children.clear();
        }
        NodeKind::List { spread, .. } => {
            *spread = node
                .children
                .iter()
                .any(|item| matches!(item.kind, NodeKind::ListItem { spread: true, .. }));
        }
        _ => {}
    }
    node
}

fn is_phrasing(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Emphasis
            | NodeKind::Strong
            | NodeKind::Delete
            | NodeKind::Link { .. }
            | NodeKind::Image { .. }
    )
}

/// Splits a fence info string into language and meta.
fn split_info(info: &str) -> (Option<String>, Option<String>) {
    let info = info.trim();
    if info.is_empty() {
        return (None, None);
    }
    match info.split_once(char::is_whitespace) {
        Some((lang, meta)) => (Some(lang.to_string()), non_empty(meta.trim())),
        None => (Some(info.to_string()), None),
    }
}

fn align(alignment: Alignment) -> Option<Align> {
    match alignment {
        Alignment::None => None,
        Alignment::Left => Some(Align::Left),
        Alignment::Center => Some(Align::Center),
        Alignment::Right => Some(Align::Right),
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}
