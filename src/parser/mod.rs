//! Markdown parsing: the adapter that turns raw content into a
//! [`FileSnapshot`] (token stream + semantic tree + line index)

mod node;
mod snapshot;
mod token;

pub use node::*;
pub use snapshot::*;
pub use token::*;

use comrak::nodes::{AstNode, NodeValue, Sourcepos};
use comrak::{Arena, Options};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::cancel::CancelToken;
use crate::types::{Error, Result};

/// Markdown dialect the parser interprets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    /// Plain CommonMark
    #[default]
    CommonMark,
    /// GitHub-flavored superset: tables, task lists, strikethrough, autolinks
    Gfm,
}

/// Parse `content` into an immutable snapshot.
///
/// The token stream always partitions the content exactly; a stream that
/// fails validation is an error, never partial success. Parsing the same
/// content twice yields identical token and node counts.
pub fn parse(
    cancel: &CancelToken,
    path: &Path,
    content: &str,
    flavor: Flavor,
) -> Result<FileSnapshot> {
    cancel.check()?;

    let lines = line_index(content);
    let tokens = tokenize(content);

    let arena = Arena::new();
    let mut options = Options::default();
    if flavor == Flavor::Gfm {
        options.extension.table = true;
        options.extension.strikethrough = true;
        options.extension.autolink = true;
        options.extension.tasklist = true;
    }
    let root = comrak::parse_document(&arena, content, &options);

    let mut builder = TreeBuilder {
        nodes: Vec::new(),
        ext: HashMap::new(),
        lines: &lines,
        tokens: &tokens,
        content_len: content.len(),
    };
    builder.build(root, None);
    builder.propagate_ranges();
    let TreeBuilder { nodes, ext, .. } = builder;

    let snapshot = FileSnapshot {
        path: path.to_path_buf(),
        content: content.to_string(),
        lines,
        tokens,
        nodes,
        ext,
    };

    if !snapshot.tokens_cover() {
        return Err(Error::Internal(format!(
            "token stream does not cover {} exactly",
            path.display()
        )));
    }
    Ok(snapshot)
}

struct TreeBuilder<'a> {
    nodes: Vec<Node>,
    ext: HashMap<NodeId, NodeExt>,
    lines: &'a [(usize, usize)],
    tokens: &'a [Token],
    content_len: usize,
}

impl TreeBuilder<'_> {
    fn build<'a>(&mut self, ast: &'a AstNode<'a>, parent: Option<NodeId>) -> NodeId {
        let data = ast.data.borrow();
        let (kind, ext) = self.map_value(&data.value);

        let mut node = Node::new(kind);
        node.parent = parent;
        let (first, last) = self.span_to_tokens(&data.sourcepos);
        node.first_token = first;
        node.last_token = last;

        let id = self.nodes.len();
        self.nodes.push(node);
        if let Some(ext) = ext {
            self.ext.insert(id, ext);
        }

        let mut prev_child: Option<NodeId> = None;
        for child in ast.children() {
            let child_id = self.build(child, Some(id));
            match prev_child {
                None => self.nodes[id].first_child = Some(child_id),
                Some(prev) => self.nodes[prev].next_sibling = Some(child_id),
            }
            prev_child = Some(child_id);
        }
        id
    }

    fn map_value(&self, value: &NodeValue) -> (NodeKind, Option<NodeExt>) {
        match value {
            NodeValue::Document => (NodeKind::Document, None),
            NodeValue::Heading(h) => (NodeKind::Heading { level: h.level }, None),
            NodeValue::Paragraph => (NodeKind::Paragraph, None),
            NodeValue::List(l) => {
                let ordered = l.list_type == comrak::nodes::ListType::Ordered;
                let marker = if ordered {
                    ListMarker::Delimiter(match l.delimiter {
                        comrak::nodes::ListDelimType::Period => ListDelimiter::Period,
                        comrak::nodes::ListDelimType::Paren => ListDelimiter::Paren,
                    })
                } else {
                    ListMarker::Bullet(l.bullet_char as char)
                };
                (
                    NodeKind::List {
                        ordered,
                        start: l.start,
                        tight: l.tight,
                        marker,
                    },
                    None,
                )
            }
            NodeValue::Item(_) => (NodeKind::ListItem, None),
            NodeValue::TaskItem(symbol) => (
                NodeKind::ListItem,
                Some(NodeExt::TaskCheckbox {
                    checked: symbol.symbol.is_some(),
                }),
            ),
            NodeValue::BlockQuote => (NodeKind::Blockquote, None),
            NodeValue::CodeBlock(cb) => (
                NodeKind::CodeBlock {
                    fenced: cb.fenced,
                    fence_char: if cb.fenced { cb.fence_char as char } else { '\0' },
                    fence_length: if cb.fenced { cb.fence_length } else { 0 },
                    info: cb.info.clone(),
                },
                None,
            ),
            NodeValue::ThematicBreak => (NodeKind::ThematicBreak, None),
            NodeValue::HtmlBlock(_) => (NodeKind::HtmlBlock, None),
            NodeValue::Text(_) => (NodeKind::Text, None),
            NodeValue::Emph => (NodeKind::Emphasis, None),
            NodeValue::Strong => (NodeKind::Strong, None),
            NodeValue::Code(_) => (NodeKind::CodeSpan, None),
            NodeValue::Link(link) => (
                NodeKind::Link {
                    dest: link.url.clone(),
                    title: link.title.clone(),
                },
                None,
            ),
            NodeValue::Image(link) => (
                NodeKind::Image {
                    dest: link.url.clone(),
                    title: link.title.clone(),
                },
                None,
            ),
            NodeValue::SoftBreak => (NodeKind::SoftBreak, None),
            NodeValue::LineBreak => (NodeKind::HardBreak, None),
            NodeValue::HtmlInline(_) => (NodeKind::HtmlInline, None),
            // GFM extension structure rides on Raw nodes; attributes go to
            // the side table and the core never interprets them.
            NodeValue::Table(table) => (
                NodeKind::Raw,
                Some(NodeExt::Table {
                    alignments: table
                        .alignments
                        .iter()
                        .map(|a| match a {
                            comrak::nodes::TableAlignment::None => TableAlignment::None,
                            comrak::nodes::TableAlignment::Left => TableAlignment::Left,
                            comrak::nodes::TableAlignment::Center => TableAlignment::Center,
                            comrak::nodes::TableAlignment::Right => TableAlignment::Right,
                        })
                        .collect(),
                }),
            ),
            NodeValue::TableRow(header) => {
                (NodeKind::Raw, Some(NodeExt::TableRow { header: *header }))
            }
            NodeValue::TableCell => (NodeKind::Raw, Some(NodeExt::TableCell)),
            NodeValue::Strikethrough => (NodeKind::Raw, Some(NodeExt::Strikethrough)),
            _ => (NodeKind::Raw, None),
        }
    }

    /// Map a comrak source span (1-based, end-inclusive) to token indices.
    fn span_to_tokens(&self, sp: &Sourcepos) -> (Option<usize>, Option<usize>) {
        let start = self.offset_at(sp.start.line, sp.start.column, false);
        let end = self.offset_at(sp.end.line, sp.end.column, true);
        match (start, end) {
            (Some(start), Some(end)) if end > start => {
                (self.token_at(start), self.token_at(end - 1))
            }
            _ => (None, None),
        }
    }

    fn offset_at(&self, line: usize, column: usize, inclusive_end: bool) -> Option<usize> {
        if line == 0 || line > self.lines.len() || column == 0 {
            return None;
        }
        let (start, end) = self.lines[line - 1];
        let delta = if inclusive_end { column } else { column - 1 };
        Some((start + delta).min(end).min(self.content_len))
    }

    fn token_at(&self, offset: usize) -> Option<usize> {
        if offset >= self.content_len {
            return None;
        }
        let idx = self.tokens.partition_point(|t| t.end <= offset);
        (idx < self.tokens.len()).then_some(idx)
    }

    /// Post-order range propagation: children were created after their
    /// parent, so a reverse id scan sees every child before its parent and
    /// can union child ranges upward. Inline nodes without direct source
    /// evidence inherit from their children this way.
    fn propagate_ranges(&mut self) {
        for id in (1..self.nodes.len()).rev() {
            let (first, last, parent) = {
                let node = &self.nodes[id];
                (node.first_token, node.last_token, node.parent)
            };
            let Some(parent) = parent else { continue };
            if let Some(first) = first {
                let p = &mut self.nodes[parent];
                p.first_token = Some(p.first_token.map_or(first, |f| f.min(first)));
            }
            if let Some(last) = last {
                let p = &mut self.nodes[parent];
                p.last_token = Some(p.last_token.map_or(last, |l| l.max(last)));
            }
        }
    }
}
