//! Immutable per-file parse result

use std::collections::HashMap;
use std::path::PathBuf;

use crate::parser::node::{Node, NodeExt, NodeId, TableAlignment, Walk};
use crate::parser::token::Token;

/// The immutable result of parsing one file: content, line index, token
/// stream, and semantic tree.
///
/// Created by the parser adapter for a single linting run, handed to rules
/// read-only, and dropped after the pipeline returns. Invariants: tokens
/// partition `[0, content.len())`; `lines` is monotonically increasing and
/// covers the content exactly; every node token range is within bounds.
#[derive(Debug)]
pub struct FileSnapshot {
    /// File the snapshot was parsed from
    pub path: PathBuf,
    /// Owned copy of the input
    pub content: String,
    /// `(start, end)` byte ranges of each line, endings included
    pub lines: Vec<(usize, usize)>,
    /// Lossless token stream
    pub tokens: Vec<Token>,
    pub(crate) nodes: Vec<Node>,
    pub(crate) ext: HashMap<NodeId, NodeExt>,
}

impl FileSnapshot {
    /// Id of the Document root node.
    pub fn root(&self) -> NodeId {
        0
    }

    /// Look up a node by id.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Number of nodes in the tree (including the root).
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of lines in the content.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Validate that the token stream partitions the content exactly:
    /// no gaps, no overlaps, full coverage.
    pub fn tokens_cover(&self) -> bool {
        let mut expected = 0;
        for token in &self.tokens {
            if token.start != expected || token.end <= token.start {
                return false;
            }
            expected = token.end;
        }
        expected == self.content.len()
    }

    /// Index of the token containing `offset`, in O(log n).
    pub fn token_at_offset(&self, offset: usize) -> Option<usize> {
        if offset >= self.content.len() {
            return None;
        }
        let idx = self.tokens.partition_point(|t| t.end <= offset);
        (idx < self.tokens.len()).then_some(idx)
    }

    /// Byte slice of a 1-based line, ending included, in O(1).
    pub fn line_content(&self, lineno: usize) -> Option<&str> {
        let (start, end) = *self.lines.get(lineno.checked_sub(1)?)?;
        Some(&self.content[start..end])
    }

    /// Byte slice of a 1-based line with the line ending stripped.
    pub fn line_without_ending(&self, lineno: usize) -> Option<&str> {
        self.line_content(lineno)
            .map(|l| l.trim_end_matches(['\n', '\r']))
    }

    /// Convert a byte offset to a 1-based `(line, column)` position.
    pub fn position_of(&self, offset: usize) -> (usize, usize) {
        if self.lines.is_empty() {
            return (1, 1);
        }
        let idx = self
            .lines
            .partition_point(|&(_, end)| end <= offset)
            .min(self.lines.len() - 1);
        let (start, _) = self.lines[idx];
        (idx + 1, offset.saturating_sub(start) + 1)
    }

    /// Convert a 1-based `(line, column)` position to a byte offset.
    pub fn offset_of(&self, line: usize, column: usize) -> Option<usize> {
        let (start, end) = *self.lines.get(line.checked_sub(1)?)?;
        let offset = start + column.checked_sub(1)?;
        (offset <= end).then_some(offset)
    }

    /// Byte span covered by a node, derived from its token range.
    pub fn node_span(&self, id: NodeId) -> Option<(usize, usize)> {
        let (first, last) = self.nodes[id].token_range()?;
        Some((self.tokens[first].start, self.tokens[last].end))
    }

    /// Source text covered by a node.
    pub fn node_text(&self, id: NodeId) -> Option<&str> {
        let (start, end) = self.node_span(id)?;
        Some(&self.content[start..end])
    }

    /// Iterate over a node's children in document order.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            snapshot: self,
            next: self.nodes[id].first_child,
        }
    }

    /// Visit nodes in document order (pre-order). The visitor controls
    /// descent and can terminate the walk early.
    pub fn walk<F>(&self, mut visitor: F)
    where
        F: FnMut(NodeId, &Node) -> Walk,
    {
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            match visitor(id, node) {
                Walk::Stop => return,
                Walk::SkipChildren => {}
                Walk::Continue => {
                    // Push children in reverse so the first child pops first.
                    let mut children: Vec<NodeId> = self.children(id).collect();
                    children.reverse();
                    stack.extend(children);
                }
            }
        }
    }

    /// All node ids in document order.
    pub fn descendants(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        self.walk(|id, _| {
            out.push(id);
            Walk::Continue
        });
        out
    }

    /// Table column alignments for a node, when it carries a GFM table.
    pub fn table_alignments(&self, id: NodeId) -> Option<&[TableAlignment]> {
        match self.ext.get(&id) {
            Some(NodeExt::Table { alignments }) => Some(alignments),
            _ => None,
        }
    }

    /// Task checkbox state for a list item, when it carries one.
    pub fn task_checked(&self, id: NodeId) -> Option<bool> {
        match self.ext.get(&id) {
            Some(NodeExt::TaskCheckbox { checked }) => Some(*checked),
            _ => None,
        }
    }

    /// Whether a node carries a strikethrough span.
    pub fn is_strikethrough(&self, id: NodeId) -> bool {
        matches!(self.ext.get(&id), Some(NodeExt::Strikethrough))
    }
}

/// Iterator over a node's children.
pub struct Children<'a> {
    snapshot: &'a FileSnapshot,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.snapshot.nodes[id].next_sibling;
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::CancelToken;
    use crate::parser::{Flavor, parse};
    use std::path::Path;

    fn snap(content: &str) -> FileSnapshot {
        parse(
            &CancelToken::new(),
            Path::new("test.md"),
            content,
            Flavor::CommonMark,
        )
        .unwrap()
    }

    #[test]
    fn test_tokens_cover_holds() {
        let s = snap("# Hello\n\nSome text.\n");
        assert!(s.tokens_cover());
    }

    #[test]
    fn test_token_at_offset() {
        let content = "# Hi\n";
        let s = snap(content);
        let idx = s.token_at_offset(2).unwrap();
        assert_eq!(s.tokens[idx].text(content), "Hi");
        assert!(s.token_at_offset(content.len()).is_none());
    }

    #[test]
    fn test_line_content() {
        let s = snap("one\ntwo\n");
        assert_eq!(s.line_content(1), Some("one\n"));
        assert_eq!(s.line_without_ending(2), Some("two"));
        assert_eq!(s.line_content(3), None);
        assert_eq!(s.line_content(0), None);
    }

    #[test]
    fn test_position_roundtrip() {
        let s = snap("ab\ncdef\n");
        assert_eq!(s.position_of(0), (1, 1));
        assert_eq!(s.position_of(4), (2, 2));
        assert_eq!(s.offset_of(2, 2), Some(4));
    }

    #[test]
    fn test_walk_early_termination() {
        let s = snap("# A\n\npara\n\n# B\n");
        let mut seen = 0;
        s.walk(|_, node| {
            seen += 1;
            if matches!(node.kind, crate::parser::NodeKind::Paragraph) {
                Walk::Stop
            } else {
                Walk::Continue
            }
        });
        assert!(seen < s.node_count());
    }

    #[test]
    fn test_children_iteration() {
        let s = snap("# A\n\npara\n");
        let kids: Vec<_> = s.children(s.root()).collect();
        assert_eq!(kids.len(), 2);
    }

    #[test]
    fn test_node_text() {
        let s = snap("# Hello\n");
        let heading = s
            .descendants()
            .into_iter()
            .find(|&id| matches!(s.node(id).kind, crate::parser::NodeKind::Heading { .. }))
            .unwrap();
        assert_eq!(s.node_text(heading), Some("# Hello"));
    }
}
