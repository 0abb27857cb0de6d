use xnode_types::{LineInfo, Node};

use crate::error::ReadError;
use crate::reader::NodeReader;
use crate::source::{FnSource, IterSource, NodeSource};

/// Pull reader over a [`NodeSource`].
///
/// This is the reader behind the node queue and the foreground side of
/// the background reader: both only know how to hand out "the next node",
/// and `DelegateReader` turns that into the cursor contract of
/// [`NodeReader`].
///
/// ```text
///   read() ─┬─▶ source.next_node()
///           │       │
///           │       ├── LineInfo(p)  → remember p, pull again
///           │       ├── EndOfStream  → current = EOF, return false
///           │       └── other        → current = node, return true
///           └────────────┘
/// ```
///
/// At the end of the stream the source is asked again on every `read`.
/// Sources that are truly finished keep answering `EndOfStream`, so the
/// reader stays at EOF; a live queue that receives more nodes later can
/// resume.
///
/// # Example
///
/// ```rust
/// use xnode_reader::{DelegateReader, NodeReader};
/// use xnode_types::{LineInfo, Node, NodeType};
///
/// let mut reader = DelegateReader::from_nodes(vec![
///   Node::LineInfo(LineInfo::new(1, 4)),
///   Node::GetObject,
///   Node::EndObject,
/// ]);
///
/// assert!(reader.read().unwrap());
/// assert_eq!(reader.node_type(), NodeType::GetObject);
/// assert_eq!(reader.line_number(), 1);
/// assert!(reader.read().unwrap());
/// assert!(!reader.read().unwrap());
/// assert!(reader.is_eof());
/// ```
pub struct DelegateReader<S> {
    /// `None` once the reader has been disposed.
    source: Option<S>,
    current: Node,
    line_info: Option<LineInfo>,
    has_line_info: bool,
}

impl<S: NodeSource> DelegateReader<S> {
    /// Create a reader over `source` that does not advertise line info.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source: Some(source),
            current: Node::START_OF_STREAM,
            line_info: None,
            has_line_info: false,
        }
    }

    /// Create a reader over `source` that advertises line info.
    #[must_use]
    pub fn with_line_info(source: S) -> Self {
        Self {
            has_line_info: true,
            ..Self::new(source)
        }
    }

    /// The underlying source, or `None` after disposal.
    pub fn source(&self) -> Option<&S> {
        self.source.as_ref()
    }

    pub fn source_mut(&mut self) -> Option<&mut S> {
        self.source.as_mut()
    }

    /// Drop the source. Every later `read` fails with `ReadError::Disposed`.
    ///
    /// Calling this more than once is a no-op.
    pub fn dispose(&mut self) {
        self.source = None;
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.source.is_none()
    }
}

impl<F> DelegateReader<FnSource<F>> {
    /// Create a reader whose source is a closure.
    pub fn from_fn(f: F) -> Self
    where
        F: FnMut() -> Result<Node, ReadError>,
    {
        Self::new(FnSource(f))
    }
}

impl DelegateReader<IterSource<std::vec::IntoIter<Node>>> {
    /// Create a reader over a fixed list of nodes.
    ///
    /// `LineInfo` entries in the list make the reader advertise line info.
    #[must_use]
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        let has_line_info = nodes.iter().any(Node::is_line_info);
        Self {
            has_line_info,
            ..Self::new(IterSource(nodes.into_iter()))
        }
    }
}

impl<S: NodeSource> NodeReader for DelegateReader<S> {
    fn read(&mut self) -> Result<bool, ReadError> {
        let source = self.source.as_mut().ok_or(ReadError::Disposed)?;
        loop {
            match source.next_node()? {
                Node::LineInfo(info) => self.line_info = Some(info),
                Node::EndOfStream => {
                    self.current = Node::END_OF_STREAM;
                    return Ok(false);
                }
                node => {
                    self.current = node;
                    return Ok(true);
                }
            }
        }
    }

    fn current(&self) -> &Node {
        &self.current
    }

    fn has_line_info(&self) -> bool {
        self.has_line_info
    }

    fn line_info(&self) -> Option<LineInfo> {
        self.line_info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use xnode_types::{NodeType, NodeValue, XamlMember, XamlType};

    fn start(name: &str) -> Node {
        Node::StartObject(Arc::new(XamlType::new("urn:ui", name)))
    }

    fn member(name: &str) -> Node {
        Node::StartMember(Arc::new(XamlMember::new(XamlType::new("urn:ui", "Panel"), name)))
    }

    fn value(text: &str) -> Node {
        Node::Value(Arc::new(NodeValue::from(text)))
    }

    #[test]
    fn starts_before_the_first_node() {
        let reader = DelegateReader::from_nodes(vec![Node::GetObject]);
        assert!(reader.current().is_start_of_stream());
        assert_eq!(reader.node_type(), NodeType::None);
        assert!(!reader.is_eof());
    }

    #[test]
    fn eof_is_idempotent() {
        let mut reader = DelegateReader::from_nodes(vec![Node::GetObject]);
        assert!(reader.read().unwrap());
        for _ in 0..5 {
            assert!(!reader.read().unwrap());
            assert!(reader.is_eof());
            assert_eq!(reader.node_type(), NodeType::None);
        }
    }

    #[test]
    fn line_info_is_absorbed_not_surfaced() {
        let mut reader = DelegateReader::from_nodes(vec![
            Node::LineInfo(LineInfo::new(1, 1)),
            start("Panel"),
            Node::LineInfo(LineInfo::new(2, 5)),
            Node::LineInfo(LineInfo::new(2, 9)),
            member("Children"),
            value("x"),
            Node::EndMember,
            Node::EndObject,
        ]);
        assert!(reader.has_line_info());

        let mut advances = 0;
        let mut positions = Vec::new();
        while reader.read().unwrap() {
            advances += 1;
            assert_ne!(reader.node_type(), NodeType::None);
            positions.push((reader.line_number(), reader.line_position()));
        }

        assert_eq!(advances, 5);
        assert_eq!(positions, vec![(1, 1), (2, 9), (2, 9), (2, 9), (2, 9)]);
    }

    #[test]
    fn trailing_line_info_is_dropped() {
        let mut reader = DelegateReader::from_nodes(vec![
            Node::LineInfo(LineInfo::new(1, 1)),
            Node::GetObject,
            Node::LineInfo(LineInfo::new(9, 9)),
        ]);
        assert!(reader.read().unwrap());
        assert_eq!(reader.line_number(), 1);
        assert!(!reader.read().unwrap());
        assert!(reader.is_eof());
    }

    #[test]
    fn disposed_reader_refuses_to_read() {
        let mut reader = DelegateReader::from_nodes(vec![Node::GetObject]);
        reader.dispose();
        reader.dispose();
        assert!(reader.is_disposed());
        assert!(matches!(reader.read(), Err(ReadError::Disposed)));
    }

    #[test]
    fn closure_source_errors_propagate() {
        let mut calls = 0;
        let mut reader = DelegateReader::from_fn(|| {
            calls += 1;
            if calls == 1 {
                Ok(Node::GetObject)
            } else {
                Err(ReadError::upstream("parser gave up"))
            }
        });

        assert!(reader.read().unwrap());
        let err = reader.read().unwrap_err();
        assert!(matches!(err, ReadError::Upstream(_)));
        assert_eq!(err.to_string(), "upstream reader failed: parser gave up");
        // The cursor stays on the last good node.
        assert_eq!(reader.node_type(), NodeType::GetObject);
    }

    #[test]
    fn skip_moves_past_nested_subtree() {
        let mut reader = DelegateReader::from_nodes(vec![
            start("Panel"),
            member("Children"),
            start("Button"),
            member("Content"),
            value("OK"),
            Node::EndMember,
            Node::EndObject,
            Node::EndMember,
            member("Tag"),
            value("t"),
            Node::EndMember,
            Node::EndObject,
        ]);

        assert!(reader.read().unwrap()); // Panel
        assert!(reader.read().unwrap()); // Children
        assert!(reader.skip().unwrap());
        assert_eq!(reader.member().unwrap().name, "Tag");

        assert!(reader.skip().unwrap());
        assert_eq!(reader.node_type(), NodeType::EndObject);
    }

    #[test]
    fn skip_on_leaf_is_a_read() {
        let mut reader = DelegateReader::from_nodes(vec![value("a"), value("b")]);
        assert!(reader.read().unwrap());
        assert!(reader.skip().unwrap());
        assert_eq!(reader.value().unwrap().as_text(), Some("b"));
    }

    #[test]
    fn skip_reports_truncated_subtree() {
        let mut reader = DelegateReader::from_nodes(vec![start("Panel"), member("Children")]);
        assert!(reader.read().unwrap());
        assert!(!reader.skip().unwrap());
        assert!(reader.is_eof());
    }
}
