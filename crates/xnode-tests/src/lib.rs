//! Shared fixtures for the xnode integration tests and benches.
//!
//! Nothing here is production code: readers that count what they produce,
//! readers that fail on cue, and a small positioned markup document.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use xnode_reader::{DelegateReader, NodeReader, ReadError};
use xnode_types::{LineInfo, NamespaceDeclaration, Node, NodeValue, XamlMember, XamlType};

pub const UI_NS: &str = "urn:ui";

#[must_use]
pub fn value(n: i64) -> Node {
    Node::Value(Arc::new(NodeValue::Int(n)))
}

/// `Value(0) .. Value(count - 1)`.
#[must_use]
pub fn numbered(count: usize) -> Vec<Node> {
    (0..count).map(|n| value(i64::try_from(n).unwrap_or(i64::MAX))).collect()
}

#[must_use]
pub fn start_object(name: &str) -> Node {
    Node::StartObject(Arc::new(XamlType::new(UI_NS, name)))
}

#[must_use]
pub fn start_member(owner: &str, name: &str) -> Node {
    Node::StartMember(Arc::new(XamlMember::new(XamlType::new(UI_NS, owner), name)))
}

#[must_use]
pub fn line(line: u32, column: u32) -> Node {
    Node::LineInfo(LineInfo::new(line, column))
}

/// A panel holding one button, with positions:
///
/// ```text
/// <Panel xmlns="urn:ui">             1:1
///   <Panel.Children>                 2:3
///     <Button Content="OK" />        3:5
///   </Panel.Children>                4:3
/// </Panel>
/// ```
#[must_use]
pub fn sample_document() -> Vec<Node> {
    vec![
        Node::NamespaceDeclaration(Arc::new(NamespaceDeclaration::new("", UI_NS))),
        line(1, 1),
        start_object("Panel"),
        line(2, 3),
        start_member("Panel", "Children"),
        line(3, 5),
        start_object("Button"),
        start_member("Button", "Content"),
        Node::Value(Arc::new(NodeValue::from("OK"))),
        Node::EndMember,
        Node::EndObject,
        line(4, 3),
        Node::EndMember,
        Node::EndObject,
    ]
}

/// Drain a reader into the nodes it surfaced.
///
/// # Panics
///
/// Panics if the reader fails.
pub fn drain(reader: &mut impl NodeReader) -> Vec<Node> {
    let mut out = Vec::new();
    while reader.read().expect("read failed") {
        out.push(reader.current().clone());
    }
    out
}

/// Drain a reader into `line:col node` lines.
///
/// # Panics
///
/// Panics if the reader fails.
pub fn render(reader: &mut impl NodeReader) -> String {
    let mut out = String::new();
    while reader.read().expect("read failed") {
        out.push_str(&format!(
            "{}:{} {}\n",
            reader.line_number(),
            reader.line_position(),
            reader.current()
        ));
    }
    out
}

/// `nodes` with every line info marker removed.
#[must_use]
pub fn without_line_info(nodes: &[Node]) -> Vec<Node> {
    nodes.iter().filter(|n| !n.is_line_info()).cloned().collect()
}

/// Reader over `Value(0) .. Value(limit - 1)` that publishes how many
/// nodes it has handed out, so tests can watch a background worker.
pub struct CountingReader {
    produced: Arc<AtomicUsize>,
    limit: usize,
    current: Node,
}

impl CountingReader {
    /// The reader plus a shared view of its produced-node counter.
    #[must_use]
    pub fn new(limit: usize) -> (Self, Arc<AtomicUsize>) {
        let produced = Arc::new(AtomicUsize::new(0));
        let reader = Self {
            produced: Arc::clone(&produced),
            limit,
            current: Node::START_OF_STREAM,
        };
        (reader, produced)
    }
}

impl NodeReader for CountingReader {
    fn read(&mut self) -> Result<bool, ReadError> {
        let n = self.produced.load(Ordering::SeqCst);
        if n >= self.limit {
            self.current = Node::END_OF_STREAM;
            return Ok(false);
        }
        self.current = value(i64::try_from(n).unwrap_or(i64::MAX));
        self.produced.store(n + 1, Ordering::SeqCst);
        Ok(true)
    }

    fn current(&self) -> &Node {
        &self.current
    }
}

/// Reader that yields `Value(0) .. Value(k - 1)` and then fails.
pub fn failing_after(k: usize) -> impl NodeReader + Send + 'static {
    let mut next = 0usize;
    DelegateReader::from_fn(move || {
        if next < k {
            next += 1;
            Ok(value(i64::try_from(next - 1).unwrap_or(i64::MAX)))
        } else {
            Err(ReadError::upstream(format!("source failed after {k} nodes")))
        }
    })
}
