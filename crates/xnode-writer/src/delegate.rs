use std::sync::Arc;

use xnode_types::{LineInfo, NamespaceDeclaration, Node, NodeValue, XamlMember, XamlType};

use crate::error::WriteError;
use crate::sink::{FnSink, NodeSink};
use crate::writer::NodeWriter;

/// Writer that turns each write call into a [`Node`] and forwards it to a
/// sink supplied at construction.
///
/// This is the single writer implementation behind every buffer in the
/// workspace: the replay list, the queue and the background reader's
/// producer side each plug in their own [`NodeSink`].
///
/// # Lifecycle
///
/// ```text
///   open ──write_*()──▶ open ──close()──▶ closed
///                                           │
///                         write_*() ──▶ Err(WriteError::Closed)
///                         close()   ──▶ Ok(()) (no second marker)
/// ```
///
/// `close()` sends [`Node::EndOfStream`] to the sink exactly once.
///
/// # Line info
///
/// Source positions are opt-in. A writer built with
/// [`with_line_info`](Self::with_line_info) reports
/// `should_provide_line_info() == true` and forwards
/// [`set_line_info`](NodeWriter::set_line_info) calls as `LineInfo` marker
/// nodes. Any other writer rejects them with
/// `WriteError::LineInfoNotRequested`.
///
/// # Usage
///
/// ```rust
/// use xnode_types::{Node, XamlType};
/// use xnode_writer::{DelegateWriter, NodeWriter};
///
/// let mut writer = DelegateWriter::new(Vec::new());
/// writer.write_start_object(XamlType::new("urn:ui", "Button").into()).unwrap();
/// writer.write_end_object().unwrap();
/// writer.close().unwrap();
///
/// let nodes = writer.into_sink();
/// assert_eq!(nodes.len(), 3);
/// assert!(nodes[2].is_eof());
/// ```
pub struct DelegateWriter<S> {
    sink: S,
    provide_line_info: bool,
    closed: bool,
}

impl<S: NodeSink> DelegateWriter<S> {
    /// Create a writer over `sink` that does not accept line info.
    #[must_use]
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            provide_line_info: false,
            closed: false,
        }
    }

    /// Create a writer over `sink` that forwards line info markers.
    #[must_use]
    pub fn with_line_info(sink: S) -> Self {
        Self {
            sink,
            provide_line_info: true,
            closed: false,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the writer and return its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    fn emit(&mut self, node: Node) -> Result<(), WriteError> {
        if self.closed {
            return Err(WriteError::Closed);
        }
        self.sink.accept(node)
    }
}

impl<F> DelegateWriter<FnSink<F>> {
    /// Create a writer whose sink is a closure.
    pub fn from_fn(f: F) -> Self
    where
        F: FnMut(Node) -> Result<(), WriteError>,
    {
        Self::new(FnSink(f))
    }

    /// Create a closure-backed writer that forwards line info markers.
    pub fn from_fn_with_line_info(f: F) -> Self
    where
        F: FnMut(Node) -> Result<(), WriteError>,
    {
        Self::with_line_info(FnSink(f))
    }
}

impl<S: NodeSink> NodeWriter for DelegateWriter<S> {
    fn write_namespace(&mut self, decl: Arc<NamespaceDeclaration>) -> Result<(), WriteError> {
        self.emit(Node::NamespaceDeclaration(decl))
    }

    fn write_start_object(&mut self, ty: Arc<XamlType>) -> Result<(), WriteError> {
        self.emit(Node::StartObject(ty))
    }

    fn write_get_object(&mut self) -> Result<(), WriteError> {
        self.emit(Node::GetObject)
    }

    fn write_end_object(&mut self) -> Result<(), WriteError> {
        self.emit(Node::EndObject)
    }

    fn write_start_member(&mut self, member: Arc<XamlMember>) -> Result<(), WriteError> {
        self.emit(Node::StartMember(member))
    }

    fn write_end_member(&mut self) -> Result<(), WriteError> {
        self.emit(Node::EndMember)
    }

    fn write_value(&mut self, value: Arc<NodeValue>) -> Result<(), WriteError> {
        self.emit(Node::Value(value))
    }

    fn should_provide_line_info(&self) -> bool {
        self.provide_line_info
    }

    fn set_line_info(&mut self, line_info: LineInfo) -> Result<(), WriteError> {
        if self.closed {
            return Err(WriteError::Closed);
        }
        if !self.provide_line_info {
            return Err(WriteError::LineInfoNotRequested);
        }
        self.sink.accept(Node::LineInfo(line_info))
    }

    fn close(&mut self) -> Result<(), WriteError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.sink.accept(Node::END_OF_STREAM)
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}
