use std::sync::Arc;

use xnode_types::{LineInfo, NamespaceDeclaration, Node, NodeValue, XamlMember, XamlType};

use crate::error::WriteError;

/// The write side of a node stream.
///
/// One method per node kind, plus line info and close. Every buffer in
/// this workspace is filled through this trait, and the pump that drains
/// a reader into a writer (`xnode_buffer::transform`) is written against
/// it, so any implementation can sit at the end of a pipeline.
///
/// Payloads are taken as `Arc` so a node read from one stream can be
/// written into another without copying its strings.
///
/// ```text
/// ┌──────────────────────────┬──────────────────────────────────┐
/// │ Call                     │ Node produced                    │
/// ├──────────────────────────┼──────────────────────────────────┤
/// │ write_namespace(d)       │ NamespaceDeclaration(d)          │
/// │ write_start_object(t)    │ StartObject(t)                   │
/// │ write_get_object()       │ GetObject                        │
/// │ write_end_object()       │ EndObject                        │
/// │ write_start_member(m)    │ StartMember(m)                   │
/// │ write_end_member()       │ EndMember                        │
/// │ write_value(v)           │ Value(v)                         │
/// │ set_line_info(p)         │ LineInfo(p)   (opt-in only)      │
/// │ close()                  │ EndOfStream   (exactly once)     │
/// └──────────────────────────┴──────────────────────────────────┘
/// ```
pub trait NodeWriter {
    fn write_namespace(&mut self, decl: Arc<NamespaceDeclaration>) -> Result<(), WriteError>;

    fn write_start_object(&mut self, ty: Arc<XamlType>) -> Result<(), WriteError>;

    fn write_get_object(&mut self) -> Result<(), WriteError>;

    fn write_end_object(&mut self) -> Result<(), WriteError>;

    fn write_start_member(&mut self, member: Arc<XamlMember>) -> Result<(), WriteError>;

    fn write_end_member(&mut self) -> Result<(), WriteError>;

    fn write_value(&mut self, value: Arc<NodeValue>) -> Result<(), WriteError>;

    /// Whether this writer wants source positions.
    ///
    /// Producers check this once up front and skip `set_line_info` calls
    /// entirely when it is `false`.
    fn should_provide_line_info(&self) -> bool {
        false
    }

    /// Record the source position of the next node written.
    ///
    /// # Errors
    ///
    /// The default implementation returns `WriteError::LineInfoNotRequested`;
    /// writers that return `true` from
    /// [`should_provide_line_info`](Self::should_provide_line_info) override it.
    fn set_line_info(&mut self, line_info: LineInfo) -> Result<(), WriteError> {
        let _ = line_info;
        Err(WriteError::LineInfoNotRequested)
    }

    /// End the stream. Writes after this fail with `WriteError::Closed`.
    fn close(&mut self) -> Result<(), WriteError>;

    fn is_closed(&self) -> bool;

    /// Write an existing node, dispatching on its variant.
    ///
    /// `LineInfo` maps to [`set_line_info`](Self::set_line_info),
    /// `EndOfStream` to [`close`](Self::close), and `StartOfStream` is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Whatever the dispatched call returns.
    fn write_node(&mut self, node: &Node) -> Result<(), WriteError> {
        match node {
            Node::NamespaceDeclaration(decl) => self.write_namespace(Arc::clone(decl)),
            Node::StartObject(ty) => self.write_start_object(Arc::clone(ty)),
            Node::GetObject => self.write_get_object(),
            Node::EndObject => self.write_end_object(),
            Node::StartMember(member) => self.write_start_member(Arc::clone(member)),
            Node::EndMember => self.write_end_member(),
            Node::Value(value) => self.write_value(Arc::clone(value)),
            Node::LineInfo(info) => self.set_line_info(*info),
            Node::StartOfStream => Ok(()),
            Node::EndOfStream => self.close(),
        }
    }
}
