use std::collections::VecDeque;

use xnode_types::Node;

use crate::error::WriteError;

/// Destination for the nodes a [`DelegateWriter`](crate::DelegateWriter)
/// builds.
///
/// A sink sees every node in write order, followed by exactly one
/// [`Node::EndOfStream`] when the writer is closed. Sinks decide what the
/// close marker means for them: a replay list flips to read mode, a
/// background hand-off flushes its partial buffer.
///
/// ```text
/// write_*() ──▶ DelegateWriter ──▶ NodeSink::accept(node)
///                     │
///                  close() ──▶ NodeSink::accept(EndOfStream)   (once)
/// ```
pub trait NodeSink {
    /// Take ownership of the next node.
    ///
    /// # Errors
    ///
    /// Returns `WriteError::Disposed` when the consumer on the other side
    /// of the sink is gone and no further nodes can be delivered.
    fn accept(&mut self, node: Node) -> Result<(), WriteError>;
}

/// Adapter that turns a closure into a [`NodeSink`].
///
/// Built by [`DelegateWriter::from_fn`](crate::DelegateWriter::from_fn).
pub struct FnSink<F>(pub F);

impl<F> NodeSink for FnSink<F>
where
    F: FnMut(Node) -> Result<(), WriteError>,
{
    fn accept(&mut self, node: Node) -> Result<(), WriteError> {
        (self.0)(node)
    }
}

/// Collects every node, including the close marker.
impl NodeSink for Vec<Node> {
    fn accept(&mut self, node: Node) -> Result<(), WriteError> {
        self.push(node);
        Ok(())
    }
}

impl NodeSink for VecDeque<Node> {
    fn accept(&mut self, node: Node) -> Result<(), WriteError> {
        self.push_back(node);
        Ok(())
    }
}

impl<S: NodeSink + ?Sized> NodeSink for &mut S {
    fn accept(&mut self, node: Node) -> Result<(), WriteError> {
        (**self).accept(node)
    }
}

impl<S: NodeSink + ?Sized> NodeSink for Box<S> {
    fn accept(&mut self, node: Node) -> Result<(), WriteError> {
        (**self).accept(node)
    }
}
