use xnode_types::Node;

use crate::error::ReadError;

/// Supplier of nodes for a [`DelegateReader`](crate::DelegateReader).
///
/// The source owns its own cursor; the reader just calls `next_node`
/// until it sees something other than a line info marker. Once a source
/// is exhausted it should keep returning [`Node::EndOfStream`].
pub trait NodeSource {
    /// Produce the next node.
    ///
    /// # Errors
    ///
    /// Sources backed by fallible producers report their failures here.
    fn next_node(&mut self) -> Result<Node, ReadError>;
}

/// Adapter that turns a closure into a [`NodeSource`].
pub struct FnSource<F>(pub F);

impl<F> NodeSource for FnSource<F>
where
    F: FnMut() -> Result<Node, ReadError>,
{
    fn next_node(&mut self) -> Result<Node, ReadError> {
        (self.0)()
    }
}

/// Source over any iterator of nodes, yielding `EndOfStream` once the
/// iterator runs dry.
pub struct IterSource<I>(pub I);

impl<I> NodeSource for IterSource<I>
where
    I: Iterator<Item = Node>,
{
    fn next_node(&mut self) -> Result<Node, ReadError> {
        Ok(self.0.next().unwrap_or(Node::END_OF_STREAM))
    }
}

impl<S: NodeSource + ?Sized> NodeSource for &mut S {
    fn next_node(&mut self) -> Result<Node, ReadError> {
        (**self).next_node()
    }
}

impl<S: NodeSource + ?Sized> NodeSource for Box<S> {
    fn next_node(&mut self) -> Result<Node, ReadError> {
        (**self).next_node()
    }
}
