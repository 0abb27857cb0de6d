use std::sync::Arc;

use xnode_types::{LineInfo, NamespaceDeclaration, Node, NodeType, NodeValue, XamlMember, XamlType};

use crate::error::ReadError;

/// Cursor-style pull access to a node stream.
///
/// A reader starts before the first node (current node is
/// [`Node::StartOfStream`], kind [`NodeType::None`]). Each
/// [`read`](Self::read) advances to the next real node and returns `true`,
/// or lands on [`Node::EndOfStream`] and returns `false`. Reading again at
/// the end keeps returning `false`.
///
/// Line info markers are never the current node. Implementations absorb
/// them while advancing and report the most recent one through
/// [`line_info`](Self::line_info).
///
/// ```text
///   source:  NS  LI(1,1)  SO  LI(2,3)  SM  V  EM  EO  EOF
///   read():  NS           SO           SM  V  EM  EO  false
///   line:    -            1:1          2:3 2:3 ...
/// ```
pub trait NodeReader {
    /// Advance to the next real node.
    ///
    /// # Errors
    ///
    /// Returns a [`ReadError`] if the reader was disposed, or the
    /// underlying source failed.
    fn read(&mut self) -> Result<bool, ReadError>;

    /// The node the cursor is on.
    fn current(&self) -> &Node;

    fn node_type(&self) -> NodeType {
        self.current().node_type()
    }

    fn is_eof(&self) -> bool {
        self.current().is_eof()
    }

    fn xaml_type(&self) -> Option<&Arc<XamlType>> {
        self.current().xaml_type()
    }

    fn member(&self) -> Option<&Arc<XamlMember>> {
        self.current().member()
    }

    fn value(&self) -> Option<&Arc<NodeValue>> {
        self.current().value()
    }

    fn namespace(&self) -> Option<&Arc<NamespaceDeclaration>> {
        self.current().namespace()
    }

    /// Whether this reader carries source positions at all.
    fn has_line_info(&self) -> bool {
        false
    }

    /// Position of the current node, if any line info has been seen.
    fn line_info(&self) -> Option<LineInfo> {
        None
    }

    /// Line of the current node, `0` when unknown.
    fn line_number(&self) -> u32 {
        self.line_info().map_or(0, |info| info.line_number)
    }

    /// Column of the current node, `0` when unknown.
    fn line_position(&self) -> u32 {
        self.line_info().map_or(0, |info| info.line_position)
    }

    /// Skip the subtree the cursor is on, then read once more.
    ///
    /// On a `StartObject` / `GetObject` the cursor moves past the matching
    /// `EndObject`; on a `StartMember`, past the matching `EndMember`. On
    /// any other node this is a plain [`read`](Self::read).
    ///
    /// Returns what the final `read` returned, or `false` if the stream
    /// ended inside the subtree.
    ///
    /// # Errors
    ///
    /// Propagates any error from the underlying reads.
    fn skip(&mut self) -> Result<bool, ReadError> {
        if self.node_type().opens_scope() {
            let mut depth = 1usize;
            while depth > 0 {
                if !self.read()? {
                    return Ok(false);
                }
                match self.node_type() {
                    kind if kind.opens_scope() => depth += 1,
                    NodeType::EndObject | NodeType::EndMember => depth -= 1,
                    _ => {}
                }
            }
        }
        self.read()
    }
}

impl<R: NodeReader + ?Sized> NodeReader for &mut R {
    fn read(&mut self) -> Result<bool, ReadError> {
        (**self).read()
    }

    fn current(&self) -> &Node {
        (**self).current()
    }

    fn has_line_info(&self) -> bool {
        (**self).has_line_info()
    }

    fn line_info(&self) -> Option<LineInfo> {
        (**self).line_info()
    }

    fn skip(&mut self) -> Result<bool, ReadError> {
        (**self).skip()
    }
}

impl<R: NodeReader + ?Sized> NodeReader for Box<R> {
    fn read(&mut self) -> Result<bool, ReadError> {
        (**self).read()
    }

    fn current(&self) -> &Node {
        (**self).current()
    }

    fn has_line_info(&self) -> bool {
        (**self).has_line_info()
    }

    fn line_info(&self) -> Option<LineInfo> {
        (**self).line_info()
    }

    fn skip(&mut self) -> Result<bool, ReadError> {
        (**self).skip()
    }
}
