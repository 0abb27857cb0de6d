use std::sync::Arc;

use xnode_types::{LineInfo, Node};

use crate::error::ReadError;
use crate::reader::NodeReader;

/// Random-access reader over a shared, immutable node sequence.
///
/// Same cursor contract as [`DelegateReader`](crate::DelegateReader), but
/// backed by an `Arc<[Node]>` so many readers can replay one captured
/// stream independently, and the cursor can be moved with
/// [`set_current_index`](Self::set_current_index).
///
/// ```text
///   nodes:  [0] NS  [1] LI(1,1)  [2] SO  [3] EO          count() == 4
///
///   set_current_index(None)     → before [0], current = StartOfStream
///   set_current_index(Some(1))  → absorbs [1], current = [2] SO @ 1:1
///   set_current_index(Some(4))  → Err(IndexOutOfRange)
///   read() past [3]             → current = EndOfStream, index = Some(4)
/// ```
///
/// Line info entries count towards [`count`](Self::count) and occupy
/// indices, but are never the current node.
#[derive(Clone)]
pub struct IndexedReader {
    nodes: Arc<[Node]>,
    /// Index of the next underlying entry `read` will look at.
    next: usize,
    current_index: Option<usize>,
    current: Node,
    line_info: Option<LineInfo>,
    has_line_info: bool,
    disposed: bool,
}

impl IndexedReader {
    /// Create a reader positioned before the first node.
    ///
    /// `has_line_info` is what the reader will report from
    /// [`NodeReader::has_line_info`]; it does not change how line info
    /// entries are handled.
    #[must_use]
    pub fn new(nodes: Arc<[Node]>, has_line_info: bool) -> Self {
        Self {
            nodes,
            next: 0,
            current_index: None,
            current: Node::START_OF_STREAM,
            line_info: None,
            has_line_info,
            disposed: false,
        }
    }

    /// Number of underlying entries, line info markers included.
    #[must_use]
    pub fn count(&self) -> usize {
        self.nodes.len()
    }

    /// Index of the current node.
    ///
    /// `None` before the first read, `Some(count())` once at end of stream.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// Move the cursor.
    ///
    /// `None` rewinds to the start of the stream. `Some(i)` positions the
    /// reader so that entry `i` is the next one pulled, then reads once;
    /// if entry `i` is a line info marker it is absorbed and the cursor
    /// lands on the first real node after it. The tracked line info is
    /// recomputed from the entries before `i`, so a seek reports the same
    /// position a sequential read would have.
    ///
    /// # Errors
    ///
    /// - `ReadError::IndexOutOfRange` if `i >= count()`.
    /// - `ReadError::Disposed` if the reader has been disposed.
    pub fn set_current_index(&mut self, index: Option<usize>) -> Result<(), ReadError> {
        if self.disposed {
            return Err(ReadError::Disposed);
        }
        match index {
            None => {
                self.next = 0;
                self.current_index = None;
                self.current = Node::START_OF_STREAM;
                self.line_info = None;
            }
            Some(i) => {
                if i >= self.nodes.len() {
                    return Err(ReadError::IndexOutOfRange {
                        index: i,
                        count: self.nodes.len(),
                    });
                }
                self.next = i;
                self.line_info = self.nodes[..i].iter().rev().find_map(Node::line_info);
                self.read()?;
            }
        }
        Ok(())
    }

    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl NodeReader for IndexedReader {
    fn read(&mut self) -> Result<bool, ReadError> {
        if self.disposed {
            return Err(ReadError::Disposed);
        }
        while let Some(node) = self.nodes.get(self.next) {
            let index = self.next;
            self.next += 1;
            match node {
                Node::LineInfo(info) => self.line_info = Some(*info),
                Node::EndOfStream => break,
                node => {
                    self.current = node.clone();
                    self.current_index = Some(index);
                    return Ok(true);
                }
            }
        }
        // Park on the end so further reads stay here.
        self.next = self.nodes.len();
        self.current = Node::END_OF_STREAM;
        self.current_index = Some(self.nodes.len());
        Ok(false)
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
