use std::sync::Arc;

use xnode_reader::IndexedReader;
use xnode_types::Node;
use xnode_writer::{DelegateWriter, NodeSink, NodeWriter, WriteError};

use crate::error::BufferError;

/// Sink that collects every node except the close marker.
#[derive(Default)]
struct ListSink {
    nodes: Vec<Node>,
}

impl NodeSink for ListSink {
    fn accept(&mut self, node: Node) -> Result<(), WriteError> {
        if !node.is_eof() {
            self.nodes.push(node);
        }
        Ok(())
    }
}

/// Record-once, replay-many buffer of nodes.
///
/// Fill it through [`writer`](Self::writer), close the writer, then hand
/// out as many [`IndexedReader`]s as needed. The recorded nodes are frozen
/// into a shared `Arc<[Node]>` the first time a reader is requested, so
/// every reader replays the same sequence without copying it.
///
/// ```text
///   writer() ──▶ [ SO, LI, SM, V, EM, EO ] ──close──▶ frozen
///                                                     ├─▶ get_reader()
///                                                     └─▶ get_reader()
/// ```
pub struct NodeList {
    writer: DelegateWriter<ListSink>,
    frozen: Option<Arc<[Node]>>,
    line_info: bool,
}

impl Default for NodeList {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeList {
    /// Create an empty list whose writer does not accept line info.
    #[must_use]
    pub fn new() -> Self {
        Self::build(false)
    }

    /// Create an empty list whose writer records line info markers and
    /// whose readers advertise them.
    #[must_use]
    pub fn with_line_info() -> Self {
        Self::build(true)
    }

    fn build(line_info: bool) -> Self {
        Self {
            writer: Self::fresh_writer(line_info),
            frozen: None,
            line_info,
        }
    }

    fn fresh_writer(line_info: bool) -> DelegateWriter<ListSink> {
        if line_info {
            DelegateWriter::with_line_info(ListSink::default())
        } else {
            DelegateWriter::new(ListSink::default())
        }
    }

    /// The writer that fills this list.
    ///
    /// After it is closed further writes fail with `WriteError::Closed`.
    pub fn writer(&mut self) -> &mut impl NodeWriter {
        &mut self.writer
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.writer.is_closed()
    }

    /// Number of recorded entries, line info markers included.
    ///
    /// The close marker is not part of the list.
    #[must_use]
    pub fn count(&self) -> usize {
        self.frozen
            .as_ref()
            .map_or_else(|| self.writer.sink().nodes.len(), |nodes| nodes.len())
    }

    /// A fresh reader over the recorded nodes, positioned before the first.
    ///
    /// # Errors
    ///
    /// Returns `BufferError::WriterNotClosed` while the writer is open.
    pub fn get_reader(&mut self) -> Result<IndexedReader, BufferError> {
        if !self.writer.is_closed() {
            return Err(BufferError::WriterNotClosed);
        }
        let nodes = self.frozen.get_or_insert_with(|| {
            std::mem::take(&mut self.writer.sink_mut().nodes).into()
        });
        Ok(IndexedReader::new(Arc::clone(nodes), self.line_info))
    }

    /// Drop the recorded nodes and start over with an open writer.
    ///
    /// Readers handed out earlier keep their own copy of the sequence.
    pub fn clear(&mut self) {
        self.writer = Self::fresh_writer(self.line_info);
        self.frozen = None;
    }
}
