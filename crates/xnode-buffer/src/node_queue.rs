use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use xnode_reader::{DelegateReader, NodeReader, NodeSource, ReadError};
use xnode_types::Node;
use xnode_writer::{DelegateWriter, NodeSink, NodeWriter, WriteError};

type SharedQueue = Rc<RefCell<VecDeque<Node>>>;

/// Writer side: enqueue everything except the close marker.
struct QueueSink(SharedQueue);

impl NodeSink for QueueSink {
    fn accept(&mut self, node: Node) -> Result<(), WriteError> {
        if !node.is_eof() {
            self.0.borrow_mut().push_back(node);
        }
        Ok(())
    }
}

/// Reader side: dequeue, or report end of stream while the queue is empty.
struct QueueSource(SharedQueue);

impl NodeSource for QueueSource {
    fn next_node(&mut self) -> Result<Node, ReadError> {
        Ok(self.0.borrow_mut().pop_front().unwrap_or(Node::END_OF_STREAM))
    }
}

/// Single-threaded FIFO connecting a writer to a reader.
///
/// Nodes written are read back in the same order. An empty queue reads
/// as end of stream, and the reader picks up again once more nodes are
/// written, so the two sides can be interleaved freely:
///
/// ```text
///   writer ──▶ [ n3 n2 n1 ] ──▶ reader
///              count() == 3
/// ```
///
/// The queue is not `Send`; crossing threads is the job of
/// [`BackgroundReader`](crate::BackgroundReader).
pub struct NodeQueue {
    queue: SharedQueue,
    writer: DelegateWriter<QueueSink>,
    reader: Option<DelegateReader<QueueSource>>,
    line_info: bool,
}

impl Default for NodeQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::build(false)
    }

    /// Queue whose writer accepts line info and whose reader reports it.
    #[must_use]
    pub fn with_line_info() -> Self {
        Self::build(true)
    }

    fn build(line_info: bool) -> Self {
        let queue = SharedQueue::default();
        let sink = QueueSink(Rc::clone(&queue));
        let writer = if line_info {
            DelegateWriter::with_line_info(sink)
        } else {
            DelegateWriter::new(sink)
        };
        Self {
            queue,
            writer,
            reader: None,
            line_info,
        }
    }

    pub fn writer(&mut self) -> &mut impl NodeWriter {
        &mut self.writer
    }

    /// The queue's reader. The same reader is returned on every call.
    pub fn reader(&mut self) -> &mut impl NodeReader {
        let line_info = self.line_info;
        let queue = &self.queue;
        self.reader.get_or_insert_with(|| {
            let source = QueueSource(Rc::clone(queue));
            if line_info {
                DelegateReader::with_line_info(source)
            } else {
                DelegateReader::new(source)
            }
        })
    }

    /// Entries waiting to be read, line info markers included.
    #[must_use]
    pub fn count(&self) -> usize {
        self.queue.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}
