//! Double-buffered reader that pulls a wrapped reader on a worker thread.
//!
//! ```text
//!   worker thread                                     caller thread
//!   ─────────────                                     ─────────────
//!   wrapped.read() ─▶ ProducerSink ─┐          ┌─▶ ConsumerSource ─▶ read()
//!                     (incoming)    └ Exchange ┘     (outgoing)
//! ```
//!
//! The worker runs `transform(wrapped, producer_writer)` and blocks once
//! `incoming` is full until the consumer has drained `outgoing`; the
//! consumer blocks when `outgoing` is empty until the worker parks a full
//! (or final) buffer. At most `2 * capacity` nodes are ever held.

mod exchange;
mod worker;

use std::fmt;
use std::sync::Arc;

use tracing::debug;
use xnode_reader::{DelegateReader, NodeReader, ReadError};
use xnode_types::{LineInfo, Node};

use crate::config::BackgroundConfig;
use crate::error::BufferError;
use exchange::{ConsumerSource, Exchange};
use worker::WorkerSettings;

/// Observable lifecycle of a [`BackgroundReader`].
///
/// ```text
///   Idle ──start_thread──▶ Running ⇄ ProducerBlocked / ConsumerBlocked
///                             │
///                             ├──▶ Eof
///                             ├──▶ Faulted
///   (any) ──dispose──▶ Disposed
/// ```
///
/// `ProducerBlocked` means the worker holds a full buffer and waits for
/// the consumer; `ConsumerBlocked` means the consumer waits for the worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackgroundState {
    Idle,
    Running,
    ProducerBlocked,
    ConsumerBlocked,
    Eof,
    Faulted,
    Disposed,
}

impl fmt::Display for BackgroundState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::ProducerBlocked => "producer-blocked",
            Self::ConsumerBlocked => "consumer-blocked",
            Self::Eof => "eof",
            Self::Faulted => "faulted",
            Self::Disposed => "disposed",
        };
        f.write_str(name)
    }
}

/// Cloneable, `Send` handle that disposes a [`BackgroundReader`] from
/// another thread, waking both the worker and a blocked consumer.
#[derive(Clone)]
pub struct DisposeHandle {
    exchange: Arc<Exchange>,
}

impl DisposeHandle {
    pub fn dispose(&self) {
        self.exchange.dispose();
    }
}

/// Reader that drains `R` on a dedicated thread and serves its nodes on
/// the calling thread.
///
/// Nodes arrive in exactly the order the wrapped reader produced them,
/// line info included when both the wrapped reader and the config enable
/// it. A failure in the wrapped reader is delivered after every node
/// produced before it, as the error of a single `read` call; the reader
/// then reports end of stream.
///
/// # Example
///
/// ```rust
/// use xnode_buffer::BackgroundReader;
/// use xnode_reader::{DelegateReader, NodeReader};
/// use xnode_types::Node;
///
/// let wrapped = DelegateReader::from_nodes(vec![Node::GetObject, Node::EndObject]);
/// let mut reader = BackgroundReader::new(wrapped);
/// reader.start_thread(Some("doc-parser")).unwrap();
///
/// let mut count = 0;
/// while reader.read().unwrap() {
///     count += 1;
/// }
/// assert_eq!(count, 2);
/// ```
pub struct BackgroundReader<R> {
    /// The wrapped reader until it moves onto the worker thread.
    wrapped: Option<R>,
    inner: DelegateReader<ConsumerSource>,
    exchange: Arc<Exchange>,
    config: BackgroundConfig,
}

impl<R> BackgroundReader<R>
where
    R: NodeReader + Send + 'static,
{
    /// Wrap `reader` with the default configuration.
    pub fn new(reader: R) -> Self {
        Self::build(reader, BackgroundConfig::default())
    }

    /// Wrap `reader` with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns `BufferError::InvalidCapacity` for a zero capacity.
    pub fn with_config(reader: R, config: BackgroundConfig) -> Result<Self, BufferError> {
        config.validate()?;
        Ok(Self::build(reader, config))
    }

    fn build(reader: R, config: BackgroundConfig) -> Self {
        let exchange = Exchange::new();
        let source = ConsumerSource::new(Arc::clone(&exchange), config.capacity);
        let inner = if config.provide_line_info && reader.has_line_info() {
            DelegateReader::with_line_info(source)
        } else {
            DelegateReader::new(source)
        };
        Self {
            wrapped: Some(reader),
            inner,
            exchange,
            config,
        }
    }

    /// Move the wrapped reader onto a new worker thread and start pumping.
    ///
    /// The thread is named `name`, else the configured name, else
    /// [`DEFAULT_THREAD_NAME`](crate::config::DEFAULT_THREAD_NAME).
    ///
    /// # Errors
    ///
    /// - `BufferError::AlreadyStarted` on a second call.
    /// - `BufferError::Read(ReadError::Disposed)` after disposal.
    /// - `BufferError::Spawn` if the OS refuses the thread.
    pub fn start_thread(&mut self, name: Option<&str>) -> Result<(), BufferError> {
        if self.exchange.is_disposed() {
            return Err(ReadError::Disposed.into());
        }
        let reader = self.wrapped.take().ok_or(BufferError::AlreadyStarted)?;
        let settings = WorkerSettings {
            name: self.config.resolve_thread_name(name),
            capacity: self.config.capacity,
            provide_line_info: self.inner.has_line_info(),
        };
        debug!(thread = %settings.name, capacity = settings.capacity, "starting background reader");

        let handle = worker::spawn(reader, Arc::clone(&self.exchange), settings).map_err(BufferError::Spawn)?;
        if let Some(source) = self.inner.source_mut() {
            source.attach(handle);
        }
        Ok(())
    }
}

impl<R> BackgroundReader<R> {
    #[must_use]
    pub fn config(&self) -> &BackgroundConfig {
        &self.config
    }

    /// Current lifecycle state. Racy by nature: the worker keeps moving.
    #[must_use]
    pub fn state(&self) -> BackgroundState {
        if self.exchange.is_disposed() {
            return BackgroundState::Disposed;
        }
        let Some(source) = self.inner.source() else {
            return BackgroundState::Disposed;
        };
        if !source.is_started() {
            return BackgroundState::Idle;
        }
        let snapshot = self.exchange.snapshot();
        if snapshot.faulted {
            BackgroundState::Faulted
        } else if source.is_finished() {
            BackgroundState::Eof
        } else if snapshot.consumer_waiting {
            BackgroundState::ConsumerBlocked
        } else if snapshot.producer_waiting {
            BackgroundState::ProducerBlocked
        } else {
            BackgroundState::Running
        }
    }

    /// Handle for disposing this reader from another thread.
    #[must_use]
    pub fn dispose_handle(&self) -> DisposeHandle {
        DisposeHandle {
            exchange: Arc::clone(&self.exchange),
        }
    }

    /// Stop the worker and release both buffers.
    ///
    /// A blocked worker is woken and exits without reading further; it is
    /// not joined. Later reads fail with `ReadError::Disposed`. Idempotent.
    pub fn dispose(&mut self) {
        if self.inner.is_disposed() {
            return;
        }
        debug!("disposing background reader");
        self.exchange.dispose();
        self.inner.dispose();
        self.wrapped = None;
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.exchange.is_disposed()
    }
}

impl<R> NodeReader for BackgroundReader<R> {
    fn read(&mut self) -> Result<bool, ReadError> {
        self.inner.read()
    }

    fn current(&self) -> &Node {
        self.inner.current()
    }

    fn has_line_info(&self) -> bool {
        self.inner.has_line_info()
    }

    fn line_info(&self) -> Option<LineInfo> {
        self.inner.line_info()
    }
}

impl<R> Drop for BackgroundReader<R> {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::{Duration, Instant};
    use xnode_types::{NodeType, NodeValue};

    fn value(n: i64) -> Node {
        Node::Value(Arc::new(NodeValue::Int(n)))
    }

    fn numbers(count: i64) -> DelegateReader<xnode_reader::IterSource<std::vec::IntoIter<Node>>> {
        DelegateReader::from_nodes((0..count).map(value).collect())
    }

    fn drain<R: NodeReader>(reader: &mut R) -> Vec<Node> {
        let mut out = Vec::new();
        while reader.read().unwrap() {
            out.push(reader.current().clone());
        }
        out
    }

    fn wait_for(reader: &BackgroundReader<impl NodeReader>, state: BackgroundState) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while reader.state() != state {
            assert!(Instant::now() < deadline, "timed out waiting for {state}, at {}", reader.state());
            thread::sleep(Duration::from_millis(1));
        }
    }

    /// Counts how many nodes the worker has pulled.
    struct Counting {
        produced: Arc<AtomicUsize>,
        limit: usize,
        current: Node,
    }

    impl NodeReader for Counting {
        fn read(&mut self) -> Result<bool, ReadError> {
            let n = self.produced.load(Ordering::SeqCst);
            if n == self.limit {
                self.current = Node::END_OF_STREAM;
                return Ok(false);
            }
            self.produced.fetch_add(1, Ordering::SeqCst);
            self.current = value(i64::try_from(n).unwrap());
            Ok(true)
        }

        fn current(&self) -> &Node {
            &self.current
        }
    }

    fn counting(limit: usize) -> (Counting, Arc<AtomicUsize>) {
        let produced = Arc::new(AtomicUsize::new(0));
        let reader = Counting {
            produced: Arc::clone(&produced),
            limit,
            current: Node::START_OF_STREAM,
        };
        (reader, produced)
    }

    #[test]
    fn preserves_order_across_buffers() {
        for capacity in [1, 2, 3, 7, 64] {
            let mut reader =
                BackgroundReader::with_config(numbers(100), BackgroundConfig::with_capacity(capacity)).unwrap();
            reader.start_thread(None).unwrap();
            let nodes = drain(&mut reader);
            assert_eq!(nodes, (0..100).map(value).collect::<Vec<_>>(), "capacity {capacity}");
            assert_eq!(reader.state(), BackgroundState::Eof);
            assert!(!reader.read().unwrap());
        }
    }

    #[test]
    fn empty_source_reaches_eof() {
        let mut reader = BackgroundReader::new(numbers(0));
        reader.start_thread(None).unwrap();
        assert!(!reader.read().unwrap());
        assert!(reader.is_eof());
    }

    #[test]
    fn read_before_start_fails() {
        let mut reader = BackgroundReader::new(numbers(3));
        assert_eq!(reader.state(), BackgroundState::Idle);
        assert!(matches!(reader.read(), Err(ReadError::NotStarted)));
    }

    #[test]
    fn second_start_is_rejected() {
        let mut reader = BackgroundReader::new(numbers(3));
        reader.start_thread(None).unwrap();
        assert!(matches!(reader.start_thread(None), Err(BufferError::AlreadyStarted)));
        assert_eq!(drain(&mut reader).len(), 3);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let result = BackgroundReader::with_config(numbers(1), BackgroundConfig::with_capacity(0));
        assert!(matches!(result, Err(BufferError::InvalidCapacity { capacity: 0 })));
    }

    #[test]
    fn worker_fills_exactly_one_buffer_before_blocking() {
        let (source, produced) = counting(1_000);
        let mut reader = BackgroundReader::with_config(source, BackgroundConfig::with_capacity(4)).unwrap();
        reader.start_thread(None).unwrap();

        wait_for(&reader, BackgroundState::ProducerBlocked);
        assert_eq!(produced.load(Ordering::SeqCst), 4);

        assert!(reader.read().unwrap());
        wait_for(&reader, BackgroundState::ProducerBlocked);
        assert!(produced.load(Ordering::SeqCst) <= 8);
    }

    #[test]
    fn dispose_releases_blocked_worker() {
        let (source, produced) = counting(1_000);
        let mut reader = BackgroundReader::with_config(source, BackgroundConfig::with_capacity(2)).unwrap();
        reader.start_thread(Some("dispose-test")).unwrap();
        wait_for(&reader, BackgroundState::ProducerBlocked);

        reader.dispose();
        reader.dispose();
        assert_eq!(reader.state(), BackgroundState::Disposed);
        assert!(matches!(reader.read(), Err(ReadError::Disposed)));

        let stalled = produced.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        assert_eq!(produced.load(Ordering::SeqCst), stalled);
        assert!(matches!(reader.start_thread(None), Err(BufferError::Read(ReadError::Disposed))));
    }

    #[test]
    fn failure_arrives_after_produced_nodes() {
        let mut calls = 0;
        let failing = DelegateReader::from_fn(move || {
            calls += 1;
            if calls <= 5 {
                Ok(value(calls))
            } else {
                Err(ReadError::upstream("malformed markup"))
            }
        });
        let mut reader = BackgroundReader::with_config(failing, BackgroundConfig::with_capacity(2)).unwrap();
        reader.start_thread(None).unwrap();

        for n in 1..=5 {
            assert!(reader.read().unwrap());
            assert_eq!(reader.current(), &value(n));
        }
        let err = reader.read().unwrap_err();
        assert_eq!(err.to_string(), "upstream reader failed: malformed markup");
        assert_eq!(reader.state(), BackgroundState::Faulted);
        assert!(!reader.read().unwrap());
    }

    #[test]
    fn worker_panic_is_reported() {
        let mut calls = 0;
        let panicking = DelegateReader::from_fn(move || {
            calls += 1;
            assert!(calls < 3, "wrapped reader exploded");
            Ok(Node::GetObject)
        });
        let mut reader = BackgroundReader::with_config(panicking, BackgroundConfig::with_capacity(8)).unwrap();
        reader.start_thread(None).unwrap();

        assert!(reader.read().unwrap());
        assert_eq!(reader.current(), &Node::GetObject);
        assert!(reader.read().unwrap());
        assert_eq!(reader.current(), &Node::GetObject);

        let err = reader.read().unwrap_err();
        assert!(matches!(err, ReadError::WorkerPanicked { ref message } if message.contains("exploded")));
        assert!(!reader.read().unwrap());
    }

    #[test]
    fn panic_after_partial_buffer_keeps_produced_values() {
        let mut calls = 0i64;
        let panicking = DelegateReader::from_fn(move || {
            calls += 1;
            assert!(calls < 3, "wrapped reader exploded");
            Ok(value(calls))
        });
        let mut reader = BackgroundReader::with_config(panicking, BackgroundConfig::with_capacity(8)).unwrap();
        reader.start_thread(None).unwrap();

        let mut seen = Vec::new();
        let err = loop {
            match reader.read() {
                Ok(true) => seen.push(reader.current().clone()),
                Ok(false) => panic!("stream ended without the worker failure"),
                Err(err) => break err,
            }
        };
        assert_eq!(seen, vec![value(1), value(2)]);
        assert!(matches!(err, ReadError::WorkerPanicked { .. }));
        assert_eq!(reader.state(), BackgroundState::Faulted);
        assert!(!reader.read().unwrap());
    }

    #[test]
    fn line_info_is_relayed_when_enabled() {
        let wrapped = DelegateReader::from_nodes(vec![
            Node::LineInfo(LineInfo::new(1, 1)),
            Node::GetObject,
            Node::LineInfo(LineInfo::new(2, 4)),
            Node::EndObject,
        ]);
        let mut reader = BackgroundReader::with_config(wrapped, BackgroundConfig::with_capacity(1)).unwrap();
        assert!(reader.has_line_info());
        reader.start_thread(None).unwrap();

        assert!(reader.read().unwrap());
        assert_eq!((reader.line_number(), reader.line_position()), (1, 1));
        assert!(reader.read().unwrap());
        assert_eq!(reader.node_type(), NodeType::EndObject);
        assert_eq!((reader.line_number(), reader.line_position()), (2, 4));
    }

    #[test]
    fn line_info_is_dropped_when_disabled() {
        let wrapped = DelegateReader::from_nodes(vec![Node::LineInfo(LineInfo::new(3, 3)), Node::GetObject]);
        let config = BackgroundConfig {
            provide_line_info: false,
            ..BackgroundConfig::default()
        };
        let mut reader = BackgroundReader::with_config(wrapped, config).unwrap();
        assert!(!reader.has_line_info());
        reader.start_thread(None).unwrap();
        assert!(reader.read().unwrap());
        assert_eq!(reader.line_info(), None);
    }

    #[test]
    fn dispose_handle_wakes_blocked_consumer() {
        let (tx, rx) = std::sync::mpsc::channel::<()>();
        let gated = DelegateReader::from_fn(move || {
            // Block until the test hangs up, then fail.
            let _ = rx.recv();
            Err(ReadError::upstream("gate closed"))
        });
        let mut reader = BackgroundReader::new(gated);
        reader.start_thread(None).unwrap();
        let handle = reader.dispose_handle();

        let disposer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            handle.dispose();
        });
        assert!(matches!(reader.read(), Err(ReadError::Disposed)));
        disposer.join().unwrap();
        drop(tx);
    }
}
