//! The two-buffer hand-off between the worker thread and the consumer.
//!
//! Exactly two `Vec<Node>` buffers exist. The producer fills one
//! (`incoming`) while the consumer drains the other (`outgoing`); the lock
//! is only taken when a full buffer changes hands, never per node.
//!
//! ```text
//!   producer                      Slots                      consumer
//!   ────────                ─────────────────                ────────
//!   incoming full ──park──▶ ready: Some(buf) ──take──▶ outgoing
//!   incoming ◀──────take─── spare: Some(buf) ◀──park── drained outgoing
//! ```
//!
//! `disposed` and `producer_done` release whichever side is waiting.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use parking_lot::{Condvar, Mutex};
use tracing::trace;
use xnode_reader::{NodeSource, ReadError};
use xnode_types::Node;
use xnode_writer::{NodeSink, WriteError};

#[derive(Default)]
struct Slots {
    ready: Option<Vec<Node>>,
    spare: Option<Vec<Node>>,
    producer_waiting: bool,
    consumer_waiting: bool,
    producer_done: bool,
    faulted: bool,
}

/// What the consumer got back from [`Exchange::take_batch`].
enum Batch {
    Ready,
    Disposed,
    ProducerGone,
}

/// Point-in-time view of the exchange, for state reporting.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Snapshot {
    pub producer_waiting: bool,
    pub consumer_waiting: bool,
    pub faulted: bool,
}

#[derive(Default)]
pub(crate) struct Exchange {
    slots: Mutex<Slots>,
    /// Signalled when `ready` is filled or the producer goes away.
    full: Condvar,
    /// Signalled when `spare` is filled.
    drained: Condvar,
    /// Mirrors disposal outside the lock so the hot paths can poll it.
    disposed: AtomicBool,
}

impl Exchange {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Release both sides. Idempotent.
    pub fn dispose(&self) {
        let _slots = self.slots.lock();
        self.disposed.store(true, Ordering::Release);
        self.full.notify_all();
        self.drained.notify_all();
    }

    pub fn snapshot(&self) -> Snapshot {
        let slots = self.slots.lock();
        Snapshot {
            producer_waiting: slots.producer_waiting,
            consumer_waiting: slots.consumer_waiting,
            faulted: slots.faulted,
        }
    }

    pub fn mark_faulted(&self) {
        self.slots.lock().faulted = true;
    }

    /// Called once when the worker exits, however it exits.
    pub fn mark_producer_done(&self) {
        let mut slots = self.slots.lock();
        slots.producer_done = true;
        self.full.notify_all();
    }

    /// Park a full `buffer` for the consumer and block until the drained
    /// one comes back. On return `buffer` is the empty spare.
    fn hand_off(&self, buffer: &mut Vec<Node>) -> Result<(), WriteError> {
        let mut slots = self.slots.lock();
        if self.is_disposed() {
            return Err(WriteError::Disposed);
        }
        trace!(nodes = buffer.len(), "handing off full buffer");
        slots.ready = Some(std::mem::take(buffer));
        self.full.notify_one();

        slots.producer_waiting = true;
        while slots.spare.is_none() && !self.is_disposed() {
            self.drained.wait(&mut slots);
        }
        slots.producer_waiting = false;

        match slots.spare.take() {
            Some(spare) if !self.is_disposed() => {
                *buffer = spare;
                Ok(())
            }
            _ => Err(WriteError::Disposed),
        }
    }

    /// Park the last buffer without waiting for a replacement.
    fn finish(&self, buffer: Vec<Node>) -> Result<(), WriteError> {
        let mut slots = self.slots.lock();
        if self.is_disposed() {
            return Err(WriteError::Disposed);
        }
        trace!(nodes = buffer.len(), "handing off final buffer");
        slots.ready = Some(buffer);
        self.full.notify_one();
        Ok(())
    }

    /// Swap the drained `outgoing` buffer for the next ready batch,
    /// blocking until one is available.
    fn take_batch(&self, outgoing: &mut Vec<Node>) -> Batch {
        let mut slots = self.slots.lock();
        slots.consumer_waiting = true;
        while slots.ready.is_none() && !slots.producer_done && !self.is_disposed() {
            self.full.wait(&mut slots);
        }
        slots.consumer_waiting = false;

        if self.is_disposed() {
            return Batch::Disposed;
        }
        match slots.ready.take() {
            Some(batch) => {
                trace!(nodes = batch.len(), "took ready buffer");
                let mut drained = std::mem::replace(outgoing, batch);
                drained.clear();
                slots.spare = Some(drained);
                self.drained.notify_one();
                Batch::Ready
            }
            None => Batch::ProducerGone,
        }
    }
}

/// Worker-side [`NodeSink`] that fills `incoming` and hands it over when
/// it reaches capacity or the stream closes.
pub(crate) struct ProducerSink {
    exchange: Arc<Exchange>,
    incoming: Vec<Node>,
    capacity: usize,
}

impl ProducerSink {
    pub fn new(exchange: Arc<Exchange>, capacity: usize) -> Self {
        Self {
            exchange,
            incoming: Vec::with_capacity(capacity),
            capacity,
        }
    }
}

impl NodeSink for ProducerSink {
    fn accept(&mut self, node: Node) -> Result<(), WriteError> {
        if self.exchange.is_disposed() {
            return Err(WriteError::Disposed);
        }
        let last = node.is_eof();
        self.incoming.push(node);
        if last {
            return self.exchange.finish(std::mem::take(&mut self.incoming));
        }
        if self.incoming.len() == self.capacity {
            self.exchange.hand_off(&mut self.incoming)?;
        }
        Ok(())
    }
}

/// Consumer-side [`NodeSource`] that drains `outgoing` and swaps it for
/// the next batch when empty.
///
/// Reaching the end of the stream joins the worker; an error the worker
/// captured from the wrapped reader is returned exactly once at that
/// point, after every node produced before the failure.
pub(crate) struct ConsumerSource {
    exchange: Arc<Exchange>,
    outgoing: Vec<Node>,
    position: usize,
    worker: Option<JoinHandle<Result<(), ReadError>>>,
    finished: bool,
}

impl ConsumerSource {
    pub fn new(exchange: Arc<Exchange>, capacity: usize) -> Self {
        Self {
            exchange,
            outgoing: Vec::with_capacity(capacity),
            position: 0,
            worker: None,
            finished: false,
        }
    }

    pub fn attach(&mut self, worker: JoinHandle<Result<(), ReadError>>) {
        self.worker = Some(worker);
    }

    pub fn is_started(&self) -> bool {
        self.worker.is_some() || self.finished
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Mark the stream finished and surface the worker's outcome.
    fn finish(&mut self) -> Result<(), ReadError> {
        self.finished = true;
        match self.worker.take() {
            None => Ok(()),
            Some(handle) => match handle.join() {
                Ok(outcome) => outcome,
                Err(payload) => Err(ReadError::WorkerPanicked {
                    message: panic_message(&*payload),
                }),
            },
        }
    }
}

impl NodeSource for ConsumerSource {
    fn next_node(&mut self) -> Result<Node, ReadError> {
        if self.finished {
            return Ok(Node::END_OF_STREAM);
        }
        if self.exchange.is_disposed() {
            return Err(ReadError::Disposed);
        }
        if self.worker.is_none() {
            return Err(ReadError::NotStarted);
        }

        while self.position == self.outgoing.len() {
            match self.exchange.take_batch(&mut self.outgoing) {
                Batch::Ready => self.position = 0,
                Batch::Disposed => return Err(ReadError::Disposed),
                Batch::ProducerGone => {
                    self.finish()?;
                    return Ok(Node::END_OF_STREAM);
                }
            }
        }

        let node = std::mem::replace(&mut self.outgoing[self.position], Node::END_OF_STREAM);
        self.position += 1;
        if node.is_eof() {
            self.finish()?;
        }
        Ok(node)
    }
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
