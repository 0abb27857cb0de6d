use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};
use xnode_reader::{NodeReader, ReadError};
use xnode_writer::{DelegateWriter, NodeWriter, WriteError};

use super::exchange::{Exchange, ProducerSink, panic_message};
use crate::error::BufferError;
use crate::pump::transform;

/// Settings the worker needs, copied out of the config before spawning.
pub(crate) struct WorkerSettings {
    pub name: String,
    pub capacity: usize,
    pub provide_line_info: bool,
}

/// Marks the producer finished when the worker exits, including a panic
/// raised inside the exchange itself.
struct ProducerGuard(Arc<Exchange>);

impl Drop for ProducerGuard {
    fn drop(&mut self) {
        self.0.mark_producer_done();
    }
}

pub(crate) fn spawn<R>(
    reader: R,
    exchange: Arc<Exchange>,
    settings: WorkerSettings,
) -> io::Result<JoinHandle<Result<(), ReadError>>>
where
    R: NodeReader + Send + 'static,
{
    let WorkerSettings {
        name,
        capacity,
        provide_line_info,
    } = settings;
    thread::Builder::new()
        .name(name)
        .spawn(move || run(reader, &exchange, capacity, provide_line_info))
}

/// Pump the wrapped reader into the exchange until it ends, fails, or the
/// consumer disposes.
fn run<R: NodeReader>(
    mut reader: R,
    exchange: &Arc<Exchange>,
    capacity: usize,
    provide_line_info: bool,
) -> Result<(), ReadError> {
    let _guard = ProducerGuard(Arc::clone(exchange));
    let sink = ProducerSink::new(Arc::clone(exchange), capacity);
    let mut writer = if provide_line_info {
        DelegateWriter::with_line_info(sink)
    } else {
        DelegateWriter::new(sink)
    };

    debug!(capacity, "background reader started");
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| transform(&mut reader, &mut writer, true)));
    let failure = match outcome {
        Ok(Ok(nodes)) => {
            debug!(nodes, "wrapped reader drained");
            return Ok(());
        }
        Ok(Err(BufferError::Write(WriteError::Disposed) | BufferError::Read(ReadError::Disposed))) => {
            debug!("background reader disposed, worker stopping");
            return Ok(());
        }
        Ok(Err(BufferError::Read(err))) => err,
        Ok(Err(other)) => ReadError::upstream(other),
        Err(payload) => ReadError::WorkerPanicked {
            message: panic_message(&*payload),
        },
    };

    warn!(error = %failure, "wrapped reader failed, deferring error to consumer");
    exchange.mark_faulted();
    // Deliver the nodes already produced, followed by end of stream.
    if let Err(err) = writer.close() {
        debug!(error = %err, "could not flush after failure");
    }
    Err(failure)
}
