use xnode_reader::ReadError;
use xnode_writer::WriteError;

/// Errors raised by the node buffers and the background reader.
///
/// ```text
/// ┌──────────────────┬──────────────────────────────────────────────────┐
/// │ Variant          │ Cause                                            │
/// ├──────────────────┼──────────────────────────────────────────────────┤
/// │ WriterNotClosed  │ NodeList::get_reader before the writer closed    │
/// │ AlreadyStarted   │ start_thread called twice                        │
/// │ InvalidCapacity  │ BackgroundConfig with a zero-sized buffer        │
/// │ Spawn            │ the OS refused to create the worker thread       │
/// │ Read             │ reader-side failure while pumping nodes          │
/// │ Write            │ writer-side failure while pumping nodes          │
/// └──────────────────┴──────────────────────────────────────────────────┘
/// ```
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("node list writer has not been closed yet")]
    WriterNotClosed,

    #[error("background reader thread already started")]
    AlreadyStarted,

    #[error("buffer capacity must be at least 1 (got {capacity})")]
    InvalidCapacity { capacity: usize },

    #[error("failed to spawn background reader thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Write(#[from] WriteError),
}
