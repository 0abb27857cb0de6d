/// Errors that can occur while reading a node stream.
///
/// Most variants are usage errors raised at the call that broke the
/// contract. The exception is [`Upstream`](ReadError::Upstream) (and
/// [`WorkerPanicked`](ReadError::WorkerPanicked)): when a reader is drained
/// on a background thread, its failure is held back and handed to the
/// foreground consumer at the read that reaches the end of the stream.
///
/// Error hierarchy:
///
/// ```text
///   ReadError
///   ├── Disposed         ← read() on a disposed reader
///   ├── NotStarted       ← read() on a background reader before start_thread()
///   ├── IndexOutOfRange  ← seek past the end of an indexed reader
///   ├── WorkerPanicked   ← background worker unwound instead of returning
///   └── Upstream(..)     ← the wrapped / underlying source failed
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("reader has been disposed")]
    Disposed,

    #[error("background reader has not been started")]
    NotStarted,

    #[error("index {index} out of range for {count} nodes")]
    IndexOutOfRange { index: usize, count: usize },

    /// The background worker thread panicked.
    ///
    /// `message` is the panic payload when it was a string, or a generic
    /// description otherwise.
    #[error("background reader thread panicked: {message}")]
    WorkerPanicked { message: String },

    /// The source feeding this reader failed.
    ///
    /// Sources outside this workspace (a markup parser, an object graph
    /// walker) report their own error types through this variant.
    #[error("upstream reader failed: {0}")]
    Upstream(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ReadError {
    /// Wrap any error (or message) as an upstream failure.
    pub fn upstream(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Upstream(err.into())
    }
}
