/// Errors that can occur while writing nodes.
///
/// Writers are thin: they build a node and hand it to a sink. What can go
/// wrong is a contract violation by the caller, or the far side of the
/// sink having gone away.
///
/// Error hierarchy:
///
/// ```text
///   WriteError
///   ├── Closed               ← write call after close()
///   ├── LineInfoNotRequested ← set_line_info on a writer that opted out
///   └── Disposed             ← the sink's consumer has been torn down
/// ```
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("writer is closed")]
    Closed,

    #[error("line info was not requested by this writer")]
    LineInfoNotRequested,

    #[error("node sink has been disposed")]
    Disposed,
}
