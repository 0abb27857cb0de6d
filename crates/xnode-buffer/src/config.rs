use crate::error::BufferError;

/// Default number of nodes per hand-off buffer.
pub const DEFAULT_CAPACITY: usize = 64;

/// Thread name used when neither the config nor `start_thread` names one.
pub const DEFAULT_THREAD_NAME: &str = "xnode-background";

/// Configuration for a [`BackgroundReader`](crate::BackgroundReader).
///
/// ```text
/// ┌───────────────────┬──────────────────────────────────────────────────┐
/// │ Field             │ Purpose                                          │
/// ├───────────────────┼──────────────────────────────────────────────────┤
/// │ capacity          │ Nodes per buffer; two buffers exist in total     │
/// │ thread_name       │ Name of the worker thread (debuggers, tracing)   │
/// │ provide_line_info │ Relay source positions from the wrapped reader   │
/// └───────────────────┴──────────────────────────────────────────────────┘
/// ```
///
/// Peak memory held by the exchange is `2 * capacity` nodes. Smaller
/// buffers hand batches over sooner (lower latency to the first node)
/// at the price of more lock round-trips per node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackgroundConfig {
    /// Nodes per buffer. Must be at least 1.
    pub capacity: usize,

    /// Worker thread name. A name passed to `start_thread` wins over this.
    pub thread_name: Option<String>,

    /// Forward line info from the wrapped reader.
    ///
    /// Line info is relayed only when this is set **and** the wrapped
    /// reader reports `has_line_info()`. Turning it off saves one marker
    /// node per position change.
    pub provide_line_info: bool,
}

impl Default for BackgroundConfig {
    /// 64-node buffers, default thread name, line info relayed.
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            thread_name: None,
            provide_line_info: true,
        }
    }
}

impl BackgroundConfig {
    /// Default config with a different buffer capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Check the config before any thread or buffer is created.
    ///
    /// # Errors
    ///
    /// Returns `BufferError::InvalidCapacity` when `capacity` is zero.
    pub fn validate(&self) -> Result<(), BufferError> {
        if self.capacity == 0 {
            return Err(BufferError::InvalidCapacity {
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    pub(crate) fn resolve_thread_name(&self, name: Option<&str>) -> String {
        name.map(str::to_owned)
            .or_else(|| self.thread_name.clone())
            .unwrap_or_else(|| DEFAULT_THREAD_NAME.to_owned())
    }
}
