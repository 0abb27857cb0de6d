#![warn(clippy::pedantic)]

pub mod error;
pub mod sink;
pub mod writer;
pub mod delegate;

pub use delegate::DelegateWriter;
pub use error::WriteError;
pub use sink::{FnSink, NodeSink};
pub use writer::NodeWriter;
