#![warn(clippy::pedantic)]

pub mod error;
pub mod reader;
pub mod source;
pub mod delegate;
pub mod indexed;

pub use delegate::DelegateReader;
pub use error::ReadError;
pub use indexed::IndexedReader;
pub use reader::NodeReader;
pub use source::{FnSource, IterSource, NodeSource};
