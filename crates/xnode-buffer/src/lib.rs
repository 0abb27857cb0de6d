#![warn(clippy::pedantic)]

pub mod background;
pub mod config;
pub mod error;
pub mod node_list;
pub mod node_queue;
pub mod pump;

pub use background::{BackgroundReader, BackgroundState, DisposeHandle};
pub use config::BackgroundConfig;
pub use error::BufferError;
pub use node_list::NodeList;
pub use node_queue::NodeQueue;
pub use pump::{transform, write_current};
