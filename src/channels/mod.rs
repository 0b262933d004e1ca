//! Channel abstraction for conversation I/O.

pub mod channel;
pub mod cli;
pub mod memory;
pub mod ws;

pub use channel::*;
pub use cli::CliChannel;
pub use memory::{MemoryChannel, Outbound};
