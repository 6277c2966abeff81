//! Spawning and observing the shell process.

mod command;
mod launcher;
mod status;
mod stream;

pub use command::LaunchSpec;
pub use launcher::{reap, spawn, SupervisedProcess};
pub use status::ProcessStatus;
pub use stream::{PipeStream, ReadMode};
