//! The supervised shell: lifecycle, line protocol and the supervisor.
//!
//! # Architecture
//!
//! - `state.rs` - Lifecycle state machine (NotStarted → Booting → Ready → Destroying → Destroyed)
//! - `reader.rs` - Line reader with blocking and non-blocking reads
//! - `writer.rs` - Newline-terminated command writer
//! - `drain.rs` - Background reader that keeps stderr flowing
//! - `protocol.rs` - Sentinels, prompt stripping
//! - `supervisor.rs` - Drives the process through the lifecycle

mod credential;
mod drain;
mod error;
pub mod protocol;
mod reader;
mod state;
mod supervisor;
mod writer;

pub use credential::Credential;
pub use error::SupervisorError;
pub use reader::{LineRead, LineReader};
pub use state::{LifecycleEvent, LifecycleState};
pub use supervisor::{ConnectionInfo, ShellSupervisor};
pub use writer::CommandWriter;
