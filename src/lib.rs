//! Supervisor for an interactive TrySql shell.
//!
//! Launches the shell as a child process, waits for it to boot, fetches the
//! database credential it hands out, relays line-oriented commands, and
//! shuts it down again without leaving the process behind.

pub mod config;
pub mod logging;
pub mod process;
pub mod shell;
#[cfg(unix)]
pub mod signals;

use std::sync::Arc;

use parking_lot::Mutex;

pub use config::{Config, ConfigError};
pub use process::{LaunchSpec, ProcessStatus};
pub use shell::{ConnectionInfo, Credential, LifecycleState, ShellSupervisor, SupervisorError};

/// A supervisor shared between threads. The mutex serializes operations.
pub type SharedSupervisor = Arc<Mutex<ShellSupervisor>>;

pub fn shared(supervisor: ShellSupervisor) -> SharedSupervisor {
    Arc::new(Mutex::new(supervisor))
}
