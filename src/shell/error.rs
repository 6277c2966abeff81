//! Error types for supervising the shell.

use std::io;
use std::time::Duration;

use thiserror::Error;

use super::state::LifecycleState;

/// Errors surfaced by [`ShellSupervisor`](super::ShellSupervisor).
///
/// Nothing is retried internally; every failure reaches the caller.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// The process or its pipes could not be created. Fatal.
    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Writing a command to the shell failed. State is unchanged.
    #[error("Failed to write command to shell: {source}")]
    Write {
        #[source]
        source: io::Error,
    },

    /// Reading the shell's output failed. The shell has been torn down.
    #[error("Failed to read shell output: {source}")]
    Read {
        #[source]
        source: io::Error,
    },

    /// Querying the OS for the process status failed.
    #[error("Failed to query shell process status: {source}")]
    Status {
        #[source]
        source: io::Error,
    },

    /// Operation not permitted in the current lifecycle state.
    #[error("Cannot {operation} while shell is {state}")]
    InvalidState {
        operation: &'static str,
        state: LifecycleState,
    },

    /// The shell closed its output before announcing shutdown.
    #[error("Shell output closed unexpectedly while {state}")]
    UnexpectedTermination { state: LifecycleState },

    /// No reply arrived within the configured response timeout.
    #[error("No response from shell after {}ms", .timeout.as_millis())]
    ResponseTimeout { timeout: Duration },
}

impl SupervisorError {
    /// Stable identifier for logs and machine-readable output.
    pub fn kind(&self) -> &'static str {
        match self {
            SupervisorError::Spawn { .. } => "spawn_error",
            SupervisorError::Write { .. } => "write_error",
            SupervisorError::Read { .. } => "read_error",
            SupervisorError::Status { .. } => "status_error",
            SupervisorError::InvalidState { .. } => "invalid_state",
            SupervisorError::UnexpectedTermination { .. } => "unexpected_termination",
            SupervisorError::ResponseTimeout { .. } => "response_timeout",
        }
    }

    /// Whether the shell is gone after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SupervisorError::Spawn { .. }
                | SupervisorError::Read { .. }
                | SupervisorError::UnexpectedTermination { .. }
        )
    }
}
