//! Forwards termination signals to a supervisor.
//!
//! The supervisor itself knows nothing about signals. This watcher runs on
//! its own thread, and for each caught signal locks the supervisor, calls
//! `terminate()` and then hands the signal number to a callback (the binary
//! uses it to exit). If `terminate()` is refused the shell is killed, so
//! the callback never runs with a live child behind it.
//!
//! Install it before `launch()`: a signal that arrives while the shell is
//! booting then waits for the supervisor lock instead of killing the
//! watcher with the child still running.

use std::io;
use std::os::raw::c_int;
use std::thread;

use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGTERM};
use signal_hook::iterator::{Handle, Signals};
use tracing::{info, warn};

use crate::SharedSupervisor;

/// Signals that end a watcher session.
pub const TERMINATION_SIGNALS: [c_int; 3] = [SIGHUP, SIGINT, SIGTERM];

pub struct TerminateOnSignal {
    handle: Handle,
    thread: thread::JoinHandle<()>,
}

impl TerminateOnSignal {
    /// Watch [`TERMINATION_SIGNALS`].
    pub fn install<F>(supervisor: SharedSupervisor, on_terminated: F) -> io::Result<Self>
    where
        F: Fn(c_int) + Send + 'static,
    {
        Self::install_for(&TERMINATION_SIGNALS, supervisor, on_terminated)
    }

    pub fn install_for<F>(
        signals: &[c_int],
        supervisor: SharedSupervisor,
        on_terminated: F,
    ) -> io::Result<Self>
    where
        F: Fn(c_int) + Send + 'static,
    {
        let mut signals = Signals::new(signals)?;
        let handle = signals.handle();
        let thread = thread::Builder::new()
            .name("signal-forwarder".to_string())
            .spawn(move || {
                for signal in signals.forever() {
                    info!("Caught {}, terminating.", signal_name(signal));
                    {
                        // Blocks while a launch is in progress.
                        let mut supervisor = supervisor.lock();
                        if let Err(err) = supervisor.terminate() {
                            warn!(error = %err, "Terminate after signal failed");
                            supervisor.abort();
                        }
                    }
                    on_terminated(signal);
                }
            })?;
        Ok(Self { handle, thread })
    }

    pub fn stop(self) {
        self.handle.close();
        let _ = self.thread.join();
    }
}

pub fn signal_name(signal: c_int) -> String {
    match signal {
        SIGHUP => "SIGHUP".to_string(),
        SIGINT => "SIGINT".to_string(),
        SIGTERM => "SIGTERM".to_string(),
        other => format!("signal {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_termination_signals() {
        assert_eq!(signal_name(SIGHUP), "SIGHUP");
        assert_eq!(signal_name(SIGINT), "SIGINT");
        assert_eq!(signal_name(SIGTERM), "SIGTERM");
        assert_eq!(signal_name(0), "signal 0");
    }
}
