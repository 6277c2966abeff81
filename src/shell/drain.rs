//! Background consumer for the shell's stderr.
//!
//! The shell logs progress (image pulls, container start) on stderr while
//! the supervisor is waiting on stdout. If nobody reads that pipe the shell
//! blocks once the kernel buffer is full, so a dedicated thread reads it
//! for the whole life of the process and forwards each line to tracing.

use std::io;
use std::process::ChildStderr;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::reader::LineReader;

/// Target for the shell's stderr.
pub(crate) const STDERR_TARGET: &str = "trysql_watcher::shell::stderr";

/// How long `finish` waits for the thread to see end-of-file.
const JOIN_GRACE: Duration = Duration::from_millis(500);
const JOIN_POLL: Duration = Duration::from_millis(10);

pub struct StderrDrain {
    handle: thread::JoinHandle<()>,
}

impl StderrDrain {
    pub fn spawn(stderr: ChildStderr) -> io::Result<Self> {
        let handle = thread::Builder::new()
            .name("shell-stderr".to_string())
            .spawn(move || {
                let mut reader = LineReader::new(stderr);
                loop {
                    match reader.await_line() {
                        Ok(Some(line)) => warn!(target: STDERR_TARGET, "{}", line),
                        Ok(None) => break,
                        Err(err) => {
                            debug!(error = %err, "Shell stderr read failed");
                            break;
                        }
                    }
                }
            })?;
        Ok(Self { handle })
    }

    /// Join once the shell has been reaped.
    ///
    /// A grandchild that inherited stderr can keep the pipe open after the
    /// shell exits; in that case the thread is detached after a short grace.
    pub fn finish(self) {
        let deadline = Instant::now() + JOIN_GRACE;
        while !self.handle.is_finished() {
            if Instant::now() >= deadline {
                debug!("Shell stderr still open after exit; detaching drain");
                return;
            }
            thread::sleep(JOIN_POLL);
        }
        let _ = self.handle.join();
    }
}
