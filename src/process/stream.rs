//! Blocking / non-blocking capability for the shell's pipe handles.
//!
//! Non-blocking reads are a per-platform capability. On unix the pipe's
//! `O_NONBLOCK` flag is toggled with `fcntl` and readiness is awaited with
//! `poll`. Elsewhere switching reports [`io::ErrorKind::Unsupported`] and the
//! stream simply stays blocking.

use std::io::{self, Read};
use std::process::{ChildStderr, ChildStdout};
use std::time::Duration;

/// How reads on a pipe behave when no data is buffered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadMode {
    #[default]
    Blocking,
    NonBlocking,
}

/// A readable pipe that can switch read modes and wait for readiness.
pub trait PipeStream: Read + Send {
    fn set_nonblocking(&self, nonblocking: bool) -> io::Result<()>;

    /// Wait until the stream is readable (data or hangup).
    ///
    /// `None` waits indefinitely. Returns `Ok(false)` if `timeout` elapsed.
    fn wait_readable(&self, timeout: Option<Duration>) -> io::Result<bool>;
}

#[cfg(unix)]
mod imp {
    use std::io;
    use std::os::fd::RawFd;
    use std::time::{Duration, Instant};

    pub fn set_nonblocking(fd: RawFd, nonblocking: bool) -> io::Result<()> {
        let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
        if flags < 0 {
            return Err(io::Error::last_os_error());
        }

        let updated = if nonblocking {
            flags | libc::O_NONBLOCK
        } else {
            flags & !libc::O_NONBLOCK
        };
        if updated == flags {
            return Ok(());
        }

        let result = unsafe { libc::fcntl(fd, libc::F_SETFL, updated) };
        if result < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    pub fn wait_readable(fd: RawFd, timeout: Option<Duration>) -> io::Result<bool> {
        let deadline = timeout.and_then(|timeout| Instant::now().checked_add(timeout));
        let mut pollfd = libc::pollfd {
            fd,
            events: libc::POLLIN,
            revents: 0,
        };

        loop {
            let ready = unsafe { libc::poll(&mut pollfd, 1, poll_timeout_ms(deadline)) };
            if ready < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(err);
            }
            // POLLHUP / POLLERR count as readable: the next read reports them.
            return Ok(ready > 0);
        }
    }

    /// Milliseconds left until `deadline`, in `poll`'s convention.
    pub(super) fn poll_timeout_ms(deadline: Option<Instant>) -> libc::c_int {
        match deadline {
            None => -1,
            Some(deadline) => deadline
                .saturating_duration_since(Instant::now())
                .as_millis()
                .min(libc::c_int::MAX as u128) as libc::c_int,
        }
    }
}

macro_rules! impl_pipe_stream {
    ($ty:ty) => {
        impl PipeStream for $ty {
            #[cfg(unix)]
            fn set_nonblocking(&self, nonblocking: bool) -> io::Result<()> {
                use std::os::fd::AsRawFd;
                imp::set_nonblocking(self.as_raw_fd(), nonblocking)
            }

            #[cfg(not(unix))]
            fn set_nonblocking(&self, nonblocking: bool) -> io::Result<()> {
                if nonblocking {
                    return Err(io::Error::new(
                        io::ErrorKind::Unsupported,
                        "non-blocking pipe reads are not supported on this platform",
                    ));
                }
                Ok(())
            }

            #[cfg(unix)]
            fn wait_readable(&self, timeout: Option<Duration>) -> io::Result<bool> {
                use std::os::fd::AsRawFd;
                imp::wait_readable(self.as_raw_fd(), timeout)
            }

            #[cfg(not(unix))]
            fn wait_readable(&self, _timeout: Option<Duration>) -> io::Result<bool> {
                // Pipes stay blocking here, so the read itself does the waiting.
                Ok(true)
            }
        }
    };
}

impl_pipe_stream!(ChildStdout);
impl_pipe_stream!(ChildStderr);
