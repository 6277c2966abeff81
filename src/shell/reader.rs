//! Line-oriented reader over the shell's output.

use std::io;
use std::time::{Duration, Instant};

use crate::process::{PipeStream, ReadMode};

const CHUNK_SIZE: usize = 4096;

/// Outcome of a single non-blocking read attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineRead {
    /// A complete line, newline (and any `\r`) removed.
    Line(String),
    /// Nothing complete is buffered yet.
    Pending,
    /// The writer hung up and every buffered byte has been returned.
    Closed,
}

/// Reads newline-delimited lines from a pipe in either read mode.
///
/// Bytes past the first newline stay buffered for the next call, so a
/// chunk carrying several lines never loses any of them. At end-of-stream
/// a trailing partial line is returned as a final line before `Closed`.
pub struct LineReader<S> {
    stream: S,
    buffer: Vec<u8>,
    mode: ReadMode,
    eof: bool,
}

impl<S: PipeStream> LineReader<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            buffer: Vec::with_capacity(CHUNK_SIZE),
            mode: ReadMode::Blocking,
            eof: false,
        }
    }

    pub fn mode(&self) -> ReadMode {
        self.mode
    }

    /// Switch the underlying pipe. On failure the previous mode is kept.
    pub fn set_mode(&mut self, mode: ReadMode) -> io::Result<()> {
        if mode == self.mode {
            return Ok(());
        }
        self.stream
            .set_nonblocking(mode == ReadMode::NonBlocking)?;
        self.mode = mode;
        Ok(())
    }

    /// Block until a full line arrives. `Ok(None)` means end-of-stream.
    pub fn await_line(&mut self) -> io::Result<Option<String>> {
        loop {
            match self.try_read_line()? {
                LineRead::Line(line) => return Ok(Some(line)),
                LineRead::Closed => return Ok(None),
                LineRead::Pending => {
                    self.stream.wait_readable(None)?;
                }
            }
        }
    }

    /// Like [`await_line`](Self::await_line), but gives up after `timeout`
    /// and returns [`LineRead::Pending`] if no complete line arrived.
    ///
    /// Readiness is awaited before every read, so the deadline holds in
    /// blocking mode too.
    pub fn await_line_within(&mut self, timeout: Option<Duration>) -> io::Result<LineRead> {
        let deadline = timeout.and_then(|timeout| Instant::now().checked_add(timeout));
        loop {
            if !self.has_buffered_line() && !self.eof {
                let remaining = match deadline {
                    Some(deadline) => match deadline.checked_duration_since(Instant::now()) {
                        Some(remaining) => Some(remaining),
                        None => return Ok(LineRead::Pending),
                    },
                    None => None,
                };
                if !self.stream.wait_readable(remaining)? {
                    return Ok(LineRead::Pending);
                }
            }
            match self.try_read_line()? {
                LineRead::Pending => continue,
                done => return Ok(done),
            }
        }
    }

    /// Perform at most one read on the pipe and return a line if one is
    /// complete. In blocking mode the read waits for data.
    pub fn try_read_line(&mut self) -> io::Result<LineRead> {
        if let Some(line) = self.take_line() {
            return Ok(LineRead::Line(line));
        }
        if self.eof {
            return Ok(self.take_remainder());
        }

        let mut chunk = [0u8; CHUNK_SIZE];
        loop {
            match self.stream.read(&mut chunk) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(self.take_remainder());
                }
                Ok(count) => {
                    self.buffer.extend_from_slice(&chunk[..count]);
                    return Ok(match self.take_line() {
                        Some(line) => LineRead::Line(line),
                        None => LineRead::Pending,
                    });
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                    return Ok(LineRead::Pending)
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn has_buffered_line(&self) -> bool {
        self.buffer.contains(&b'\n')
    }

    fn take_line(&mut self) -> Option<String> {
        let newline = self.buffer.iter().position(|&byte| byte == b'\n')?;
        let rest = self.buffer.split_off(newline + 1);
        let line = std::mem::replace(&mut self.buffer, rest);
        Some(decode(&line))
    }

    fn take_remainder(&mut self) -> LineRead {
        if self.buffer.is_empty() {
            return LineRead::Closed;
        }
        let line = std::mem::take(&mut self.buffer);
        LineRead::Line(decode(&line))
    }
}

fn decode(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.trim_end_matches('\n').trim_end_matches('\r').to_string()
}
