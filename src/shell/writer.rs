//! Command writer for the shell's input pipe.

use std::io::{self, Write};

/// Writes newline-terminated commands to the shell.
pub struct CommandWriter<W> {
    sink: W,
}

impl<W: Write> CommandWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    /// Write `command`, appending a newline if it lacks one.
    ///
    /// Returns the number of bytes written, newline included.
    pub fn write_command(&mut self, command: &str) -> io::Result<usize> {
        let line = normalize(command);
        self.sink.write_all(line.as_bytes())?;
        self.sink.flush()?;
        Ok(line.len())
    }
}

/// Ensure a command is terminated by exactly the newline the shell expects.
pub fn normalize(command: &str) -> String {
    if command.ends_with('\n') {
        command.to_string()
    } else {
        format!("{command}\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_newline() {
        let mut writer = CommandWriter::new(Vec::new());
        let written = writer.write_command("p").unwrap();
        assert_eq!(written, 2);
        assert_eq!(writer.sink, b"p\n");
    }

    #[test]
    fn keeps_existing_newline() {
        let mut writer = CommandWriter::new(Vec::new());
        let written = writer.write_command("quit\n").unwrap();
        assert_eq!(written, 5);
        assert_eq!(writer.sink, b"quit\n");
    }

    #[test]
    fn commands_accumulate_in_order() {
        let mut writer = CommandWriter::new(Vec::new());
        writer.write_command("p").unwrap();
        writer.write_command("select 1;").unwrap();
        assert_eq!(writer.sink, b"p\nselect 1;\n");
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_propagates() {
        let mut writer = CommandWriter::new(BrokenPipe);
        let err = writer.write_command("p").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn normalize_empty_command() {
        assert_eq!(normalize(""), "\n");
    }
}
