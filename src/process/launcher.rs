use std::io;
use std::process::{Child, ChildStderr, ChildStdin, ChildStdout};

use tracing::debug;

use super::command::LaunchSpec;
use super::status::ProcessStatus;

/// A freshly spawned shell with its three pipes detached from the `Child`.
pub struct SupervisedProcess {
    pub child: Child,
    pub command: String,
    pub stdin: ChildStdin,
    pub stdout: ChildStdout,
    pub stderr: ChildStderr,
}

/// Spawn `spec` with stdin, stdout and stderr connected to pipes.
pub fn spawn(spec: &LaunchSpec) -> io::Result<SupervisedProcess> {
    let mut child = spec.to_command().spawn()?;
    let command = spec.command_line();

    let (stdin, stdout, stderr) = match (child.stdin.take(), child.stdout.take(), child.stderr.take())
    {
        (Some(stdin), Some(stdout), Some(stderr)) => (stdin, stdout, stderr),
        _ => {
            let _ = reap(&mut child, &command, true);
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "child standard streams were not piped",
            ));
        }
    };

    debug!(pid = child.id(), command = %command, "Spawned shell process");
    Ok(SupervisedProcess {
        child,
        command,
        stdin,
        stdout,
        stderr,
    })
}

/// Wait for `child` to exit, killing it first when `force` is set.
///
/// Callers close the child's pipes before reaping so a shell blocked on
/// its input sees end-of-file.
pub fn reap(child: &mut Child, command: &str, force: bool) -> io::Result<ProcessStatus> {
    if force {
        // Already exited is fine; wait() below still collects it.
        let _ = child.kill();
    }
    let status = child.wait()?;
    debug!(pid = child.id(), ?status, "Reaped shell process");
    Ok(ProcessStatus::exited(command, child.id(), status))
}
