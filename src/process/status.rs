use std::io;
use std::process::{Child, ExitStatus};

use serde::Serialize;

/// Point-in-time view of the shell process as reported by the OS.
///
/// Snapshots go stale as soon as they are taken; refresh explicitly before
/// relying on `running` or `exit_code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessStatus {
    pub command: String,
    pub pid: u32,
    pub running: bool,
    pub exit_code: Option<i32>,
    /// Signal that terminated the process (unix only).
    pub signal: Option<i32>,
}

impl ProcessStatus {
    /// Query `child` without blocking. Reaps it if it has already exited.
    pub fn capture(child: &mut Child, command: &str) -> io::Result<Self> {
        let pid = child.id();
        Ok(match child.try_wait()? {
            None => Self {
                command: command.to_string(),
                pid,
                running: true,
                exit_code: None,
                signal: None,
            },
            Some(status) => Self::exited(command, pid, status),
        })
    }

    pub fn exited(command: &str, pid: u32, status: ExitStatus) -> Self {
        Self {
            command: command.to_string(),
            pid,
            running: false,
            exit_code: status.code(),
            signal: termination_signal(&status),
        }
    }
}

#[cfg(unix)]
fn termination_signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn termination_signal(_status: &ExitStatus) -> Option<i32> {
    None
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::process::{Command, Stdio};

    #[test]
    fn running_child_has_no_exit_code() {
        let mut child = Command::new("sleep")
            .arg("5")
            .stdout(Stdio::null())
            .spawn()
            .unwrap();
        let status = ProcessStatus::capture(&mut child, "sleep 5").unwrap();
        assert!(status.running);
        assert!(status.pid > 0);
        assert_eq!(status.exit_code, None);
        assert_eq!(status.command, "sleep 5");

        child.kill().unwrap();
        child.wait().unwrap();
    }

    #[test]
    fn exited_child_reports_code() {
        let mut child = Command::new("sh").arg("-c").arg("exit 3").spawn().unwrap();
        let exit = child.wait().unwrap();
        let status = ProcessStatus::exited("sh", child.id(), exit);
        assert!(!status.running);
        assert_eq!(status.exit_code, Some(3));
        assert_eq!(status.signal, None);
    }

    #[test]
    fn killed_child_reports_signal() {
        let mut child = Command::new("sleep").arg("5").spawn().unwrap();
        child.kill().unwrap();
        let exit = child.wait().unwrap();
        let status = ProcessStatus::exited("sleep", child.id(), exit);
        assert_eq!(status.exit_code, None);
        assert_eq!(status.signal, Some(libc::SIGKILL));
    }

    #[test]
    fn serializes_to_json() {
        let status = ProcessStatus {
            command: "trysql".to_string(),
            pid: 42,
            running: true,
            exit_code: None,
            signal: None,
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["pid"], 42);
        assert_eq!(json["running"], true);
        assert!(json["exit_code"].is_null());
    }
}
