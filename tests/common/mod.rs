//! Shared test utilities: a scripted stand-in for the TrySql shell.

#![allow(dead_code, unused_imports)]

use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tempfile::TempDir;
use trysql_watcher::{Config, ShellSupervisor, SupervisorError};

/// Credential the fake shell hands out for the bootstrap command.
pub const FAKE_CREDENTIAL: &str = "0123456789abcdef0123456789abcdef";

const SCRIPT: &str = r#"#!/bin/sh
# Fake TrySql shell: speaks the line protocol over stdio.
port=6603
destroy=yes
flood=no
boot_delay=0
bootstrap_delay=0
while [ $# -gt 0 ]; do
  case "$1" in
    -p) port="$2"; shift 2 ;;
    --boot-fail)
      echo "starting trysql"
      echo "docker: cannot connect to daemon" >&2
      exit 1 ;;
    --no-destroy) destroy=no; shift ;;
    --flood-stderr) flood=yes; shift ;;
    --slow-boot) boot_delay=1; shift ;;
    --slow-bootstrap) bootstrap_delay=5; shift ;;
    *) shift ;;
  esac
done

echo "starting trysql on port $port"
if [ "$flood" = yes ]; then
  i=0
  while [ $i -lt 4000 ]; do
    echo "pulling layer 0123456789abcdef0123456789abcdef: downloading" >&2
    i=$((i+1))
  done
fi
sleep $boot_delay
echo "pulling mysql image"
echo "shell ready"

while IFS= read -r line; do
  case "$line" in
    p) sleep $bootstrap_delay; echo "> __CREDENTIAL__" ;;
    port) echo "> $port" ;;
    warn) echo "warning: deprecated command" >&2; echo "> ok" ;;
    slow) sleep 1; echo "> slow" ;;
    die) exit 3 ;;
    close)
      exec 0<&-
      echo "> stdin closed"
      exec sleep 30 ;;
    quit)
      echo "removing container"
      if [ "$destroy" = yes ]; then echo "container destroyed"; fi
      exit 0 ;;
    *) echo "> $line" ;;
  esac
done
"#;

/// Fake shell script in a temp directory. Removed on drop.
pub struct FakeShell {
    _dir: TempDir,
    script: PathBuf,
}

impl FakeShell {
    pub fn install() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let script = dir.path().join("trysql.sh");
        std::fs::write(&script, SCRIPT.replace("__CREDENTIAL__", FAKE_CREDENTIAL))
            .expect("Failed to write fake shell");
        Self { _dir: dir, script }
    }

    /// Config running the script through `sh`, so it never needs exec bits.
    pub fn config(&self) -> Config {
        self.config_with_args(&[])
    }

    pub fn config_with_args(&self, extra: &[&str]) -> Config {
        let mut config = Config::default();
        config.shell.program = "sh".to_string();
        config.shell.args = std::iter::once(self.script.display().to_string())
            .chain(extra.iter().map(|arg| arg.to_string()))
            .collect();
        config
    }
}

/// A supervisor that has completed `launch()`.
pub fn launched(config: &Config) -> ShellSupervisor {
    let mut supervisor = ShellSupervisor::new(config);
    supervisor.launch().expect("launch should reach ready");
    supervisor
}

/// Run `launch()` on a worker thread. `None` if it has not returned
/// within `limit`, so a stalled launch fails the test instead of hanging it.
pub fn launch_within(
    config: &Config,
    limit: Duration,
) -> Option<(ShellSupervisor, Result<(), SupervisorError>)> {
    let mut supervisor = ShellSupervisor::new(config);
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = supervisor.launch();
        let _ = tx.send((supervisor, result));
    });
    rx.recv_timeout(limit).ok()
}

/// Whether `pid` still names a process (zombies included).
pub fn pid_exists(pid: u32) -> bool {
    unsafe { libc::kill(pid as libc::pid_t, 0) == 0 }
}
