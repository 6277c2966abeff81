use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::config::{ShellConfig, DEFAULT_PORT};

/// Everything needed to spawn the shell: program, args, env and cwd.
///
/// Built from [`ShellConfig`] via [`LaunchSpec::from_config`], which applies
/// the port rule: the port flag is only passed when the resolved port
/// differs from [`DEFAULT_PORT`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    program: String,
    args: Vec<String>,
    env: Vec<(String, String)>,
    cwd: Option<PathBuf>,
    port: u16,
}

impl LaunchSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            cwd: None,
            port: DEFAULT_PORT,
        }
    }

    pub fn from_config(shell: &ShellConfig) -> Self {
        let port = shell.resolved_port();
        let mut spec = Self::new(shell.program.clone()).args(shell.args.iter().cloned());
        if port != DEFAULT_PORT {
            spec = spec.arg(shell.port_flag.clone()).arg(port.to_string());
        }
        for (key, value) in &shell.env {
            spec = spec.env(key.clone(), value.clone());
        }
        if let Some(cwd) = &shell.cwd {
            spec = spec.cwd(cwd.clone());
        }
        spec.port = port;
        spec
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args(mut self, args: impl IntoIterator<Item = String>) -> Self {
        self.args.extend(args);
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    pub fn environment(&self) -> &[(String, String)] {
        &self.env
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// Port the shell was asked to bind.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Human-readable command line, as recorded in status snapshots.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// A `Command` with all three standard streams piped.
    pub(crate) fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(cwd) = &self.cwd {
            command.current_dir(cwd);
        }
        command
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell(port: u16) -> ShellConfig {
        ShellConfig {
            program: "trysql".to_string(),
            port,
            ..ShellConfig::default()
        }
    }

    #[test]
    fn default_port_passes_no_flag() {
        let spec = LaunchSpec::from_config(&shell(0));
        assert!(spec.arguments().is_empty());
        assert_eq!(spec.port(), DEFAULT_PORT);
        assert_eq!(spec.command_line(), "trysql");
    }

    #[test]
    fn explicit_default_port_passes_no_flag() {
        let spec = LaunchSpec::from_config(&shell(DEFAULT_PORT));
        assert!(spec.arguments().is_empty());
    }

    #[test]
    fn custom_port_appends_flag() {
        let spec = LaunchSpec::from_config(&shell(7000));
        assert_eq!(spec.arguments(), ["-p", "7000"]);
        assert_eq!(spec.port(), 7000);
        assert_eq!(spec.command_line(), "trysql -p 7000");
    }

    #[test]
    fn base_args_come_before_port_flag() {
        let mut config = shell(7000);
        config.args = vec!["--verbose".to_string()];
        config.port_flag = "--port".to_string();
        let spec = LaunchSpec::from_config(&config);
        assert_eq!(spec.arguments(), ["--verbose", "--port", "7000"]);
    }

    #[test]
    fn env_and_cwd_carried_over() {
        let mut config = shell(0);
        config
            .env
            .insert("TRYSQL_IMAGE".to_string(), "mysql:8".to_string());
        config.cwd = Some(PathBuf::from("/tmp"));
        let spec = LaunchSpec::from_config(&config);
        assert_eq!(
            spec.environment(),
            [("TRYSQL_IMAGE".to_string(), "mysql:8".to_string())]
        );
        assert_eq!(spec.working_dir(), Some(Path::new("/tmp")));
    }

    #[test]
    fn builder_accumulates() {
        let spec = LaunchSpec::new("sh").arg("-c").arg("echo hi").env("A", "1");
        assert_eq!(spec.program(), "sh");
        assert_eq!(spec.arguments(), ["-c", "echo hi"]);
        assert_eq!(spec.environment().len(), 1);
    }
}
