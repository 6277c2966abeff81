use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::shell::protocol::{
    BOOTSTRAP_COMMAND, DESTROYED_SENTINEL, PROMPT, QUIT_COMMAND, READY_SENTINEL,
};

/// Port the shell binds when none is requested.
pub const DEFAULT_PORT: u16 = 6603;

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub shell: ShellConfig,
    #[serde(default)]
    pub protocol: ProtocolConfig,
    #[serde(default)]
    pub connection: ConnectionConfig,
}

/// How to launch the shell process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Executable to run (looked up on PATH when not absolute).
    #[serde(default = "default_program")]
    pub program: String,
    /// Arguments passed before the port flag.
    #[serde(default)]
    pub args: Vec<String>,
    /// Port to bind; 0 means [`DEFAULT_PORT`].
    #[serde(default)]
    pub port: u16,
    /// Flag used to pass a non-default port.
    #[serde(default = "default_port_flag")]
    pub port_flag: String,
    /// Extra environment variables for the shell.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    /// Working directory; inherits ours when unset.
    #[serde(default)]
    pub cwd: Option<PathBuf>,
}

/// Sentinels and fixed commands of the shell's line protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolConfig {
    #[serde(default = "default_ready_sentinel")]
    pub ready_sentinel: String,
    #[serde(default = "default_destroyed_sentinel")]
    pub destroyed_sentinel: String,
    /// Command whose reply carries the credential.
    #[serde(default = "default_bootstrap_command")]
    pub bootstrap_command: String,
    #[serde(default = "default_quit_command")]
    pub quit_command: String,
    /// Decoration prefixed to replies.
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Upper bound on a single round trip. Unset waits indefinitely.
    #[serde(default)]
    pub response_timeout_ms: Option<u64>,
}

/// Where clients reach the service the shell starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Host address; the service is published on the host, not the container.
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_user")]
    pub user: String,
}

impl ShellConfig {
    /// The port the shell will actually bind.
    pub fn resolved_port(&self) -> u16 {
        if self.port > 0 {
            self.port
        } else {
            DEFAULT_PORT
        }
    }
}

fn default_program() -> String {
    "trysql".to_string()
}

fn default_port_flag() -> String {
    "-p".to_string()
}

fn default_ready_sentinel() -> String {
    READY_SENTINEL.to_string()
}

fn default_destroyed_sentinel() -> String {
    DESTROYED_SENTINEL.to_string()
}

fn default_bootstrap_command() -> String {
    BOOTSTRAP_COMMAND.to_string()
}

fn default_quit_command() -> String {
    QUIT_COMMAND.to_string()
}

fn default_prompt() -> String {
    PROMPT.to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_user() -> String {
    "root".to_string()
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: Vec::new(),
            port: 0,
            port_flag: default_port_flag(),
            env: BTreeMap::new(),
            cwd: None,
        }
    }
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            ready_sentinel: default_ready_sentinel(),
            destroyed_sentinel: default_destroyed_sentinel(),
            bootstrap_command: default_bootstrap_command(),
            quit_command: default_quit_command(),
            prompt: default_prompt(),
            response_timeout_ms: None,
        }
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            user: default_user(),
        }
    }
}
