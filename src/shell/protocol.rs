//! Line protocol spoken by the shell.
//!
//! The shell answers every command with exactly one line. Two substrings are
//! significant in its own chatter: one announces that boot finished, the
//! other that shutdown finished. Replies are decorated with a prompt that
//! has to be removed before values such as the credential are usable.

use std::time::Duration;

use crate::config::ProtocolConfig;

pub const READY_SENTINEL: &str = "shell ready";
pub const DESTROYED_SENTINEL: &str = "destroyed";
pub const BOOTSTRAP_COMMAND: &str = "p";
pub const QUIT_COMMAND: &str = "quit";
pub const PROMPT: &str = "> ";

/// Length of the credential handed out by the shell.
pub const CREDENTIAL_LEN: usize = 32;

impl ProtocolConfig {
    pub fn is_ready_line(&self, line: &str) -> bool {
        line.contains(&self.ready_sentinel)
    }

    pub fn is_destroyed_line(&self, line: &str) -> bool {
        line.contains(&self.destroyed_sentinel)
    }

    /// Remove every prompt decoration from an already-clean reply.
    pub fn strip_prompt(&self, line: &str) -> String {
        strip_prompt(line, &self.prompt)
    }

    pub fn response_timeout(&self) -> Option<Duration> {
        self.response_timeout_ms.map(Duration::from_millis)
    }
}

/// Normalize a raw reply: surrounding whitespace and stray newlines go.
pub fn clean_line(raw: &str) -> String {
    raw.trim().replace('\n', "")
}

/// Whether a prompt-stripped bootstrap reply has the credential's shape.
pub fn is_well_formed_credential(value: &str) -> bool {
    value.chars().count() == CREDENTIAL_LEN
}

/// Remove every occurrence of `prompt` from `line`.
pub fn strip_prompt(line: &str, prompt: &str) -> String {
    if prompt.is_empty() {
        return line.to_string();
    }
    line.replace(prompt, "")
}
