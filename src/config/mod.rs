mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{Config, ConnectionConfig, ProtocolConfig, ShellConfig, DEFAULT_PORT};
