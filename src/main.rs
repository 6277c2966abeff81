use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;

use trysql_watcher::logging::{init_tracing, level_for};
use trysql_watcher::shell::protocol::QUIT_COMMAND;
use trysql_watcher::{shared, Config, SharedSupervisor, ShellSupervisor};

/// Launch a TrySql shell, print its connection details and relay commands
/// from stdin until EOF or `quit`.
#[derive(Debug, Parser)]
#[command(name = "trysql-watcher", version)]
struct Cli {
    /// Config file (defaults to the platform config dir).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Shell executable, overriding the config file.
    #[arg(long)]
    program: Option<String>,

    /// Port to bind; 0 or unset means 6603.
    #[arg(short, long)]
    port: Option<u16>,

    /// Print connection details as JSON.
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(level_for(cli.verbose));

    let config = load_config(&cli)?;
    let supervisor = shared(ShellSupervisor::new(&config));

    // The signal thread holds a clone, so Drop alone is not enough.
    let _cleanup = scopeguard::guard(Arc::clone(&supervisor), |supervisor| {
        let mut supervisor = supervisor.lock();
        if supervisor.state().is_ready() {
            if let Err(err) = supervisor.terminate() {
                warn!(error = %err, "Shell did not shut down cleanly");
            }
        }
    });

    #[cfg(unix)]
    let signals = trysql_watcher::signals::TerminateOnSignal::install(
        Arc::clone(&supervisor),
        |signal| std::process::exit(128 + signal),
    )
    .context("failed to install signal handlers")?;

    supervisor.lock().launch().context("failed to launch shell")?;
    print_connection(&supervisor, cli.json)?;

    relay(&supervisor, &config.protocol.quit_command)?;

    #[cfg(unix)]
    signals.stop();
    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load configuration")?;

    if let Some(program) = &cli.program {
        config.shell.program = program.clone();
    }
    if let Some(port) = cli.port {
        config.shell.port = port;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn print_connection(supervisor: &SharedSupervisor, json: bool) -> Result<()> {
    let supervisor = supervisor.lock();
    let info = supervisor.connection_info();
    let pid = supervisor.process_status().map(|status| status.pid);
    let password = info.password.as_ref().map(|p| p.expose().to_string());

    let mut stdout = io::stdout().lock();
    if json {
        let body = serde_json::json!({
            "host": info.host,
            "port": info.port,
            "user": info.user,
            "password": password,
            "pid": pid,
        });
        writeln!(stdout, "{}", body)?;
    } else {
        writeln!(stdout, "host:     {}", info.host)?;
        writeln!(stdout, "port:     {}", info.port)?;
        writeln!(stdout, "user:     {}", info.user)?;
        writeln!(stdout, "password: {}", password.unwrap_or_default())?;
    }
    stdout.flush()?;
    Ok(())
}

/// Forward stdin lines to the shell, one round trip each.
fn relay(supervisor: &SharedSupervisor, quit_command: &str) -> Result<()> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        let command = line.trim();
        if command.is_empty() {
            continue;
        }
        if command == quit_command || command == QUIT_COMMAND || command == "exit" {
            break;
        }

        let result = supervisor.lock().send(command);
        match result {
            Ok(response) => println!("{response}"),
            Err(err) if err.is_fatal() => return Err(err).context("shell went away"),
            Err(err) => warn!(kind = err.kind(), error = %err, "Command failed"),
        }
    }

    supervisor
        .lock()
        .terminate()
        .context("failed to terminate shell")?;
    Ok(())
}
