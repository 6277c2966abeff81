use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` overrides `default_directive`.
///
/// Logs go to stderr; stdout carries shell replies.
pub fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();
}

/// Map a `-v` count to a filter directive.
pub fn level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}
