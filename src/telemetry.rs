use tracing_subscriber::EnvFilter;

/// Sends diagnostics to stderr, filtered by `RUST_LOG` (warnings by default),
/// so stdout only carries the transcript.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
