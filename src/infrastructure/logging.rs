// Tracing subscriber setup
use tracing_subscriber::EnvFilter;

/// JSON lines on stdout by default; human-readable output on stderr with `console`.
/// `RUST_LOG` takes precedence over the `debug` flag.
pub fn init_tracing(debug: bool, console: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if console {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stdout)
            .init();
    }

    tracing::info!(level = default_level, console, "logging initialised");
}
