use tracing_subscriber::EnvFilter;

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Log to stderr. `RUST_LOG` wins over the configured level.
pub fn init_logging(level: &str) {
    let level = if LEVELS.contains(&level) {
        level
    } else {
        eprintln!("Invalid log level '{level}' in config, using 'warn'");
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
