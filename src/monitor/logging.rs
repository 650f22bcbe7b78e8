use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured logging with a default level and format.
///
/// `RUST_LOG` still wins over `level` when it is set. Examples:
/// - `RUST_LOG=debug` - Debug level and above
/// - `RUST_LOG=pinglight=debug` - Debug level for pinglight crate only
///
/// Output goes to stderr so it does not interleave with the status line.
pub fn init_logging_with_config(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_thread_ids(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_thread_ids(true)
                    .with_line_number(true)
                    .with_file(true),
            )
            .init();
    }
}
