use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global log subscriber.
///
/// Logs go to stderr so stdout only ever carries results. The level defaults
/// to `warn` and can be raised with `RUST_LOG` (e.g. `RUST_LOG=debug`).
pub fn init_logging() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_line_number(true)
                .with_target(false)
                .with_timer(tracing_subscriber::fmt::time::ChronoUtc::rfc_3339())
                .with_file(true),
        )
        .try_init()?;

    Ok(())
}
