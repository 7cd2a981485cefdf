use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Human-readable events on stderr, filtered by `filter` (an `EnvFilter` directive).
pub fn init_tracing(filter: &str) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_new(filter)?;
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_filter(env_filter),
        )
        .try_init()?;
    tracing::debug!(target: "logging", filter, "logging_initialized");
    Ok(())
}
