use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging to stderr, keeping stdout free for results.
///
/// The log level comes from the `level` parameter unless the `RUST_LOG`
/// environment variable overrides the whole filter.
pub fn init_logging(level: &str) -> color_eyre::Result<()> {
    let default_filter = format!("strokesim={level},strokesim_core={level}");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    Ok(())
}
