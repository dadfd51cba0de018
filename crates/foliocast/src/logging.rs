//! Tracing setup for the CLI host.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging to stderr.
///
/// The default level applies to the foliocast crates; `RUST_LOG` overrides
/// the whole filter when set.
pub fn init_logging(level: &str) -> color_eyre::Result<()> {
    let default_filter = format!("foliocast={level},foliocast_core=warn");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .init();

    Ok(())
}
