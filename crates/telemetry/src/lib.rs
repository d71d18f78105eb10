//! Tracing subscriber bootstrap for the bookshelf binaries.

use anyhow::Context;
use bookshelf_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `settings.log_level` when it is set.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => filter_from_directive(&settings.log_level)?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match settings.log_format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|err| anyhow::anyhow!(err))?;

    tracing::debug!(
        target: "bookshelf-telemetry",
        format = ?settings.log_format,
        "tracing subscriber installed"
    );
    Ok(())
}

/// Parse a `tracing` filter directive such as `info` or `bookshelf_app=debug`.
pub fn filter_from_directive(directive: &str) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_new(directive)
        .with_context(|| format!("invalid log level directive '{}'", directive))
}
