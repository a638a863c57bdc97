//! Structured logging infrastructure for didhub.
//!
//! Logging is initialized once from the `[logging]` configuration section,
//! as human-readable lines or as JSON. Either way it is written to stderr so
//! that stdout stays reserved for command output.

use crate::config::LoggingConfig;
use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Build the filter from `RUST_LOG`, falling back to `default_level`.
fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn subscriber<W>(config: &LoggingConfig, writer: W) -> Box<dyn Subscriber + Send + Sync>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let registry = tracing_subscriber::registry().with(env_filter(&config.level));

    if config.json {
        Box::new(registry.with(fmt::layer().json().with_target(true).with_writer(writer)))
    } else {
        Box::new(registry.with(fmt::layer().with_target(true).with_writer(writer)))
    }
}

/// Initialize logging from the `[logging]` configuration section.
///
/// `RUST_LOG` still takes precedence over `config.level`. Calling this more
/// than once is harmless; only the first subscriber is installed.
///
/// # Example
/// ```no_run
/// use didhub_core::{logging, LoggingConfig};
///
/// logging::init_from_config(&LoggingConfig::default());
/// tracing::info!(store = "file", "Registry opened");
/// ```
pub fn init_from_config(config: &LoggingConfig) {
    let _ = subscriber(config, std::io::stderr).try_init();
}
