use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::config::LogLevel;
use crate::error::{WorkStudyError, WorkStudyResult};

/// filter_directive builds the default filter for the given level.
///
/// OpenCV bindings only report warnings and above.
pub fn filter_directive(level: &LogLevel) -> String {
    format!("{},opencv=warn", level.as_str())
}

/// init_logging installs the global console subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
/// Fails if a global subscriber is already set.
pub fn init_logging(level: &LogLevel) -> WorkStudyResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(level)));

    let console_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(true)
        .with_thread_ids(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .try_init()
        .map_err(|e| WorkStudyError::Logging(e.to_string()))
}
