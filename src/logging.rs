//! Process-wide logging setup.
//!
//! On Android entries go to logcat under the configured tag; elsewhere they
//! are formatted to stderr. `log` records from dependencies are bridged into
//! the same subscriber through `tracing`'s `log` feature.

use std::sync::Once;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

static LOGGING_INIT: Once = Once::new();

/// Build the level filter for `config`, falling back to `debug` when the
/// configured directive does not parse.
pub fn level_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_new(&config.level).unwrap_or_else(|err| {
        eprintln!(
            "[{}] invalid log level {:?} ({}), using debug",
            config.tag, config.level, err
        );
        EnvFilter::new("debug")
    })
}

/// Install the global subscriber. Later calls are no-ops, as is a call made
/// after something else already installed a subscriber.
pub fn init_logging(config: &LoggingConfig) {
    LOGGING_INIT.call_once(|| {
        let filter = level_filter(config);

        #[cfg(target_os = "android")]
        let result = match tracing_android::layer(&config.tag) {
            Ok(layer) => tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init(),
            Err(err) => {
                eprintln!("[{}] logcat unavailable: {}", config.tag, err);
                return;
            }
        };

        #[cfg(not(target_os = "android"))]
        let result = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init();

        match result {
            Ok(()) => tracing::debug!(
                tag = %config.tag,
                level = %config.level,
                "logging initialized"
            ),
            Err(err) => eprintln!("[{}] logging already initialized: {}", config.tag, err),
        }
    });
}
