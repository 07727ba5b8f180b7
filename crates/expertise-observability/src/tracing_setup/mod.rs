//! Tracing setup: an `fmt` subscriber filtered by `EXPERTISE_LOG`.

pub mod events;
pub mod spans;

use std::sync::Once;

use tracing_subscriber::EnvFilter;

use expertise_core::config::ObservabilityConfig;

/// Environment variable holding the log filter, e.g. `EXPERTISE_LOG=expertise_retrieval=debug`.
pub const LOG_ENV: &str = "EXPERTISE_LOG";

static INIT: Once = Once::new();

/// Install the global subscriber. `EXPERTISE_LOG` wins over `level` when set.
///
/// Idempotent: only the first call installs anything, and a subscriber
/// installed elsewhere (e.g. by a test harness) is left in place.
pub fn init_tracing(level: &str, json: bool) {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr);
        let installed = if json {
            builder.json().with_thread_ids(true).try_init()
        } else {
            builder.try_init()
        };
        if installed.is_err() {
            tracing::debug!("tracing subscriber already installed");
        }
    });
}

pub fn init_from_config(config: &ObservabilityConfig) {
    init_tracing(&config.log_level, config.json_logs);
}
