//! Tracing bootstrap for applications embedding the engine

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingSettings;

/// Initialize tracing/logging
///
/// `RUST_LOG` wins over the configured level. Returns `false` when a global
/// subscriber was already installed.
pub fn init_tracing(settings: &LoggingSettings) -> bool {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "rentflow_core={},rentflow_pricing={}",
            settings.level, settings.level
        ))
    });

    let registry = tracing_subscriber::registry().with(env_filter);

    if settings.json {
        registry
            .with(fmt::layer().json().with_target(true))
            .try_init()
            .is_ok()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()
            .is_ok()
    }
}
