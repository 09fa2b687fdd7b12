//! Tracing initialization. Logs go to stderr so they never mix with the
//! captured output printed on stdout.

use tracing_subscriber::{prelude::*, EnvFilter};

use crate::config::Config;

/// Install the global subscriber. `RUST_LOG` wins over `PYREPL_LOG_LEVEL`.
pub fn init_tracing(cfg: &Config) {
    let level = cfg.get("PYREPL_LOG_LEVEL").unwrap_or_else(|| "warn".into());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    let _ = if cfg.get_bool("PYREPL_LOG_JSON") {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .try_init()
    };
}
