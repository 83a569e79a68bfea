//! Ambient logging setup.
//!
//! The teacher crate wires `tracing_subscriber::fmt` with an `env-filter`
//! in its binaries; this crate does the same, and additionally honors the
//! `DEBUG` environment variable (spec §6) by appending a second sink that
//! writes to a file named `log` in the working directory, mirroring the
//! original C tool's `log_ptr = fopen("log", "a")` diagnostic file.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

/// Guard that must be held for the lifetime of the process for the
/// `DEBUG` file sink to keep flushing.
pub struct LoggingGuard(Option<tracing_appender::non_blocking::WorkerGuard>);

/// Initializes the global tracing subscriber according to `config`.
///
/// Safe to call more than once; subsequent calls are no-ops if a global
/// subscriber is already installed.
pub fn init(config: &Config) -> LoggingGuard {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if config.debug { "debug" } else { "info" }));

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    if config.debug {
        let file_appender = tracing_appender::rolling::never(".", "log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .try_init();

        LoggingGuard(Some(guard))
    } else {
        let _ = tracing_subscriber::registry().with(env_filter).with(stderr_layer).try_init();

        LoggingGuard(None)
    }
}
