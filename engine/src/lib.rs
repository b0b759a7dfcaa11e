//! ReelCut Core Library
//!
//! Timeline editing core of the ReelCut non-linear video editor: the clip and
//! track model, the time-space mapper, the interaction controller, the tool
//! registry, and the command layer over them. Rendering, encoding and the
//! desktop shell live outside this crate.

pub mod core;

use std::path::Path;
use std::sync::OnceLock;

pub use crate::core::{CoreError, CoreResult};

static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// Installs the global tracing subscriber.
///
/// Logs go to stderr, and additionally to a daily-rolling file in `log_dir`
/// when one is given. The filter comes from `RUST_LOG`, defaulting to `info`.
/// Calling this more than once is a no-op.
pub fn init_logging(log_dir: Option<&Path>) {
    use tracing_subscriber::prelude::*;

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(cfg!(debug_assertions));

    // File logging is best effort.
    let file_layer = log_dir.and_then(|dir| {
        std::fs::create_dir_all(dir).ok()?;
        let file_appender = tracing_appender::rolling::daily(dir, "reelcut.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        LOG_GUARD.set(guard).ok()?;
        Some(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
    });

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer);

    // Avoid panics if already initialized (tests, embedding hosts).
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_logging_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let log_dir = dir.path().join("logs");

        init_logging(Some(&log_dir));
        init_logging(None);
        tracing::info!("logging initialised");

        assert!(log_dir.is_dir());
    }
}
