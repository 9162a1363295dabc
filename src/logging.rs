//! Tracing subscriber setup for programs embedding the client.
//!
//! The library itself only emits events; nothing is recorded until the host
//! program installs a subscriber, either its own or the file logger below.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Filter used when neither an explicit directive nor `RUST_LOG` is given.
const DEFAULT_LOG_FILTER: &str = "jira_rpc=info,warn";

/// File name prefix of the daily log files.
const LOG_FILE_PREFIX: &str = "jira-rpc.log";

/// Install a global subscriber writing daily-rotated files into `log_dir`.
///
/// `filter` takes `EnvFilter` directives (e.g. `"jira_rpc=debug"`, usually
/// from [`Settings::log_filter`](crate::config::Settings::log_filter)). When it
/// is `None`, `RUST_LOG` is used, then `jira_rpc=info,warn`.
///
/// Faults reported by the default [`TracingReporter`](crate::api::TracingReporter)
/// end up here at `error` level.
///
/// Writes happen on a background thread. Keep the returned guard alive for
/// the life of the program; dropping it flushes what is still buffered.
///
/// # Errors
///
/// Returns an error if the directory cannot be created, the filter does not
/// parse, or a global subscriber is already installed.
///
/// # Example
///
/// ```no_run
/// use jira_rpc::logging;
///
/// let dir = logging::default_log_directory().expect("no data directory");
/// let _guard = logging::init(&dir, Some("jira_rpc=debug")).expect("logging");
/// ```
pub fn init(log_dir: &Path, filter: Option<&str>) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Could not create log directory {}", log_dir.display()))?;

    let filter = build_filter(filter)?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX));

    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .with(filter);

    tracing::subscriber::set_global_default(subscriber)
        .context("A global tracing subscriber is already installed")?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_dir = %log_dir.display(),
        "jira-rpc logging started"
    );

    Ok(guard)
}

/// The per-user log directory, e.g. `~/.local/share/jira-rpc/logs` on Linux.
///
/// `None` if the platform has no local data directory.
pub fn default_log_directory() -> Option<PathBuf> {
    dirs::data_local_dir().map(|base| base.join("jira-rpc").join("logs"))
}

fn build_filter(directive: Option<&str>) -> anyhow::Result<EnvFilter> {
    match directive {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("Invalid log filter '{}'", directive)),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_directory_has_expected_structure() {
        if let Some(dir) = default_log_directory() {
            assert!(dir.ends_with("jira-rpc/logs"));
        }
    }

    #[test]
    fn test_explicit_filter_wins() {
        let filter = build_filter(Some("jira_rpc=debug")).unwrap();
        assert_eq!(filter.to_string(), "jira_rpc=debug");
    }

    #[test]
    fn test_invalid_filter_is_rejected() {
        let err = build_filter(Some("jira_rpc=loud")).unwrap_err();
        assert!(err.to_string().contains("jira_rpc=loud"));
    }

    // The only test that installs the global subscriber.
    #[test]
    fn test_init_creates_directory_and_installs_once() {
        let temp = tempfile::tempdir().unwrap();
        let log_dir = temp.path().join("nested").join("logs");

        let guard = init(&log_dir, Some("jira_rpc=debug")).unwrap();
        assert!(log_dir.is_dir());

        assert!(init(&log_dir, None).is_err());
        drop(guard);
    }
}
