//! The fault reporting channel.
//!
//! Every fault raised while invoking a remote procedure goes through a
//! [`FaultReporter`] exactly once before the error is handed back to the
//! caller. The default reporter writes it to the tracing log.

use std::sync::Arc;

use tracing::error;

use super::error::ApiError;

/// Receives every fault raised while invoking a remote procedure.
pub trait FaultReporter: Send + Sync {
    /// Report a fault raised by `procedure`.
    fn report(&self, procedure: &str, fault: &ApiError);
}

/// Logs faults at `error` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl FaultReporter for TracingReporter {
    fn report(&self, procedure: &str, fault: &ApiError) {
        error!(procedure, auth_fault = fault.is_auth_fault(), "{}", fault);
    }
}

impl<F> FaultReporter for F
where
    F: Fn(&str, &ApiError) + Send + Sync,
{
    fn report(&self, procedure: &str, fault: &ApiError) {
        self(procedure, fault)
    }
}

/// A shared reporter handle.
pub type SharedReporter = Arc<dyn FaultReporter>;


#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::api::transport::TransportFault;

    #[test]
    fn test_closure_reporter() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let reporter: SharedReporter = Arc::new(move |procedure: &str, _fault: &ApiError| {
            assert_eq!(procedure, "getIssue");
            seen.fetch_add(1, Ordering::SeqCst);
        });

        reporter.report("getIssue", &TransportFault::malformed("x").into());

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_recording_reporter_keeps_message() {
        let reporter = recording::RecordingReporter::new();
        reporter.report("getStatuses", &TransportFault::remote(3, "down").into());

        assert_eq!(
            reporter.faults(),
            vec![("getStatuses".to_string(), "Remote fault 3: down".to_string())]
        );
    }

    #[test]
    fn test_tracing_reporter_does_not_panic_without_subscriber() {
        TracingReporter.report("getPriorities", &TransportFault::malformed("x").into());
    }
}
