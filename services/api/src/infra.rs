use jobworks::notifications::{MailError, MailMessage, MailTransport};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

impl AppState {
    /// Starts not-ready; `mark_ready` flips the `/ready` probe once the
    /// listener is bound.
    pub(crate) fn new(metrics: PrometheusHandle) -> Self {
        Self {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(metrics),
        }
    }

    pub(crate) fn mark_ready(&self) {
        self.readiness.store(true, Ordering::Release);
    }
}

/// Logs outbound mail instead of delivering it. The serve command wires this
/// in until a real SMTP transport is configured.
pub(crate) struct LogMailer;

impl MailTransport for LogMailer {
    fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        info!(
            to = %message.to.join(", "),
            subject = %message.subject,
            "outbound mail (log transport)"
        );
        Ok(())
    }
}

/// Keeps every message it is asked to deliver so the demo can show what the
/// applicant would have received.
#[derive(Default)]
pub(crate) struct CapturingMailer {
    sent: Mutex<Vec<MailMessage>>,
}

impl CapturingMailer {
    pub(crate) fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().expect("mailbox mutex poisoned").clone()
    }
}

impl MailTransport for CapturingMailer {
    fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        self.sent
            .lock()
            .expect("mailbox mutex poisoned")
            .push(message.clone());
        Ok(())
    }
}

/// Refuses every delivery. Used by the demo to show that a status update
/// survives a broken mail transport.
pub(crate) struct FailingMailer;

impl MailTransport for FailingMailer {
    fn send(&self, _message: &MailMessage) -> Result<(), MailError> {
        Err(MailError::Transport("smtp connection refused".to_string()))
    }
}
