use std::sync::Arc;

use tracing::warn;

use super::domain::{Notification, NotificationKind};
use super::mail::{strip_tags, MailMessage, MailTransport};
use super::repository::{NewNotification, NotificationRepository};
use crate::applications::{ApplicationId, ApplicationStatus};
use crate::identity::IdentityId;
use crate::store::StoreError;

/// Snapshot of one committed status transition.
///
/// The caller copies these fields out before doing any further record
/// mutation, so the emitter always describes the transition as committed.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub application: ApplicationId,
    pub job_title: String,
    pub company_name: String,
    pub applicant: IdentityId,
    pub applicant_username: String,
    pub applicant_email: String,
    pub employer: IdentityId,
    pub old_status: ApplicationStatus,
    pub new_status: ApplicationStatus,
}

/// Whether the best-effort status email actually went out. The transition
/// itself has already committed either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailDispatch {
    Sent,
    Failed,
}

/// Writes the in-app notifications and sends the applicant email for status
/// transitions.
pub struct StatusChangeNotifier {
    notifications: Arc<dyn NotificationRepository>,
    mailer: Arc<dyn MailTransport>,
    from_address: String,
}

impl StatusChangeNotifier {
    pub fn new(
        notifications: Arc<dyn NotificationRepository>,
        mailer: Arc<dyn MailTransport>,
        from_address: String,
    ) -> Self {
        Self {
            notifications,
            mailer,
            from_address,
        }
    }

    /// Employer-side audit row. Written for every transition, notify or not.
    pub fn record_audit(&self, change: &StatusChange) -> Result<Notification, StoreError> {
        self.notifications.insert_notification(NewNotification {
            owner: change.employer,
            kind: NotificationKind::ApplicationStatus,
            title: "Application Status Updated".to_string(),
            message: format!(
                "You updated {}'s application for {} from {} to {}.",
                change.applicant_username,
                change.job_title,
                change.old_status.headline(),
                change.new_status.headline(),
            ),
            application: Some(change.application),
        })
    }

    /// Best-effort email. A transport failure is logged and reported to the
    /// caller, never propagated as an error.
    pub fn send_status_email(&self, change: &StatusChange) -> EmailDispatch {
        let message = status_update_email(change, &self.from_address);
        match self.mailer.send(&message) {
            Ok(()) => EmailDispatch::Sent,
            Err(err) => {
                warn!(
                    application = change.application.0,
                    recipient = %change.applicant_email,
                    error = %err,
                    "status email failed, continuing without delivery"
                );
                EmailDispatch::Failed
            }
        }
    }

    /// Applicant-facing inbox row confirming the new status.
    pub fn record_applicant_notice(
        &self,
        change: &StatusChange,
    ) -> Result<Notification, StoreError> {
        self.notifications.insert_notification(NewNotification {
            owner: change.applicant,
            kind: NotificationKind::ApplicationStatus,
            title: format!("Application Status Update - {}", change.job_title),
            message: format!(
                "Your application status has been updated to {}.",
                change.new_status.headline()
            ),
            application: Some(change.application),
        })
    }
}

pub(crate) fn status_update_email(change: &StatusChange, from_address: &str) -> MailMessage {
    let mut html = String::new();
    html.push_str("<html><body>\n");
    html.push_str(&format!("<p>Hi {},</p>\n", change.applicant_username));
    html.push_str(&format!(
        "<p>Your application for <strong>{}</strong> at {} has a new status.</p>\n",
        change.job_title, change.company_name
    ));
    html.push_str(&format!(
        "<p>Status changed from <strong>{}</strong> to <strong>{}</strong>.</p>\n",
        change.old_status.headline(),
        change.new_status.headline()
    ));
    html.push_str("<p>Sign in to your dashboard to see the details.</p>\n");
    html.push_str("</body></html>");

    MailMessage {
        subject: format!("Application Status Update - {}", change.job_title),
        plain_body: strip_tags(&html),
        html_body: html,
        from: from_address.to_string(),
        to: vec![change.applicant_email.clone()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::mail::MailError;
    use crate::store::memory::MemoryStore;
    use std::sync::Mutex;

    struct RecordingMailer {
        sent: Mutex<Vec<MailMessage>>,
    }

    impl RecordingMailer {
        fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    impl MailTransport for RecordingMailer {
        fn send(&self, message: &MailMessage) -> Result<(), MailError> {
            self.sent.lock().expect("mailer mutex poisoned").push(message.clone());
            Ok(())
        }
    }

    struct FailingMailer;

    impl MailTransport for FailingMailer {
        fn send(&self, _message: &MailMessage) -> Result<(), MailError> {
            Err(MailError::Transport("smtp refused".to_string()))
        }
    }

    fn change() -> StatusChange {
        StatusChange {
            application: ApplicationId(42),
            job_title: "Backend Engineer".to_string(),
            company_name: "Acme".to_string(),
            applicant: IdentityId(7),
            applicant_username: "dana".to_string(),
            applicant_email: "dana@example.test".to_string(),
            employer: IdentityId(3),
            old_status: ApplicationStatus::Submitted,
            new_status: ApplicationStatus::Shortlisted,
        }
    }

    #[test]
    fn email_carries_subject_recipient_and_both_bodies() {
        let message = status_update_email(&change(), "noreply@jobworks.dev");
        assert_eq!(message.subject, "Application Status Update - Backend Engineer");
        assert_eq!(message.from, "noreply@jobworks.dev");
        assert_eq!(message.to, vec!["dana@example.test".to_string()]);
        assert!(message.html_body.contains("<strong>Submitted</strong>"));
        assert!(message.html_body.contains("<strong>Shortlisted</strong>"));
        assert!(message.plain_body.contains("Status changed from Submitted to Shortlisted."));
        assert!(!message.plain_body.contains('<'));
    }

    #[test]
    fn audit_and_notice_rows_target_the_right_owners() {
        let store = Arc::new(MemoryStore::default());
        let notifier = StatusChangeNotifier::new(
            store.clone(),
            Arc::new(RecordingMailer::new()),
            "noreply@jobworks.dev".to_string(),
        );
        let change = change();

        let audit = notifier.record_audit(&change).expect("audit row");
        assert_eq!(audit.owner, change.employer);
        assert_eq!(audit.kind, NotificationKind::ApplicationStatus);
        assert!(audit.message.contains("from Submitted to Shortlisted"));

        let notice = notifier
            .record_applicant_notice(&change)
            .expect("notice row");
        assert_eq!(notice.owner, change.applicant);
        assert_eq!(notice.title, "Application Status Update - Backend Engineer");
        assert!(notice.message.contains("updated to Shortlisted"));
        assert_eq!(notice.application, Some(change.application));
    }

    #[test]
    fn transport_failure_is_reported_not_raised() {
        let store = Arc::new(MemoryStore::default());
        let notifier = StatusChangeNotifier::new(
            store,
            Arc::new(FailingMailer),
            "noreply@jobworks.dev".to_string(),
        );
        assert_eq!(notifier.send_status_email(&change()), EmailDispatch::Failed);
    }

    #[test]
    fn successful_send_is_recorded() {
        let store = Arc::new(MemoryStore::default());
        let mailer = Arc::new(RecordingMailer::new());
        let notifier = StatusChangeNotifier::new(
            store,
            mailer.clone(),
            "noreply@jobworks.dev".to_string(),
        );
        assert_eq!(notifier.send_status_email(&change()), EmailDispatch::Sent);
        let sent = mailer.sent.lock().expect("mailer mutex poisoned");
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, vec!["dana@example.test".to_string()]);
    }
}
