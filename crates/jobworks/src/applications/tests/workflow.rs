use std::sync::Arc;

use chrono::Utc;

use super::common::*;
use crate::applications::domain::ApplicationStatus;
use crate::applications::repository::ApplicationRepository;
use crate::applications::ApplicationError;
use crate::identity::Role;
use crate::notifications::repository::NotificationRepository;
use crate::notifications::{EmailDispatch, NotificationKind};

#[test]
fn notify_produces_audit_notice_email_and_timestamp() {
    let store = store();
    let mailer = Arc::new(RecordingMailer::default());
    let service = service(&store, mailer.clone());
    let employer = identity(&store, "acme-hr", Role::Employer);
    let seeker = identity(&store, "dana", Role::JobSeeker);
    let acme = company(&store, "Acme");
    let posting = job(&store, &employer, &acme, "Backend Engineer");
    let filed = application(&store, &posting, &seeker);

    let now = Utc::now();
    let outcome = service
        .update_status(
            &employer,
            filed.id,
            update("shortlisted", "Strong portfolio", true),
            now,
        )
        .expect("update succeeds");

    assert!(outcome.notified());
    assert_eq!(outcome.old_status, ApplicationStatus::Submitted);
    assert_eq!(outcome.application.status, ApplicationStatus::Shortlisted);
    assert_eq!(outcome.application.employer_notes, "Strong portfolio");
    assert_eq!(outcome.application.last_status_update, now);
    assert_eq!(outcome.application.notified_at, Some(now));
    assert_eq!(outcome.email, Some(EmailDispatch::Sent));

    let audit = &outcome.audit;
    assert_eq!(audit.owner, employer.id);
    assert_eq!(audit.kind, NotificationKind::ApplicationStatus);
    assert!(audit.message.contains("from Submitted to Shortlisted"));

    let notice = outcome.applicant_notice.as_ref().expect("notice row");
    assert_eq!(notice.owner, seeker.id);
    assert!(notice.title.contains("Backend Engineer"));

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, vec!["dana@example.test".to_string()]);

    let stored = store
        .find_application(filed.id)
        .expect("find")
        .expect("exists");
    assert_eq!(stored.status, ApplicationStatus::Shortlisted);
    assert_eq!(stored.notified_at, Some(now));
}

#[test]
fn without_notify_only_the_audit_row_is_written() {
    let store = store();
    let mailer = Arc::new(RecordingMailer::default());
    let service = service(&store, mailer.clone());
    let employer = identity(&store, "acme-hr", Role::Employer);
    let seeker = identity(&store, "dana", Role::JobSeeker);
    let acme = company(&store, "Acme");
    let posting = job(&store, &employer, &acme, "Backend Engineer");
    let filed = application(&store, &posting, &seeker);

    let outcome = service
        .update_status(
            &employer,
            filed.id,
            update("under_review", "", false),
            Utc::now(),
        )
        .expect("update succeeds");

    assert!(!outcome.notified());
    assert!(outcome.email.is_none());
    assert!(outcome.application.notified_at.is_none());
    assert!(mailer.sent().is_empty());
    assert_eq!(
        store
            .list_notifications_for(employer.id)
            .expect("employer rows")
            .len(),
        1
    );
    assert!(store
        .list_notifications_for(seeker.id)
        .expect("seeker rows")
        .is_empty());
}

#[test]
fn mail_failure_never_blocks_the_transition() {
    let store = store();
    let service = service(&store, Arc::new(FailingMailer));
    let employer = identity(&store, "acme-hr", Role::Employer);
    let seeker = identity(&store, "dana", Role::JobSeeker);
    let acme = company(&store, "Acme");
    let posting = job(&store, &employer, &acme, "Backend Engineer");
    let filed = application(&store, &posting, &seeker);

    let now = Utc::now();
    let outcome = service
        .update_status(&employer, filed.id, update("accepted", "", true), now)
        .expect("update succeeds despite mail failure");

    assert_eq!(outcome.email, Some(EmailDispatch::Failed));
    assert!(outcome.notified());
    assert_eq!(outcome.application.notified_at, Some(now));

    let stored = store
        .find_application(filed.id)
        .expect("find")
        .expect("exists");
    assert_eq!(stored.status, ApplicationStatus::Accepted);
    assert_eq!(stored.notified_at, Some(now));
    assert_eq!(
        store
            .list_notifications_for(seeker.id)
            .expect("seeker rows")
            .len(),
        1
    );
}

#[test]
fn unknown_status_leaves_the_record_untouched() {
    let store = store();
    let service = service(&store, Arc::new(RecordingMailer::default()));
    let employer = identity(&store, "acme-hr", Role::Employer);
    let seeker = identity(&store, "dana", Role::JobSeeker);
    let acme = company(&store, "Acme");
    let posting = job(&store, &employer, &acme, "Backend Engineer");
    let filed = application(&store, &posting, &seeker);

    let err = service
        .update_status(
            &employer,
            filed.id,
            update("fast_tracked", "ignored", true),
            Utc::now(),
        )
        .expect_err("unknown status");
    assert!(matches!(err, ApplicationError::UnknownStatus(value) if value == "fast_tracked"));

    let stored = store
        .find_application(filed.id)
        .expect("find")
        .expect("exists");
    assert_eq!(stored.status, ApplicationStatus::Submitted);
    assert_eq!(stored.employer_notes, "");
    assert_eq!(stored.last_status_update, filed.last_status_update);
    assert!(store
        .list_notifications_for(employer.id)
        .expect("rows")
        .is_empty());
}

#[test]
fn case_sensitive_labels_are_the_only_accepted_spelling() {
    let store = store();
    let service = service(&store, Arc::new(RecordingMailer::default()));
    let employer = identity(&store, "acme-hr", Role::Employer);
    let seeker = identity(&store, "dana", Role::JobSeeker);
    let acme = company(&store, "Acme");
    let posting = job(&store, &employer, &acme, "Backend Engineer");
    let filed = application(&store, &posting, &seeker);

    let err = service
        .update_status(
            &employer,
            filed.id,
            update("SHORTLISTED", "", false),
            Utc::now(),
        )
        .expect_err("uppercase label");
    assert!(matches!(err, ApplicationError::UnknownStatus(_)));

    service
        .update_status(
            &employer,
            filed.id,
            update("  shortlisted  ", "", false),
            Utc::now(),
        )
        .expect("surrounding whitespace is tolerated");
}

#[test]
fn non_owner_updates_are_forbidden_and_change_nothing() {
    let store = store();
    let service = service(&store, Arc::new(RecordingMailer::default()));
    let employer = identity(&store, "acme-hr", Role::Employer);
    let rival = identity(&store, "rival-hr", Role::Employer);
    let seeker = identity(&store, "dana", Role::JobSeeker);
    let acme = company(&store, "Acme");
    let posting = job(&store, &employer, &acme, "Backend Engineer");
    let filed = application(&store, &posting, &seeker);

    let err = service
        .update_status(
            &rival,
            filed.id,
            update("rejected", "not ours", true),
            Utc::now(),
        )
        .expect_err("rival update");
    assert!(matches!(err, ApplicationError::NotJobOwner));

    let stored = store
        .find_application(filed.id)
        .expect("find")
        .expect("exists");
    assert_eq!(stored.status, ApplicationStatus::Submitted);
    assert_eq!(stored.employer_notes, "");
    assert!(store
        .list_notifications_for(rival.id)
        .expect("rows")
        .is_empty());
    assert!(store
        .list_notifications_for(seeker.id)
        .expect("rows")
        .is_empty());
}

#[test]
fn later_updates_replace_employer_notes_and_restamp() {
    let store = store();
    let service = service(&store, Arc::new(RecordingMailer::default()));
    let employer = identity(&store, "acme-hr", Role::Employer);
    let seeker = identity(&store, "dana", Role::JobSeeker);
    let acme = company(&store, "Acme");
    let posting = job(&store, &employer, &acme, "Backend Engineer");
    let filed = application(&store, &posting, &seeker);

    let first = Utc::now();
    service
        .update_status(&employer, filed.id, update("under_review", "first pass", false), first)
        .expect("first update");
    let second = first + chrono::Duration::minutes(5);
    let outcome = service
        .update_status(
            &employer,
            filed.id,
            update("interview_scheduled", "panel on Friday", false),
            second,
        )
        .expect("second update");

    assert_eq!(outcome.old_status, ApplicationStatus::UnderReview);
    assert_eq!(outcome.application.employer_notes, "panel on Friday");
    assert_eq!(outcome.application.last_status_update, second);

    // Two transitions, two audit rows.
    assert_eq!(
        store
            .list_notifications_for(employer.id)
            .expect("rows")
            .len(),
        2
    );
}

#[test]
fn any_status_can_move_to_any_other() {
    let store = store();
    let service = service(&store, Arc::new(RecordingMailer::default()));
    let employer = identity(&store, "acme-hr", Role::Employer);
    let seeker = identity(&store, "dana", Role::JobSeeker);
    let acme = company(&store, "Acme");
    let posting = job(&store, &employer, &acme, "Backend Engineer");
    let filed = application(&store, &posting, &seeker);

    // Rejected is not terminal; the workflow allows walking back.
    for label in ["rejected", "submitted", "accepted", "under_review"] {
        service
            .update_status(&employer, filed.id, update(label, "", false), Utc::now())
            .expect("transition allowed");
    }
    let stored = store
        .find_application(filed.id)
        .expect("find")
        .expect("exists");
    assert_eq!(stored.status, ApplicationStatus::UnderReview);
}
