use crate::infra::{CapturingMailer, FailingMailer};
use chrono::{Duration, Utc};
use clap::Args;
use jobworks::applications::{ApplicantFilter, ApplicationForm, StatusUpdateRequest};
use jobworks::catalog::{ExperienceLevel, JobDraft, JobFilter, JobType};
use jobworks::identity::{EmployerProfile, ProfileUpdate, Registration, Role};
use jobworks::notifications::{EmailDispatch, MailTransport};
use jobworks::{AppError, MemoryStore, Portal, PortalStores};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Simulate a broken mail transport during the status update.
    #[arg(long)]
    pub(crate) fail_mail: bool,
    /// Stop after the application is filed, skipping the employer review.
    #[arg(long)]
    pub(crate) skip_review: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        fail_mail,
        skip_review,
    } = args;

    let store = Arc::new(MemoryStore::default());
    let mailbox = Arc::new(CapturingMailer::default());
    let mailer: Arc<dyn MailTransport> = if fail_mail {
        Arc::new(FailingMailer)
    } else {
        mailbox.clone()
    };
    let portal = Portal::new(
        PortalStores::from_memory(&store),
        mailer,
        "noreply@jobworks.dev".to_string(),
    );
    let now = Utc::now();

    println!("JobWorks hiring pipeline demo");
    if fail_mail {
        println!("Mail transport: failing (simulated outage)");
    } else {
        println!("Mail transport: in-memory capture");
    }

    println!("\nEmployer setup");
    let employer = match portal.identity.register(Registration {
        username: "acme-hr".to_string(),
        email: "hr@acme.test".to_string(),
        role: Role::Employer,
        phone: None,
    }) {
        Ok(identity) => identity,
        Err(err) => {
            println!("  Registration rejected: {err}");
            return Ok(());
        }
    };
    println!(
        "- Registered employer '{}' (id {})",
        employer.username, employer.id.0
    );

    let profile = ProfileUpdate {
        email: None,
        phone: None,
        job_seeker: None,
        employer: Some(EmployerProfile {
            company_name: "Acme".to_string(),
            company_description: "We build gadgets.".to_string(),
            company_website: "https://acme.test".to_string(),
            company_logo: None,
            company_size: "50-200".to_string(),
            industry: "Manufacturing".to_string(),
        }),
    };
    if let Err(err) = portal.identity.update_profile(&employer, profile) {
        println!("  Profile update rejected: {err}");
        return Ok(());
    }
    println!("- Completed the Acme company profile");

    let job = match portal.catalog.post_job(
        &employer,
        JobDraft {
            title: "Backend Engineer".to_string(),
            description: "Own the ingestion pipeline end to end.".to_string(),
            requirements: "Rust, PostgreSQL".to_string(),
            location: "Berlin".to_string(),
            job_type: JobType::FullTime,
            experience_level: ExperienceLevel::Mid,
            salary: Some(70_000),
            application_deadline: now + Duration::days(30),
        },
        now,
    ) {
        Ok(job) => job,
        Err(err) => {
            println!("  Posting rejected: {err}");
            return Ok(());
        }
    };
    println!(
        "- Posted '{}' in {} (apply by {})",
        job.title,
        job.location,
        job.application_deadline.format("%Y-%m-%d")
    );

    println!("\nSeeker activity");
    let seeker = match portal.identity.register(Registration {
        username: "dana".to_string(),
        email: "dana@example.test".to_string(),
        role: Role::JobSeeker,
        phone: None,
    }) {
        Ok(identity) => identity,
        Err(err) => {
            println!("  Registration rejected: {err}");
            return Ok(());
        }
    };
    println!("- Registered seeker '{}' (id {})", seeker.username, seeker.id.0);

    let filter = JobFilter {
        query: Some("backend".to_string()),
        ..JobFilter::default()
    };
    match portal.catalog.list_jobs(&filter, now) {
        Ok(listing) => println!(
            "- Searching for 'backend' finds {} posting(s)",
            listing.total
        ),
        Err(err) => println!("  Search unavailable: {err}"),
    }

    let application = match portal.applications.apply(
        &seeker,
        job.id,
        ApplicationForm {
            cover_letter: "I have five years of pipeline experience.".to_string(),
            resume: "resumes/dana.pdf".to_string(),
        },
        now,
    ) {
        Ok(application) => application,
        Err(err) => {
            println!("  Application rejected: {err}");
            return Ok(());
        }
    };
    println!(
        "- Filed application {} -> status {}",
        application.id.0,
        application.status.label()
    );

    if skip_review {
        return Ok(());
    }

    println!("\nEmployer review");
    match portal
        .applications
        .applicants(&employer, job.id, &ApplicantFilter::default())
    {
        Ok(list) => println!("- {} applicant(s) waiting", list.total),
        Err(err) => println!("  Applicant list unavailable: {err}"),
    }

    let outcome = match portal.applications.update_status(
        &employer,
        application.id,
        StatusUpdateRequest {
            status: "shortlisted".to_string(),
            employer_notes: "Strong portfolio, book a call this week.".to_string(),
            notify_applicant: true,
        },
        Utc::now(),
    ) {
        Ok(outcome) => outcome,
        Err(err) => {
            println!("  Status update rejected: {err}");
            return Ok(());
        }
    };
    println!(
        "- Moved '{}' from {} to {}",
        seeker.username,
        outcome.old_status.headline(),
        outcome.application.status.headline()
    );
    println!("  Audit trail: {}", outcome.audit.message);
    match outcome.email {
        Some(EmailDispatch::Sent) => println!("  Applicant email: sent"),
        Some(EmailDispatch::Failed) => {
            println!("  Applicant email: transport failed, status update kept")
        }
        None => println!("  Applicant email: not requested"),
    }
    if let Some(notice) = &outcome.applicant_notice {
        println!("  In-app notice: {}", notice.title);
    }

    for mail in mailbox.sent() {
        println!("  Outbound mail to {}: {}", mail.to.join(", "), mail.subject);
    }

    println!("\nSeeker follow-up");
    match portal.notifications.inbox(&seeker) {
        Ok(inbox) => println!("- Inbox: {} unread notification(s)", inbox.unread_count),
        Err(err) => println!("  Inbox unavailable: {err}"),
    }
    match portal.notifications.mark_all_read(&seeker) {
        Ok(marked) => println!("- Marked {marked} notification(s) as read"),
        Err(err) => println!("  Inbox unavailable: {err}"),
    }

    let record = match portal.applications.detail(&employer, application.id) {
        Ok(view) => view,
        Err(err) => {
            println!("  Record lookup unavailable: {err}");
            return Ok(());
        }
    };
    match serde_json::to_string_pretty(&record) {
        Ok(json) => println!("\nEmployer view of the record:\n{json}"),
        Err(err) => println!("  Record unavailable: {err}"),
    }

    match portal.dashboard.employer_overview(&employer, Utc::now()) {
        Ok(overview) => println!(
            "\nEmployer dashboard: {} posting(s), {} active, {} application(s) total",
            overview.jobs.len(),
            overview.active_jobs,
            overview.total_applications
        ),
        Err(err) => println!("  Dashboard unavailable: {err}"),
    }

    Ok(())
}
