use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::Utc;

use super::StoreError;
use crate::applications::domain::{Application, ApplicationId, ApplicationStatus};
use crate::applications::repository::{ApplicationRepository, NewApplication};
use crate::catalog::domain::{Company, CompanyId, Job, JobId, SavedJob, SavedJobId};
use crate::catalog::repository::{
    CompanyRepository, JobRepository, NewCompany, NewJob, SavedJobRepository,
};
use crate::identity::domain::{EmployerProfile, Identity, IdentityId, JobSeekerProfile};
use crate::identity::repository::{IdentityRepository, NewIdentity};
use crate::notifications::domain::{Notification, NotificationId};
use crate::notifications::repository::{NewNotification, NotificationRepository};

/// In-memory store backing the API binary, the demo walkthrough, and the
/// tests. Implements every repository trait in the crate over mutex-guarded
/// tables.
///
/// A single sequence hands out ids, so ids are unique across record kinds
/// and insertion order matches id order within any one table.
#[derive(Default)]
pub struct MemoryStore {
    sequence: AtomicU64,
    identities: Mutex<HashMap<IdentityId, Identity>>,
    job_seeker_profiles: Mutex<HashMap<IdentityId, JobSeekerProfile>>,
    employer_profiles: Mutex<HashMap<IdentityId, EmployerProfile>>,
    companies: Mutex<HashMap<CompanyId, Company>>,
    jobs: Mutex<HashMap<JobId, Job>>,
    saved_jobs: Mutex<HashMap<SavedJobId, SavedJob>>,
    applications: Mutex<HashMap<ApplicationId, Application>>,
    notifications: Mutex<HashMap<NotificationId, Notification>>,
}

impl MemoryStore {
    fn next_id(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl IdentityRepository for MemoryStore {
    fn insert_identity(&self, new: NewIdentity) -> Result<Identity, StoreError> {
        let mut identities = self.identities.lock().expect("store mutex poisoned");
        if identities
            .values()
            .any(|existing| existing.username == new.username)
        {
            return Err(StoreError::Conflict);
        }
        let identity = Identity {
            id: IdentityId(self.next_id()),
            username: new.username,
            email: new.email,
            role: new.role,
            phone: new.phone,
            joined_at: Utc::now(),
        };
        identities.insert(identity.id, identity.clone());
        Ok(identity)
    }

    fn find_identity(&self, id: IdentityId) -> Result<Option<Identity>, StoreError> {
        Ok(self
            .identities
            .lock()
            .expect("store mutex poisoned")
            .get(&id)
            .cloned())
    }

    fn find_identity_by_username(&self, username: &str) -> Result<Option<Identity>, StoreError> {
        Ok(self
            .identities
            .lock()
            .expect("store mutex poisoned")
            .values()
            .find(|identity| identity.username == username)
            .cloned())
    }

    fn update_contact(
        &self,
        id: IdentityId,
        email: String,
        phone: Option<String>,
    ) -> Result<Identity, StoreError> {
        let mut identities = self.identities.lock().expect("store mutex poisoned");
        let identity = identities.get_mut(&id).ok_or(StoreError::NotFound)?;
        identity.email = email;
        identity.phone = phone;
        Ok(identity.clone())
    }

    fn list_identities(&self) -> Result<Vec<Identity>, StoreError> {
        let mut rows: Vec<Identity> = self
            .identities
            .lock()
            .expect("store mutex poisoned")
            .values()
            .cloned()
            .collect();
        rows.sort_by_key(|identity| Reverse((identity.joined_at, identity.id)));
        Ok(rows)
    }

    fn job_seeker_profile(
        &self,
        id: IdentityId,
    ) -> Result<Option<JobSeekerProfile>, StoreError> {
        Ok(self
            .job_seeker_profiles
            .lock()
            .expect("store mutex poisoned")
            .get(&id)
            .cloned())
    }

    fn save_job_seeker_profile(
        &self,
        id: IdentityId,
        profile: JobSeekerProfile,
    ) -> Result<(), StoreError> {
        self.job_seeker_profiles
            .lock()
            .expect("store mutex poisoned")
            .insert(id, profile);
        Ok(())
    }

    fn employer_profile(&self, id: IdentityId) -> Result<Option<EmployerProfile>, StoreError> {
        Ok(self
            .employer_profiles
            .lock()
            .expect("store mutex poisoned")
            .get(&id)
            .cloned())
    }

    fn save_employer_profile(
        &self,
        id: IdentityId,
        profile: EmployerProfile,
    ) -> Result<(), StoreError> {
        self.employer_profiles
            .lock()
            .expect("store mutex poisoned")
            .insert(id, profile);
        Ok(())
    }
}

impl CompanyRepository for MemoryStore {
    // Company names are not constrained; two employers may register the
    // same name and get separate rows.
    fn insert_company(&self, new: NewCompany) -> Result<Company, StoreError> {
        let mut companies = self.companies.lock().expect("store mutex poisoned");
        let company = Company {
            id: CompanyId(self.next_id()),
            name: new.name,
            description: new.description,
            website: new.website,
            logo: new.logo,
            created_at: Utc::now(),
        };
        companies.insert(company.id, company.clone());
        Ok(company)
    }

    fn find_company(&self, id: CompanyId) -> Result<Option<Company>, StoreError> {
        Ok(self
            .companies
            .lock()
            .expect("store mutex poisoned")
            .get(&id)
            .cloned())
    }

    fn find_company_by_name(&self, name: &str) -> Result<Option<Company>, StoreError> {
        Ok(self
            .companies
            .lock()
            .expect("store mutex poisoned")
            .values()
            .find(|company| company.name == name)
            .cloned())
    }

    fn list_companies(&self) -> Result<Vec<Company>, StoreError> {
        let mut rows: Vec<Company> = self
            .companies
            .lock()
            .expect("store mutex poisoned")
            .values()
            .cloned()
            .collect();
        rows.sort_by_key(|company| Reverse((company.created_at, company.id)));
        Ok(rows)
    }
}

impl JobRepository for MemoryStore {
    fn insert_job(&self, new: NewJob) -> Result<Job, StoreError> {
        let now = Utc::now();
        let job = Job {
            id: JobId(self.next_id()),
            title: new.title,
            company: new.company,
            owner: new.owner,
            description: new.description,
            requirements: new.requirements,
            location: new.location,
            job_type: new.job_type,
            experience_level: new.experience_level,
            salary: new.salary,
            application_deadline: new.application_deadline,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.jobs
            .lock()
            .expect("store mutex poisoned")
            .insert(job.id, job.clone());
        Ok(job)
    }

    fn update_job(&self, job: Job) -> Result<(), StoreError> {
        let mut jobs = self.jobs.lock().expect("store mutex poisoned");
        if !jobs.contains_key(&job.id) {
            return Err(StoreError::NotFound);
        }
        jobs.insert(job.id, job);
        Ok(())
    }

    fn find_job(&self, id: JobId) -> Result<Option<Job>, StoreError> {
        Ok(self
            .jobs
            .lock()
            .expect("store mutex poisoned")
            .get(&id)
            .cloned())
    }

    fn list_jobs(&self) -> Result<Vec<Job>, StoreError> {
        let mut rows: Vec<Job> = self
            .jobs
            .lock()
            .expect("store mutex poisoned")
            .values()
            .cloned()
            .collect();
        rows.sort_by_key(|job| Reverse((job.created_at, job.id)));
        Ok(rows)
    }

    fn list_jobs_owned_by(&self, owner: IdentityId) -> Result<Vec<Job>, StoreError> {
        let mut rows: Vec<Job> = self
            .jobs
            .lock()
            .expect("store mutex poisoned")
            .values()
            .filter(|job| job.owner == owner)
            .cloned()
            .collect();
        rows.sort_by_key(|job| Reverse((job.created_at, job.id)));
        Ok(rows)
    }
}

impl SavedJobRepository for MemoryStore {
    fn insert_saved_job(&self, job: JobId, user: IdentityId) -> Result<SavedJob, StoreError> {
        let mut saved = self.saved_jobs.lock().expect("store mutex poisoned");
        if saved
            .values()
            .any(|existing| existing.job == job && existing.user == user)
        {
            return Err(StoreError::Conflict);
        }
        let bookmark = SavedJob {
            id: SavedJobId(self.next_id()),
            job,
            user,
            saved_at: Utc::now(),
        };
        saved.insert(bookmark.id, bookmark.clone());
        Ok(bookmark)
    }

    fn saved_job_exists(&self, job: JobId, user: IdentityId) -> Result<bool, StoreError> {
        Ok(self
            .saved_jobs
            .lock()
            .expect("store mutex poisoned")
            .values()
            .any(|existing| existing.job == job && existing.user == user))
    }

    fn delete_saved_job(&self, job: JobId, user: IdentityId) -> Result<bool, StoreError> {
        let mut saved = self.saved_jobs.lock().expect("store mutex poisoned");
        let id = saved
            .values()
            .find(|existing| existing.job == job && existing.user == user)
            .map(|existing| existing.id);
        match id {
            Some(id) => {
                saved.remove(&id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn list_saved_jobs_for(&self, user: IdentityId) -> Result<Vec<SavedJob>, StoreError> {
        let mut rows: Vec<SavedJob> = self
            .saved_jobs
            .lock()
            .expect("store mutex poisoned")
            .values()
            .filter(|bookmark| bookmark.user == user)
            .cloned()
            .collect();
        rows.sort_by_key(|bookmark| Reverse((bookmark.saved_at, bookmark.id)));
        Ok(rows)
    }

    fn count_saved_jobs_for(&self, user: IdentityId) -> Result<usize, StoreError> {
        Ok(self
            .saved_jobs
            .lock()
            .expect("store mutex poisoned")
            .values()
            .filter(|bookmark| bookmark.user == user)
            .count())
    }
}

impl ApplicationRepository for MemoryStore {
    fn insert_application(&self, new: NewApplication) -> Result<Application, StoreError> {
        let mut applications = self.applications.lock().expect("store mutex poisoned");
        if applications
            .values()
            .any(|existing| existing.job == new.job && existing.applicant == new.applicant)
        {
            return Err(StoreError::Conflict);
        }
        let now = Utc::now();
        let application = Application {
            id: ApplicationId(self.next_id()),
            job: new.job,
            applicant: new.applicant,
            cover_letter: new.cover_letter,
            resume: new.resume,
            applied_at: now,
            status: ApplicationStatus::Submitted,
            notes: String::new(),
            employer_notes: String::new(),
            last_status_update: now,
            notified_at: None,
        };
        applications.insert(application.id, application.clone());
        Ok(application)
    }

    fn update_application(&self, application: Application) -> Result<(), StoreError> {
        let mut applications = self.applications.lock().expect("store mutex poisoned");
        if !applications.contains_key(&application.id) {
            return Err(StoreError::NotFound);
        }
        applications.insert(application.id, application);
        Ok(())
    }

    fn find_application(&self, id: ApplicationId) -> Result<Option<Application>, StoreError> {
        Ok(self
            .applications
            .lock()
            .expect("store mutex poisoned")
            .get(&id)
            .cloned())
    }

    fn has_applied(&self, job: JobId, applicant: IdentityId) -> Result<bool, StoreError> {
        Ok(self
            .applications
            .lock()
            .expect("store mutex poisoned")
            .values()
            .any(|existing| existing.job == job && existing.applicant == applicant))
    }

    fn list_applications_for_job(&self, job: JobId) -> Result<Vec<Application>, StoreError> {
        let mut rows: Vec<Application> = self
            .applications
            .lock()
            .expect("store mutex poisoned")
            .values()
            .filter(|application| application.job == job)
            .cloned()
            .collect();
        rows.sort_by_key(|application| Reverse((application.applied_at, application.id)));
        Ok(rows)
    }

    fn list_applications_by_applicant(
        &self,
        applicant: IdentityId,
    ) -> Result<Vec<Application>, StoreError> {
        let mut rows: Vec<Application> = self
            .applications
            .lock()
            .expect("store mutex poisoned")
            .values()
            .filter(|application| application.applicant == applicant)
            .cloned()
            .collect();
        rows.sort_by_key(|application| Reverse((application.applied_at, application.id)));
        Ok(rows)
    }

    fn count_applications_for_job(&self, job: JobId) -> Result<usize, StoreError> {
        Ok(self
            .applications
            .lock()
            .expect("store mutex poisoned")
            .values()
            .filter(|application| application.job == job)
            .count())
    }

    fn list_applications(&self) -> Result<Vec<Application>, StoreError> {
        let mut rows: Vec<Application> = self
            .applications
            .lock()
            .expect("store mutex poisoned")
            .values()
            .cloned()
            .collect();
        rows.sort_by_key(|application| Reverse((application.applied_at, application.id)));
        Ok(rows)
    }
}

impl NotificationRepository for MemoryStore {
    fn insert_notification(&self, new: NewNotification) -> Result<Notification, StoreError> {
        let notification = Notification {
            id: NotificationId(self.next_id()),
            owner: new.owner,
            kind: new.kind,
            title: new.title,
            message: new.message,
            application: new.application,
            is_read: false,
            created_at: Utc::now(),
        };
        self.notifications
            .lock()
            .expect("store mutex poisoned")
            .insert(notification.id, notification.clone());
        Ok(notification)
    }

    fn find_notification(
        &self,
        id: NotificationId,
    ) -> Result<Option<Notification>, StoreError> {
        Ok(self
            .notifications
            .lock()
            .expect("store mutex poisoned")
            .get(&id)
            .cloned())
    }

    fn list_notifications_for(
        &self,
        owner: IdentityId,
    ) -> Result<Vec<Notification>, StoreError> {
        let mut rows: Vec<Notification> = self
            .notifications
            .lock()
            .expect("store mutex poisoned")
            .values()
            .filter(|notification| notification.owner == owner)
            .cloned()
            .collect();
        rows.sort_by_key(|notification| Reverse((notification.created_at, notification.id)));
        Ok(rows)
    }

    fn mark_notification_read(&self, id: NotificationId) -> Result<(), StoreError> {
        let mut notifications = self.notifications.lock().expect("store mutex poisoned");
        let notification = notifications.get_mut(&id).ok_or(StoreError::NotFound)?;
        notification.is_read = true;
        Ok(())
    }

    fn mark_all_notifications_read(&self, owner: IdentityId) -> Result<usize, StoreError> {
        let mut notifications = self.notifications.lock().expect("store mutex poisoned");
        let mut flipped = 0;
        for notification in notifications.values_mut() {
            if notification.owner == owner && !notification.is_read {
                notification.is_read = true;
                flipped += 1;
            }
        }
        Ok(flipped)
    }

    fn count_unread_notifications(&self, owner: IdentityId) -> Result<usize, StoreError> {
        Ok(self
            .notifications
            .lock()
            .expect("store mutex poisoned")
            .values()
            .filter(|notification| notification.owner == owner && !notification.is_read)
            .count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::domain::{ExperienceLevel, JobType};
    use crate::identity::Role;
    use chrono::Duration;

    fn store() -> MemoryStore {
        MemoryStore::default()
    }

    fn identity(store: &MemoryStore, username: &str, role: Role) -> Identity {
        store
            .insert_identity(NewIdentity {
                username: username.to_string(),
                email: format!("{username}@example.test"),
                role,
                phone: None,
            })
            .expect("insert identity")
    }

    fn job(store: &MemoryStore, owner: &Identity, company: CompanyId, title: &str) -> Job {
        store
            .insert_job(NewJob {
                title: title.to_string(),
                company,
                owner: owner.id,
                description: "desc".to_string(),
                requirements: "reqs".to_string(),
                location: "Berlin".to_string(),
                job_type: JobType::FullTime,
                experience_level: ExperienceLevel::Mid,
                salary: None,
                application_deadline: Utc::now() + Duration::days(30),
            })
            .expect("insert job")
    }

    #[test]
    fn usernames_are_unique() {
        let store = store();
        identity(&store, "dana", Role::JobSeeker);
        let err = store
            .insert_identity(NewIdentity {
                username: "dana".to_string(),
                email: "other@example.test".to_string(),
                role: Role::Employer,
                phone: None,
            })
            .expect_err("duplicate username");
        assert!(matches!(err, StoreError::Conflict));
    }

    #[test]
    fn one_application_per_job_and_applicant() {
        let store = store();
        let hr = identity(&store, "acme-hr", Role::Employer);
        let dana = identity(&store, "dana", Role::JobSeeker);
        let posting = job(&store, &hr, CompanyId(99), "Backend Engineer");

        let new = |letter: &str| NewApplication {
            job: posting.id,
            applicant: dana.id,
            cover_letter: letter.to_string(),
            resume: "resumes/dana.pdf".to_string(),
        };
        let first = store.insert_application(new("hello")).expect("first");
        assert_eq!(first.status, ApplicationStatus::Submitted);
        assert_eq!(first.applied_at, first.last_status_update);
        assert!(first.notified_at.is_none());

        let err = store.insert_application(new("again")).expect_err("dup");
        assert!(matches!(err, StoreError::Conflict));
    }

    #[test]
    fn updates_against_missing_rows_are_reported() {
        let store = store();
        let hr = identity(&store, "acme-hr", Role::Employer);
        let posting = job(&store, &hr, CompanyId(99), "Backend Engineer");

        let mut ghost = posting.clone();
        ghost.id = JobId(4242);
        assert!(matches!(
            store.update_job(ghost).expect_err("missing job"),
            StoreError::NotFound
        ));
        assert!(matches!(
            store
                .mark_notification_read(NotificationId(4242))
                .expect_err("missing notification"),
            StoreError::NotFound
        ));
    }

    #[test]
    fn listings_come_back_newest_first() {
        let store = store();
        let hr = identity(&store, "acme-hr", Role::Employer);
        let first = job(&store, &hr, CompanyId(99), "First");
        let second = job(&store, &hr, CompanyId(99), "Second");
        let third = job(&store, &hr, CompanyId(99), "Third");

        let listed: Vec<JobId> = store
            .list_jobs()
            .expect("list")
            .into_iter()
            .map(|job| job.id)
            .collect();
        assert_eq!(listed, vec![third.id, second.id, first.id]);
    }

    #[test]
    fn saved_job_delete_reports_whether_anything_was_removed() {
        let store = store();
        let hr = identity(&store, "acme-hr", Role::Employer);
        let dana = identity(&store, "dana", Role::JobSeeker);
        let posting = job(&store, &hr, CompanyId(99), "Backend Engineer");

        store
            .insert_saved_job(posting.id, dana.id)
            .expect("bookmark");
        assert!(store
            .saved_job_exists(posting.id, dana.id)
            .expect("exists check"));
        assert!(store
            .delete_saved_job(posting.id, dana.id)
            .expect("first delete"));
        assert!(!store
            .delete_saved_job(posting.id, dana.id)
            .expect("second delete"));
    }
}
