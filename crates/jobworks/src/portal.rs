//! Composition root: wires stores and services together and exposes the
//! full HTTP surface.

use std::sync::Arc;

use axum::Router;

use crate::admin::{self, default_ordering, SectionOrdering};
use crate::applications::repository::ApplicationRepository;
use crate::applications::ApplicationService;
use crate::catalog::repository::{CompanyRepository, JobRepository, SavedJobRepository};
use crate::catalog::CatalogService;
use crate::dashboard::{self, DashboardService};
use crate::identity::repository::IdentityRepository;
use crate::identity::{Guard, IdentityService};
use crate::notifications::repository::NotificationRepository;
use crate::notifications::{MailTransport, NotificationService, StatusChangeNotifier};
use crate::store::memory::MemoryStore;

/// One handle per repository seam. A single store value may sit behind all
/// of them, as [`PortalStores::from_memory`] arranges.
#[derive(Clone)]
pub struct PortalStores {
    pub identities: Arc<dyn IdentityRepository>,
    pub companies: Arc<dyn CompanyRepository>,
    pub jobs: Arc<dyn JobRepository>,
    pub saved_jobs: Arc<dyn SavedJobRepository>,
    pub applications: Arc<dyn ApplicationRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
}

impl PortalStores {
    pub fn from_memory(store: &Arc<MemoryStore>) -> Self {
        Self {
            identities: store.clone(),
            companies: store.clone(),
            jobs: store.clone(),
            saved_jobs: store.clone(),
            applications: store.clone(),
            notifications: store.clone(),
        }
    }
}

/// Shared state behind every route.
pub struct Portal {
    pub guard: Guard,
    pub identity: IdentityService,
    pub catalog: CatalogService,
    pub applications: ApplicationService,
    pub notifications: NotificationService,
    pub dashboard: DashboardService,
    pub admin_ordering: SectionOrdering,
}

impl Portal {
    pub fn new(
        stores: PortalStores,
        mailer: Arc<dyn MailTransport>,
        mail_from: String,
    ) -> Self {
        let notifier =
            StatusChangeNotifier::new(stores.notifications.clone(), mailer, mail_from);
        Self {
            guard: Guard::new(stores.identities.clone()),
            identity: IdentityService::new(stores.identities.clone()),
            catalog: CatalogService::new(
                stores.companies.clone(),
                stores.jobs.clone(),
                stores.saved_jobs.clone(),
                stores.applications.clone(),
                stores.identities.clone(),
            ),
            applications: ApplicationService::new(
                stores.applications.clone(),
                stores.jobs.clone(),
                stores.companies.clone(),
                stores.identities.clone(),
                notifier,
            ),
            notifications: NotificationService::new(stores.notifications.clone()),
            dashboard: DashboardService::new(
                stores.identities.clone(),
                stores.companies.clone(),
                stores.jobs.clone(),
                stores.saved_jobs.clone(),
                stores.applications.clone(),
                stores.notifications,
            ),
            admin_ordering: default_ordering(),
        }
    }
}

/// The complete `/api/v1` surface with `portal` as its shared state.
pub fn api_router(portal: Arc<Portal>) -> Router {
    Router::new()
        .merge(crate::identity::router::routes())
        .merge(crate::catalog::router::routes())
        .merge(crate::applications::router::routes())
        .merge(crate::notifications::router::routes())
        .merge(dashboard::routes())
        .merge(admin::routes())
        .with_state(portal)
}
