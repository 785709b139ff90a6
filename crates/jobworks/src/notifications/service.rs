use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use super::domain::{InboxView, NotificationId, NotificationKind, NotificationView};
use super::repository::NotificationRepository;
use crate::identity::{AuthError, Identity};
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("notification not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl NotificationError {
    fn status(&self) -> StatusCode {
        match self {
            NotificationError::Auth(err) => err.status(),
            NotificationError::NotFound => StatusCode::NOT_FOUND,
            NotificationError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
            NotificationError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for NotificationError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Per-identity inbox and read-state management.
pub struct NotificationService {
    notifications: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    pub fn new(notifications: Arc<dyn NotificationRepository>) -> Self {
        Self { notifications }
    }

    /// The caller's notifications, newest first, with the bell counters.
    pub fn inbox(&self, caller: &Identity) -> Result<InboxView, NotificationError> {
        let rows = self.notifications.list_notifications_for(caller.id)?;
        let unread_count = rows.iter().filter(|row| !row.is_read).count();
        let count_kind = |kind: NotificationKind| rows.iter().filter(|row| row.kind == kind).count();

        Ok(InboxView {
            unread_count,
            application_status_count: count_kind(NotificationKind::ApplicationStatus),
            interview_count: count_kind(NotificationKind::Interview),
            message_count: count_kind(NotificationKind::Message),
            system_count: count_kind(NotificationKind::System),
            notifications: rows.iter().map(NotificationView::from_notification).collect(),
        })
    }

    /// Marks one of the caller's notifications read. Someone else's row reads
    /// as missing; re-marking a read row is a no-op.
    pub fn mark_read(
        &self,
        caller: &Identity,
        id: NotificationId,
    ) -> Result<NotificationView, NotificationError> {
        let mut notification = self
            .notifications
            .find_notification(id)?
            .ok_or(NotificationError::NotFound)?;
        if notification.owner != caller.id {
            return Err(NotificationError::NotFound);
        }
        self.notifications.mark_notification_read(id)?;
        notification.is_read = true;
        Ok(NotificationView::from_notification(&notification))
    }

    /// Sweeps the caller's unread rows; returns how many were flipped.
    pub fn mark_all_read(&self, caller: &Identity) -> Result<usize, NotificationError> {
        Ok(self.notifications.mark_all_notifications_read(caller.id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applications::ApplicationId;
    use crate::identity::{IdentityRepository, NewIdentity, Role};
    use crate::notifications::repository::NewNotification;
    use crate::store::memory::MemoryStore;

    fn setup() -> (NotificationService, Arc<MemoryStore>, Identity, Identity) {
        let store = Arc::new(MemoryStore::default());
        let dana = store
            .insert_identity(NewIdentity {
                username: "dana".to_string(),
                email: "dana@example.test".to_string(),
                role: Role::JobSeeker,
                phone: None,
            })
            .expect("seed dana");
        let lee = store
            .insert_identity(NewIdentity {
                username: "lee".to_string(),
                email: "lee@example.test".to_string(),
                role: Role::Employer,
                phone: None,
            })
            .expect("seed lee");
        (NotificationService::new(store.clone()), store, dana, lee)
    }

    fn notify(store: &MemoryStore, owner: &Identity, kind: NotificationKind, title: &str) {
        store
            .insert_notification(NewNotification {
                owner: owner.id,
                kind,
                title: title.to_string(),
                message: "hello".to_string(),
                application: Some(ApplicationId(1)),
            })
            .expect("insert notification");
    }

    #[test]
    fn inbox_counts_unread_and_kinds() {
        let (service, store, dana, lee) = setup();
        notify(&store, &dana, NotificationKind::ApplicationStatus, "one");
        notify(&store, &dana, NotificationKind::ApplicationStatus, "two");
        notify(&store, &dana, NotificationKind::System, "three");
        notify(&store, &lee, NotificationKind::Message, "not hers");

        let inbox = service.inbox(&dana).expect("inbox");
        assert_eq!(inbox.notifications.len(), 3);
        assert_eq!(inbox.unread_count, 3);
        assert_eq!(inbox.application_status_count, 2);
        assert_eq!(inbox.system_count, 1);
        assert_eq!(inbox.message_count, 0);
        // Newest first.
        assert_eq!(inbox.notifications[0].title, "three");
    }

    #[test]
    fn mark_read_is_owner_scoped_and_idempotent() {
        let (service, store, dana, lee) = setup();
        notify(&store, &dana, NotificationKind::ApplicationStatus, "hers");
        let id = service.inbox(&dana).expect("inbox").notifications[0].id;

        let view = service.mark_read(&dana, id).expect("marks");
        assert!(view.is_read);
        // Second mark is a quiet no-op.
        service.mark_read(&dana, id).expect("still fine");

        let err = service.mark_read(&lee, id).expect_err("not his row");
        assert!(matches!(err, NotificationError::NotFound));

        let err = service
            .mark_read(&dana, NotificationId(999))
            .expect_err("missing row");
        assert!(matches!(err, NotificationError::NotFound));
    }

    #[test]
    fn mark_all_reports_how_many_flipped() {
        let (service, store, dana, _) = setup();
        notify(&store, &dana, NotificationKind::ApplicationStatus, "one");
        notify(&store, &dana, NotificationKind::System, "two");
        let first = service.inbox(&dana).expect("inbox").notifications[0].id;
        service.mark_read(&dana, first).expect("pre-read one");

        assert_eq!(service.mark_all_read(&dana).expect("sweep"), 1);
        assert_eq!(service.mark_all_read(&dana).expect("repeat sweep"), 0);
        assert_eq!(service.inbox(&dana).expect("inbox").unread_count, 0);
    }
}
