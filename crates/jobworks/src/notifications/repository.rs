use super::domain::{Notification, NotificationId, NotificationKind};
use crate::applications::ApplicationId;
use crate::identity::IdentityId;
use crate::store::StoreError;

/// Insert payload; the store assigns the id, `created_at`, and starts the
/// row unread.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub owner: IdentityId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub application: Option<ApplicationId>,
}

pub trait NotificationRepository: Send + Sync {
    fn insert_notification(&self, new: NewNotification) -> Result<Notification, StoreError>;

    fn find_notification(&self, id: NotificationId)
        -> Result<Option<Notification>, StoreError>;

    /// One identity's notifications, newest first.
    fn list_notifications_for(
        &self,
        owner: IdentityId,
    ) -> Result<Vec<Notification>, StoreError>;

    /// Idempotent; flipping an already-read row is a no-op. Missing rows are
    /// [`StoreError::NotFound`].
    fn mark_notification_read(&self, id: NotificationId) -> Result<(), StoreError>;

    /// Returns how many rows were unread before the sweep.
    fn mark_all_notifications_read(&self, owner: IdentityId) -> Result<usize, StoreError>;

    fn count_unread_notifications(&self, owner: IdentityId) -> Result<usize, StoreError>;
}
