use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::applications::ApplicationId;
use crate::identity::IdentityId;

/// Primary key for a notification record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NotificationId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ApplicationStatus,
    Interview,
    Message,
    System,
}

impl NotificationKind {
    pub const fn label(self) -> &'static str {
        match self {
            NotificationKind::ApplicationStatus => "application_status",
            NotificationKind::Interview => "interview",
            NotificationKind::Message => "message",
            NotificationKind::System => "system",
        }
    }
}

/// An in-app notification owned by one identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub owner: IdentityId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// Present when the notification refers to a specific application.
    pub application: Option<ApplicationId>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Wire shape for one notification row.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationView {
    pub id: NotificationId,
    pub kind: &'static str,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application: Option<ApplicationId>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl NotificationView {
    pub fn from_notification(notification: &Notification) -> Self {
        Self {
            id: notification.id,
            kind: notification.kind.label(),
            title: notification.title.clone(),
            message: notification.message.clone(),
            application: notification.application,
            is_read: notification.is_read,
            created_at: notification.created_at,
        }
    }
}

/// Inbox payload: rows plus the counters the notification bell renders.
#[derive(Debug, Serialize)]
pub struct InboxView {
    pub notifications: Vec<NotificationView>,
    pub unread_count: usize,
    pub application_status_count: usize,
    pub interview_count: usize,
    pub message_count: usize,
    pub system_count: usize,
}
