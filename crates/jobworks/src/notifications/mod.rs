//! In-app notifications, the status-change emitter, and outbound mail.

pub mod domain;
pub mod emitter;
pub mod mail;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{InboxView, Notification, NotificationId, NotificationKind, NotificationView};
pub use emitter::{EmailDispatch, StatusChange, StatusChangeNotifier};
pub use mail::{strip_tags, MailError, MailMessage, MailTransport};
pub use repository::{NewNotification, NotificationRepository};
pub use service::{NotificationError, NotificationService};
