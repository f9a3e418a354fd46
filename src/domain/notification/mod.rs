// System notification domain module

pub mod system_notification;

pub use system_notification::{NotificationType, SystemNotification};
