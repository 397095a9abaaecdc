use uuid::Uuid;

use super::{SortField, SortOrder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationSort {
    CreatedAt,
}

impl SortField for NotificationSort {
    const ALL: &'static [Self] = &[NotificationSort::CreatedAt];

    fn name(&self) -> &'static str {
        match self {
            NotificationSort::CreatedAt => "created_at",
        }
    }
}

pub fn default_notification_order() -> SortOrder<NotificationSort> {
    SortOrder::desc(NotificationSort::CreatedAt)
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub recipient_id: Uuid,
    pub message: String,
    pub request_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct NotificationPatch {
    pub message: Option<String>,
    pub is_read: Option<bool>,
}
