use uuid::Uuid;

use crate::application::access::Viewer;
use crate::application::dto::notifications::NotificationPatch;
use crate::application::ports::notification_repository::NotificationRepository;

pub struct MarkNotificationRead<'a, R: NotificationRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: NotificationRepository + ?Sized> MarkNotificationRead<'a, R> {
    /// Returns false when the notification does not belong to the viewer.
    pub async fn execute(&self, viewer: &Viewer, id: Uuid) -> anyhow::Result<bool> {
        let patch = NotificationPatch {
            is_read: Some(true),
            ..Default::default()
        };
        Ok(self.repo.update_for(viewer.user_id, id, &patch).await?.is_some())
    }
}
