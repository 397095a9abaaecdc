use async_trait::async_trait;
use uuid::Uuid;

use crate::application::dto::SortOrder;
use crate::application::dto::notifications::{
    NewNotification, NotificationPatch, NotificationSort,
};
use crate::domain::maintenance::notification::Notification;

/// Reads and writes are keyed by recipient so one user never reaches another's rows.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn list_for(
        &self,
        recipient_id: Uuid,
        ordering: SortOrder<NotificationSort>,
    ) -> anyhow::Result<Vec<Notification>>;
    async fn get_for(&self, recipient_id: Uuid, id: Uuid) -> anyhow::Result<Option<Notification>>;
    async fn create(&self, notification: &NewNotification) -> anyhow::Result<Notification>;
    async fn update_for(
        &self,
        recipient_id: Uuid,
        id: Uuid,
        patch: &NotificationPatch,
    ) -> anyhow::Result<Option<Notification>>;
    async fn delete_for(&self, recipient_id: Uuid, id: Uuid) -> anyhow::Result<bool>;
}
