use uuid::Uuid;

use crate::application::access::Viewer;
use crate::application::dto::SortOrder;
use crate::application::dto::notifications::{NewNotification, NotificationPatch, NotificationSort};
use crate::application::ports::notification_repository::NotificationRepository;
use crate::application::ports::request_repository::RequestRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::references::ensure_request;
use crate::application::use_cases::write_error::{WriteError, optional_required, required};
use crate::domain::maintenance::notification::Notification;

pub struct ListNotifications<'a, R: NotificationRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: NotificationRepository + ?Sized> ListNotifications<'a, R> {
    pub async fn execute(
        &self,
        viewer: &Viewer,
        ordering: SortOrder<NotificationSort>,
    ) -> anyhow::Result<Vec<Notification>> {
        self.repo.list_for(viewer.user_id, ordering).await
    }
}

pub struct GetNotification<'a, R: NotificationRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: NotificationRepository + ?Sized> GetNotification<'a, R> {
    pub async fn execute(&self, viewer: &Viewer, id: Uuid) -> anyhow::Result<Option<Notification>> {
        self.repo.get_for(viewer.user_id, id).await
    }
}

#[derive(Debug, Clone)]
pub struct CreateNotificationInput {
    pub recipient_id: Option<Uuid>,
    pub message: String,
    pub request_id: Option<Uuid>,
}

/// Creates a notification; without an explicit recipient it goes to the caller.
/// A linked request must be visible to the caller.
pub struct CreateNotification<'a, R, U, Q>
where
    R: NotificationRepository + ?Sized,
    U: UserRepository + ?Sized,
    Q: RequestRepository + ?Sized,
{
    pub repo: &'a R,
    pub users: &'a U,
    pub requests: &'a Q,
}

impl<'a, R, U, Q> CreateNotification<'a, R, U, Q>
where
    R: NotificationRepository + ?Sized,
    U: UserRepository + ?Sized,
    Q: RequestRepository + ?Sized,
{
    pub async fn execute(
        &self,
        viewer: &Viewer,
        input: CreateNotificationInput,
    ) -> Result<Notification, WriteError> {
        let message = required("message", &input.message)?;
        let recipient_id = input.recipient_id.unwrap_or(viewer.user_id);
        if self.users.find_account(recipient_id).await?.is_none() {
            return Err(WriteError::Invalid("recipient does not exist".into()));
        }
        ensure_request(self.requests, viewer, input.request_id).await?;
        let created = self
            .repo
            .create(&NewNotification {
                recipient_id,
                message,
                request_id: input.request_id,
            })
            .await?;
        Ok(created)
    }
}

pub struct UpdateNotification<'a, R: NotificationRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: NotificationRepository + ?Sized> UpdateNotification<'a, R> {
    pub async fn execute(
        &self,
        viewer: &Viewer,
        id: Uuid,
        patch: NotificationPatch,
    ) -> Result<Notification, WriteError> {
        let patch = NotificationPatch {
            message: optional_required("message", patch.message.as_deref())?,
            is_read: patch.is_read,
        };
        self.repo
            .update_for(viewer.user_id, id, &patch)
            .await?
            .ok_or(WriteError::NotFound)
    }
}

pub struct DeleteNotification<'a, R: NotificationRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: NotificationRepository + ?Sized> DeleteNotification<'a, R> {
    pub async fn execute(&self, viewer: &Viewer, id: Uuid) -> anyhow::Result<bool> {
        self.repo.delete_for(viewer.user_id, id).await
    }
}
