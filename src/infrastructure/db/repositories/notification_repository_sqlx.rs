use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::application::dto::SortOrder;
use crate::application::dto::notifications::{
    NewNotification, NotificationPatch, NotificationSort,
};
use crate::application::ports::notification_repository::NotificationRepository;
use crate::domain::maintenance::notification::Notification;
use crate::infrastructure::db::PgPool;
use crate::infrastructure::db::repositories::order_by;

pub struct SqlxNotificationRepository {
    pub pool: PgPool,
}

impl SqlxNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_notification(r: &PgRow) -> Notification {
    Notification {
        id: r.get("id"),
        recipient_id: r.get("recipient_id"),
        message: r.get("message"),
        request_id: r.get("request_id"),
        is_read: r.get("is_read"),
        created_at: r.get("created_at"),
    }
}

#[async_trait]
impl NotificationRepository for SqlxNotificationRepository {
    async fn list_for(
        &self,
        recipient_id: Uuid,
        ordering: SortOrder<NotificationSort>,
    ) -> anyhow::Result<Vec<Notification>> {
        let sql = format!(
            "SELECT id, recipient_id, message, request_id, is_read, created_at
               FROM notifications WHERE recipient_id = $1{}",
            order_by(&ordering, |f| match f {
                NotificationSort::CreatedAt => "created_at",
            })
        );
        let rows = sqlx::query(&sql)
            .bind(recipient_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(map_notification).collect())
    }

    async fn get_for(&self, recipient_id: Uuid, id: Uuid) -> anyhow::Result<Option<Notification>> {
        let row = sqlx::query(
            r#"SELECT id, recipient_id, message, request_id, is_read, created_at
                 FROM notifications WHERE id = $1 AND recipient_id = $2"#,
        )
        .bind(id)
        .bind(recipient_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(map_notification))
    }

    async fn create(&self, notification: &NewNotification) -> anyhow::Result<Notification> {
        let row = sqlx::query(
            r#"INSERT INTO notifications (recipient_id, message, request_id) VALUES ($1, $2, $3)
               RETURNING id, recipient_id, message, request_id, is_read, created_at"#,
        )
        .bind(notification.recipient_id)
        .bind(&notification.message)
        .bind(notification.request_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(map_notification(&row))
    }

    async fn update_for(
        &self,
        recipient_id: Uuid,
        id: Uuid,
        patch: &NotificationPatch,
    ) -> anyhow::Result<Option<Notification>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE notifications SET id = id");
        if let Some(message) = &patch.message {
            qb.push(", message = ").push_bind(message.clone());
        }
        if let Some(is_read) = patch.is_read {
            qb.push(", is_read = ").push_bind(is_read);
        }
        qb.push(" WHERE id = ")
            .push_bind(id)
            .push(" AND recipient_id = ")
            .push_bind(recipient_id)
            .push(" RETURNING id, recipient_id, message, request_id, is_read, created_at");
        let row = qb.build().fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(map_notification))
    }

    async fn delete_for(&self, recipient_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM notifications WHERE id = $1 AND recipient_id = $2")
            .bind(id)
            .bind(recipient_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
