use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::application::dto::SortOrder;
use crate::application::dto::notifications::{NotificationPatch, default_notification_order};
use crate::application::use_cases::notifications::crud::{
    CreateNotification, CreateNotificationInput, DeleteNotification, GetNotification,
    ListNotifications, UpdateNotification,
};
use crate::application::use_cases::notifications::mark_read::MarkNotificationRead;
use crate::bootstrap::app_context::AppContext;
use crate::domain::maintenance::notification::Notification;
use crate::presentation::http::StatusResponse;
use crate::presentation::http::auth::CurrentUser;
use crate::presentation::http::error::{ApiError, ApiResult};

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationResponse {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub message: String,
    pub request_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Notification> for NotificationResponse {
    fn from(n: Notification) -> Self {
        NotificationResponse {
            id: n.id,
            recipient_id: n.recipient_id,
            message: n.message,
            request_id: n.request_id,
            is_read: n.is_read,
            created_at: n.created_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NotificationListQuery {
    /// `created_at` or `-created_at`
    pub ordering: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateNotificationRequest {
    /// Defaults to the caller
    pub recipient_id: Option<Uuid>,
    pub message: String,
    pub request_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateNotificationRequest {
    pub message: Option<String>,
    pub is_read: Option<bool>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route(
            "/notifications",
            get(list_notifications).post(create_notification),
        )
        .route(
            "/notifications/:id",
            get(get_notification)
                .patch(update_notification)
                .put(update_notification)
                .delete(delete_notification),
        )
        .route("/notifications/:id/mark_read", post(mark_read))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/notifications", tag = "Notifications",
    params(NotificationListQuery),
    responses((status = 200, body = [NotificationResponse])))]
pub async fn list_notifications(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    query: Result<Query<NotificationListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<NotificationResponse>>> {
    let Query(q) = query?;
    let ordering = SortOrder::parse_or(q.ordering.as_deref(), default_notification_order());
    let repo = ctx.notification_repo();
    let items = ListNotifications {
        repo: repo.as_ref(),
    }
    .execute(&user.viewer(), ordering)
    .await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

#[utoipa::path(post, path = "/api/notifications", tag = "Notifications",
    request_body = CreateNotificationRequest,
    responses((status = 201, body = NotificationResponse), (status = 400, body = crate::presentation::http::error::ErrorBody)))]
pub async fn create_notification(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    payload: Result<Json<CreateNotificationRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<NotificationResponse>)> {
    let Json(req) = payload?;
    let repo = ctx.notification_repo();
    let users = ctx.user_repo();
    let requests = ctx.request_repo();
    let created = CreateNotification {
        repo: repo.as_ref(),
        users: users.as_ref(),
        requests: requests.as_ref(),
    }
    .execute(
        &user.viewer(),
        CreateNotificationInput {
            recipient_id: req.recipient_id,
            message: req.message,
            request_id: req.request_id,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

#[utoipa::path(get, path = "/api/notifications/{id}", tag = "Notifications",
    params(("id" = Uuid, Path, description = "Notification id")),
    responses((status = 200, body = NotificationResponse), (status = 404, body = crate::presentation::http::error::ErrorBody)))]
pub async fn get_notification(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<NotificationResponse>> {
    let Path(id) = path?;
    let repo = ctx.notification_repo();
    let item = GetNotification {
        repo: repo.as_ref(),
    }
    .execute(&user.viewer(), id)
    .await?
    .ok_or(ApiError::NotFound)?;
    Ok(Json(item.into()))
}

#[utoipa::path(patch, path = "/api/notifications/{id}", tag = "Notifications",
    params(("id" = Uuid, Path, description = "Notification id")),
    request_body = UpdateNotificationRequest,
    responses((status = 200, body = NotificationResponse)))]
pub async fn update_notification(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateNotificationRequest>, JsonRejection>,
) -> ApiResult<Json<NotificationResponse>> {
    let Path(id) = path?;
    let Json(req) = payload?;
    let repo = ctx.notification_repo();
    let item = UpdateNotification {
        repo: repo.as_ref(),
    }
    .execute(
        &user.viewer(),
        id,
        NotificationPatch {
            message: req.message,
            is_read: req.is_read,
        },
    )
    .await?;
    Ok(Json(item.into()))
}

#[utoipa::path(delete, path = "/api/notifications/{id}", tag = "Notifications",
    params(("id" = Uuid, Path, description = "Notification id")),
    responses((status = 204)))]
pub async fn delete_notification(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = path?;
    let repo = ctx.notification_repo();
    let deleted = DeleteNotification {
        repo: repo.as_ref(),
    }
    .execute(&user.viewer(), id)
    .await?;
    if !deleted {
        return Err(ApiError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(post, path = "/api/notifications/{id}/mark_read", tag = "Notifications",
    params(("id" = Uuid, Path, description = "Notification id")),
    responses((status = 200, body = StatusResponse), (status = 404, body = crate::presentation::http::error::ErrorBody)))]
pub async fn mark_read(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<StatusResponse>> {
    let Path(id) = path?;
    let repo = ctx.notification_repo();
    let marked = MarkNotificationRead {
        repo: repo.as_ref(),
    }
    .execute(&user.viewer(), id)
    .await?;
    if !marked {
        return Err(ApiError::NotFound);
    }
    Ok(Json(StatusResponse::new("marked as read")))
}
