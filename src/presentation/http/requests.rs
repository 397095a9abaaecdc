use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::application::dto::requests::{
    CreateRequestInput, RequestFilter, RequestPatch, RequestSort, RequestSummary, StatusColumn,
};
use crate::application::dto::{SortOrder, normalize_search};
use crate::application::use_cases::requests::create_request::CreateRequest;
use crate::application::use_cases::requests::kanban::RequestsByStatus;
use crate::application::use_cases::requests::list_requests::{
    DeleteRequest, GetRequest, ListRequests,
};
use crate::application::use_cases::requests::summary::SummarizeRequests;
use crate::application::use_cases::requests::update_request::UpdateRequest;
use crate::bootstrap::app_context::AppContext;
use crate::domain::maintenance::request::{MaintenanceRequest, RequestStatus, RequestType};
use crate::presentation::http::auth::CurrentUser;
use crate::presentation::http::double_option::{DoubleOption, deserialize_double_option};
use crate::presentation::http::error::{ApiError, ApiResult};

#[derive(Debug, Serialize, ToSchema)]
pub struct RequestResponse {
    pub id: Uuid,
    pub subject: String,
    pub description: String,
    pub request_type: RequestType,
    pub request_type_label: &'static str,
    pub status: RequestStatus,
    pub status_label: &'static str,
    pub equipment_id: Option<Uuid>,
    pub equipment_name: Option<String>,
    pub team_id: Option<Uuid>,
    pub team_name: Option<String>,
    pub technician_id: Option<Uuid>,
    pub technician_name: Option<String>,
    pub created_by_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub due_date: Option<NaiveDate>,
    pub duration_hours: Option<f64>,
    pub is_overdue: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RequestResponse {
    fn build(r: MaintenanceRequest, today: NaiveDate) -> Self {
        RequestResponse {
            is_overdue: r.is_overdue(today),
            request_type_label: r.request_type.label(),
            status_label: r.status.label(),
            id: r.id,
            subject: r.subject,
            description: r.description,
            request_type: r.request_type,
            status: r.status,
            equipment_id: r.equipment_id,
            equipment_name: r.equipment_name,
            team_id: r.team_id,
            team_name: r.team_name,
            technician_id: r.technician_id,
            technician_name: r.technician_name,
            created_by_id: r.created_by_id,
            client_id: r.client_id,
            scheduled_date: r.scheduled_date,
            due_date: r.due_date,
            duration_hours: r.duration_hours,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn respond_many(requests: Vec<MaintenanceRequest>) -> Vec<RequestResponse> {
    let today = today();
    requests
        .into_iter()
        .map(|r| RequestResponse::build(r, today))
        .collect()
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusColumnResponse {
    pub label: &'static str,
    pub count: usize,
    pub items: Vec<RequestResponse>,
}

/// Kanban board keyed by status, columns in workflow order.
#[derive(Debug, Serialize, ToSchema)]
pub struct KanbanResponse {
    pub new: StatusColumnResponse,
    pub in_progress: StatusColumnResponse,
    pub repaired: StatusColumnResponse,
    pub scrap: StatusColumnResponse,
}

impl KanbanResponse {
    fn from_columns(columns: Vec<StatusColumn>) -> Self {
        let today = today();
        let mut board = KanbanResponse {
            new: empty_column(RequestStatus::New),
            in_progress: empty_column(RequestStatus::InProgress),
            repaired: empty_column(RequestStatus::Repaired),
            scrap: empty_column(RequestStatus::Scrap),
        };
        for column in columns {
            let slot = match column.status {
                RequestStatus::New => &mut board.new,
                RequestStatus::InProgress => &mut board.in_progress,
                RequestStatus::Repaired => &mut board.repaired,
                RequestStatus::Scrap => &mut board.scrap,
            };
            *slot = StatusColumnResponse {
                label: column.label,
                count: column.count,
                items: column
                    .items
                    .into_iter()
                    .map(|r| RequestResponse::build(r, today))
                    .collect(),
            };
        }
        board
    }
}

fn empty_column(status: RequestStatus) -> StatusColumnResponse {
    StatusColumnResponse {
        label: status.label(),
        count: 0,
        items: Vec::new(),
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TeamCountResponse {
    pub team_id: Option<Uuid>,
    pub team_name: Option<String>,
    pub count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TypeCountResponse {
    pub request_type: RequestType,
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryResponse {
    pub total: usize,
    pub open: usize,
    pub overdue: usize,
    pub by_team: Vec<TeamCountResponse>,
    pub by_type: Vec<TypeCountResponse>,
}

impl From<RequestSummary> for SummaryResponse {
    fn from(s: RequestSummary) -> Self {
        SummaryResponse {
            total: s.total,
            open: s.open,
            overdue: s.overdue,
            by_team: s
                .by_team
                .into_iter()
                .map(|t| TeamCountResponse {
                    team_id: t.team_id,
                    team_name: t.team_name,
                    count: t.count,
                })
                .collect(),
            by_type: s
                .by_type
                .into_iter()
                .map(|t| TypeCountResponse {
                    request_type: t.request_type,
                    label: t.request_type.label(),
                    count: t.count,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RequestListQuery {
    pub status: Option<RequestStatus>,
    pub request_type: Option<RequestType>,
    pub team: Option<Uuid>,
    pub technician: Option<Uuid>,
    /// Matches subject and equipment name
    pub search: Option<String>,
    /// `created_at`, `due_date` or `scheduled_date`, prefixed with `-` for descending
    pub ordering: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRequestBody {
    pub subject: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_type")]
    pub request_type: RequestType,
    #[serde(default = "default_status")]
    pub status: RequestStatus,
    pub equipment_id: Option<Uuid>,
    pub team_id: Option<Uuid>,
    pub technician_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub due_date: Option<NaiveDate>,
    pub duration_hours: Option<f64>,
}

fn default_type() -> RequestType {
    RequestType::Corrective
}

fn default_status() -> RequestStatus {
    RequestStatus::New
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateRequestBody {
    pub subject: Option<String>,
    pub description: Option<String>,
    pub request_type: Option<RequestType>,
    pub status: Option<RequestStatus>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub equipment_id: DoubleOption<Uuid>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub team_id: DoubleOption<Uuid>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub technician_id: DoubleOption<Uuid>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub client_id: DoubleOption<Uuid>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    #[schema(value_type = Option<DateTime<Utc>>)]
    pub scheduled_date: DoubleOption<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    #[schema(value_type = Option<NaiveDate>)]
    pub due_date: DoubleOption<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    #[schema(value_type = Option<f64>)]
    pub duration_hours: DoubleOption<f64>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/requests", get(list_requests).post(create_request))
        .route("/requests/by_status", get(requests_by_status))
        .route("/requests/summary", get(requests_summary))
        .route(
            "/requests/:id",
            get(get_request)
                .patch(update_request)
                .put(update_request)
                .delete(delete_request),
        )
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/requests", tag = "Requests",
    params(RequestListQuery),
    responses((status = 200, body = [RequestResponse])))]
pub async fn list_requests(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    query: Result<Query<RequestListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<RequestResponse>>> {
    let Query(q) = query?;
    let filter = RequestFilter {
        status: q.status,
        request_type: q.request_type,
        team_id: q.team,
        technician_id: q.technician,
        search: normalize_search(q.search),
        ordering: SortOrder::parse_or(
            q.ordering.as_deref(),
            SortOrder::desc(RequestSort::CreatedAt),
        ),
    };
    let repo = ctx.request_repo();
    let requests = ListRequests {
        repo: repo.as_ref(),
    }
    .execute(&user.viewer(), &filter)
    .await?;
    Ok(Json(respond_many(requests)))
}

#[utoipa::path(get, path = "/api/requests/by_status", tag = "Requests",
    responses((status = 200, body = KanbanResponse)))]
pub async fn requests_by_status(
    State(ctx): State<AppContext>,
    user: CurrentUser,
) -> ApiResult<Json<KanbanResponse>> {
    let repo = ctx.request_repo();
    let columns = RequestsByStatus {
        repo: repo.as_ref(),
    }
    .execute(&user.viewer())
    .await?;
    Ok(Json(KanbanResponse::from_columns(columns)))
}

#[utoipa::path(get, path = "/api/requests/summary", tag = "Requests",
    responses((status = 200, body = SummaryResponse)))]
pub async fn requests_summary(
    State(ctx): State<AppContext>,
    user: CurrentUser,
) -> ApiResult<Json<SummaryResponse>> {
    let repo = ctx.request_repo();
    let summary = SummarizeRequests {
        repo: repo.as_ref(),
    }
    .execute(&user.viewer(), today())
    .await?;
    Ok(Json(summary.into()))
}

#[utoipa::path(post, path = "/api/requests", tag = "Requests", request_body = CreateRequestBody,
    responses((status = 201, body = RequestResponse), (status = 400, body = crate::presentation::http::error::ErrorBody)))]
pub async fn create_request(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    payload: Result<Json<CreateRequestBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<RequestResponse>)> {
    let Json(req) = payload?;
    let requests = ctx.request_repo();
    let equipment = ctx.equipment_repo();
    let teams = ctx.team_repo();
    let users = ctx.user_repo();
    let notifications = ctx.notification_repo();
    let created = CreateRequest {
        requests: requests.as_ref(),
        equipment: equipment.as_ref(),
        teams: teams.as_ref(),
        users: users.as_ref(),
        notifications: notifications.as_ref(),
    }
    .execute(
        &user.viewer(),
        CreateRequestInput {
            subject: req.subject,
            description: req.description,
            request_type: req.request_type,
            status: req.status,
            equipment_id: req.equipment_id,
            team_id: req.team_id,
            technician_id: req.technician_id,
            client_id: req.client_id,
            scheduled_date: req.scheduled_date,
            due_date: req.due_date,
            duration_hours: req.duration_hours,
        },
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(RequestResponse::build(created, today())),
    ))
}

#[utoipa::path(get, path = "/api/requests/{id}", tag = "Requests",
    params(("id" = Uuid, Path, description = "Request id")),
    responses((status = 200, body = RequestResponse), (status = 404, body = crate::presentation::http::error::ErrorBody)))]
pub async fn get_request(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<RequestResponse>> {
    let Path(id) = path?;
    let repo = ctx.request_repo();
    let request = GetRequest {
        repo: repo.as_ref(),
    }
    .execute(&user.viewer(), id)
    .await?
    .ok_or(ApiError::NotFound)?;
    Ok(Json(RequestResponse::build(request, today())))
}

#[utoipa::path(patch, path = "/api/requests/{id}", tag = "Requests",
    params(("id" = Uuid, Path, description = "Request id")),
    request_body = UpdateRequestBody,
    responses((status = 200, body = RequestResponse), (status = 404, body = crate::presentation::http::error::ErrorBody)))]
pub async fn update_request(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateRequestBody>, JsonRejection>,
) -> ApiResult<Json<RequestResponse>> {
    let Path(id) = path?;
    let Json(req) = payload?;
    let requests = ctx.request_repo();
    let equipment = ctx.equipment_repo();
    let teams = ctx.team_repo();
    let users = ctx.user_repo();
    let notifications = ctx.notification_repo();
    let updated = UpdateRequest {
        requests: requests.as_ref(),
        equipment: equipment.as_ref(),
        teams: teams.as_ref(),
        users: users.as_ref(),
        notifications: notifications.as_ref(),
    }
    .execute(
        &user.viewer(),
        id,
        RequestPatch {
            subject: req.subject,
            description: req.description,
            request_type: req.request_type,
            status: req.status,
            equipment_id: req.equipment_id.into_patch(),
            team_id: req.team_id.into_patch(),
            technician_id: req.technician_id.into_patch(),
            client_id: req.client_id.into_patch(),
            scheduled_date: req.scheduled_date.into_patch(),
            due_date: req.due_date.into_patch(),
            duration_hours: req.duration_hours.into_patch(),
            retire_equipment: false,
        },
    )
    .await?;
    Ok(Json(RequestResponse::build(updated, today())))
}

#[utoipa::path(delete, path = "/api/requests/{id}", tag = "Requests",
    params(("id" = Uuid, Path, description = "Request id")),
    responses((status = 204), (status = 404, body = crate::presentation::http::error::ErrorBody)))]
pub async fn delete_request(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = path?;
    let repo = ctx.request_repo();
    let deleted = DeleteRequest {
        repo: repo.as_ref(),
    }
    .execute(&user.viewer(), id)
    .await?;
    if !deleted {
        return Err(ApiError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
