use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::application::dto::teams::{NewTeam, TeamFilter, TeamPatch, TeamSort};
use crate::application::dto::{SortOrder, normalize_search};
use crate::application::use_cases::teams::crud::{
    CreateTeam, DeleteTeam, GetTeam, ListTeams, UpdateTeam,
};
use crate::bootstrap::app_context::AppContext;
use crate::domain::maintenance::team::MaintenanceTeam;
use crate::presentation::http::auth::CurrentUser;
use crate::presentation::http::error::{ApiError, ApiResult};

#[derive(Debug, Serialize, ToSchema)]
pub struct TeamResponse {
    pub id: Uuid,
    pub team_name: String,
    pub description: String,
    pub member_count: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<MaintenanceTeam> for TeamResponse {
    fn from(t: MaintenanceTeam) -> Self {
        TeamResponse {
            id: t.id,
            team_name: t.team_name,
            description: t.description,
            member_count: t.member_count,
            created_at: t.created_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TeamListQuery {
    /// Case-insensitive match on the team name
    pub search: Option<String>,
    /// `team_name` or `-team_name`
    pub ordering: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTeamRequest {
    pub team_name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateTeamRequest {
    pub team_name: Option<String>,
    pub description: Option<String>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/teams", get(list_teams).post(create_team))
        .route(
            "/teams/:id",
            get(get_team)
                .patch(update_team)
                .put(update_team)
                .delete(delete_team),
        )
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/teams", tag = "Teams",
    params(TeamListQuery),
    responses((status = 200, body = [TeamResponse])))]
pub async fn list_teams(
    State(ctx): State<AppContext>,
    _user: CurrentUser,
    query: Result<Query<TeamListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<TeamResponse>>> {
    let Query(q) = query?;
    let filter = TeamFilter {
        search: normalize_search(q.search),
        ordering: SortOrder::parse_or(q.ordering.as_deref(), SortOrder::asc(TeamSort::TeamName)),
    };
    let repo = ctx.team_repo();
    let teams = ListTeams {
        repo: repo.as_ref(),
    }
    .execute(&filter)
    .await?;
    Ok(Json(teams.into_iter().map(Into::into).collect()))
}

#[utoipa::path(post, path = "/api/teams", tag = "Teams", request_body = CreateTeamRequest,
    responses((status = 201, body = TeamResponse), (status = 400, body = crate::presentation::http::error::ErrorBody)))]
pub async fn create_team(
    State(ctx): State<AppContext>,
    _user: CurrentUser,
    payload: Result<Json<CreateTeamRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TeamResponse>)> {
    let Json(req) = payload?;
    let repo = ctx.team_repo();
    let team = CreateTeam {
        repo: repo.as_ref(),
    }
    .execute(NewTeam {
        team_name: req.team_name,
        description: req.description,
    })
    .await?;
    tracing::info!(team_id = %team.id, "team_created");
    Ok((StatusCode::CREATED, Json(team.into())))
}

#[utoipa::path(get, path = "/api/teams/{id}", tag = "Teams",
    params(("id" = Uuid, Path, description = "Team id")),
    responses((status = 200, body = TeamResponse), (status = 404, body = crate::presentation::http::error::ErrorBody)))]
pub async fn get_team(
    State(ctx): State<AppContext>,
    _user: CurrentUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<TeamResponse>> {
    let Path(id) = path?;
    let repo = ctx.team_repo();
    let team = GetTeam {
        repo: repo.as_ref(),
    }
    .execute(id)
    .await?
    .ok_or(ApiError::NotFound)?;
    Ok(Json(team.into()))
}

#[utoipa::path(patch, path = "/api/teams/{id}", tag = "Teams",
    params(("id" = Uuid, Path, description = "Team id")),
    request_body = UpdateTeamRequest,
    responses((status = 200, body = TeamResponse)))]
pub async fn update_team(
    State(ctx): State<AppContext>,
    _user: CurrentUser,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateTeamRequest>, JsonRejection>,
) -> ApiResult<Json<TeamResponse>> {
    let Path(id) = path?;
    let Json(req) = payload?;
    let repo = ctx.team_repo();
    let team = UpdateTeam {
        repo: repo.as_ref(),
    }
    .execute(
        id,
        TeamPatch {
            team_name: req.team_name,
            description: req.description,
        },
    )
    .await?;
    Ok(Json(team.into()))
}

#[utoipa::path(delete, path = "/api/teams/{id}", tag = "Teams",
    params(("id" = Uuid, Path, description = "Team id")),
    responses((status = 204)))]
pub async fn delete_team(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = path?;
    let repo = ctx.team_repo();
    let deleted = DeleteTeam {
        repo: repo.as_ref(),
    }
    .execute(id)
    .await?;
    if !deleted {
        return Err(ApiError::NotFound);
    }
    tracing::info!(team_id = %id, user_id = %user.0.user.id, "team_deleted");
    Ok(StatusCode::NO_CONTENT)
}
