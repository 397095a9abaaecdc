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

use crate::application::dto::accounts::{
    CreateProfileInput, ProfileFilter, ProfileSort, UpdateProfileInput,
};
use crate::application::dto::{SortOrder, normalize_search};
use crate::application::use_cases::profiles::crud::{
    CreateProfile, DeleteProfile, GetProfile, ListProfiles, UpdateProfile,
};
use crate::application::use_cases::profiles::technicians::{ListTeamMembers, ListTechnicians};
use crate::bootstrap::app_context::AppContext;
use crate::domain::accounts::profile::Profile;
use crate::domain::accounts::user::{Role, User};
use crate::presentation::http::TeamIdQuery;
use crate::presentation::http::auth::CurrentUser;
use crate::presentation::http::double_option::{DoubleOption, deserialize_double_option};
use crate::presentation::http::error::{ApiError, ApiResult};

#[derive(Debug, Serialize, ToSchema)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub is_active: bool,
}

impl From<User> for UserSummary {
    fn from(u: User) -> Self {
        UserSummary {
            full_name: u.full_name(),
            id: u.id,
            username: u.username,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            is_active: u.is_active,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub user: UserSummary,
    pub role: Role,
    pub team_id: Option<Uuid>,
    pub team_name: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> Self {
        ProfileResponse {
            id: p.id,
            user: p.user.into(),
            role: p.role,
            team_id: p.team_id,
            team_name: p.team_name,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProfileListQuery {
    pub role: Option<Role>,
    pub team: Option<Uuid>,
    /// Matches username, first and last name
    pub search: Option<String>,
    /// `username`, `role`, prefixed with `-` for descending
    pub ordering: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProfileRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default = "default_role")]
    pub role: Role,
    pub team_id: Option<Uuid>,
}

fn default_role() -> Role {
    Role::User
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub role: Option<Role>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub team_id: DoubleOption<Uuid>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
    pub password: Option<String>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/profiles", get(list_profiles).post(create_profile))
        .route("/profiles/technicians", get(list_technicians))
        .route("/profiles/by_team", get(profiles_by_team))
        .route(
            "/profiles/:id",
            get(get_profile)
                .patch(update_profile)
                .put(update_profile)
                .delete(delete_profile),
        )
        .with_state(ctx)
}

fn respond(profiles: Vec<Profile>) -> Json<Vec<ProfileResponse>> {
    Json(profiles.into_iter().map(Into::into).collect())
}

#[utoipa::path(get, path = "/api/profiles", tag = "Profiles",
    params(ProfileListQuery),
    responses((status = 200, body = [ProfileResponse])))]
pub async fn list_profiles(
    State(ctx): State<AppContext>,
    _user: CurrentUser,
    query: Result<Query<ProfileListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<ProfileResponse>>> {
    let Query(q) = query?;
    let filter = ProfileFilter {
        role: q.role,
        team_id: q.team,
        search: normalize_search(q.search),
        ordering: SortOrder::parse_or(q.ordering.as_deref(), SortOrder::asc(ProfileSort::Username)),
    };
    let repo = ctx.user_repo();
    let profiles = ListProfiles {
        repo: repo.as_ref(),
    }
    .execute(&filter)
    .await?;
    Ok(respond(profiles))
}

#[utoipa::path(get, path = "/api/profiles/technicians", tag = "Profiles",
    params(TeamIdQuery),
    responses((status = 200, body = [ProfileResponse])))]
pub async fn list_technicians(
    State(ctx): State<AppContext>,
    _user: CurrentUser,
    query: Result<Query<TeamIdQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<ProfileResponse>>> {
    let Query(q) = query?;
    let repo = ctx.user_repo();
    let profiles = ListTechnicians {
        repo: repo.as_ref(),
    }
    .execute(q.optional()?)
    .await?;
    Ok(respond(profiles))
}

#[utoipa::path(get, path = "/api/profiles/by_team", tag = "Profiles",
    params(TeamIdQuery),
    responses((status = 200, body = [ProfileResponse]), (status = 400, body = crate::presentation::http::error::ErrorBody)))]
pub async fn profiles_by_team(
    State(ctx): State<AppContext>,
    _user: CurrentUser,
    query: Result<Query<TeamIdQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<ProfileResponse>>> {
    let Query(q) = query?;
    let team_id = q.required()?;
    let repo = ctx.user_repo();
    let profiles = ListTeamMembers {
        repo: repo.as_ref(),
    }
    .execute(team_id)
    .await?;
    Ok(respond(profiles))
}

#[utoipa::path(post, path = "/api/profiles", tag = "Profiles", request_body = CreateProfileRequest,
    responses((status = 201, body = ProfileResponse), (status = 400, body = crate::presentation::http::error::ErrorBody)))]
pub async fn create_profile(
    State(ctx): State<AppContext>,
    _user: CurrentUser,
    payload: Result<Json<CreateProfileRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ProfileResponse>)> {
    let Json(req) = payload?;
    let users = ctx.user_repo();
    let teams = ctx.team_repo();
    let profile = CreateProfile {
        users: users.as_ref(),
        teams: teams.as_ref(),
    }
    .execute(CreateProfileInput {
        username: req.username,
        password: req.password,
        email: req.email,
        first_name: req.first_name,
        last_name: req.last_name,
        role: req.role,
        team_id: req.team_id,
    })
    .await?;
    Ok((StatusCode::CREATED, Json(profile.into())))
}

#[utoipa::path(get, path = "/api/profiles/{id}", tag = "Profiles",
    params(("id" = Uuid, Path, description = "Profile id")),
    responses((status = 200, body = ProfileResponse), (status = 404, body = crate::presentation::http::error::ErrorBody)))]
pub async fn get_profile(
    State(ctx): State<AppContext>,
    _user: CurrentUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<ProfileResponse>> {
    let Path(id) = path?;
    let repo = ctx.user_repo();
    let profile = GetProfile {
        repo: repo.as_ref(),
    }
    .execute(id)
    .await?
    .ok_or(ApiError::NotFound)?;
    Ok(Json(profile.into()))
}

#[utoipa::path(patch, path = "/api/profiles/{id}", tag = "Profiles",
    params(("id" = Uuid, Path, description = "Profile id")),
    request_body = UpdateProfileRequest,
    responses((status = 200, body = ProfileResponse)))]
pub async fn update_profile(
    State(ctx): State<AppContext>,
    _user: CurrentUser,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> ApiResult<Json<ProfileResponse>> {
    let Path(id) = path?;
    let Json(req) = payload?;
    let users = ctx.user_repo();
    let teams = ctx.team_repo();
    let profile = UpdateProfile {
        users: users.as_ref(),
        teams: teams.as_ref(),
    }
    .execute(
        id,
        UpdateProfileInput {
            role: req.role,
            team_id: req.team_id.into_patch(),
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            is_active: req.is_active,
            password: req.password,
        },
    )
    .await?;
    Ok(Json(profile.into()))
}

#[utoipa::path(delete, path = "/api/profiles/{id}", tag = "Profiles",
    params(("id" = Uuid, Path, description = "Profile id")),
    responses((status = 204)))]
pub async fn delete_profile(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = path?;
    let repo = ctx.user_repo();
    let deleted = DeleteProfile {
        repo: repo.as_ref(),
    }
    .execute(id)
    .await?;
    if !deleted {
        return Err(ApiError::NotFound);
    }
    tracing::info!(profile_id = %id, user_id = %user.0.user.id, "profile_deleted");
    Ok(StatusCode::NO_CONTENT)
}
