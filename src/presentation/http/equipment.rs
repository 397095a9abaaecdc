use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::application::dto::equipment::{
    EquipmentFilter, EquipmentPatch, EquipmentSort, NewEquipment,
};
use crate::application::dto::{SortOrder, normalize_search};
use crate::application::use_cases::equipment::by_team::EquipmentByTeam;
use crate::application::use_cases::equipment::crud::{
    CreateEquipment, DeleteEquipment, GetEquipment, ListEquipment, UpdateEquipment,
};
use crate::bootstrap::app_context::AppContext;
use crate::domain::maintenance::equipment::Equipment;
use crate::presentation::http::TeamIdQuery;
use crate::presentation::http::auth::CurrentUser;
use crate::presentation::http::double_option::{DoubleOption, deserialize_double_option};
use crate::presentation::http::error::{ApiError, ApiResult};

#[derive(Debug, Serialize, ToSchema)]
pub struct EquipmentResponse {
    pub id: Uuid,
    pub name: String,
    pub serial_number: String,
    pub department: String,
    pub owner_name: String,
    pub location: String,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_expiry: Option<NaiveDate>,
    pub maintenance_team_id: Option<Uuid>,
    pub maintenance_team_name: Option<String>,
    pub is_active: bool,
    pub notes: String,
    /// Requests in `new` or `in_progress`
    pub open_request_count: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Equipment> for EquipmentResponse {
    fn from(e: Equipment) -> Self {
        EquipmentResponse {
            id: e.id,
            name: e.name,
            serial_number: e.serial_number,
            department: e.department,
            owner_name: e.owner_name,
            location: e.location,
            purchase_date: e.purchase_date,
            warranty_expiry: e.warranty_expiry,
            maintenance_team_id: e.maintenance_team_id,
            maintenance_team_name: e.maintenance_team_name,
            is_active: e.is_active,
            notes: e.notes,
            open_request_count: e.open_request_count,
            created_at: e.created_at,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EquipmentListQuery {
    pub maintenance_team: Option<Uuid>,
    pub department: Option<String>,
    pub is_active: Option<bool>,
    /// Matches name, serial number and owner name
    pub search: Option<String>,
    /// `name` or `purchase_date`, prefixed with `-` for descending
    pub ordering: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEquipmentRequest {
    pub name: String,
    pub serial_number: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub owner_name: String,
    #[serde(default)]
    pub location: String,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_expiry: Option<NaiveDate>,
    pub maintenance_team_id: Option<Uuid>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub notes: String,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateEquipmentRequest {
    pub name: Option<String>,
    pub serial_number: Option<String>,
    pub department: Option<String>,
    pub owner_name: Option<String>,
    pub location: Option<String>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    #[schema(value_type = Option<NaiveDate>)]
    pub purchase_date: DoubleOption<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    #[schema(value_type = Option<NaiveDate>)]
    pub warranty_expiry: DoubleOption<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_double_option")]
    #[schema(value_type = Option<Uuid>)]
    pub maintenance_team_id: DoubleOption<Uuid>,
    pub is_active: Option<bool>,
    pub notes: Option<String>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/equipment", get(list_equipment).post(create_equipment))
        .route("/equipment/by_team", get(equipment_by_team))
        .route(
            "/equipment/:id",
            get(get_equipment)
                .patch(update_equipment)
                .put(update_equipment)
                .delete(delete_equipment),
        )
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/equipment", tag = "Equipment",
    params(EquipmentListQuery),
    responses((status = 200, body = [EquipmentResponse])))]
pub async fn list_equipment(
    State(ctx): State<AppContext>,
    _user: CurrentUser,
    query: Result<Query<EquipmentListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<EquipmentResponse>>> {
    let Query(q) = query?;
    let filter = EquipmentFilter {
        maintenance_team_id: q.maintenance_team,
        department: normalize_search(q.department),
        is_active: q.is_active,
        search: normalize_search(q.search),
        ordering: SortOrder::parse_or(q.ordering.as_deref(), SortOrder::asc(EquipmentSort::Name)),
    };
    let repo = ctx.equipment_repo();
    let items = ListEquipment {
        repo: repo.as_ref(),
    }
    .execute(&filter)
    .await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

#[utoipa::path(get, path = "/api/equipment/by_team", tag = "Equipment",
    params(TeamIdQuery),
    responses((status = 200, body = [EquipmentResponse]), (status = 400, body = crate::presentation::http::error::ErrorBody)))]
pub async fn equipment_by_team(
    State(ctx): State<AppContext>,
    _user: CurrentUser,
    query: Result<Query<TeamIdQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<EquipmentResponse>>> {
    let Query(q) = query?;
    let team_id = q.required()?;
    let repo = ctx.equipment_repo();
    let items = EquipmentByTeam {
        repo: repo.as_ref(),
    }
    .execute(team_id)
    .await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

#[utoipa::path(post, path = "/api/equipment", tag = "Equipment", request_body = CreateEquipmentRequest,
    responses((status = 201, body = EquipmentResponse), (status = 400, body = crate::presentation::http::error::ErrorBody)))]
pub async fn create_equipment(
    State(ctx): State<AppContext>,
    _user: CurrentUser,
    payload: Result<Json<CreateEquipmentRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<EquipmentResponse>)> {
    let Json(req) = payload?;
    let repo = ctx.equipment_repo();
    let teams = ctx.team_repo();
    let equipment = CreateEquipment {
        repo: repo.as_ref(),
        teams: teams.as_ref(),
    }
    .execute(NewEquipment {
        name: req.name,
        serial_number: req.serial_number,
        department: req.department,
        owner_name: req.owner_name,
        location: req.location,
        purchase_date: req.purchase_date,
        warranty_expiry: req.warranty_expiry,
        maintenance_team_id: req.maintenance_team_id,
        is_active: req.is_active,
        notes: req.notes,
    })
    .await?;
    tracing::info!(equipment_id = %equipment.id, "equipment_created");
    Ok((StatusCode::CREATED, Json(equipment.into())))
}

#[utoipa::path(get, path = "/api/equipment/{id}", tag = "Equipment",
    params(("id" = Uuid, Path, description = "Equipment id")),
    responses((status = 200, body = EquipmentResponse), (status = 404, body = crate::presentation::http::error::ErrorBody)))]
pub async fn get_equipment(
    State(ctx): State<AppContext>,
    _user: CurrentUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<EquipmentResponse>> {
    let Path(id) = path?;
    let repo = ctx.equipment_repo();
    let equipment = GetEquipment {
        repo: repo.as_ref(),
    }
    .execute(id)
    .await?
    .ok_or(ApiError::NotFound)?;
    Ok(Json(equipment.into()))
}

#[utoipa::path(patch, path = "/api/equipment/{id}", tag = "Equipment",
    params(("id" = Uuid, Path, description = "Equipment id")),
    request_body = UpdateEquipmentRequest,
    responses((status = 200, body = EquipmentResponse)))]
pub async fn update_equipment(
    State(ctx): State<AppContext>,
    _user: CurrentUser,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateEquipmentRequest>, JsonRejection>,
) -> ApiResult<Json<EquipmentResponse>> {
    let Path(id) = path?;
    let Json(req) = payload?;
    let repo = ctx.equipment_repo();
    let teams = ctx.team_repo();
    let equipment = UpdateEquipment {
        repo: repo.as_ref(),
        teams: teams.as_ref(),
    }
    .execute(
        id,
        EquipmentPatch {
            name: req.name,
            serial_number: req.serial_number,
            department: req.department,
            owner_name: req.owner_name,
            location: req.location,
            purchase_date: req.purchase_date.into_patch(),
            warranty_expiry: req.warranty_expiry.into_patch(),
            maintenance_team_id: req.maintenance_team_id.into_patch(),
            is_active: req.is_active,
            notes: req.notes,
        },
    )
    .await?;
    Ok(Json(equipment.into()))
}

#[utoipa::path(delete, path = "/api/equipment/{id}", tag = "Equipment",
    params(("id" = Uuid, Path, description = "Equipment id")),
    responses((status = 204)))]
pub async fn delete_equipment(
    State(ctx): State<AppContext>,
    user: CurrentUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = path?;
    let repo = ctx.equipment_repo();
    let deleted = DeleteEquipment {
        repo: repo.as_ref(),
    }
    .execute(id)
    .await?;
    if !deleted {
        return Err(ApiError::NotFound);
    }
    tracing::info!(equipment_id = %id, user_id = %user.0.user.id, "equipment_deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::domain::accounts::user::Role;
    use crate::presentation::http::test_support::{TestApp, body_json};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn create_rejects_duplicate_serial() {
        let app = TestApp::new();
        app.store.add_user("manager", Some(Role::Manager), None);
        let token = app.token_for("manager");
        let body = json!({
            "name": "Lathe",
            "serial_number": "LT-001",
            "purchase_date": "2024-03-01",
        });

        let res = app.post_json("/api/equipment", Some(&token), body.clone()).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let created = body_json(res).await;
        assert_eq!(created["is_active"], true);
        assert_eq!(created["purchase_date"], "2024-03-01");
        assert_eq!(created["open_request_count"], 0);

        let res = app.post_json("/api/equipment", Some(&token), body).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(res).await["error"], "serial_number already exists");
    }

    #[tokio::test]
    async fn by_team_lists_active_equipment_only() {
        let app = TestApp::new();
        app.store.add_user("manager", Some(Role::Manager), None);
        let team = app.store.add_team("Mechanics");
        let keep = app.store.add_equipment("Compressor", Some(team));
        let retired = app.store.add_equipment("Old pump", Some(team));
        app.store.set_equipment_active(retired, false);
        app.store.add_equipment("Forklift", None);
        let token = app.token_for("manager");

        let res = app.get("/api/equipment/by_team", Some(&token)).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let res = app
            .get(&format!("/api/equipment/by_team?team_id={team}"), Some(&token))
            .await;
        let body = body_json(res).await;
        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], keep.to_string());
        assert_eq!(items[0]["maintenance_team_name"], "Mechanics");
    }

    #[tokio::test]
    async fn list_filters_and_patch_clears_dates() {
        let app = TestApp::new();
        app.store.add_user("manager", Some(Role::Manager), None);
        let team = app.store.add_team("Mechanics");
        let id = app.store.add_equipment("Compressor", Some(team));
        app.store.add_equipment("Forklift", None);
        let token = app.token_for("manager");

        let res = app
            .get(&format!("/api/equipment?maintenance_team={team}"), Some(&token))
            .await;
        assert_eq!(body_json(res).await.as_array().unwrap().len(), 1);

        let res = app.get("/api/equipment?search=fork", Some(&token)).await;
        assert_eq!(body_json(res).await[0]["name"], "Forklift");

        let res = app
            .patch_json(
                &format!("/api/equipment/{id}"),
                &token,
                json!({"warranty_expiry": "2026-01-31", "maintenance_team_id": null}),
            )
            .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["warranty_expiry"], "2026-01-31");
        assert!(body["maintenance_team_id"].is_null());

        let res = app
            .patch_json(&format!("/api/equipment/{id}"), &token, json!({"name": "  "}))
            .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let app = TestApp::new();
        app.store.add_user("manager", Some(Role::Manager), None);
        let token = app.token_for("manager");
        let res = app.get("/api/equipment/not-a-uuid", Some(&token)).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
