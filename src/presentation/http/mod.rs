pub mod auth;
pub mod double_option;
pub mod equipment;
pub mod error;
pub mod health;
pub mod notifications;
pub mod profiles;
pub mod requests;
pub mod teams;

use axum::Router;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::error::ApiError;

/// `{"status": "..."}` acknowledgement body.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub fn new(status: &'static str) -> Self {
        Self { status }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TeamIdQuery {
    pub team_id: Option<String>,
}

impl TeamIdQuery {
    /// Blank or missing ids are "not given"; malformed ones are a 400.
    pub fn optional(&self) -> Result<Option<Uuid>, ApiError> {
        match self.team_id.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => Uuid::parse_str(raw)
                .map(Some)
                .map_err(|_| ApiError::bad_request("team_id must be a valid UUID")),
        }
    }

    pub fn required(&self) -> Result<Uuid, ApiError> {
        self.optional()?
            .ok_or_else(|| ApiError::bad_request("team_id parameter is required"))
    }
}

/// Every `/api` route; layers (CORS, tracing, docs) are added by the binary.
pub fn api_router(ctx: AppContext) -> Router {
    let api = Router::new()
        .merge(health::routes(ctx.clone()))
        .merge(auth::routes(ctx.clone()))
        .merge(teams::routes(ctx.clone()))
        .merge(profiles::routes(ctx.clone()))
        .merge(equipment::routes(ctx.clone()))
        .merge(requests::routes(ctx.clone()))
        .merge(notifications::routes(ctx));
    Router::new().nest("/api", api)
}
