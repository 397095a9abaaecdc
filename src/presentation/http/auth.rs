use axum::extract::FromRequestParts;
use axum::extract::rejection::JsonRejection;
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue, header};
use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::access::Viewer;
use crate::application::use_cases::auth::login::{Login as LoginUc, LoginRequest as LoginDto};
use crate::application::use_cases::auth::me::GetMe;
use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::Config;
use crate::domain::accounts::profile::Account;
use crate::domain::accounts::user::Role;
use crate::presentation::http::StatusResponse;
use crate::presentation::http::error::{ApiError, ApiResult};

pub const ACCESS_COOKIE: &str = "access_token";

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// The signed-in account as the frontend sees it.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionUser {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub role: Role,
    pub team_id: Option<Uuid>,
}

impl From<&Account> for SessionUser {
    fn from(account: &Account) -> Self {
        SessionUser {
            id: account.user.id,
            username: account.user.username.clone(),
            full_name: account.user.full_name(),
            role: account.effective_role(),
            team_id: account.team_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub role: Role,
    pub team_id: Option<Uuid>,
    pub access_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/login", tag = "Auth", request_body = LoginRequest, security(()), responses(
    (status = 200, body = LoginResponse),
    (status = 400, body = crate::presentation::http::error::ErrorBody)
))]
pub async fn login(
    State(ctx): State<AppContext>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<(HeaderMap, Json<LoginResponse>)> {
    let Json(req) = payload?;
    let repo = ctx.user_repo();
    let uc = LoginUc {
        repo: repo.as_ref(),
    };
    let dto = LoginDto {
        username: req.username,
        password: req.password,
    };
    let Some(account) = uc.execute(&dto).await? else {
        tracing::info!(username = %dto.username, "login_failed");
        return Err(ApiError::bad_request("Invalid credentials"));
    };
    let token = issue_token(&ctx.cfg, account.user.id)?;
    tracing::info!(user_id = %account.user.id, role = %account.effective_role(), "login_succeeded");

    let mut headers = HeaderMap::new();
    let cookie = build_access_cookie(&token, ctx.cfg.jwt_expires_secs, secure_cookies(&ctx.cfg));
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie).map_err(|e| ApiError::Internal(e.into()))?,
    );

    let user = SessionUser::from(&account);
    Ok((
        headers,
        Json(LoginResponse {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            role: user.role,
            team_id: user.team_id,
            access_token: token,
        }),
    ))
}

#[utoipa::path(post, path = "/api/logout", tag = "Auth", responses((status = 200, body = StatusResponse)))]
pub async fn logout(
    State(ctx): State<AppContext>,
    CurrentUser(account): CurrentUser,
) -> ApiResult<(HeaderMap, Json<StatusResponse>)> {
    let mut headers = HeaderMap::new();
    let cookie = if secure_cookies(&ctx.cfg) {
        "access_token=; HttpOnly; Secure; Path=/; Max-Age=0; SameSite=Lax"
    } else {
        "access_token=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax"
    };
    headers.insert(header::SET_COOKIE, HeaderValue::from_static(cookie));
    tracing::info!(user_id = %account.user.id, "logout");
    Ok((headers, Json(StatusResponse::new("logged out"))))
}

#[utoipa::path(get, path = "/api/me", tag = "Auth", responses((status = 200, body = SessionUser)))]
pub async fn me(CurrentUser(account): CurrentUser) -> Json<SessionUser> {
    Json(SessionUser::from(&account))
}

// --- Bearer extractor & JWT utils ---

pub struct Bearer(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Bearer
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Authorization header wins over the cookie
        if let Some(auth) = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
        {
            if let Some(t) = auth.strip_prefix("Bearer ") {
                return Ok(Bearer(t.trim().to_string()));
            }
        }
        if let Some(cookie_hdr) = parts
            .headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
        {
            if let Some(token) = get_cookie(cookie_hdr, ACCESS_COOKIE) {
                return Ok(Bearer(token));
            }
        }
        Err(ApiError::Unauthorized)
    }
}

/// The authenticated, active account behind the request's session.
pub struct CurrentUser(pub Account);

impl CurrentUser {
    pub fn viewer(&self) -> Viewer {
        Viewer::from(&self.0)
    }
}

#[axum::async_trait]
impl FromRequestParts<AppContext> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let bearer = Bearer::from_request_parts(parts, ctx).await?;
        let user_id = validate_token(&ctx.cfg, &bearer.0)?;
        let repo = ctx.user_repo();
        let account = GetMe {
            repo: repo.as_ref(),
        }
        .execute(user_id)
        .await?
        .ok_or(ApiError::Unauthorized)?;
        Ok(CurrentUser(account))
    }
}

pub fn issue_token(cfg: &Config, user_id: Uuid) -> anyhow::Result<String> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (now + cfg.jwt_expires_secs.max(0)) as usize,
    };
    let token = jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(cfg.jwt_secret.as_bytes()),
    )?;
    Ok(token)
}

pub fn validate_token(cfg: &Config, token: &str) -> Result<Uuid, ApiError> {
    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(cfg.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| ApiError::Unauthorized)?;
    Uuid::parse_str(&data.claims.sub).map_err(|_| ApiError::Unauthorized)
}

// --- Cookie helpers ---

fn secure_cookies(cfg: &Config) -> bool {
    cfg.frontend_url
        .as_deref()
        .is_some_and(|u| u.starts_with("https://"))
}

fn get_cookie(cookie_header: &str, name: &str) -> Option<String> {
    cookie_header.split(';').find_map(|part| {
        let (k, v) = part.trim().split_once('=')?;
        (k.trim() == name).then(|| v.trim().to_string())
    })
}

fn build_access_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let secure_attr = if secure { "; Secure" } else { "" };
    format!(
        "{ACCESS_COOKIE}={}; HttpOnly{}; Path=/; Max-Age={}; SameSite=Lax",
        token,
        secure_attr,
        max_age_secs.max(0)
    )
}
