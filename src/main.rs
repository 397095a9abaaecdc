use std::net::SocketAddr;

use axum::extract::MatchedPath;
use dotenvy::dotenv;
use http::HeaderValue;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use gearguard_api::bootstrap::app_context::{AppContext, AppServices};
use gearguard_api::bootstrap::config::Config;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
        paths(
            gearguard_api::presentation::http::health::health,
            gearguard_api::presentation::http::auth::login,
            gearguard_api::presentation::http::auth::logout,
            gearguard_api::presentation::http::auth::me,
            gearguard_api::presentation::http::teams::list_teams,
            gearguard_api::presentation::http::teams::create_team,
            gearguard_api::presentation::http::teams::get_team,
            gearguard_api::presentation::http::teams::update_team,
            gearguard_api::presentation::http::teams::delete_team,
            gearguard_api::presentation::http::profiles::list_profiles,
            gearguard_api::presentation::http::profiles::list_technicians,
            gearguard_api::presentation::http::profiles::profiles_by_team,
            gearguard_api::presentation::http::profiles::create_profile,
            gearguard_api::presentation::http::profiles::get_profile,
            gearguard_api::presentation::http::profiles::update_profile,
            gearguard_api::presentation::http::profiles::delete_profile,
            gearguard_api::presentation::http::equipment::list_equipment,
            gearguard_api::presentation::http::equipment::equipment_by_team,
            gearguard_api::presentation::http::equipment::create_equipment,
            gearguard_api::presentation::http::equipment::get_equipment,
            gearguard_api::presentation::http::equipment::update_equipment,
            gearguard_api::presentation::http::equipment::delete_equipment,
            gearguard_api::presentation::http::requests::list_requests,
            gearguard_api::presentation::http::requests::requests_by_status,
            gearguard_api::presentation::http::requests::requests_summary,
            gearguard_api::presentation::http::requests::create_request,
            gearguard_api::presentation::http::requests::get_request,
            gearguard_api::presentation::http::requests::update_request,
            gearguard_api::presentation::http::requests::delete_request,
            gearguard_api::presentation::http::notifications::list_notifications,
            gearguard_api::presentation::http::notifications::create_notification,
            gearguard_api::presentation::http::notifications::get_notification,
            gearguard_api::presentation::http::notifications::update_notification,
            gearguard_api::presentation::http::notifications::delete_notification,
            gearguard_api::presentation::http::notifications::mark_read,
        ),
        components(schemas(
            gearguard_api::presentation::http::StatusResponse,
            gearguard_api::presentation::http::error::ErrorBody,
            gearguard_api::presentation::http::health::HealthResp,
            gearguard_api::presentation::http::auth::LoginRequest,
            gearguard_api::presentation::http::auth::LoginResponse,
            gearguard_api::presentation::http::auth::SessionUser,
            gearguard_api::presentation::http::teams::TeamResponse,
            gearguard_api::presentation::http::teams::CreateTeamRequest,
            gearguard_api::presentation::http::teams::UpdateTeamRequest,
            gearguard_api::presentation::http::profiles::UserSummary,
            gearguard_api::presentation::http::profiles::ProfileResponse,
            gearguard_api::presentation::http::profiles::CreateProfileRequest,
            gearguard_api::presentation::http::profiles::UpdateProfileRequest,
            gearguard_api::presentation::http::equipment::EquipmentResponse,
            gearguard_api::presentation::http::equipment::CreateEquipmentRequest,
            gearguard_api::presentation::http::equipment::UpdateEquipmentRequest,
            gearguard_api::presentation::http::requests::RequestResponse,
            gearguard_api::presentation::http::requests::StatusColumnResponse,
            gearguard_api::presentation::http::requests::KanbanResponse,
            gearguard_api::presentation::http::requests::TeamCountResponse,
            gearguard_api::presentation::http::requests::TypeCountResponse,
            gearguard_api::presentation::http::requests::SummaryResponse,
            gearguard_api::presentation::http::requests::CreateRequestBody,
            gearguard_api::presentation::http::requests::UpdateRequestBody,
            gearguard_api::presentation::http::notifications::NotificationResponse,
            gearguard_api::presentation::http::notifications::CreateNotificationRequest,
            gearguard_api::presentation::http::notifications::UpdateNotificationRequest,
            gearguard_api::domain::accounts::user::Role,
            gearguard_api::domain::maintenance::request::RequestStatus,
            gearguard_api::domain::maintenance::request::RequestType,
        )),
        tags(
            (name = "Auth", description = "Session login and logout"),
            (name = "Teams", description = "Maintenance teams"),
            (name = "Profiles", description = "User accounts and roles"),
            (name = "Equipment", description = "Equipment register"),
            (name = "Requests", description = "Maintenance requests, Kanban and reporting"),
            (name = "Notifications", description = "Per-user notifications"),
            (name = "Health", description = "System health checks")
        )
    )]
struct ApiDoc;

fn methods() -> [http::Method; 6] {
    [
        http::Method::GET,
        http::Method::POST,
        http::Method::PUT,
        http::Method::DELETE,
        http::Method::PATCH,
        http::Method::OPTIONS,
    ]
}

fn build_cors(cfg: &Config) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods(methods())
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION]);
    match cfg.frontend_url.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => base.allow_origin(origin).allow_credentials(true),
        // production requires FRONTEND_URL (enforced by Config::validate); deny everything otherwise
        _ if cfg.is_production => {
            base.allow_origin(AllowOrigin::exact(HeaderValue::from_static("http://invalid")))
        }
        _ => base
            .allow_origin(AllowOrigin::mirror_request())
            .allow_credentials(true),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "gearguard_api=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(
        api_port = cfg.api_port,
        is_production = cfg.is_production,
        frontend_url = ?cfg.frontend_url,
        "Starting GearGuard backend"
    );

    let pool = gearguard_api::infrastructure::db::connect_pool(&cfg).await?;
    gearguard_api::infrastructure::db::migrate(&pool).await?;

    let ctx = AppContext::new(cfg.clone(), AppServices::postgres(pool));

    let app = gearguard_api::presentation::http::api_router(ctx)
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .layer(build_cors(&cfg))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        );

    let api_addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%api_addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(api_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = ?e, "shutdown_signal_failed");
    }
    info!("shutdown_requested");
}
