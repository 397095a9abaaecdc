use std::sync::Arc;

use crate::application::ports::equipment_repository::EquipmentRepository;
use crate::application::ports::notification_repository::NotificationRepository;
use crate::application::ports::request_repository::RequestRepository;
use crate::application::ports::team_repository::TeamRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::bootstrap::config::Config;
use crate::infrastructure::db::PgPool;
use crate::infrastructure::db::repositories::equipment_repository_sqlx::SqlxEquipmentRepository;
use crate::infrastructure::db::repositories::notification_repository_sqlx::SqlxNotificationRepository;
use crate::infrastructure::db::repositories::request_repository_sqlx::SqlxRequestRepository;
use crate::infrastructure::db::repositories::team_repository_sqlx::SqlxTeamRepository;
use crate::infrastructure::db::repositories::user_repository_sqlx::SqlxUserRepository;

/// Readiness probe used by the health endpoint.
#[async_trait::async_trait]
pub trait HealthProbe: Send + Sync {
    async fn ping(&self) -> anyhow::Result<()>;
}

#[async_trait::async_trait]
impl HealthProbe for PgPool {
    async fn ping(&self) -> anyhow::Result<()> {
        sqlx::query("SELECT 1").execute(self).await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

#[derive(Clone)]
pub struct AppServices {
    user_repo: Arc<dyn UserRepository>,
    team_repo: Arc<dyn TeamRepository>,
    equipment_repo: Arc<dyn EquipmentRepository>,
    request_repo: Arc<dyn RequestRepository>,
    notification_repo: Arc<dyn NotificationRepository>,
    health: Arc<dyn HealthProbe>,
}

impl AppServices {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        team_repo: Arc<dyn TeamRepository>,
        equipment_repo: Arc<dyn EquipmentRepository>,
        request_repo: Arc<dyn RequestRepository>,
        notification_repo: Arc<dyn NotificationRepository>,
        health: Arc<dyn HealthProbe>,
    ) -> Self {
        Self {
            user_repo,
            team_repo,
            equipment_repo,
            request_repo,
            notification_repo,
            health,
        }
    }

    /// Wires every port to its PostgreSQL adapter over a shared pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self::new(
            Arc::new(SqlxUserRepository::new(pool.clone())),
            Arc::new(SqlxTeamRepository::new(pool.clone())),
            Arc::new(SqlxEquipmentRepository::new(pool.clone())),
            Arc::new(SqlxRequestRepository::new(pool.clone())),
            Arc::new(SqlxNotificationRepository::new(pool.clone())),
            Arc::new(pool),
        )
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn user_repo(&self) -> Arc<dyn UserRepository> {
        self.services.user_repo.clone()
    }

    pub fn team_repo(&self) -> Arc<dyn TeamRepository> {
        self.services.team_repo.clone()
    }

    pub fn equipment_repo(&self) -> Arc<dyn EquipmentRepository> {
        self.services.equipment_repo.clone()
    }

    pub fn request_repo(&self) -> Arc<dyn RequestRepository> {
        self.services.request_repo.clone()
    }

    pub fn notification_repo(&self) -> Arc<dyn NotificationRepository> {
        self.services.notification_repo.clone()
    }

    pub fn health(&self) -> Arc<dyn HealthProbe> {
        self.services.health.clone()
    }
}
