use async_trait::async_trait;
use uuid::Uuid;

use crate::application::dto::teams::{NewTeam, TeamFilter, TeamPatch};
use crate::domain::maintenance::team::MaintenanceTeam;

#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn list(&self, filter: &TeamFilter) -> anyhow::Result<Vec<MaintenanceTeam>>;
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<MaintenanceTeam>>;
    async fn find_by_name(&self, team_name: &str) -> anyhow::Result<Option<MaintenanceTeam>>;
    async fn create(&self, team: &NewTeam) -> anyhow::Result<MaintenanceTeam>;
    async fn update(&self, id: Uuid, patch: &TeamPatch)
    -> anyhow::Result<Option<MaintenanceTeam>>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}
