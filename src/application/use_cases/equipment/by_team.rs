use uuid::Uuid;

use crate::application::dto::equipment::EquipmentFilter;
use crate::application::ports::equipment_repository::EquipmentRepository;
use crate::domain::maintenance::equipment::Equipment;

/// Active equipment maintained by a team.
pub struct EquipmentByTeam<'a, R: EquipmentRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: EquipmentRepository + ?Sized> EquipmentByTeam<'a, R> {
    pub async fn execute(&self, team_id: Uuid) -> anyhow::Result<Vec<Equipment>> {
        let filter = EquipmentFilter {
            maintenance_team_id: Some(team_id),
            is_active: Some(true),
            ..EquipmentFilter::default()
        };
        self.repo.list(&filter).await
    }
}
