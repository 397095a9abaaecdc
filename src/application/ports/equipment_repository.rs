use async_trait::async_trait;
use uuid::Uuid;

use crate::application::dto::equipment::{EquipmentFilter, EquipmentPatch, NewEquipment};
use crate::domain::maintenance::equipment::Equipment;

#[async_trait]
pub trait EquipmentRepository: Send + Sync {
    async fn list(&self, filter: &EquipmentFilter) -> anyhow::Result<Vec<Equipment>>;
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Equipment>>;
    async fn create(&self, equipment: &NewEquipment) -> anyhow::Result<Equipment>;
    async fn update(&self, id: Uuid, patch: &EquipmentPatch)
    -> anyhow::Result<Option<Equipment>>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}
