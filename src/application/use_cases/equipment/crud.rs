use uuid::Uuid;

use crate::application::dto::equipment::{EquipmentFilter, EquipmentPatch, NewEquipment};
use crate::application::ports::equipment_repository::EquipmentRepository;
use crate::application::ports::team_repository::TeamRepository;
use crate::application::use_cases::references::ensure_team;
use crate::application::use_cases::write_error::{WriteError, optional_required, required};
use crate::domain::maintenance::equipment::Equipment;

pub struct ListEquipment<'a, R: EquipmentRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: EquipmentRepository + ?Sized> ListEquipment<'a, R> {
    pub async fn execute(&self, filter: &EquipmentFilter) -> anyhow::Result<Vec<Equipment>> {
        self.repo.list(filter).await
    }
}

pub struct GetEquipment<'a, R: EquipmentRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: EquipmentRepository + ?Sized> GetEquipment<'a, R> {
    pub async fn execute(&self, id: Uuid) -> anyhow::Result<Option<Equipment>> {
        self.repo.get(id).await
    }
}

pub struct CreateEquipment<'a, E, T>
where
    E: EquipmentRepository + ?Sized,
    T: TeamRepository + ?Sized,
{
    pub repo: &'a E,
    pub teams: &'a T,
}

impl<'a, E, T> CreateEquipment<'a, E, T>
where
    E: EquipmentRepository + ?Sized,
    T: TeamRepository + ?Sized,
{
    pub async fn execute(&self, input: NewEquipment) -> Result<Equipment, WriteError> {
        ensure_team(self.teams, "maintenance team", input.maintenance_team_id).await?;
        let equipment = NewEquipment {
            name: required("name", &input.name)?,
            serial_number: required("serial_number", &input.serial_number)?,
            department: input.department.trim().to_string(),
            owner_name: input.owner_name.trim().to_string(),
            location: input.location.trim().to_string(),
            ..input
        };
        Ok(self.repo.create(&equipment).await?)
    }
}

pub struct UpdateEquipment<'a, E, T>
where
    E: EquipmentRepository + ?Sized,
    T: TeamRepository + ?Sized,
{
    pub repo: &'a E,
    pub teams: &'a T,
}

impl<'a, E, T> UpdateEquipment<'a, E, T>
where
    E: EquipmentRepository + ?Sized,
    T: TeamRepository + ?Sized,
{
    pub async fn execute(&self, id: Uuid, patch: EquipmentPatch) -> Result<Equipment, WriteError> {
        if let Some(team_id) = patch.maintenance_team_id {
            ensure_team(self.teams, "maintenance team", team_id).await?;
        }
        let patch = EquipmentPatch {
            name: optional_required("name", patch.name.as_deref())?,
            serial_number: optional_required("serial_number", patch.serial_number.as_deref())?,
            ..patch
        };
        self.repo
            .update(id, &patch)
            .await?
            .ok_or(WriteError::NotFound)
    }
}

pub struct DeleteEquipment<'a, R: EquipmentRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: EquipmentRepository + ?Sized> DeleteEquipment<'a, R> {
    pub async fn execute(&self, id: Uuid) -> anyhow::Result<bool> {
        self.repo.delete(id).await
    }
}
