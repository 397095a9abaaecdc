use uuid::Uuid;

use crate::application::access::Viewer;
use crate::application::dto::requests::RequestPatch;
use crate::application::ports::equipment_repository::EquipmentRepository;
use crate::application::ports::notification_repository::NotificationRepository;
use crate::application::ports::request_repository::RequestRepository;
use crate::application::ports::team_repository::TeamRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::references::{ensure_team, ensure_user, load_equipment};
use crate::application::use_cases::requests::create_request::ensure_duration;
use crate::application::use_cases::requests::notify::{notify_assignment, notify_status_change};
use crate::application::use_cases::write_error::{WriteError, optional_required};
use crate::domain::maintenance::request::{MaintenanceRequest, RequestStatus};

pub struct UpdateRequest<'a, R, E, T, U, N>
where
    R: RequestRepository + ?Sized,
    E: EquipmentRepository + ?Sized,
    T: TeamRepository + ?Sized,
    U: UserRepository + ?Sized,
    N: NotificationRepository + ?Sized,
{
    pub requests: &'a R,
    pub equipment: &'a E,
    pub teams: &'a T,
    pub users: &'a U,
    pub notifications: &'a N,
}

impl<'a, R, E, T, U, N> UpdateRequest<'a, R, E, T, U, N>
where
    R: RequestRepository + ?Sized,
    E: EquipmentRepository + ?Sized,
    T: TeamRepository + ?Sized,
    U: UserRepository + ?Sized,
    N: NotificationRepository + ?Sized,
{
    pub async fn execute(
        &self,
        viewer: &Viewer,
        id: Uuid,
        patch: RequestPatch,
    ) -> Result<MaintenanceRequest, WriteError> {
        let scope = viewer.request_scope();
        let before = self
            .requests
            .get(&scope, id)
            .await?
            .ok_or(WriteError::NotFound)?;

        if let Some(equipment_id) = patch.equipment_id {
            load_equipment(self.equipment, equipment_id).await?;
        }
        if let Some(team_id) = patch.team_id {
            ensure_team(self.teams, "team", team_id).await?;
        }
        if let Some(technician_id) = patch.technician_id {
            ensure_user(self.users, "technician", technician_id).await?;
        }
        if let Some(client_id) = patch.client_id {
            ensure_user(self.users, "client", client_id).await?;
        }
        if let Some(hours) = patch.duration_hours {
            ensure_duration(hours)?;
        }
        let patch = RequestPatch {
            subject: optional_required("subject", patch.subject.as_deref())?,
            description: patch.description.map(|d| d.trim().to_string()),
            retire_equipment: patch.status == Some(RequestStatus::Scrap)
                && before.status != RequestStatus::Scrap,
            ..patch
        };

        let after = self
            .requests
            .update(&scope, id, &patch)
            .await?
            .ok_or(WriteError::NotFound)?;

        if after.technician_id.is_some() && after.technician_id != before.technician_id {
            notify_assignment(self.notifications, &after, viewer.user_id).await;
        }
        if after.status != before.status {
            tracing::info!(
                request_id = %id,
                user_id = %viewer.user_id,
                from = before.status.as_str(),
                to = after.status.as_str(),
                "request_status_changed"
            );
            notify_status_change(self.notifications, &after, viewer.user_id).await;
        }
        if patch.retire_equipment {
            if let Some(equipment_id) = after.equipment_id {
                tracing::info!(
                    request_id = %id,
                    equipment_id = %equipment_id,
                    "equipment_retired"
                );
            }
        }
        Ok(after)
    }
}
