use crate::application::access::Viewer;
use crate::application::dto::requests::{CreateRequestInput, NewRequest};
use crate::application::ports::equipment_repository::EquipmentRepository;
use crate::application::ports::notification_repository::NotificationRepository;
use crate::application::ports::request_repository::RequestRepository;
use crate::application::ports::team_repository::TeamRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::references::{ensure_team, ensure_user, load_equipment};
use crate::application::use_cases::requests::notify::notify_assignment;
use crate::application::use_cases::write_error::{WriteError, required};
use crate::domain::maintenance::request::{MaintenanceRequest, RequestStatus};

pub struct CreateRequest<'a, R, E, T, U, N>
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

pub(crate) fn ensure_duration(hours: Option<f64>) -> Result<(), WriteError> {
    match hours {
        Some(h) if !h.is_finite() || h < 0.0 => Err(WriteError::Invalid(
            "duration_hours must be a non-negative number".into(),
        )),
        _ => Ok(()),
    }
}

impl<'a, R, E, T, U, N> CreateRequest<'a, R, E, T, U, N>
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
        input: CreateRequestInput,
    ) -> Result<MaintenanceRequest, WriteError> {
        let subject = required("subject", &input.subject)?;
        ensure_duration(input.duration_hours)?;
        let equipment = load_equipment(self.equipment, input.equipment_id).await?;
        ensure_team(self.teams, "team", input.team_id).await?;
        ensure_user(self.users, "technician", input.technician_id).await?;
        ensure_user(self.users, "client", input.client_id).await?;

        let team_id = input
            .team_id
            .or_else(|| equipment.as_ref().and_then(|e| e.maintenance_team_id));
        let client_id = match input.client_id {
            Some(id) => Some(id),
            None if viewer.is_client() => Some(viewer.user_id),
            None => None,
        };

        let row = NewRequest {
            subject,
            description: input.description.trim().to_string(),
            request_type: input.request_type,
            status: input.status,
            equipment_id: input.equipment_id,
            team_id,
            technician_id: input.technician_id,
            created_by_id: viewer.user_id,
            client_id,
            scheduled_date: input.scheduled_date,
            due_date: input.due_date,
            duration_hours: input.duration_hours,
        };
        let created = self.requests.create(&row).await?;
        tracing::info!(
            request_id = %created.id,
            user_id = %viewer.user_id,
            status = created.status.as_str(),
            "request_created"
        );

        notify_assignment(self.notifications, &created, viewer.user_id).await;
        if created.status == RequestStatus::Scrap {
            if let Some(equipment_id) = created.equipment_id {
                tracing::info!(
                    request_id = %created.id,
                    equipment_id = %equipment_id,
                    "equipment_retired"
                );
            }
        }
        Ok(created)
    }
}
