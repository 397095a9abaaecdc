use chrono::NaiveDate;
use uuid::Uuid;

use super::{SortField, SortOrder};
use crate::domain::maintenance::request::{MaintenanceRequest, RequestStatus, RequestType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestSort {
    CreatedAt,
    DueDate,
    ScheduledDate,
}

impl SortField for RequestSort {
    const ALL: &'static [Self] = &[
        RequestSort::CreatedAt,
        RequestSort::DueDate,
        RequestSort::ScheduledDate,
    ];

    fn name(&self) -> &'static str {
        match self {
            RequestSort::CreatedAt => "created_at",
            RequestSort::DueDate => "due_date",
            RequestSort::ScheduledDate => "scheduled_date",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RequestFilter {
    pub status: Option<RequestStatus>,
    pub request_type: Option<RequestType>,
    pub team_id: Option<Uuid>,
    pub technician_id: Option<Uuid>,
    pub search: Option<String>,
    pub ordering: SortOrder<RequestSort>,
}

impl Default for RequestFilter {
    fn default() -> Self {
        Self {
            status: None,
            request_type: None,
            team_id: None,
            technician_id: None,
            search: None,
            ordering: SortOrder::desc(RequestSort::CreatedAt),
        }
    }
}

/// Request creation input as submitted by the caller.
#[derive(Debug, Clone)]
pub struct CreateRequestInput {
    pub subject: String,
    pub description: String,
    pub request_type: RequestType,
    pub status: RequestStatus,
    pub equipment_id: Option<Uuid>,
    pub team_id: Option<Uuid>,
    pub technician_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub scheduled_date: Option<chrono::DateTime<chrono::Utc>>,
    pub due_date: Option<NaiveDate>,
    pub duration_hours: Option<f64>,
}

/// Fully resolved row handed to the repository.
#[derive(Debug, Clone)]
pub struct NewRequest {
    pub subject: String,
    pub description: String,
    pub request_type: RequestType,
    pub status: RequestStatus,
    pub equipment_id: Option<Uuid>,
    pub team_id: Option<Uuid>,
    pub technician_id: Option<Uuid>,
    pub created_by_id: Uuid,
    pub client_id: Option<Uuid>,
    pub scheduled_date: Option<chrono::DateTime<chrono::Utc>>,
    pub due_date: Option<NaiveDate>,
    pub duration_hours: Option<f64>,
}

// Nullable fields: None => not provided; Some(None) => clear; Some(Some(v)) => set
#[derive(Debug, Clone, Default)]
pub struct RequestPatch {
    pub subject: Option<String>,
    pub description: Option<String>,
    pub request_type: Option<RequestType>,
    pub status: Option<RequestStatus>,
    pub equipment_id: Option<Option<Uuid>>,
    pub team_id: Option<Option<Uuid>>,
    pub technician_id: Option<Option<Uuid>>,
    pub client_id: Option<Option<Uuid>>,
    pub scheduled_date: Option<Option<chrono::DateTime<chrono::Utc>>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub duration_hours: Option<Option<f64>>,
    /// Deactivate the request's equipment together with the row update.
    pub retire_equipment: bool,
}

#[derive(Debug, Clone)]
pub struct StatusColumn {
    pub status: RequestStatus,
    pub label: &'static str,
    pub count: usize,
    pub items: Vec<MaintenanceRequest>,
}

#[derive(Debug, Clone)]
pub struct TeamCount {
    pub team_id: Option<Uuid>,
    pub team_name: Option<String>,
    pub count: usize,
}

#[derive(Debug, Clone)]
pub struct TypeCount {
    pub request_type: RequestType,
    pub count: usize,
}

#[derive(Debug, Clone)]
pub struct RequestSummary {
    pub total: usize,
    pub open: usize,
    pub overdue: usize,
    pub by_team: Vec<TeamCount>,
    pub by_type: Vec<TypeCount>,
}
