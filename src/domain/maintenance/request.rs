use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    New,
    InProgress,
    Repaired,
    Scrap,
}

impl RequestStatus {
    /// Kanban column order.
    pub const ALL: [RequestStatus; 4] = [
        RequestStatus::New,
        RequestStatus::InProgress,
        RequestStatus::Repaired,
        RequestStatus::Scrap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::New => "new",
            RequestStatus::InProgress => "in_progress",
            RequestStatus::Repaired => "repaired",
            RequestStatus::Scrap => "scrap",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RequestStatus::New => "New",
            RequestStatus::InProgress => "In Progress",
            RequestStatus::Repaired => "Repaired",
            RequestStatus::Scrap => "Scrap",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }

    /// Repaired and scrapped requests need no further work.
    pub fn is_closed(&self) -> bool {
        matches!(self, RequestStatus::Repaired | RequestStatus::Scrap)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    Corrective,
    Preventive,
}

impl RequestType {
    pub const ALL: [RequestType; 2] = [RequestType::Corrective, RequestType::Preventive];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Corrective => "corrective",
            RequestType::Preventive => "preventive",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RequestType::Corrective => "Corrective",
            RequestType::Preventive => "Preventive",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

#[derive(Debug, Clone)]
pub struct MaintenanceRequest {
    pub id: Uuid,
    pub subject: String,
    pub description: String,
    pub request_type: RequestType,
    pub status: RequestStatus,
    pub equipment_id: Option<Uuid>,
    pub equipment_name: Option<String>,
    pub team_id: Option<Uuid>,
    pub team_name: Option<String>,
    pub technician_id: Option<Uuid>,
    pub technician_name: Option<String>,
    pub created_by_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub scheduled_date: Option<chrono::DateTime<chrono::Utc>>,
    pub due_date: Option<NaiveDate>,
    pub duration_hours: Option<f64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl MaintenanceRequest {
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.due_date {
            Some(due) => due < today && !self.status.is_closed(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(status: RequestStatus, due_date: Option<NaiveDate>) -> MaintenanceRequest {
        let now = chrono::Utc::now();
        MaintenanceRequest {
            id: Uuid::new_v4(),
            subject: "Leaking pump".into(),
            description: String::new(),
            request_type: RequestType::Corrective,
            status,
            equipment_id: None,
            equipment_name: None,
            team_id: None,
            team_name: None,
            technician_id: None,
            technician_name: None,
            created_by_id: None,
            client_id: None,
            scheduled_date: None,
            due_date,
            duration_hours: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn status_wire_names_parse_back() {
        for status in RequestStatus::ALL {
            assert_eq!(RequestStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(RequestStatus::parse("done"), None);
        assert_eq!(RequestStatus::InProgress.label(), "In Progress");
    }

    #[test]
    fn overdue_only_for_open_requests_past_due() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();

        assert!(request(RequestStatus::New, Some(yesterday)).is_overdue(today));
        assert!(request(RequestStatus::InProgress, Some(yesterday)).is_overdue(today));
        assert!(!request(RequestStatus::Repaired, Some(yesterday)).is_overdue(today));
        assert!(!request(RequestStatus::Scrap, Some(yesterday)).is_overdue(today));
        assert!(!request(RequestStatus::New, Some(today)).is_overdue(today));
        assert!(!request(RequestStatus::New, None).is_overdue(today));
    }
}
