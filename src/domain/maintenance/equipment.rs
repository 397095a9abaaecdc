use chrono::NaiveDate;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Equipment {
    pub id: Uuid,
    pub name: String,
    pub serial_number: String,
    pub department: String,
    pub owner_name: String,
    pub location: String,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_expiry: Option<NaiveDate>,
    pub maintenance_team_id: Option<Uuid>,
    pub maintenance_team_name: Option<String>,
    pub is_active: bool,
    pub notes: String,
    pub open_request_count: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
