use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct MaintenanceTeam {
    pub id: Uuid,
    pub team_name: String,
    pub description: String,
    pub member_count: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
