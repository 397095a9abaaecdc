use uuid::Uuid;

use super::user::{Role, User};

/// Role/team metadata attached to an account, loaded together with the account.
#[derive(Debug, Clone)]
pub struct Profile {
    pub id: Uuid,
    pub role: Role,
    pub team_id: Option<Uuid>,
    pub team_name: Option<String>,
    pub user: User,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// An account as seen by the session layer: the user plus its profile, if any.
#[derive(Debug, Clone)]
pub struct Account {
    pub user: User,
    pub role: Option<Role>,
    pub team_id: Option<Uuid>,
}

impl Account {
    /// Accounts without a profile are treated as plain users.
    pub fn effective_role(&self) -> Role {
        self.role.unwrap_or(Role::User)
    }
}
