use uuid::Uuid;

use crate::domain::accounts::profile::Account;
use crate::domain::accounts::user::Role;
use crate::domain::maintenance::request::MaintenanceRequest;

/// The authenticated caller. `role` is `None` for accounts without a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: Uuid,
    pub role: Option<Role>,
    pub team_id: Option<Uuid>,
}

impl From<&Account> for Viewer {
    fn from(account: &Account) -> Self {
        Viewer {
            user_id: account.user.id,
            role: account.role,
            team_id: account.team_id,
        }
    }
}

/// Subset of maintenance requests a viewer may see or modify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestScope {
    All,
    /// Assigned to the technician, or to the technician's team when they have one.
    AssignedOrTeam {
        technician_id: Uuid,
        team_id: Option<Uuid>,
    },
    /// Created by the user or naming them as the client.
    Involved { user_id: Uuid },
    CreatedBy { user_id: Uuid },
}

impl Viewer {
    pub fn request_scope(&self) -> RequestScope {
        match self.role {
            Some(Role::Manager) => RequestScope::All,
            Some(Role::Technician) => RequestScope::AssignedOrTeam {
                technician_id: self.user_id,
                team_id: self.team_id,
            },
            Some(Role::User) => RequestScope::Involved {
                user_id: self.user_id,
            },
            None => RequestScope::CreatedBy {
                user_id: self.user_id,
            },
        }
    }

    pub fn is_client(&self) -> bool {
        self.role == Some(Role::User)
    }
}

impl RequestScope {
    pub fn permits(&self, req: &MaintenanceRequest) -> bool {
        match self {
            RequestScope::All => true,
            RequestScope::AssignedOrTeam {
                technician_id,
                team_id,
            } => {
                req.technician_id == Some(*technician_id)
                    || (team_id.is_some() && req.team_id == *team_id)
            }
            RequestScope::Involved { user_id } => {
                req.created_by_id == Some(*user_id) || req.client_id == Some(*user_id)
            }
            RequestScope::CreatedBy { user_id } => req.created_by_id == Some(*user_id),
        }
    }
}
