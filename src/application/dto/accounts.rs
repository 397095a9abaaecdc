use uuid::Uuid;

use super::{SortField, SortOrder};
use crate::domain::accounts::user::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSort {
    Username,
    Role,
}

impl SortField for ProfileSort {
    const ALL: &'static [Self] = &[ProfileSort::Username, ProfileSort::Role];

    fn name(&self) -> &'static str {
        match self {
            ProfileSort::Username => "username",
            ProfileSort::Role => "role",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProfileFilter {
    pub role: Option<Role>,
    pub team_id: Option<Uuid>,
    pub search: Option<String>,
    pub ordering: SortOrder<ProfileSort>,
}

impl Default for ProfileFilter {
    fn default() -> Self {
        Self {
            role: None,
            team_id: None,
            search: None,
            ordering: SortOrder::asc(ProfileSort::Username),
        }
    }
}

/// Account + profile creation input; `password` is plain text until hashed by the use case.
#[derive(Debug, Clone)]
pub struct CreateProfileInput {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub team_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub team_id: Option<Uuid>,
}

// team_id: None => not provided; Some(None) => clear; Some(Some(id)) => set
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub role: Option<Role>,
    pub team_id: Option<Option<Uuid>>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
    pub password_hash: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateProfileInput {
    pub role: Option<Role>,
    pub team_id: Option<Option<Uuid>>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
    pub password: Option<String>,
}
