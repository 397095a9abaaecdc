use uuid::Uuid;

use crate::application::dto::accounts::ProfileFilter;
use crate::application::ports::user_repository::UserRepository;
use crate::domain::accounts::profile::Profile;
use crate::domain::accounts::user::Role;

pub struct ListTechnicians<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> ListTechnicians<'a, R> {
    pub async fn execute(&self, team_id: Option<Uuid>) -> anyhow::Result<Vec<Profile>> {
        let filter = ProfileFilter {
            role: Some(Role::Technician),
            team_id,
            ..ProfileFilter::default()
        };
        self.repo.list_profiles(&filter).await
    }
}

pub struct ListTeamMembers<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> ListTeamMembers<'a, R> {
    pub async fn execute(&self, team_id: Uuid) -> anyhow::Result<Vec<Profile>> {
        let filter = ProfileFilter {
            team_id: Some(team_id),
            ..ProfileFilter::default()
        };
        self.repo.list_profiles(&filter).await
    }
}
