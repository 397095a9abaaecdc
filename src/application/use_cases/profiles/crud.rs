use uuid::Uuid;

use crate::application::dto::accounts::{
    CreateProfileInput, NewAccount, ProfileFilter, ProfilePatch, UpdateProfileInput,
};
use crate::application::ports::team_repository::TeamRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::auth::password::hash_password;
use crate::application::use_cases::references::ensure_team;
use crate::application::use_cases::write_error::{WriteError, required};
use crate::domain::accounts::profile::Profile;

pub struct ListProfiles<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> ListProfiles<'a, R> {
    pub async fn execute(&self, filter: &ProfileFilter) -> anyhow::Result<Vec<Profile>> {
        self.repo.list_profiles(filter).await
    }
}

pub struct GetProfile<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> GetProfile<'a, R> {
    pub async fn execute(&self, id: Uuid) -> anyhow::Result<Option<Profile>> {
        self.repo.get_profile(id).await
    }
}

pub struct CreateProfile<'a, U, T>
where
    U: UserRepository + ?Sized,
    T: TeamRepository + ?Sized,
{
    pub users: &'a U,
    pub teams: &'a T,
}

impl<'a, U, T> CreateProfile<'a, U, T>
where
    U: UserRepository + ?Sized,
    T: TeamRepository + ?Sized,
{
    pub async fn execute(&self, input: CreateProfileInput) -> Result<Profile, WriteError> {
        let username = required("username", &input.username)?;
        if input.password.is_empty() {
            return Err(WriteError::Invalid("password may not be blank".into()));
        }
        if self.users.username_exists(&username).await? {
            return Err(WriteError::Invalid("username already exists".into()));
        }
        ensure_team(self.teams, "team", input.team_id).await?;

        let account = NewAccount {
            username,
            password_hash: hash_password(&input.password)?,
            email: input.email.trim().to_string(),
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            role: input.role,
            team_id: input.team_id,
        };
        let profile = self.users.create_with_profile(&account).await?;
        tracing::info!(profile_id = %profile.id, role = %profile.role, "profile_created");
        Ok(profile)
    }
}

pub struct UpdateProfile<'a, U, T>
where
    U: UserRepository + ?Sized,
    T: TeamRepository + ?Sized,
{
    pub users: &'a U,
    pub teams: &'a T,
}

impl<'a, U, T> UpdateProfile<'a, U, T>
where
    U: UserRepository + ?Sized,
    T: TeamRepository + ?Sized,
{
    pub async fn execute(
        &self,
        id: Uuid,
        input: UpdateProfileInput,
    ) -> Result<Profile, WriteError> {
        if let Some(team_id) = input.team_id {
            ensure_team(self.teams, "team", team_id).await?;
        }
        let password_hash = match input.password.as_deref() {
            Some("") => return Err(WriteError::Invalid("password may not be blank".into())),
            Some(p) => Some(hash_password(p)?),
            None => None,
        };
        let patch = ProfilePatch {
            role: input.role,
            team_id: input.team_id,
            email: input.email.map(|e| e.trim().to_string()),
            first_name: input.first_name.map(|s| s.trim().to_string()),
            last_name: input.last_name.map(|s| s.trim().to_string()),
            is_active: input.is_active,
            password_hash,
        };
        self.users
            .update_profile(id, &patch)
            .await?
            .ok_or(WriteError::NotFound)
    }
}

pub struct DeleteProfile<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> DeleteProfile<'a, R> {
    pub async fn execute(&self, id: Uuid) -> anyhow::Result<bool> {
        self.repo.delete_profile(id).await
    }
}
