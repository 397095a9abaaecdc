use async_trait::async_trait;
use uuid::Uuid;

use crate::application::dto::accounts::{NewAccount, ProfileFilter, ProfilePatch};
use crate::domain::accounts::profile::{Account, Profile};

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub is_active: bool,
    pub password_hash: Option<String>,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_credentials(&self, username: &str) -> anyhow::Result<Option<UserRow>>;
    async fn find_account(&self, id: Uuid) -> anyhow::Result<Option<Account>>;
    async fn username_exists(&self, username: &str) -> anyhow::Result<bool>;

    /// Creates the user and its profile atomically.
    async fn create_with_profile(&self, account: &NewAccount) -> anyhow::Result<Profile>;
    async fn list_profiles(&self, filter: &ProfileFilter) -> anyhow::Result<Vec<Profile>>;
    async fn get_profile(&self, id: Uuid) -> anyhow::Result<Option<Profile>>;
    async fn update_profile(
        &self,
        id: Uuid,
        patch: &ProfilePatch,
    ) -> anyhow::Result<Option<Profile>>;
    /// Deletes the profile together with its user.
    async fn delete_profile(&self, id: Uuid) -> anyhow::Result<bool>;
}
