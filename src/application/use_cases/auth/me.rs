use uuid::Uuid;

use crate::application::ports::user_repository::UserRepository;
use crate::domain::accounts::profile::Account;

pub struct GetMe<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> GetMe<'a, R> {
    pub async fn execute(&self, id: Uuid) -> anyhow::Result<Option<Account>> {
        Ok(self
            .repo
            .find_account(id)
            .await?
            .filter(|a| a.user.is_active))
    }
}
