use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::auth::password::verify_password;
use crate::domain::accounts::profile::Account;

pub struct Login<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl<'a, R: UserRepository + ?Sized> Login<'a, R> {
    /// `Ok(None)` for unknown users, inactive accounts and wrong passwords alike.
    pub async fn execute(&self, req: &LoginRequest) -> anyhow::Result<Option<Account>> {
        let row = match self.repo.find_credentials(req.username.trim()).await? {
            Some(r) => r,
            None => return Ok(None),
        };
        if !row.is_active {
            tracing::debug!(user_id = %row.id, "login_rejected_inactive");
            return Ok(None);
        }
        let hash = row.password_hash.unwrap_or_default();
        if !verify_password(&req.password, &hash) {
            return Ok(None);
        }
        self.repo.find_account(row.id).await
    }
}
