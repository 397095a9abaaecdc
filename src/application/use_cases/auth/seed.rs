use crate::application::dto::accounts::NewAccount;
use crate::application::ports::team_repository::TeamRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::auth::password::hash_password;
use crate::domain::accounts::user::Role;

pub const DEMO_PASSWORD: &str = "password123";

#[derive(Debug, Clone, Copy)]
pub struct DemoUser {
    pub username: &'static str,
    pub role: Role,
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub team_name: Option<&'static str>,
}

pub const DEMO_USERS: [DemoUser; 3] = [
    DemoUser {
        username: "manager",
        role: Role::Manager,
        first_name: "Admin",
        last_name: "User",
        team_name: None,
    },
    DemoUser {
        username: "client",
        role: Role::User,
        first_name: "Client",
        last_name: "User",
        team_name: None,
    },
    DemoUser {
        username: "tech",
        role: Role::Technician,
        first_name: "Tech",
        last_name: "User",
        team_name: Some("General Maintenance"),
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    Created { username: String, role: Role },
    AlreadyExists { username: String },
}

pub struct SeedDemoUsers<'a, U, T>
where
    U: UserRepository + ?Sized,
    T: TeamRepository + ?Sized,
{
    pub users: &'a U,
    pub teams: &'a T,
}

impl<'a, U, T> SeedDemoUsers<'a, U, T>
where
    U: UserRepository + ?Sized,
    T: TeamRepository + ?Sized,
{
    /// Creates the demo accounts that do not exist yet. Safe to run repeatedly.
    pub async fn execute(&self) -> anyhow::Result<Vec<SeedOutcome>> {
        let mut out = Vec::with_capacity(DEMO_USERS.len());
        for demo in DEMO_USERS {
            if self.users.username_exists(demo.username).await? {
                out.push(SeedOutcome::AlreadyExists {
                    username: demo.username.to_string(),
                });
                continue;
            }
            let team_id = match demo.team_name {
                Some(name) => self.teams.find_by_name(name).await?.map(|t| t.id),
                None => None,
            };
            if demo.team_name.is_some() && team_id.is_none() {
                tracing::warn!(
                    username = demo.username,
                    team = ?demo.team_name,
                    "seed_team_missing"
                );
            }
            let account = NewAccount {
                username: demo.username.to_string(),
                password_hash: hash_password(DEMO_PASSWORD)?,
                email: format!("{}@example.com", demo.username),
                first_name: demo.first_name.to_string(),
                last_name: demo.last_name.to_string(),
                role: demo.role,
                team_id,
            };
            self.users.create_with_profile(&account).await?;
            out.push(SeedOutcome::Created {
                username: demo.username.to_string(),
                role: demo.role,
            });
        }
        Ok(out)
    }
}
