use dotenvy::dotenv;
use tracing::info;

use gearguard_api::application::use_cases::auth::seed::{DEMO_PASSWORD, SeedDemoUsers, SeedOutcome};
use gearguard_api::bootstrap::config::Config;
use gearguard_api::infrastructure::db::repositories::team_repository_sqlx::SqlxTeamRepository;
use gearguard_api::infrastructure::db::repositories::user_repository_sqlx::SqlxUserRepository;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "gearguard_api=info,seed_demo_users=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    let pool = gearguard_api::infrastructure::db::connect_pool(&cfg).await?;
    gearguard_api::infrastructure::db::migrate(&pool).await?;

    let users = SqlxUserRepository::new(pool.clone());
    let teams = SqlxTeamRepository::new(pool);
    let outcomes = SeedDemoUsers {
        users: &users,
        teams: &teams,
    }
    .execute()
    .await?;

    for outcome in &outcomes {
        match outcome {
            SeedOutcome::Created { username, role } => {
                info!(%username, %role, "demo_user_created")
            }
            SeedOutcome::AlreadyExists { username } => {
                info!(%username, "demo_user_already_exists")
            }
        }
    }
    info!(password = DEMO_PASSWORD, "demo_users_ready");
    Ok(())
}
