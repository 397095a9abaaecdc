use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

use crate::bootstrap::config::Config;

pub mod repositories;

pub type PgPool = Pool<Postgres>;

/// A request waiting longer than this for a connection fails instead of queueing forever.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

fn pool_options(cfg: &Config) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(cfg.db_max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
}

/// Opens the pool shared by every repository and the health check.
pub async fn connect_pool(cfg: &Config) -> anyhow::Result<PgPool> {
    let pool = pool_options(cfg)
        .connect(&cfg.database_url)
        .await
        .context("connecting to DATABASE_URL")?;
    tracing::info!(max_connections = cfg.db_max_connections, "database_pool_ready");
    Ok(pool)
}

/// Brings the schema in `migrations/` up to date; the files are embedded at compile time.
pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    let migrator = sqlx::migrate!("./migrations");
    migrator
        .run(pool)
        .await
        .context("applying database migrations")?;
    tracing::info!(known = migrator.iter().count(), "database_migrated");
    Ok(())
}
