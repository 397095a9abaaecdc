use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Postgres, QueryBuilder, Row};
use uuid::Uuid;

use crate::application::dto::teams::{NewTeam, TeamFilter, TeamPatch, TeamSort};
use crate::application::ports::team_repository::TeamRepository;
use crate::domain::maintenance::team::MaintenanceTeam;
use crate::infrastructure::db::PgPool;
use crate::infrastructure::db::repositories::{like_pattern, map_unique, order_by};

const TEAM_SELECT: &str = r#"SELECT t.id, t.team_name, t.description, t.created_at,
       (SELECT COUNT(*) FROM user_profiles p WHERE p.team_id = t.id)::BIGINT AS member_count
  FROM maintenance_teams t"#;

pub struct SqlxTeamRepository {
    pub pool: PgPool,
}

impl SqlxTeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_team(r: &PgRow) -> MaintenanceTeam {
    MaintenanceTeam {
        id: r.get("id"),
        team_name: r.get("team_name"),
        description: r.get("description"),
        member_count: r.get("member_count"),
        created_at: r.get("created_at"),
    }
}

#[async_trait]
impl TeamRepository for SqlxTeamRepository {
    async fn list(&self, filter: &TeamFilter) -> anyhow::Result<Vec<MaintenanceTeam>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(TEAM_SELECT);
        if let Some(search) = filter.search.as_deref() {
            qb.push(" WHERE t.team_name ILIKE ")
                .push_bind(like_pattern(search));
        }
        qb.push(order_by(&filter.ordering, |f| match f {
            TeamSort::TeamName => "t.team_name",
        }));
        let rows = qb.build().fetch_all(&self.pool).await?;
        Ok(rows.iter().map(map_team).collect())
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<MaintenanceTeam>> {
        let row = sqlx::query(&format!("{TEAM_SELECT} WHERE t.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(map_team))
    }

    async fn find_by_name(&self, team_name: &str) -> anyhow::Result<Option<MaintenanceTeam>> {
        let row = sqlx::query(&format!("{TEAM_SELECT} WHERE t.team_name = $1"))
            .bind(team_name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(map_team))
    }

    async fn create(&self, team: &NewTeam) -> anyhow::Result<MaintenanceTeam> {
        let row = sqlx::query(
            r#"INSERT INTO maintenance_teams (team_name, description) VALUES ($1, $2)
               RETURNING id, team_name, description, created_at, 0::BIGINT AS member_count"#,
        )
        .bind(&team.team_name)
        .bind(&team.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique(e, "team_name"))?;
        Ok(map_team(&row))
    }

    async fn update(
        &self,
        id: Uuid,
        patch: &TeamPatch,
    ) -> anyhow::Result<Option<MaintenanceTeam>> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE maintenance_teams SET id = id");
        if let Some(name) = &patch.team_name {
            qb.push(", team_name = ").push_bind(name.clone());
        }
        if let Some(description) = &patch.description {
            qb.push(", description = ").push_bind(description.clone());
        }
        qb.push(" WHERE id = ").push_bind(id);
        let res = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| map_unique(e, "team_name"))?;
        if res.rows_affected() == 0 {
            return Ok(None);
        }
        self.get(id).await
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM maintenance_teams WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
