use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Postgres, QueryBuilder, Row};
use uuid::Uuid;

use crate::application::dto::accounts::{NewAccount, ProfileFilter, ProfilePatch, ProfileSort};
use crate::application::ports::user_repository::{UserRepository, UserRow};
use crate::domain::accounts::profile::{Account, Profile};
use crate::domain::accounts::user::{Role, User};
use crate::infrastructure::db::PgPool;
use crate::infrastructure::db::repositories::{like_pattern, map_unique, order_by};

const PROFILE_SELECT: &str = r#"SELECT p.id AS profile_id, p.role, p.team_id, t.team_name,
       p.created_at AS profile_created_at,
       u.id AS user_id, u.username, u.email, u.first_name, u.last_name, u.is_active,
       u.created_at AS user_created_at
  FROM user_profiles p
  JOIN users u ON u.id = p.user_id
  LEFT JOIN maintenance_teams t ON t.id = p.team_id"#;

pub struct SqlxUserRepository {
    pub pool: PgPool,
}

impl SqlxUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn parse_role(raw: &str) -> anyhow::Result<Role> {
    Role::parse(raw).ok_or_else(|| anyhow::anyhow!("unknown role '{raw}'"))
}

fn map_user(r: &PgRow) -> User {
    User {
        id: r.get("user_id"),
        username: r.get("username"),
        email: r.get("email"),
        first_name: r.get("first_name"),
        last_name: r.get("last_name"),
        is_active: r.get("is_active"),
        created_at: r.get("user_created_at"),
    }
}

fn map_profile(r: &PgRow) -> anyhow::Result<Profile> {
    Ok(Profile {
        id: r.get("profile_id"),
        role: parse_role(r.get::<String, _>("role").as_str())?,
        team_id: r.get("team_id"),
        team_name: r.get("team_name"),
        user: map_user(r),
        created_at: r.get("profile_created_at"),
    })
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn find_credentials(&self, username: &str) -> anyhow::Result<Option<UserRow>> {
        let row = sqlx::query(
            r#"SELECT id, username, is_active, password_hash FROM users WHERE username = $1"#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| UserRow {
            id: r.get("id"),
            username: r.get("username"),
            is_active: r.get("is_active"),
            password_hash: r.try_get("password_hash").ok(),
        }))
    }

    async fn find_account(&self, id: Uuid) -> anyhow::Result<Option<Account>> {
        let row = sqlx::query(
            r#"SELECT u.id AS user_id, u.username, u.email, u.first_name, u.last_name,
                      u.is_active, u.created_at AS user_created_at, p.role, p.team_id
                 FROM users u
                 LEFT JOIN user_profiles p ON p.user_id = u.id
                WHERE u.id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        let Some(r) = row else { return Ok(None) };
        let role = match r.get::<Option<String>, _>("role") {
            Some(raw) => Some(parse_role(&raw)?),
            None => None,
        };
        Ok(Some(Account {
            user: map_user(&r),
            role,
            team_id: r.get("team_id"),
        }))
    }

    async fn username_exists(&self, username: &str) -> anyhow::Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn create_with_profile(&self, account: &NewAccount) -> anyhow::Result<Profile> {
        let mut tx = self.pool.begin().await?;
        let user_id: Uuid = sqlx::query_scalar(
            r#"INSERT INTO users (username, email, first_name, last_name, password_hash)
               VALUES ($1, $2, $3, $4, $5) RETURNING id"#,
        )
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique(e, "username"))?;
        let profile_id: Uuid = sqlx::query_scalar(
            r#"INSERT INTO user_profiles (user_id, role, team_id) VALUES ($1, $2, $3) RETURNING id"#,
        )
        .bind(user_id)
        .bind(account.role.as_str())
        .bind(account.team_id)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        self.get_profile(profile_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("profile {profile_id} missing after insert"))
    }

    async fn list_profiles(&self, filter: &ProfileFilter) -> anyhow::Result<Vec<Profile>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(PROFILE_SELECT);
        qb.push(" WHERE TRUE");
        if let Some(role) = filter.role {
            qb.push(" AND p.role = ").push_bind(role.as_str());
        }
        if let Some(team_id) = filter.team_id {
            qb.push(" AND p.team_id = ").push_bind(team_id);
        }
        if let Some(search) = filter.search.as_deref() {
            let like = like_pattern(search);
            qb.push(" AND (u.username ILIKE ")
                .push_bind(like.clone())
                .push(" OR u.first_name ILIKE ")
                .push_bind(like.clone())
                .push(" OR u.last_name ILIKE ")
                .push_bind(like)
                .push(")");
        }
        qb.push(order_by(&filter.ordering, |f| match f {
            ProfileSort::Username => "u.username",
            ProfileSort::Role => "p.role",
        }));
        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(map_profile).collect()
    }

    async fn get_profile(&self, id: Uuid) -> anyhow::Result<Option<Profile>> {
        let row = sqlx::query(&format!("{PROFILE_SELECT} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_profile).transpose()
    }

    async fn update_profile(
        &self,
        id: Uuid,
        patch: &ProfilePatch,
    ) -> anyhow::Result<Option<Profile>> {
        let mut tx = self.pool.begin().await?;
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE user_profiles SET role = role");
        if let Some(role) = patch.role {
            qb.push(", role = ").push_bind(role.as_str());
        }
        if let Some(team_id) = patch.team_id {
            qb.push(", team_id = ").push_bind(team_id);
        }
        qb.push(" WHERE id = ").push_bind(id).push(" RETURNING user_id");
        let user_id: Option<Uuid> = qb
            .build_query_scalar()
            .fetch_optional(&mut *tx)
            .await?;
        let Some(user_id) = user_id else {
            return Ok(None);
        };

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE users SET id = id");
        if let Some(email) = &patch.email {
            qb.push(", email = ").push_bind(email.clone());
        }
        if let Some(first) = &patch.first_name {
            qb.push(", first_name = ").push_bind(first.clone());
        }
        if let Some(last) = &patch.last_name {
            qb.push(", last_name = ").push_bind(last.clone());
        }
        if let Some(active) = patch.is_active {
            qb.push(", is_active = ").push_bind(active);
        }
        if let Some(hash) = &patch.password_hash {
            qb.push(", password_hash = ").push_bind(hash.clone());
        }
        qb.push(" WHERE id = ").push_bind(user_id);
        qb.build().execute(&mut *tx).await?;
        tx.commit().await?;
        self.get_profile(id).await
    }

    async fn delete_profile(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query(
            "DELETE FROM users WHERE id = (SELECT user_id FROM user_profiles WHERE id = $1)",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }
}
