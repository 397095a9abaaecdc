use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Postgres, QueryBuilder, Row};
use uuid::Uuid;

use crate::application::access::RequestScope;
use crate::application::dto::requests::{NewRequest, RequestFilter, RequestPatch, RequestSort};
use crate::application::ports::request_repository::RequestRepository;
use crate::domain::maintenance::request::{MaintenanceRequest, RequestStatus, RequestType};
use crate::infrastructure::db::PgPool;
use crate::infrastructure::db::repositories::{like_pattern, order_by};

const REQUEST_SELECT: &str = r#"SELECT r.id, r.subject, r.description, r.request_type, r.status,
       r.equipment_id, e.name AS equipment_name,
       r.team_id, t.team_name,
       r.technician_id,
       COALESCE(NULLIF(TRIM(u.first_name || ' ' || u.last_name), ''), u.username) AS technician_name,
       r.created_by_id, r.client_id, r.scheduled_date, r.due_date, r.duration_hours,
       r.created_at, r.updated_at
  FROM maintenance_requests r
  LEFT JOIN equipment e ON e.id = r.equipment_id
  LEFT JOIN maintenance_teams t ON t.id = r.team_id
  LEFT JOIN users u ON u.id = r.technician_id"#;

pub struct SqlxRequestRepository {
    pub pool: PgPool,
}

impl SqlxRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, id: Uuid) -> anyhow::Result<Option<MaintenanceRequest>> {
        let row = sqlx::query(&format!("{REQUEST_SELECT} WHERE r.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_request).transpose()
    }
}

const RETIRE_EQUIPMENT: &str = r#"UPDATE equipment SET is_active = FALSE
 WHERE id = (SELECT equipment_id FROM maintenance_requests WHERE id = $1)"#;

/// Appends the visibility predicate for `scope` to a query whose request table is aliased `r`.
fn push_scope(qb: &mut QueryBuilder<'_, Postgres>, scope: &RequestScope) {
    match scope {
        RequestScope::All => {}
        RequestScope::AssignedOrTeam {
            technician_id,
            team_id: Some(team_id),
        } => {
            qb.push(" AND (r.technician_id = ")
                .push_bind(*technician_id)
                .push(" OR r.team_id = ")
                .push_bind(*team_id)
                .push(")");
        }
        RequestScope::AssignedOrTeam {
            technician_id,
            team_id: None,
        } => {
            qb.push(" AND r.technician_id = ").push_bind(*technician_id);
        }
        RequestScope::Involved { user_id } => {
            qb.push(" AND (r.created_by_id = ")
                .push_bind(*user_id)
                .push(" OR r.client_id = ")
                .push_bind(*user_id)
                .push(")");
        }
        RequestScope::CreatedBy { user_id } => {
            qb.push(" AND r.created_by_id = ").push_bind(*user_id);
        }
    }
}

fn map_request(r: &PgRow) -> anyhow::Result<MaintenanceRequest> {
    let status: String = r.get("status");
    let request_type: String = r.get("request_type");
    Ok(MaintenanceRequest {
        id: r.get("id"),
        subject: r.get("subject"),
        description: r.get("description"),
        request_type: RequestType::parse(&request_type)
            .ok_or_else(|| anyhow::anyhow!("unknown request type '{request_type}'"))?,
        status: RequestStatus::parse(&status)
            .ok_or_else(|| anyhow::anyhow!("unknown request status '{status}'"))?,
        equipment_id: r.get("equipment_id"),
        equipment_name: r.get("equipment_name"),
        team_id: r.get("team_id"),
        team_name: r.get("team_name"),
        technician_id: r.get("technician_id"),
        technician_name: r.get("technician_name"),
        created_by_id: r.get("created_by_id"),
        client_id: r.get("client_id"),
        scheduled_date: r.get("scheduled_date"),
        due_date: r.get("due_date"),
        duration_hours: r.get("duration_hours"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    })
}

#[async_trait]
impl RequestRepository for SqlxRequestRepository {
    async fn list(
        &self,
        scope: &RequestScope,
        filter: &RequestFilter,
    ) -> anyhow::Result<Vec<MaintenanceRequest>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(REQUEST_SELECT);
        qb.push(" WHERE TRUE");
        push_scope(&mut qb, scope);
        if let Some(status) = filter.status {
            qb.push(" AND r.status = ").push_bind(status.as_str());
        }
        if let Some(request_type) = filter.request_type {
            qb.push(" AND r.request_type = ")
                .push_bind(request_type.as_str());
        }
        if let Some(team_id) = filter.team_id {
            qb.push(" AND r.team_id = ").push_bind(team_id);
        }
        if let Some(technician_id) = filter.technician_id {
            qb.push(" AND r.technician_id = ").push_bind(technician_id);
        }
        if let Some(search) = filter.search.as_deref() {
            let like = like_pattern(search);
            qb.push(" AND (r.subject ILIKE ")
                .push_bind(like.clone())
                .push(" OR e.name ILIKE ")
                .push_bind(like)
                .push(")");
        }
        qb.push(order_by(&filter.ordering, |f| match f {
            RequestSort::CreatedAt => "r.created_at",
            RequestSort::DueDate => "r.due_date",
            RequestSort::ScheduledDate => "r.scheduled_date",
        }));
        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(map_request).collect()
    }

    async fn get(
        &self,
        scope: &RequestScope,
        id: Uuid,
    ) -> anyhow::Result<Option<MaintenanceRequest>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(REQUEST_SELECT);
        qb.push(" WHERE r.id = ").push_bind(id);
        push_scope(&mut qb, scope);
        let row = qb.build().fetch_optional(&self.pool).await?;
        row.as_ref().map(map_request).transpose()
    }

    async fn create(&self, request: &NewRequest) -> anyhow::Result<MaintenanceRequest> {
        let mut tx = self.pool.begin().await?;
        let id: Uuid = sqlx::query_scalar(
            r#"INSERT INTO maintenance_requests (subject, description, request_type, status,
                   equipment_id, team_id, technician_id, created_by_id, client_id,
                   scheduled_date, due_date, duration_hours)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
               RETURNING id"#,
        )
        .bind(&request.subject)
        .bind(&request.description)
        .bind(request.request_type.as_str())
        .bind(request.status.as_str())
        .bind(request.equipment_id)
        .bind(request.team_id)
        .bind(request.technician_id)
        .bind(request.created_by_id)
        .bind(request.client_id)
        .bind(request.scheduled_date)
        .bind(request.due_date)
        .bind(request.duration_hours)
        .fetch_one(&mut *tx)
        .await?;
        if request.status == RequestStatus::Scrap {
            sqlx::query(RETIRE_EQUIPMENT)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        self.fetch(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("request {id} missing after insert"))
    }

    async fn update(
        &self,
        scope: &RequestScope,
        id: Uuid,
        patch: &RequestPatch,
    ) -> anyhow::Result<Option<MaintenanceRequest>> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE maintenance_requests r SET updated_at = now()");
        if let Some(v) = &patch.subject {
            qb.push(", subject = ").push_bind(v.clone());
        }
        if let Some(v) = &patch.description {
            qb.push(", description = ").push_bind(v.clone());
        }
        if let Some(v) = patch.request_type {
            qb.push(", request_type = ").push_bind(v.as_str());
        }
        if let Some(v) = patch.status {
            qb.push(", status = ").push_bind(v.as_str());
        }
        for (column, value) in [
            ("equipment_id", patch.equipment_id),
            ("team_id", patch.team_id),
            ("technician_id", patch.technician_id),
            ("client_id", patch.client_id),
        ] {
            if let Some(v) = value {
                qb.push(format!(", {column} = ")).push_bind(v);
            }
        }
        if let Some(v) = patch.scheduled_date {
            qb.push(", scheduled_date = ").push_bind(v);
        }
        if let Some(v) = patch.due_date {
            qb.push(", due_date = ").push_bind(v);
        }
        if let Some(v) = patch.duration_hours {
            qb.push(", duration_hours = ").push_bind(v);
        }
        qb.push(" WHERE r.id = ").push_bind(id);
        push_scope(&mut qb, scope);
        let mut tx = self.pool.begin().await?;
        let res = qb.build().execute(&mut *tx).await?;
        if res.rows_affected() == 0 {
            return Ok(None);
        }
        if patch.retire_equipment {
            sqlx::query(RETIRE_EQUIPMENT)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        // the update may move the row out of the caller's scope (e.g. reassignment)
        self.fetch(id).await
    }

    async fn delete(&self, scope: &RequestScope, id: Uuid) -> anyhow::Result<bool> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("DELETE FROM maintenance_requests r WHERE r.id = ");
        qb.push_bind(id);
        push_scope(&mut qb, scope);
        let res = qb.build().execute(&self.pool).await?;
        Ok(res.rows_affected() > 0)
    }
}
