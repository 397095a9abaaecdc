use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Postgres, QueryBuilder, Row};
use uuid::Uuid;

use crate::application::dto::equipment::{
    EquipmentFilter, EquipmentPatch, EquipmentSort, NewEquipment,
};
use crate::application::ports::equipment_repository::EquipmentRepository;
use crate::domain::maintenance::equipment::Equipment;
use crate::infrastructure::db::PgPool;
use crate::infrastructure::db::repositories::{like_pattern, map_unique, order_by};

const EQUIPMENT_SELECT: &str = r#"SELECT e.id, e.name, e.serial_number, e.department, e.owner_name,
       e.location, e.purchase_date, e.warranty_expiry, e.maintenance_team_id,
       t.team_name AS maintenance_team_name, e.is_active, e.notes, e.created_at,
       (SELECT COUNT(*) FROM maintenance_requests r
         WHERE r.equipment_id = e.id AND r.status NOT IN ('repaired', 'scrap'))::BIGINT
         AS open_request_count
  FROM equipment e
  LEFT JOIN maintenance_teams t ON t.id = e.maintenance_team_id"#;

pub struct SqlxEquipmentRepository {
    pub pool: PgPool,
}

impl SqlxEquipmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_equipment(r: &PgRow) -> Equipment {
    Equipment {
        id: r.get("id"),
        name: r.get("name"),
        serial_number: r.get("serial_number"),
        department: r.get("department"),
        owner_name: r.get("owner_name"),
        location: r.get("location"),
        purchase_date: r.get("purchase_date"),
        warranty_expiry: r.get("warranty_expiry"),
        maintenance_team_id: r.get("maintenance_team_id"),
        maintenance_team_name: r.get("maintenance_team_name"),
        is_active: r.get("is_active"),
        notes: r.get("notes"),
        open_request_count: r.get("open_request_count"),
        created_at: r.get("created_at"),
    }
}

#[async_trait]
impl EquipmentRepository for SqlxEquipmentRepository {
    async fn list(&self, filter: &EquipmentFilter) -> anyhow::Result<Vec<Equipment>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(EQUIPMENT_SELECT);
        qb.push(" WHERE TRUE");
        if let Some(team_id) = filter.maintenance_team_id {
            qb.push(" AND e.maintenance_team_id = ").push_bind(team_id);
        }
        if let Some(department) = &filter.department {
            qb.push(" AND e.department = ").push_bind(department.clone());
        }
        if let Some(active) = filter.is_active {
            qb.push(" AND e.is_active = ").push_bind(active);
        }
        if let Some(search) = filter.search.as_deref() {
            let like = like_pattern(search);
            qb.push(" AND (e.name ILIKE ")
                .push_bind(like.clone())
                .push(" OR e.serial_number ILIKE ")
                .push_bind(like.clone())
                .push(" OR e.owner_name ILIKE ")
                .push_bind(like)
                .push(")");
        }
        qb.push(order_by(&filter.ordering, |f| match f {
            EquipmentSort::Name => "e.name",
            EquipmentSort::PurchaseDate => "e.purchase_date",
        }));
        let rows = qb.build().fetch_all(&self.pool).await?;
        Ok(rows.iter().map(map_equipment).collect())
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<Equipment>> {
        let row = sqlx::query(&format!("{EQUIPMENT_SELECT} WHERE e.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(map_equipment))
    }

    async fn create(&self, equipment: &NewEquipment) -> anyhow::Result<Equipment> {
        let id: Uuid = sqlx::query_scalar(
            r#"INSERT INTO equipment (name, serial_number, department, owner_name, location,
                   purchase_date, warranty_expiry, maintenance_team_id, is_active, notes)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
               RETURNING id"#,
        )
        .bind(&equipment.name)
        .bind(&equipment.serial_number)
        .bind(&equipment.department)
        .bind(&equipment.owner_name)
        .bind(&equipment.location)
        .bind(equipment.purchase_date)
        .bind(equipment.warranty_expiry)
        .bind(equipment.maintenance_team_id)
        .bind(equipment.is_active)
        .bind(&equipment.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique(e, "serial_number"))?;
        self.get(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("equipment {id} missing after insert"))
    }

    async fn update(
        &self,
        id: Uuid,
        patch: &EquipmentPatch,
    ) -> anyhow::Result<Option<Equipment>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE equipment SET id = id");
        for (column, value) in [
            ("name", &patch.name),
            ("serial_number", &patch.serial_number),
            ("department", &patch.department),
            ("owner_name", &patch.owner_name),
            ("location", &patch.location),
            ("notes", &patch.notes),
        ] {
            if let Some(v) = value {
                qb.push(format!(", {column} = ")).push_bind(v.clone());
            }
        }
        if let Some(v) = patch.purchase_date {
            qb.push(", purchase_date = ").push_bind(v);
        }
        if let Some(v) = patch.warranty_expiry {
            qb.push(", warranty_expiry = ").push_bind(v);
        }
        if let Some(v) = patch.maintenance_team_id {
            qb.push(", maintenance_team_id = ").push_bind(v);
        }
        if let Some(v) = patch.is_active {
            qb.push(", is_active = ").push_bind(v);
        }
        qb.push(" WHERE id = ").push_bind(id);
        let res = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| map_unique(e, "serial_number"))?;
        if res.rows_affected() == 0 {
            return Ok(None);
        }
        self.get(id).await
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
