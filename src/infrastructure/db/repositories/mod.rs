pub mod equipment_repository_sqlx;
pub mod notification_repository_sqlx;
pub mod request_repository_sqlx;
pub mod team_repository_sqlx;
pub mod user_repository_sqlx;

use crate::application::dto::{SortField, SortOrder};
use crate::application::ports::errors::DuplicateKey;

/// Maps a Postgres unique violation (SQLSTATE 23505) to `DuplicateKey`.
pub(crate) fn map_unique(err: sqlx::Error, field: &'static str) -> anyhow::Error {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some("23505") {
            return DuplicateKey { field }.into();
        }
    }
    err.into()
}

/// `ORDER BY` clause for a whitelisted sort field; `column` maps the field to its qualified column.
pub(crate) fn order_by<F: SortField>(
    order: &SortOrder<F>,
    column: impl Fn(F) -> &'static str,
) -> String {
    let dir = if order.descending { "DESC" } else { "ASC" };
    format!(" ORDER BY {} {}", column(order.field), dir)
}

pub(crate) fn like_pattern(search: &str) -> String {
    format!("%{}%", search.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_"))
}
