use crate::application::access::Viewer;
use crate::application::dto::requests::{RequestFilter, StatusColumn};
use crate::application::ports::request_repository::RequestRepository;
use crate::domain::maintenance::request::RequestStatus;

/// Requests grouped into one column per status, in board order.
pub struct RequestsByStatus<'a, R: RequestRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: RequestRepository + ?Sized> RequestsByStatus<'a, R> {
    pub async fn execute(&self, viewer: &Viewer) -> anyhow::Result<Vec<StatusColumn>> {
        let rows = self
            .repo
            .list(&viewer.request_scope(), &RequestFilter::default())
            .await?;
        let mut columns: Vec<StatusColumn> = RequestStatus::ALL
            .into_iter()
            .map(|status| StatusColumn {
                status,
                label: status.label(),
                count: 0,
                items: Vec::new(),
            })
            .collect();
        for row in rows {
            if let Some(col) = columns.iter_mut().find(|c| c.status == row.status) {
                col.items.push(row);
            }
        }
        for col in &mut columns {
            col.count = col.items.len();
        }
        Ok(columns)
    }
}
