use uuid::Uuid;

use crate::application::access::Viewer;
use crate::application::dto::requests::RequestFilter;
use crate::application::ports::request_repository::RequestRepository;
use crate::domain::maintenance::request::MaintenanceRequest;

pub struct ListRequests<'a, R: RequestRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: RequestRepository + ?Sized> ListRequests<'a, R> {
    pub async fn execute(
        &self,
        viewer: &Viewer,
        filter: &RequestFilter,
    ) -> anyhow::Result<Vec<MaintenanceRequest>> {
        self.repo.list(&viewer.request_scope(), filter).await
    }
}

pub struct GetRequest<'a, R: RequestRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: RequestRepository + ?Sized> GetRequest<'a, R> {
    pub async fn execute(
        &self,
        viewer: &Viewer,
        id: Uuid,
    ) -> anyhow::Result<Option<MaintenanceRequest>> {
        self.repo.get(&viewer.request_scope(), id).await
    }
}

pub struct DeleteRequest<'a, R: RequestRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: RequestRepository + ?Sized> DeleteRequest<'a, R> {
    pub async fn execute(&self, viewer: &Viewer, id: Uuid) -> anyhow::Result<bool> {
        let deleted = self.repo.delete(&viewer.request_scope(), id).await?;
        if deleted {
            tracing::info!(request_id = %id, user_id = %viewer.user_id, "request_deleted");
        }
        Ok(deleted)
    }
}
