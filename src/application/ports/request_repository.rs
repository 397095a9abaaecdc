use async_trait::async_trait;
use uuid::Uuid;

use crate::application::access::RequestScope;
use crate::application::dto::requests::{NewRequest, RequestFilter, RequestPatch};
use crate::domain::maintenance::request::MaintenanceRequest;

/// Every read and write is confined to `scope`; rows outside it behave as missing.
///
/// A request created as `scrap`, or updated with `retire_equipment`, marks its
/// equipment inactive in the same transaction as the request write.
#[async_trait]
pub trait RequestRepository: Send + Sync {
    async fn list(
        &self,
        scope: &RequestScope,
        filter: &RequestFilter,
    ) -> anyhow::Result<Vec<MaintenanceRequest>>;
    async fn get(
        &self,
        scope: &RequestScope,
        id: Uuid,
    ) -> anyhow::Result<Option<MaintenanceRequest>>;
    async fn create(&self, request: &NewRequest) -> anyhow::Result<MaintenanceRequest>;
    async fn update(
        &self,
        scope: &RequestScope,
        id: Uuid,
        patch: &RequestPatch,
    ) -> anyhow::Result<Option<MaintenanceRequest>>;
    async fn delete(&self, scope: &RequestScope, id: Uuid) -> anyhow::Result<bool>;
}
