use crate::domain::{entities::NewTenant, errors::ServiceResult};
use async_trait::async_trait;

/// Port for the remote tenant management service
#[async_trait]
pub trait TenantManager: Send + Sync {
    async fn add_tenant(&self, tenant: &NewTenant) -> ServiceResult<()>;
}
