use crate::domain::{entities::RoleListUpdate, errors::ServiceResult};
use async_trait::async_trait;

/// Port for the remote user-store management service.
///
/// One method per remote operation the facade uses. Implementations perform
/// exactly one remote call per method and report failures as `ServiceError`.
#[async_trait]
pub trait UserStoreManager: Send + Sync {
    // User operations
    async fn add_user(&self, username: &str, password: &str, full_name: &str) -> ServiceResult<()>;
    async fn delete_user(&self, username: &str) -> ServiceResult<()>;
    async fn authenticate(&self, username: &str, password: &str) -> ServiceResult<bool>;
    async fn is_existing_user(&self, username: &str) -> ServiceResult<bool>;
    async fn list_users(&self) -> ServiceResult<Vec<String>>;

    // Role operations
    async fn is_existing_role(&self, role_name: &str) -> ServiceResult<bool>;
    async fn add_role(&self, role_name: &str) -> ServiceResult<()>;
    async fn delete_role(&self, role_name: &str) -> ServiceResult<()>;
    async fn get_role_names(&self) -> ServiceResult<Vec<String>>;

    // Role membership
    async fn get_role_list_of_user(&self, username: &str) -> ServiceResult<Vec<String>>;
    async fn get_user_list_of_role(&self, role_name: &str) -> ServiceResult<Vec<String>>;
    async fn update_role_list_of_user(
        &self,
        username: &str,
        update: &RoleListUpdate,
    ) -> ServiceResult<()>;

    // Tenant context of the admin session
    async fn get_tenant_id(&self) -> ServiceResult<i32>;
}
