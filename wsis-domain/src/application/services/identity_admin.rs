use crate::{
    application::ports::*,
    domain::{
        entities::*,
        errors::{RemoteOperationError, RemoteResult, ServiceError},
    },
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub const ADD_USER_FAILED: &str = "Unable to add new user";
pub const DELETE_USER_FAILED: &str = "Unable to delete user";
pub const AUTHENTICATE_FAILED: &str = "Unable to authenticate user";
pub const USERNAME_EXISTS_FAILED: &str = "Unable to verify username exists";
pub const ROLE_EXISTS_FAILED: &str = "Unable to check if the role exists";
pub const ADD_ROLE_FAILED: &str = "Unable to add this role";
pub const DELETE_ROLE_FAILED: &str = "Unable to delete role";
pub const GET_ALL_ROLES_FAILED: &str = "Unable to get all roles";
pub const GET_USER_ROLES_FAILED: &str = "Unable to get User roles.";
pub const GET_USER_LIST_OF_ROLE_FAILED: &str = "Unable to get user list of roles.";
pub const UPDATE_USER_ROLES_FAILED: &str = "Unable to update role of the user.";
pub const LIST_USERS_FAILED: &str = "Unable to list users.";
pub const GET_TENANT_ID_FAILED: &str = "Unable to get the tenant Id.";
pub const CONNECT_FAILED: &str = "Unable to instantiate WSO2 IS client";

/// Simplified identity management API over the two remote admin services.
///
/// Every operation performs exactly one remote call. Success values pass
/// through untouched; failures are rewrapped as [`RemoteOperationError`]
/// with a fixed message and the original [`ServiceError`] as cause.
#[derive(Clone)]
pub struct IdentityAdminService {
    user_store: Arc<dyn UserStoreManager>,
    tenant_manager: Arc<dyn TenantManager>,
}

fn wrap(message: &'static str) -> impl FnOnce(ServiceError) -> RemoteOperationError {
    move |cause| RemoteOperationError::new(message, cause)
}

impl IdentityAdminService {
    pub fn new(
        user_store: Arc<dyn UserStoreManager>,
        tenant_manager: Arc<dyn TenantManager>,
    ) -> Self {
        Self {
            user_store,
            tenant_manager,
        }
    }

    /// Add a new user with the given password and full name
    #[instrument(skip(self, password, full_name), fields(username = %username))]
    pub async fn add_user(
        &self,
        username: &str,
        password: &str,
        full_name: &str,
    ) -> RemoteResult<()> {
        self.user_store
            .add_user(username, password, full_name)
            .await
            .map_err(wrap(ADD_USER_FAILED))?;

        info!("Added user '{}'", username);
        Ok(())
    }

    /// Delete an existing user
    #[instrument(skip(self), fields(username = %username))]
    pub async fn delete_user(&self, username: &str) -> RemoteResult<()> {
        self.user_store
            .delete_user(username)
            .await
            .map_err(wrap(DELETE_USER_FAILED))?;

        info!("Deleted user '{}'", username);
        Ok(())
    }

    /// Check a username/password pair against the user store
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn authenticate(&self, username: &str, password: &str) -> RemoteResult<bool> {
        self.user_store
            .authenticate(username, password)
            .await
            .map_err(|cause| {
                debug!(error = ?cause, "authenticate call failed");
                RemoteOperationError::new(AUTHENTICATE_FAILED, cause)
            })
    }

    #[instrument(skip(self), fields(username = %username))]
    pub async fn username_exists(&self, username: &str) -> RemoteResult<bool> {
        self.user_store
            .is_existing_user(username)
            .await
            .map_err(wrap(USERNAME_EXISTS_FAILED))
    }

    #[instrument(skip(self), fields(role = %role_name))]
    pub async fn is_existing_role(&self, role_name: &str) -> RemoteResult<bool> {
        self.user_store
            .is_existing_role(role_name)
            .await
            .map_err(wrap(ROLE_EXISTS_FAILED))
    }

    /// Add a role with no members and no permissions
    #[instrument(skip(self), fields(role = %role_name))]
    pub async fn add_role(&self, role_name: &str) -> RemoteResult<()> {
        self.user_store
            .add_role(role_name)
            .await
            .map_err(wrap(ADD_ROLE_FAILED))?;

        info!("Added role '{}'", role_name);
        Ok(())
    }

    #[instrument(skip(self), fields(role = %role_name))]
    pub async fn delete_role(&self, role_name: &str) -> RemoteResult<()> {
        self.user_store.delete_role(role_name).await.map_err(|cause| {
            debug!(error = ?cause, "deleteRole call failed");
            RemoteOperationError::new(DELETE_ROLE_FAILED, cause)
        })?;

        info!("Deleted role '{}'", role_name);
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_all_roles(&self) -> RemoteResult<Vec<String>> {
        self.user_store
            .get_role_names()
            .await
            .map_err(wrap(GET_ALL_ROLES_FAILED))
    }

    #[instrument(skip(self), fields(username = %username))]
    pub async fn get_user_roles(&self, username: &str) -> RemoteResult<Vec<String>> {
        self.user_store
            .get_role_list_of_user(username)
            .await
            .map_err(wrap(GET_USER_ROLES_FAILED))
    }

    #[instrument(skip(self), fields(role = %role_name))]
    pub async fn get_user_list_of_role(&self, role_name: &str) -> RemoteResult<Vec<String>> {
        self.user_store
            .get_user_list_of_role(role_name)
            .await
            .map_err(|cause| {
                debug!(error = ?cause, "getUserListOfRole call failed");
                RemoteOperationError::new(GET_USER_LIST_OF_ROLE_FAILED, cause)
            })
    }

    /// Apply a role membership change to a user
    #[instrument(skip(self, update), fields(username = %username))]
    pub async fn update_user_roles(
        &self,
        username: &str,
        update: &RoleListUpdate,
    ) -> RemoteResult<()> {
        self.user_store
            .update_role_list_of_user(username, update)
            .await
            .map_err(wrap(UPDATE_USER_ROLES_FAILED))?;

        info!(
            "Updated roles of '{}' (+{} / -{})",
            username,
            update.new_roles.len(),
            update.deleted_roles.len()
        );
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self) -> RemoteResult<Vec<String>> {
        self.user_store.list_users().await.map_err(|cause| {
            debug!(error = %cause, "listUsers call failed");
            RemoteOperationError::new(LIST_USERS_FAILED, cause)
        })
    }

    /// Tenant id of the administrative session
    #[instrument(skip(self))]
    pub async fn get_tenant_id(&self) -> RemoteResult<i32> {
        self.user_store.get_tenant_id().await.map_err(|cause| {
            debug!(error = %cause, "getTenantId call failed");
            RemoteOperationError::new(GET_TENANT_ID_FAILED, cause)
        })
    }

    /// Register a new tenant.
    ///
    /// The tenant service reports a fault even when creation succeeds, so
    /// failures are logged and otherwise ignored. Callers cannot tell a real
    /// failure from success here.
    #[instrument(skip(self, tenant), fields(tenant_domain = %tenant.tenant_domain))]
    pub async fn create_tenant(&self, tenant: &NewTenant) {
        match self.tenant_manager.add_tenant(tenant).await {
            Ok(()) => info!("Created tenant '{}'", tenant.tenant_domain),
            Err(e) => warn!(
                "Ignoring fault from addTenant for '{}': {}",
                tenant.tenant_domain, e
            ),
        }
    }
}
