use async_trait::async_trait;

use super::soap_client::SoapClient;
use super::soap_envelope::{SoapCall, USER_STORE_NS, USER_STORE_TYPES_NS};
use crate::application::ports::UserStoreManager;
use crate::domain::{entities::RoleListUpdate, errors::ServiceResult};

const GIVEN_NAME_CLAIM: &str = "http://wso2.org/claims/givenname";
const DEFAULT_PROFILE: &str = "default";

/// `RemoteUserStoreManagerService` adapter implementing the UserStoreManager port
pub struct SoapUserStoreManager {
    client: SoapClient,
}

impl SoapUserStoreManager {
    pub fn new(client: SoapClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &SoapClient {
        &self.client
    }

    fn call(operation: &'static str) -> SoapCall {
        SoapCall::request_response(USER_STORE_NS, operation)
    }

    fn one_way(operation: &'static str) -> SoapCall {
        SoapCall::one_way(USER_STORE_NS, operation)
    }
}

#[async_trait]
impl UserStoreManager for SoapUserStoreManager {
    // User operations
    async fn add_user(&self, username: &str, password: &str, full_name: &str) -> ServiceResult<()> {
        let call = Self::one_way("addUser")
            .with_types(USER_STORE_TYPES_NS)
            .param("userName", username)
            .param("credential", password)
            .complex(
                "claims",
                vec![
                    ("claimURI", GIVEN_NAME_CLAIM.to_string()),
                    ("value", full_name.to_string()),
                ],
            )
            .param("profileName", DEFAULT_PROFILE)
            .param("requirePasswordChange", false);

        self.client.call(&call).await?;
        Ok(())
    }

    async fn delete_user(&self, username: &str) -> ServiceResult<()> {
        let call = Self::one_way("deleteUser").param("userName", username);
        self.client.call(&call).await?;
        Ok(())
    }

    async fn authenticate(&self, username: &str, password: &str) -> ServiceResult<bool> {
        let call = Self::call("authenticate")
            .param("userName", username)
            .param("credential", password);
        self.client.call(&call).await?.into_bool()
    }

    async fn is_existing_user(&self, username: &str) -> ServiceResult<bool> {
        let call = Self::call("isExistingUser").param("userName", username);
        self.client.call(&call).await?.into_bool()
    }

    async fn list_users(&self) -> ServiceResult<Vec<String>> {
        let call = Self::call("listUsers")
            .param("filter", "*")
            .param("maxItemLimit", -1);
        Ok(self.client.call(&call).await?.into_strings())
    }

    // Role operations
    async fn is_existing_role(&self, role_name: &str) -> ServiceResult<bool> {
        let call = Self::call("isExistingRole").param("roleName", role_name);
        self.client.call(&call).await?.into_bool()
    }

    async fn add_role(&self, role_name: &str) -> ServiceResult<()> {
        let call = Self::one_way("addRole").param("roleName", role_name);
        self.client.call(&call).await?;
        Ok(())
    }

    async fn delete_role(&self, role_name: &str) -> ServiceResult<()> {
        let call = Self::one_way("deleteRole").param("roleName", role_name);
        self.client.call(&call).await?;
        Ok(())
    }

    async fn get_role_names(&self) -> ServiceResult<Vec<String>> {
        Ok(self.client.call(&Self::call("getRoleNames")).await?.into_strings())
    }

    // Membership operations
    async fn get_role_list_of_user(&self, username: &str) -> ServiceResult<Vec<String>> {
        let call = Self::call("getRoleListOfUser").param("userName", username);
        Ok(self.client.call(&call).await?.into_strings())
    }

    async fn get_user_list_of_role(&self, role_name: &str) -> ServiceResult<Vec<String>> {
        let call = Self::call("getUserListOfRole").param("roleName", role_name);
        Ok(self.client.call(&call).await?.into_strings())
    }

    async fn update_role_list_of_user(
        &self,
        username: &str,
        update: &RoleListUpdate,
    ) -> ServiceResult<()> {
        let call = Self::one_way("updateRoleListOfUser")
            .param("userName", username)
            .params("deletedRoles", &update.deleted_roles)
            .params("newRoles", &update.new_roles);
        self.client.call(&call).await?;
        Ok(())
    }

    // Tenant
    async fn get_tenant_id(&self) -> ServiceResult<i32> {
        self.client.call(&Self::call("getTenantId")).await?.into_i32()
    }
}
