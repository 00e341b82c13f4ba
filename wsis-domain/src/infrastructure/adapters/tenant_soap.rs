use async_trait::async_trait;

use super::soap_client::SoapClient;
use super::soap_envelope::{SoapCall, TENANT_NS, TENANT_TYPES_NS};
use crate::application::ports::TenantManager;
use crate::domain::{entities::NewTenant, errors::ServiceResult};

/// `TenantMgtAdminService` adapter implementing the TenantManager port
pub struct SoapTenantManager {
    client: SoapClient,
}

impl SoapTenantManager {
    pub fn new(client: SoapClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &SoapClient {
        &self.client
    }
}

fn tenant_info_bean(tenant: &NewTenant) -> Vec<(&'static str, String)> {
    vec![
        ("active", tenant.active.to_string()),
        ("admin", tenant.admin_username.clone()),
        ("adminPassword", tenant.admin_password.clone()),
        ("email", tenant.email.clone()),
        ("firstname", tenant.first_name.clone()),
        ("lastname", tenant.last_name.clone()),
        ("tenantDomain", tenant.tenant_domain.clone()),
    ]
}

#[async_trait]
impl TenantManager for SoapTenantManager {
    async fn add_tenant(&self, tenant: &NewTenant) -> ServiceResult<()> {
        let call = SoapCall::request_response(TENANT_NS, "addTenant")
            .with_types(TENANT_TYPES_NS)
            .complex("tenantInfoBean", tenant_info_bean(tenant));

        // The returned status string carries nothing the caller uses
        self.client.call(&call).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bean_fields_follow_remote_names() {
        let tenant = NewTenant::new(
            true,
            "admin",
            "s3cret",
            "ops@acme.test",
            "Ada",
            "Lovelace",
            "acme.test",
        );

        let names: Vec<_> = tenant_info_bean(&tenant).into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            names,
            [
                "active",
                "admin",
                "adminPassword",
                "email",
                "firstname",
                "lastname",
                "tenantDomain"
            ]
        );
        assert_eq!(tenant_info_bean(&tenant)[0].1, "true");
    }
}
