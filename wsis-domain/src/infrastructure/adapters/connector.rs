use std::sync::Arc;
use tracing::{error, info, instrument};

use super::soap_client::SoapClient;
use super::tenant_soap::SoapTenantManager;
use super::tls_policy::TlsPolicy;
use super::user_store_soap::SoapUserStoreManager;
use super::wsdl_cache::WsdlCache;
use crate::application::ports::IdentityServerConfig;
use crate::application::services::{IdentityAdminService, CONNECT_FAILED};
use crate::domain::errors::{RemoteOperationError, RemoteResult, ServiceError, ServiceResult};

/// Build the shared HTTP client: TLS policy, timeouts and user agent
pub fn build_http_client(config: &IdentityServerConfig) -> ServiceResult<reqwest::Client> {
    let tls = TlsPolicy::from_config(config).client_config()?;

    reqwest::Client::builder()
        .use_preconfigured_tls(tls)
        .timeout(config.http.get_timeout())
        .connect_timeout(config.http.get_connect_timeout())
        .user_agent(config.http.user_agent.as_str())
        .build()
        .map_err(|e| ServiceError::Transport {
            message: format!("failed to build HTTP client: {e}"),
        })
}

fn soap_client(
    config: &IdentityServerConfig,
    http: &reqwest::Client,
    endpoint: String,
) -> SoapClient {
    SoapClient::new(
        endpoint,
        http.clone(),
        config.admin_username.clone(),
        config.admin_password.clone(),
        config.soap.clone(),
    )
}

async fn connect(config: &IdentityServerConfig) -> ServiceResult<IdentityAdminService> {
    config.validate()?;

    let http = build_http_client(config)?;
    let user_store = soap_client(config, &http, config.user_store_endpoint());
    let tenants = soap_client(config, &http, config.tenant_endpoint());

    let cache = WsdlCache::from_options(&config.soap);
    user_store.service_description(&cache).await?;
    tenants.service_description(&cache).await?;

    Ok(IdentityAdminService::new(
        Arc::new(SoapUserStoreManager::new(user_store)),
        Arc::new(SoapTenantManager::new(tenants)),
    ))
}

/// Create the facade with both remote service clients ready for use.
///
/// Both service descriptions must be reachable (or cached) before the
/// facade is handed out; any failure along the way is reported with the
/// same fixed message.
#[instrument(skip(config), fields(service_url = %config.service_url, server = %config.server))]
pub async fn connect_identity_server(
    config: &IdentityServerConfig,
) -> RemoteResult<IdentityAdminService> {
    match connect(config).await {
        Ok(service) => {
            info!("Connected to identity server admin services");
            Ok(service)
        }
        Err(cause) => {
            error!("Failed to connect to identity server: {}", cause);
            Err(RemoteOperationError::new(CONNECT_FAILED, cause))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_client_builds_without_peer_verification() {
        let mut config = IdentityServerConfig::new(
            "admin",
            Some("admin".to_string()),
            "localhost",
            "https://localhost:9443/services/",
            None,
            false,
            false,
        );
        config.http.user_agent = "wsis-test".to_string();

        assert!(build_http_client(&config).is_ok());
    }

    #[test]
    fn missing_ca_file_fails_client_construction() {
        let config = IdentityServerConfig::new(
            "admin",
            None,
            "localhost",
            "https://localhost:9443/services/",
            Some("/nonexistent/ca.pem".into()),
            true,
            false,
        );

        assert!(matches!(
            build_http_client(&config),
            Err(ServiceError::Configuration { .. })
        ));
    }
}
