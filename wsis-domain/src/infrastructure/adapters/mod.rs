pub mod connector;
pub mod env_config;
pub mod soap_client;
pub mod soap_envelope;
pub mod tenant_soap;
pub mod tls_policy;
pub mod user_store_soap;
pub mod wsdl_cache;

pub use connector::{build_http_client, connect_identity_server};
pub use env_config::EnvConfigurationAdapter;
pub use soap_client::{SoapClient, SoapExchange};
pub use soap_envelope::{parse_response, SoapCall, SoapResponse};
pub use tenant_soap::SoapTenantManager;
pub use tls_policy::{load_ca_certificates, PolicyVerifier, TlsPolicy};
pub use user_store_soap::SoapUserStoreManager;
pub use wsdl_cache::{check_service_description, WsdlCache};
