/*!
# WSIS Domain

Administration facade for the WSO2 Identity Server remote admin services,
laid out with hexagonal architecture principles.

This crate provides:
- Request value types for tenants and role membership changes
- Port definitions for the user-store and tenant management services
- `IdentityAdminService`, the facade that forwards each operation to exactly
  one remote call and rewraps failures with a fixed message
- SOAP 1.1 adapters with a configurable TLS policy and WSDL cache

## Architecture

```text
┌─────────────────────────────────────────────────────────────┐
│                    Primary Adapters                         │
├─────────────────────────────────────────────────────────────┤
│              HTTP admin API (Axum handlers)                 │
└─────────────────────────────────────────────────────────────┘
                              │
┌─────────────────────────────────────────────────────────────┐
│                Application Layer                            │
├─────────────────────────────────────────────────────────────┤
│  • IdentityAdminService                                     │
└─────────────────────────────────────────────────────────────┘
                              │
┌─────────────────────────────────────────────────────────────┐
│                 Domain Layer (Ports)                        │
├─────────────────────────────────────────────────────────────┤
│  • UserStoreManager   • TenantManager   • ConfigurationPort │
└─────────────────────────────────────────────────────────────┘
                              │
┌─────────────────────────────────────────────────────────────┐
│              Infrastructure Layer (Adapters)                │
├─────────────────────────────────────────────────────────────┤
│  • SoapUserStoreManager   • SoapTenantManager               │
│  • TlsPolicy / WsdlCache  • EnvConfigurationAdapter         │
└─────────────────────────────────────────────────────────────┘
```

## Usage

```rust,no_run
use wsis_domain::{connect_identity_server, IdentityServerConfig, RoleListUpdate};

# async fn run() -> Result<(), Box<dyn std::error::Error>> {
let config = IdentityServerConfig::new(
    "admin",
    Some("admin".to_string()),
    "idp.example.org",
    "https://idp.example.org:9443/services/",
    Some("/etc/ssl/idp-ca.pem".into()),
    true,
    false,
);

let admin = connect_identity_server(&config).await?;
admin.add_user("alice", "s3cret", "Alice Liddell").await?;
admin
    .update_user_roles("alice", &RoleListUpdate::new().add("editors"))
    .await?;
# Ok(())
# }
```
*/

pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use application::ports::*;
pub use application::services::*;
pub use domain::entities::*;
pub use domain::errors::*;
pub use infrastructure::adapters::{connect_identity_server, EnvConfigurationAdapter};
