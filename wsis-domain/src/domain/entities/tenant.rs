use serde::{Deserialize, Serialize};

/// Everything the tenant manager needs to register a new tenant.
///
/// Values are forwarded as-is; the identity server owns validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTenant {
    pub active: bool,
    pub admin_username: String,
    pub admin_password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub tenant_domain: String,
}

impl NewTenant {
    pub fn new(
        active: bool,
        admin_username: impl Into<String>,
        admin_password: impl Into<String>,
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        tenant_domain: impl Into<String>,
    ) -> Self {
        Self {
            active,
            admin_username: admin_username.into(),
            admin_password: admin_password.into(),
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            tenant_domain: tenant_domain.into(),
        }
    }
}
