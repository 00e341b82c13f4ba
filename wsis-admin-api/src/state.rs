use crate::config::Config;
use std::sync::Arc;
use wsis_domain::{connect_identity_server, IdentityAdminService, RemoteOperationError};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub admin: IdentityAdminService,
}

impl AppState {
    /// Connect to the identity server described by `config`
    pub async fn new(config: Config) -> Result<Self, RemoteOperationError> {
        let admin = connect_identity_server(config.app.get_identity_server_config()).await?;
        Ok(Self::with_service(config, admin))
    }

    pub fn with_service(config: Config, admin: IdentityAdminService) -> Self {
        Self {
            config: Arc::new(config),
            admin,
        }
    }
}
