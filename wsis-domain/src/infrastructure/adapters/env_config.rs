use crate::application::ports::{
    AppConfig, ConfigurationPort, Environment, IdentityServerConfig, LoggingConfig,
};
use crate::domain::errors::ConfigError;

/// Configuration read once from the process environment
#[derive(Debug, Clone)]
pub struct EnvConfigurationAdapter {
    config: AppConfig,
}

impl EnvConfigurationAdapter {
    /// Load and validate `WSIS_*`, `LOG_*` and `HTTP_*` variables
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self::from_config(AppConfig::from_env()?))
    }

    pub fn from_config(config: AppConfig) -> Self {
        Self { config }
    }
}

impl ConfigurationPort for EnvConfigurationAdapter {
    fn get_environment(&self) -> &Environment {
        &self.config.environment
    }

    fn get_identity_server_config(&self) -> &IdentityServerConfig {
        &self.config.identity_server
    }

    fn get_logging_config(&self) -> &LoggingConfig {
        &self.config.logging
    }
}
