use std::sync::Arc;
use wsis_domain::{ConfigError, ConfigurationPort, EnvConfigurationAdapter};

const DEFAULT_PORT: u16 = 3000;

/// Settings of the HTTP front end itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub port: u16,
    /// When set, every request except `/health` must carry it in `x-api-key`
    pub api_key: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            api_key: None,
        }
    }
}

impl ApiConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                message: format!("'{raw}' is not a valid port"),
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            port,
            api_key: lookup("API_KEY").filter(|key| !key.is_empty()),
        })
    }
}

/// Front-end settings plus the domain configuration behind its port
#[derive(Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub app: Arc<dyn ConfigurationPort>,
}

impl Config {
    pub fn new(api: ApiConfig, app: impl ConfigurationPort + 'static) -> Self {
        Self {
            api,
            app: Arc::new(app),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(
            ApiConfig::from_lookup(|key| std::env::var(key).ok())?,
            EnvConfigurationAdapter::new()?,
        ))
    }
}
