use crate::domain::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Configuration port for accessing application configuration
pub trait ConfigurationPort: Send + Sync {
    /// Deployment environment the process runs in
    fn get_environment(&self) -> &Environment;

    /// Get identity server connection configuration
    fn get_identity_server_config(&self) -> &IdentityServerConfig;

    /// Get logging configuration
    fn get_logging_config(&self) -> &LoggingConfig;
}

pub const USER_STORE_SERVICE: &str = "RemoteUserStoreManagerService";
pub const TENANT_SERVICE: &str = "TenantMgtAdminService";

/// Connection settings for the identity server.
///
/// Fixed once handed to the connector; the facade never reads it again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityServerConfig {
    pub admin_username: String,
    pub admin_password: Option<String>,
    /// Host name the server certificate must be valid for
    pub server: String,
    /// Base URL the admin services live under, e.g. `https://idp:9443/services/`
    pub service_url: String,
    pub ca_file: Option<PathBuf>,
    pub verify_peer: bool,
    pub allow_self_signed: bool,
    #[serde(default)]
    pub soap: SoapOptions,
    #[serde(default)]
    pub http: HttpConfig,
}

impl IdentityServerConfig {
    pub fn new(
        admin_username: impl Into<String>,
        admin_password: Option<String>,
        server: impl Into<String>,
        service_url: impl Into<String>,
        ca_file: Option<PathBuf>,
        verify_peer: bool,
        allow_self_signed: bool,
    ) -> Self {
        Self {
            admin_username: admin_username.into(),
            admin_password,
            server: server.into(),
            service_url: service_url.into(),
            ca_file,
            verify_peer,
            allow_self_signed,
            soap: SoapOptions::default(),
            http: HttpConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admin_username.is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "WSIS_ADMIN_USERNAME".to_string(),
            });
        }

        if self.server.is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "WSIS_SERVER".to_string(),
            });
        }

        if self.service_url.is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "WSIS_SERVICE_URL".to_string(),
            });
        }

        if !self.service_url.starts_with("http://") && !self.service_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                key: "WSIS_SERVICE_URL".to_string(),
                message: "Must start with http:// or https://".to_string(),
            });
        }

        url::Url::parse(&self.service_url).map_err(|e| ConfigError::InvalidValue {
            key: "WSIS_SERVICE_URL".to_string(),
            message: e.to_string(),
        })?;

        if self.verify_peer && !self.allow_self_signed && self.ca_file.is_none() {
            return Err(ConfigError::MissingRequired {
                key: "WSIS_CA_FILE".to_string(),
            });
        }

        self.soap.validate()?;
        self.http.validate()?;
        Ok(())
    }

    pub fn service_endpoint(&self, service: &str) -> String {
        format!("{}/{}", self.service_url.trim_end_matches('/'), service)
    }

    pub fn user_store_endpoint(&self) -> String {
        self.service_endpoint(USER_STORE_SERVICE)
    }

    pub fn tenant_endpoint(&self) -> String {
        self.service_endpoint(TENANT_SERVICE)
    }
}

/// How downloaded service descriptions are cached
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum WsdlCacheMode {
    Off,
    Memory,
    Disk,
    #[default]
    Both,
}

impl WsdlCacheMode {
    pub fn uses_memory(self) -> bool {
        matches!(self, WsdlCacheMode::Memory | WsdlCacheMode::Both)
    }

    pub fn uses_disk(self) -> bool {
        matches!(self, WsdlCacheMode::Disk | WsdlCacheMode::Both)
    }
}

impl std::fmt::Display for WsdlCacheMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WsdlCacheMode::Off => write!(f, "off"),
            WsdlCacheMode::Memory => write!(f, "memory"),
            WsdlCacheMode::Disk => write!(f, "disk"),
            WsdlCacheMode::Both => write!(f, "both"),
        }
    }
}

/// SOAP call options shared by both remote clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoapOptions {
    /// Keep the last request/response envelope of every client
    pub trace: bool,
    /// Read the response of one-way operations so faults surface
    pub wait_one_way_calls: bool,
    pub wsdl_cache: WsdlCacheMode,
    pub wsdl_cache_dir: PathBuf,
    pub wsdl_cache_ttl_seconds: u64,
    /// Parameter names whose values are masked in traced envelopes
    pub sensitive_fields: Vec<String>,
}

impl Default for SoapOptions {
    fn default() -> Self {
        Self {
            trace: true,
            wait_one_way_calls: true,
            wsdl_cache: WsdlCacheMode::Both,
            wsdl_cache_dir: std::env::temp_dir().join("wsis-wsdl"),
            wsdl_cache_ttl_seconds: 86_400, // 1 day
            sensitive_fields: vec![
                "password".to_string(),
                "credential".to_string(),
                "secret".to_string(),
                "token".to_string(),
                "authorization".to_string(),
            ],
        }
    }
}

impl SoapOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.wsdl_cache.uses_disk() && self.wsdl_cache_dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "WSIS_WSDL_CACHE_DIR".to_string(),
            });
        }

        Ok(())
    }

    pub fn get_wsdl_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.wsdl_cache_ttl_seconds)
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            connect_timeout_seconds: 10,
            user_agent: concat!("wsis-domain/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                key: "HTTP_TIMEOUT_SECONDS".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        if self.connect_timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                key: "HTTP_CONNECT_TIMEOUT_SECONDS".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    pub fn get_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn get_connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
        }
    }
}

/// Log level enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// Log format enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

/// Environment-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Test,
    Staging,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub identity_server: IdentityServerConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.identity_server.validate()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key/value source shaped like the environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| ConfigError::MissingRequired {
                key: key.to_string(),
            })
        };

        let environment = parse_or(&lookup, "ENVIRONMENT", Environment::Development)?;

        let soap_defaults = SoapOptions::default();
        let soap = SoapOptions {
            trace: parse_or(&lookup, "WSIS_SOAP_TRACE", soap_defaults.trace)?,
            wait_one_way_calls: parse_or(
                &lookup,
                "WSIS_WAIT_ONE_WAY_CALLS",
                soap_defaults.wait_one_way_calls,
            )?,
            wsdl_cache: parse_or(&lookup, "WSIS_WSDL_CACHE", soap_defaults.wsdl_cache)?,
            wsdl_cache_dir: lookup("WSIS_WSDL_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(soap_defaults.wsdl_cache_dir),
            wsdl_cache_ttl_seconds: parse_or(
                &lookup,
                "WSIS_WSDL_CACHE_TTL_SECONDS",
                soap_defaults.wsdl_cache_ttl_seconds,
            )?,
            sensitive_fields: lookup("LOG_SENSITIVE_FIELDS")
                .map(|raw| {
                    raw.split(',')
                        .map(|field| field.trim().to_string())
                        .filter(|field| !field.is_empty())
                        .collect()
                })
                .unwrap_or(soap_defaults.sensitive_fields),
        };

        let http_defaults = HttpConfig::default();
        let http = HttpConfig {
            timeout_seconds: parse_or(
                &lookup,
                "HTTP_TIMEOUT_SECONDS",
                http_defaults.timeout_seconds,
            )?,
            connect_timeout_seconds: parse_or(
                &lookup,
                "HTTP_CONNECT_TIMEOUT_SECONDS",
                http_defaults.connect_timeout_seconds,
            )?,
            user_agent: lookup("HTTP_USER_AGENT").unwrap_or(http_defaults.user_agent),
        };

        let identity_server = IdentityServerConfig {
            admin_username: required("WSIS_ADMIN_USERNAME")?,
            admin_password: lookup("WSIS_ADMIN_PASSWORD"),
            server: required("WSIS_SERVER")?,
            service_url: required("WSIS_SERVICE_URL")?,
            ca_file: lookup("WSIS_CA_FILE").map(PathBuf::from),
            verify_peer: parse_or(&lookup, "WSIS_VERIFY_PEER", true)?,
            allow_self_signed: parse_or(&lookup, "WSIS_ALLOW_SELF_SIGNED", false)?,
            soap,
            http,
        };

        let logging = LoggingConfig {
            level: parse_or(&lookup, "LOG_LEVEL", LogLevel::Info)?,
            format: parse_or(&lookup, "LOG_FORMAT", LogFormat::Compact)?,
        };

        let config = AppConfig {
            environment,
            identity_server,
            logging,
        };

        config.validate()?;
        Ok(config)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}

/// String parsing implementations
impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!("Invalid environment: {s}")),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {s}")),
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: {s}")),
        }
    }
}

impl FromStr for WsdlCacheMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "off" | "none" => Ok(WsdlCacheMode::Off),
            "memory" => Ok(WsdlCacheMode::Memory),
            "disk" => Ok(WsdlCacheMode::Disk),
            "both" => Ok(WsdlCacheMode::Both),
            _ => Err(format!("Invalid WSDL cache mode: {s}")),
        }
    }
}
