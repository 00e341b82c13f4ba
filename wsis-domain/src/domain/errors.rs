use thiserror::Error;

/// Failure reported by a remote client call or raised while building one.
///
/// This is the "cause" carried by [`RemoteOperationError`]. It is cloneable and
/// comparable so callers (and tests) can inspect exactly what the remote side said.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("SOAP fault {code}: {message}")]
    Fault {
        code: String,
        message: String,
        detail: Option<String>,
    },

    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    #[error("TLS configuration error: {message}")]
    Tls { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl ServiceError {
    pub fn fault(code: impl Into<String>, message: impl Into<String>) -> Self {
        ServiceError::Fault {
            code: code.into(),
            message: message.into(),
            detail: None,
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        ServiceError::MalformedResponse {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        ServiceError::Transport {
            message: err.to_string(),
        }
    }
}

impl From<quick_xml::Error> for ServiceError {
    fn from(err: quick_xml::Error) -> Self {
        ServiceError::MalformedResponse {
            message: err.to_string(),
        }
    }
}

/// Result type returned by remote client ports
pub type ServiceResult<T> = Result<T, ServiceError>;

/// The single application-level error raised by the facade.
///
/// `Display` yields the fixed per-operation message; `source()` yields the
/// original [`ServiceError`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RemoteOperationError {
    message: String,
    #[source]
    cause: ServiceError,
}

impl RemoteOperationError {
    pub fn new(message: impl Into<String>, cause: ServiceError) -> Self {
        Self {
            message: message.into(),
            cause,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> &ServiceError {
        &self.cause
    }

    pub fn into_cause(self) -> ServiceError {
        self.cause
    }
}

/// Result type for facade operations
pub type RemoteResult<T> = Result<T, RemoteOperationError>;

/// Configuration-specific errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}")]
    MissingRequired { key: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Configuration file error: {message}")]
    FileError { message: String },
}

impl From<ConfigError> for ServiceError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::MissingRequired { key } => ServiceError::Configuration {
                message: format!("Missing required configuration: {key}"),
            },
            ConfigError::InvalidValue { key, message } => ServiceError::Configuration {
                message: format!("Invalid value for {key}: {message}"),
            },
            ConfigError::FileError { message } => ServiceError::Configuration { message },
        }
    }
}
