use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("Malformed portal address '{candidate}': {reason}")]
    MalformedAddress { candidate: String, reason: String },

    #[error("Transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Address,
    Network,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PortalError {
    pub fn malformed(candidate: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedAddress {
            candidate: candidate.into(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MalformedAddress { .. } => ErrorCategory::Address,
            Self::Transport(_) | Self::UnexpectedStatus { .. } => ErrorCategory::Network,
            Self::Serialization(_) => ErrorCategory::Data,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    /// Drives the CLI exit code.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MalformedAddress { .. } => ErrorSeverity::Low,
            Self::Transport(_) => ErrorSeverity::Medium,
            Self::UnexpectedStatus { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            Self::UnexpectedStatus { .. } | Self::Serialization(_) => ErrorSeverity::High,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorSeverity::High,
            Self::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::MalformedAddress { .. } => {
                "Use an absolute address such as https://<label>.awsapps.com/start".to_string()
            }
            Self::Transport(_) => {
                "Check network connectivity to the portal host and try again".to_string()
            }
            Self::UnexpectedStatus { status, .. } => match status {
                401 | 403 => "Confirm you have access to this portal endpoint".to_string(),
                404 => "Check the endpoint path against the configured [api] table".to_string(),
                s if *s >= 500 => "The portal is having trouble; try again later".to_string(),
                _ => "Inspect the response for details".to_string(),
            },
            Self::Serialization(_) => "The portal returned a body that is not JSON".to_string(),
            Self::ConfigError { .. } | Self::ConfigValidationError { .. } => {
                "Check the configuration file syntax".to_string()
            }
            Self::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of '{}' in the configuration", field)
            }
            Self::MissingConfigError { field } => {
                format!("Add '{}' to the configuration", field)
            }
            Self::IoError(_) => "Check file paths and permissions".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::MalformedAddress { candidate, .. } => {
                format!("'{}' is not a usable portal address", candidate)
            }
            Self::Transport(_) => "Could not reach the portal".to_string(),
            Self::UnexpectedStatus { status, url } => {
                format!("The portal answered {} for {}", status, url)
            }
            Self::Serialization(_) => "The portal response could not be read".to_string(),
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            Self::ConfigValidationError { field, message } => {
                format!("Configuration problem in {}: {}", field, message)
            }
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid {}: {}", field, reason)
            }
            Self::MissingConfigError { field } => format!("Missing setting: {}", field),
            Self::IoError(e) => format!("File system error: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, PortalError>;
