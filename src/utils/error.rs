use thiserror::Error;

#[derive(Error, Debug)]
pub enum PopularityError {
    #[error("No Pokémon name was given")]
    EmptyInput,

    #[error("'{name}' is not a recognised Pokémon name")]
    InvalidName { name: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfig { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{provider} provider failed: {message}")]
    Provider { provider: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Provider,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PopularityError {
    pub fn provider(provider: &str, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyInput | Self::InvalidName { .. } => ErrorCategory::Input,
            Self::Configuration { .. }
            | Self::MissingConfig { .. }
            | Self::InvalidConfigValue { .. } => ErrorCategory::Configuration,
            Self::Provider { .. } => ErrorCategory::Provider,
            Self::Io(_) | Self::Serialization(_) | Self::Csv(_) => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Provider => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    /// 給使用者看的訊息；所有 provider 失敗共用同一句
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::EmptyInput => "Please enter a Pokémon name".to_string(),
            Self::InvalidName { .. } => "Please enter a valid Pokémon name".to_string(),
            Self::Provider { .. } => "Error fetching data.".to_string(),
            Self::Configuration { .. }
            | Self::MissingConfig { .. }
            | Self::InvalidConfigValue { .. } => format!("Configuration problem: {}", self),
            Self::Io(_) | Self::Serialization(_) | Self::Csv(_) => {
                format!("Unexpected internal error: {}", self)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::EmptyInput => "Pass a name, e.g. `pokemon-popularity pikachu`".to_string(),
            Self::InvalidName { .. } => {
                "Check the spelling; only Generation 1 Pokémon are recognised".to_string()
            }
            Self::MissingConfig { field } => format!(
                "Set `{}` in the config file or provide it through the environment",
                field
            ),
            Self::Configuration { .. } | Self::InvalidConfigValue { .. } => {
                "Review the configuration file and command line flags".to_string()
            }
            Self::Provider { .. } => "Try again in a moment".to_string(),
            Self::Io(_) | Self::Serialization(_) | Self::Csv(_) => {
                "Check file permissions and available disk space".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, PopularityError>;
