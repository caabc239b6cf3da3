use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransferError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API request failed: {status} - {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Unexpected response status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("No metafields export found. Run the export first.")]
    NoExportFound,

    #[error("Malformed metafield '{qualified_key}': {reason}")]
    MalformedMetafield {
        qualified_key: String,
        reason: String,
    },

    #[error("Handle '{handle}' is shared by {count} destination products")]
    HandleCollision { handle: String, count: usize },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Storage,
    Data,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TransferError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) | Self::HttpStatus { .. } | Self::UnexpectedStatus { .. } => {
                ErrorCategory::Network
            }
            Self::CsvError(_) | Self::IoError(_) | Self::NoExportFound => ErrorCategory::Storage,
            Self::SerializationError(_)
            | Self::MalformedMetafield { .. }
            | Self::HandleCollision { .. } => ErrorCategory::Data,
            Self::ConfigValidationError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MalformedMetafield { .. } => ErrorSeverity::Low,
            Self::ApiError(_) | Self::HttpStatus { .. } | Self::UnexpectedStatus { .. } => {
                ErrorSeverity::Medium
            }
            Self::NoExportFound
            | Self::SerializationError(_)
            | Self::CsvError(_)
            | Self::HandleCollision { .. } => ErrorSeverity::High,
            Self::IoError(_)
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::ApiError(_) => {
                "Check network connectivity and the store domain, then re-run".to_string()
            }
            Self::HttpStatus { status: 401, .. } | Self::HttpStatus { status: 403, .. } => {
                "Check the access token and its read/write_products scopes".to_string()
            }
            Self::HttpStatus { status: 429, .. } => {
                "Rate limit hit: increase the [rate_limit] delays and re-run".to_string()
            }
            Self::HttpStatus { .. } | Self::UnexpectedStatus { .. } => {
                "Inspect the response body above; re-running is safe".to_string()
            }
            Self::NoExportFound => "Run `metafield-transfer export` before importing".to_string(),
            Self::CsvError(_) | Self::SerializationError(_) => {
                "The export file is damaged; re-run the export".to_string()
            }
            Self::MalformedMetafield { .. } => {
                "Fix the metafield in the source store and export again".to_string()
            }
            Self::HandleCollision { .. } => {
                "Make destination handles unique or disable matching.strict_handles".to_string()
            }
            Self::IoError(_) => "Check that the output path exists and is writable".to_string(),
            Self::ConfigValidationError { .. } | Self::InvalidConfigValueError { .. } => {
                "Review the configuration file".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Store API error: {}", self),
            ErrorCategory::Storage => format!("Export storage error: {}", self),
            ErrorCategory::Data => format!("Data error: {}", self),
            ErrorCategory::Configuration => format!("Configuration error: {}", self),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransferError>;
