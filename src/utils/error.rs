use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackError {
    #[error("FIT decode error: {0}")]
    FitError(#[from] fitparser::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("ZIP operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Unsupported track format: {path}")]
    UnsupportedFormatError { path: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Parse,
    Config,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Warning only, the run still counts as successful.
    Low,
    /// Possibly transient, retrying may help.
    Medium,
    /// The input cannot be processed.
    High,
    /// Misconfiguration, nothing can run until it is fixed.
    Critical,
}

impl TrackError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TrackError::IoError(_) | TrackError::StorageError { .. } | TrackError::ZipError(_) => {
                ErrorCategory::Io
            }
            TrackError::FitError(_)
            | TrackError::SerializationError(_)
            | TrackError::CsvError(_)
            | TrackError::UnsupportedFormatError { .. } => ErrorCategory::Parse,
            TrackError::ConfigError { .. }
            | TrackError::InvalidConfigValueError { .. }
            | TrackError::MissingConfigError { .. }
            | TrackError::ConfigValidationError { .. } => ErrorCategory::Config,
            TrackError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Io => ErrorSeverity::Medium,
            ErrorCategory::Parse => ErrorSeverity::High,
            ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Config => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            TrackError::FitError(_) => {
                "Check that the input is a valid FIT activity export".to_string()
            }
            TrackError::SerializationError(_) => {
                "Check that the input is a valid Strava streams JSON export".to_string()
            }
            TrackError::UnsupportedFormatError { .. } => {
                "Use a .fit or .json input, or pass --format explicitly".to_string()
            }
            TrackError::IoError(_) | TrackError::StorageError { .. } => {
                "Check that the input exists and the output location is writable".to_string()
            }
            TrackError::ZipError(_) | TrackError::CsvError(_) => {
                "Re-run with --verbose and inspect the report output step".to_string()
            }
            TrackError::ConfigError { .. }
            | TrackError::InvalidConfigValueError { .. }
            | TrackError::MissingConfigError { .. }
            | TrackError::ConfigValidationError { .. } => {
                "Fix the configuration value and run again".to_string()
            }
            TrackError::ProcessingError { .. } => {
                "Check that the recording actually contains GPS positions".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            TrackError::FitError(_) => "The FIT file could not be decoded".to_string(),
            TrackError::SerializationError(_) => {
                "The Strava export could not be parsed".to_string()
            }
            TrackError::UnsupportedFormatError { path } => {
                format!("Cannot tell the track format of '{}'", path)
            }
            TrackError::ProcessingError { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackError>;
