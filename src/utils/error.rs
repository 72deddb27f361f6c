use thiserror::Error;

#[derive(Error, Debug)]
pub enum PricingError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Processing,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl PricingError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PricingError::ConfigError { .. }
            | PricingError::ConfigValidationError { .. }
            | PricingError::InvalidConfigValueError { .. }
            | PricingError::MissingConfigError { .. } => ErrorCategory::Configuration,
            PricingError::ValidationError { .. } => ErrorCategory::Input,
            PricingError::ProcessingError { .. } | PricingError::SerializationError(_) => {
                ErrorCategory::Processing
            }
            PricingError::ZipError(_) | PricingError::CsvError(_) | PricingError::IoError(_) => {
                ErrorCategory::Output
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PricingError::ValidationError { .. }
            | PricingError::ConfigError { .. }
            | PricingError::ConfigValidationError { .. }
            | PricingError::InvalidConfigValueError { .. }
            | PricingError::MissingConfigError { .. } => ErrorSeverity::High,
            PricingError::ProcessingError { .. } => ErrorSeverity::Medium,
            PricingError::CsvError(_) | PricingError::SerializationError(_) => {
                ErrorSeverity::Medium
            }
            PricingError::ZipError(_) | PricingError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            PricingError::InvalidConfigValueError { field, .. } => {
                format!("Check the value of '{}' and run again", field)
            }
            PricingError::MissingConfigError { field } => {
                format!("Add '{}' to the configuration", field)
            }
            PricingError::ConfigValidationError { field, .. } => {
                format!("Fix the '{}' section of the configuration file", field)
            }
            PricingError::ConfigError { .. } => {
                "Review the configuration file for typos or missing sections".to_string()
            }
            PricingError::ValidationError { .. } => {
                "Base cost must be at least 0.01 and product names at least 2 characters"
                    .to_string()
            }
            PricingError::ProcessingError { .. } => {
                "Re-run with --verbose to see which product failed".to_string()
            }
            PricingError::CsvError(_) | PricingError::SerializationError(_) => {
                "Try a different output format or re-run with --verbose".to_string()
            }
            PricingError::ZipError(_) | PricingError::IoError(_) => {
                "Make sure the output path exists and is writable".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Input => format!("Invalid product input: {}", self),
            ErrorCategory::Processing => format!("Pricing run failed: {}", self),
            ErrorCategory::Output => format!("Could not write pricing report: {}", self),
        }
    }

    /// Exit code used by the binaries. Always non-zero.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, PricingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = PricingError::MissingConfigError {
            field: "products".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.exit_code(), 1);
        assert!(err.recovery_suggestion().contains("products"));
    }

    #[test]
    fn test_io_errors_are_critical() {
        let err: PricingError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert_eq!(err.category(), ErrorCategory::Output);
        assert_eq!(err.exit_code(), 3);
        assert!(err.user_friendly_message().starts_with("Could not write"));
    }

    #[test]
    fn test_every_error_exits_non_zero() {
        let errors = [
            PricingError::ValidationError {
                message: "cost".to_string(),
            },
            PricingError::ProcessingError {
                message: "lock".to_string(),
            },
            PricingError::ConfigError {
                message: "toml".to_string(),
            },
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into(),
        ];
        for err in &errors {
            assert!(err.exit_code() > 0, "{err} exited with 0");
        }
        assert_eq!(errors[0].exit_code(), 1);
        assert_eq!(errors[1].exit_code(), 2);
    }
}
