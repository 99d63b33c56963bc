use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
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

    #[error("No input text supplied")]
    MissingInputError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Config,
    Data,
    Usage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl PipelineError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PipelineError::IoError(_) | PipelineError::ZipError(_) => ErrorCategory::Io,
            PipelineError::ConfigValidationError { .. }
            | PipelineError::InvalidConfigValueError { .. }
            | PipelineError::MissingConfigError { .. } => ErrorCategory::Config,
            PipelineError::CsvError(_)
            | PipelineError::SerializationError(_)
            | PipelineError::ProcessingError { .. } => ErrorCategory::Data,
            PipelineError::MissingInputError => ErrorCategory::Usage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            PipelineError::MissingInputError => ErrorSeverity::Medium,
            PipelineError::ConfigValidationError { .. }
            | PipelineError::InvalidConfigValueError { .. }
            | PipelineError::MissingConfigError { .. }
            | PipelineError::CsvError(_)
            | PipelineError::SerializationError(_)
            | PipelineError::ProcessingError { .. } => ErrorSeverity::High,
            PipelineError::IoError(_) | PipelineError::ZipError(_) => ErrorSeverity::Critical,
        }
    }

    /// 依嚴重程度對應的程序退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,   // 使用方式錯誤
            ErrorSeverity::High => 1,     // 處理錯誤
            ErrorSeverity::Critical => 3, // 系統錯誤
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PipelineError::IoError(e) => format!("Could not read or write a file: {}", e),
            PipelineError::ZipError(e) => format!("Could not build the output archive: {}", e),
            PipelineError::CsvError(e) => format!("Could not write tabular output: {}", e),
            PipelineError::SerializationError(e) => format!("Could not write JSON output: {}", e),
            PipelineError::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            PipelineError::InvalidConfigValueError {
                field,
                value,
                reason,
            } => format!("'{}' is not a valid value for '{}': {}", value, field, reason),
            PipelineError::MissingConfigError { field } => {
                format!("The configuration is missing '{}'", field)
            }
            PipelineError::ProcessingError { message } => format!("Processing failed: {}", message),
            PipelineError::MissingInputError => {
                "No input text was given on the command line or standard input".to_string()
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Io => "Check that the input file exists and the output directory is writable",
            ErrorCategory::Config => "Fix the configuration file and run again (try --dry-run first)",
            ErrorCategory::Data => "Inspect the input lines and the selected output formats",
            ErrorCategory::Usage => "Pass the text as an argument or pipe one line on standard input",
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
