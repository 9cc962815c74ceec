use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Custom error type for the adapters
#[derive(Debug)]
pub enum Error {
    /// A bad or missing path, a bad argument or a wrong singleton length
    Validation { detail: String },
    /// The destination exists and overwriting was not requested
    Conflict { path: PathBuf },
    /// Error related to file operations
    FileOperation {
        source: io::Error,
        path: PathBuf,
        operation: String,
    },
    /// File content does not parse as the expected format
    Format { path: PathBuf, detail: String },
    /// Error related to configuration parsing
    ConfigParsing {
        source: Box<dyn StdError + Send + Sync>,
        detail: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Validation { detail } => write!(f, "{detail}"),
            Error::Conflict { path } => {
                write!(f, "Output file exists: {}", path.display())
            }
            Error::FileOperation {
                source,
                path,
                operation,
            } => {
                write!(
                    f,
                    "Failed to {} file: {} ({source})",
                    operation,
                    path.display()
                )
            }
            Error::Format { path, detail } => {
                write!(f, "Invalid content in {}: {detail}", path.display())
            }
            Error::ConfigParsing { detail, .. } => {
                write!(f, "Configuration parsing error: {detail}")
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::FileOperation { source, .. } => Some(source),
            Error::ConfigParsing { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::FileOperation {
            source: err,
            path: PathBuf::new(),
            operation: "perform operation on".to_string(),
        }
    }
}

impl Error {
    /// Returns true for the `Validation` variant
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }

    /// Returns true for the `Conflict` variant
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict { .. })
    }

    /// Returns true for the `FileOperation` variant
    pub fn is_file_operation(&self) -> bool {
        matches!(self, Error::FileOperation { .. })
    }

    /// Returns true for the `Format` variant
    pub fn is_format(&self) -> bool {
        matches!(self, Error::Format { .. })
    }
}

/// Custom Result type for the adapters
///
/// Every adapter returns this alias so callers can match on the error
/// variant to tell validation failures from I/O failures.
///
/// # Examples
/// ```
/// use mmadapt::prelude::{Result, validation_error};
///
/// fn example_function(n: usize) -> Result<usize> {
///     if n == 0 {
///         return Err(validation_error("n must be positive"));
///     }
///     Ok(n)
/// }
///
/// assert!(example_function(0).is_err());
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Helper function to create a validation error
pub fn validation_error(detail: &str) -> Error {
    Error::Validation {
        detail: detail.to_string(),
    }
}

/// Helper function to create a validation error for a missing regular file
pub fn invalid_file_error(path: PathBuf) -> Error {
    Error::Validation {
        detail: format!("'{}' is not a valid filename.", path.display()),
    }
}

/// Helper function to create a validation error for a missing directory
pub fn invalid_directory_error(path: PathBuf) -> Error {
    Error::Validation {
        detail: format!("'{}' is not a valid directory.", path.display()),
    }
}

/// Helper function to create a conflict error
pub fn conflict_error(path: PathBuf) -> Error {
    Error::Conflict { path }
}

/// Helper function to create a file operation error
pub fn file_operation_error(err: io::Error, path: PathBuf, operation: &str) -> Error {
    Error::FileOperation {
        source: err,
        path,
        operation: operation.to_string(),
    }
}

/// Helper function to create a format error
pub fn format_error(path: PathBuf, detail: &str) -> Error {
    Error::Format {
        path,
        detail: detail.to_string(),
    }
}

/// Helper function to create a config parsing error
pub fn config_parsing_error<E: StdError + Send + Sync + 'static>(err: E, detail: &str) -> Error {
    Error::ConfigParsing {
        source: Box::new(err),
        detail: detail.to_string(),
    }
}
