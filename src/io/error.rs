//! Error types for generation runs, request loading and image export

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Main error type for all generation operations
///
/// Every variant is terminal for the run that produced it; callers may
/// start a fresh run afterwards.
#[derive(Debug)]
pub enum GenerationError {
    /// Requested canvas exceeds the hard pixel cap
    DimensionsTooLarge {
        /// Requested width in pixels
        width: u32,
        /// Requested height in pixels
        height: u32,
        /// Maximum allowed `width * height`
        limit: u64,
    },

    /// An allocation failed or the memory probe was refused
    ResourceExhausted {
        /// What was being allocated
        resource: &'static str,
        /// Description of the failure
        reason: String,
    },

    /// Final buffer could not be handed to the caller
    TransferFailure {
        /// Description of the failed handoff
        reason: String,
    },

    /// Unexpected failure while growing the pattern
    RuntimeFault {
        /// Operation in progress when the fault occurred
        operation: &'static str,
        /// Description of the fault
        reason: String,
    },

    /// The caller's run-level timeout expired before a result arrived
    TimedOut {
        /// Timeout that expired
        limit: Duration,
    },

    /// Request parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Numerical computation produced invalid result
    Computation {
        /// Name of the computation that failed
        operation: &'static str,
        /// Description of the failure
        reason: String,
    },

    /// Failed to save generated image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Request file is not a valid generation request
    RequestParse {
        /// Path of the request file, `<inline>` for in-memory JSON
        path: PathBuf,
        /// Underlying JSON error
        source: serde_json::Error,
    },

    /// Failure reported by a run on the background worker
    RunFailed {
        /// Category of the error the run ended with
        kind: ErrorKind,
        /// Message of the original error
        message: String,
    },
}

/// Category of a [`GenerationError`]
///
/// Survives the trip over the worker channel, where the error itself is
/// reduced to a [`RunError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Pixel cap exceeded or an allocation failed
    ResourceExhausted,
    /// Final buffer could not be handed over
    TransferFailure,
    /// Unexpected fault while growing, including caught panics
    RuntimeFault,
    /// Caller-side timeout expired
    TimedOut,
    /// Request parameter out of range
    InvalidParameter,
    /// Numerical or buffer shape error
    Computation,
    /// File, image or request file I/O
    Io,
}

/// Error message sent by a run in place of its buffer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunError {
    /// Category of the underlying error
    pub kind: ErrorKind,
    /// Display text of the underlying error
    pub message: String,
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<&GenerationError> for RunError {
    fn from(error: &GenerationError) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

impl From<RunError> for GenerationError {
    fn from(error: RunError) -> Self {
        Self::RunFailed {
            kind: error.kind,
            message: error.message,
        }
    }
}

impl GenerationError {
    /// Category of the error
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::DimensionsTooLarge { .. } | Self::ResourceExhausted { .. } => {
                ErrorKind::ResourceExhausted
            }
            Self::TransferFailure { .. } => ErrorKind::TransferFailure,
            Self::RuntimeFault { .. } => ErrorKind::RuntimeFault,
            Self::TimedOut { .. } => ErrorKind::TimedOut,
            Self::InvalidParameter { .. } => ErrorKind::InvalidParameter,
            Self::Computation { .. } => ErrorKind::Computation,
            Self::ImageExport { .. } | Self::FileSystem { .. } | Self::RequestParse { .. } => {
                ErrorKind::Io
            }
            Self::RunFailed { kind, .. } => *kind,
        }
    }

    /// Whether the error belongs to the resource exhaustion family
    ///
    /// These are reported before any growth work starts.
    pub const fn is_resource_exhausted(&self) -> bool {
        matches!(self.kind(), ErrorKind::ResourceExhausted)
    }
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DimensionsTooLarge {
                width,
                height,
                limit,
            } => {
                write!(
                    f,
                    "Image size too large: {width}x{height} exceeds the limit of {limit} pixels"
                )
            }
            Self::ResourceExhausted { resource, reason } => {
                write!(f, "Not enough memory for {resource}: {reason}")
            }
            Self::TransferFailure { reason } => {
                write!(f, "Failed to deliver generated buffer: {reason}")
            }
            Self::RuntimeFault { operation, reason } => {
                write!(f, "Generation failed during {operation}: {reason}")
            }
            Self::TimedOut { limit } => {
                write!(f, "Generation timed out after {} seconds", limit.as_secs())
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::Computation { operation, reason } => {
                write!(f, "Computation error in {operation}: {reason}")
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::RequestParse { path, source } => {
                write!(
                    f,
                    "Invalid generation request in '{}': {source}",
                    path.display()
                )
            }
            Self::RunFailed { message, .. } => f.write_str(message),
        }
    }
}

impl std::error::Error for GenerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::RequestParse { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for generation results
pub type Result<T> = std::result::Result<T, GenerationError>;

impl From<std::io::Error> for GenerationError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

impl From<std::collections::TryReserveError> for GenerationError {
    fn from(err: std::collections::TryReserveError) -> Self {
        Self::ResourceExhausted {
            resource: "buffer",
            reason: err.to_string(),
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> GenerationError {
    GenerationError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a runtime fault error
pub fn runtime_fault(operation: &'static str, reason: &impl ToString) -> GenerationError {
    GenerationError::RuntimeFault {
        operation,
        reason: reason.to_string(),
    }
}
