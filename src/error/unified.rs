//! Error classification shared with callers that map failures to responses.

use serde::{Deserialize, Serialize};

/// Machine-readable error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    UnsupportedFormat,
    FileTooLarge,
    InvalidAudio,
    EncodingFailed,
    ProcessingFailed,
    DependencyMissing,
    Timeout,
    NotFound,
    InvalidConfiguration,
    Io,
}

/// Broad error category for routing error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The uploaded file itself is unacceptable.
    Input,
    Codec,
    Dependency,
    Timeout,
    Configuration,
    Internal,
}
