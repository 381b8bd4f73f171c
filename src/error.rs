//! Error types for huffman-codec

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("path does not exist: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("not a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("not a config file (expected .{expected} extension): {}", .path.display())]
    NotAConfigFile { path: PathBuf, expected: &'static str },

    #[error("{} would be overwritten by {}", .input.display(), .target.display())]
    SamePath { input: PathBuf, target: PathBuf },

    #[error("missing prerequisite: {0}")]
    MissingPrerequisite(String),

    #[error("malformed config file: {0}")]
    MalformedConfig(String),

    #[error("compressed stream ended after {decoded} of {expected} symbols")]
    TruncatedStream { expected: u64, decoded: u64 },

    #[error("compressed stream contains a code missing from the tree")]
    InvalidCode,

    #[error("byte {0:#04x} has no code in the table")]
    UnknownSymbol(u8),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Coarse grouping of [`CodecError`] for callers that only present a
/// handful of distinct messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The path argument itself was rejected.
    Validation,
    /// The configured config file or output directory is unusable.
    MissingPrerequisite,
    Io,
    /// Persisted data does not decode.
    Format,
}

impl CodecError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CodecError::PathNotFound(_)
            | CodecError::NotAFile(_)
            | CodecError::NotADirectory(_)
            | CodecError::NotAConfigFile { .. }
            | CodecError::SamePath { .. } => ErrorCategory::Validation,
            CodecError::MissingPrerequisite(_) => ErrorCategory::MissingPrerequisite,
            CodecError::IoError(_) => ErrorCategory::Io,
            CodecError::MalformedConfig(_)
            | CodecError::TruncatedStream { .. }
            | CodecError::InvalidCode
            | CodecError::UnknownSymbol(_) => ErrorCategory::Format,
        }
    }
}
