//! Error types for Ripple operations.
//!
//! Errors are categorized into two main types:
//!
//! - **`Error`**: Top-level errors that fail the current call (precondition
//!   violations, unreadable configuration, etc.)
//! - **`ExtractError`**: File-level errors that are collected during a graph
//!   build but don't halt it
//!
//! ## Error Philosophy
//!
//! Graph builds follow a "best effort" approach:
//! - A single malformed file shouldn't prevent building the rest of the graph
//! - Errors are collected and reported, not thrown
//! - Only precondition and infrastructure failures cause early termination
//!
//! ## Error Categorization
//!
//! `ExtractErrorKind` uses a 4xx/5xx style categorization:
//! - Input problems (user's fault): parse errors, unsupported languages
//! - Internal problems (our fault): I/O errors

use std::path::PathBuf;
use thiserror::Error;

/// Result type for Ripple operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for Ripple operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A query was made before the component was initialized.
    ///
    /// This is a programming error on the caller's side; initialize first.
    #[error("{component} is not initialized; call initialize() first")]
    NotInitialized {
        /// Name of the component that was queried
        component: &'static str,
    },

    /// File system operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration or arguments
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML (de)serialization failed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A single file could not be extracted
    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),
}

impl Error {
    /// Create a precondition-violation error for the named component.
    #[must_use]
    pub fn not_initialized(component: &'static str) -> Self {
        Self::NotInitialized { component }
    }

    /// Returns `true` if this error is a precondition violation.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::NotInitialized { .. })
    }
}

/// Error encountered while extracting a specific file.
///
/// These errors are collected during a graph build but don't halt the operation.
/// The build continues with remaining files and reports all errors at the end.
#[derive(Debug, Clone)]
pub struct ExtractError {
    /// Path to the file that failed
    pub path: PathBuf,
    /// Category of the error
    pub kind: ExtractErrorKind,
    /// Human-readable error message
    pub message: String,
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} ({})",
            self.path.display(),
            self.message,
            self.kind
        )
    }
}

impl std::error::Error for ExtractError {}

/// Categorization of extraction errors.
///
/// Uses a 4xx/5xx style pattern:
/// - Input problems are issues with the source files (user can fix)
/// - Internal problems are issues with Ripple itself or the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractErrorKind {
    // === Input Problems (analogous to HTTP 4xx) ===
    /// Source file could not be parsed at all
    ParseFailed,

    /// File type is not supported (unknown extension)
    UnsupportedLanguage,

    /// File content is not valid UTF-8
    EncodingError,

    // === Internal Problems (analogous to HTTP 5xx) ===
    /// Could not read the file from disk
    IoError,
}

impl std::fmt::Display for ExtractErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParseFailed => write!(f, "parse failed"),
            Self::UnsupportedLanguage => write!(f, "unsupported language"),
            Self::EncodingError => write!(f, "encoding error"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl ExtractErrorKind {
    /// Returns `true` if this is an input problem (4xx-style).
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::ParseFailed | Self::UnsupportedLanguage | Self::EncodingError
        )
    }

    /// Returns `true` if this is an internal problem (5xx-style).
    #[must_use]
    pub fn is_internal_error(&self) -> bool {
        matches!(self, Self::IoError)
    }
}

impl ExtractError {
    /// Create a new extraction error.
    #[must_use]
    pub fn new(path: PathBuf, kind: ExtractErrorKind, message: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            message: message.into(),
        }
    }

    /// Create a parse error for a file.
    #[must_use]
    pub fn parse_failed(path: PathBuf, message: impl Into<String>) -> Self {
        Self::new(path, ExtractErrorKind::ParseFailed, message)
    }

    /// Create an unsupported language error.
    #[must_use]
    pub fn unsupported_language(path: PathBuf) -> Self {
        let ext = path
            .extension()
            .map_or_else(|| "none".to_string(), |e| e.to_string_lossy().to_string());
        Self::new(
            path,
            ExtractErrorKind::UnsupportedLanguage,
            format!("unsupported extension: {ext}"),
        )
    }

    /// Create an encoding error for a file.
    #[must_use]
    pub fn encoding_error(path: PathBuf) -> Self {
        Self::new(
            path,
            ExtractErrorKind::EncodingError,
            "file is not valid UTF-8",
        )
    }

    /// Create an I/O error for a file.
    #[must_use]
    pub fn io_error(path: PathBuf, error: &std::io::Error) -> Self {
        Self::new(path, ExtractErrorKind::IoError, error.to_string())
    }
}
