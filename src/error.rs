//! Error handling for celforge
//!
//! Missing keys are never errors (the tree materializes them). Everything
//! else that can go wrong while editing a cel surfaces here.

use std::path::PathBuf;

use thiserror::Error;

use crate::tree::ValueKind;

/// Result type alias for celforge operations
pub type Result<T> = std::result::Result<T, CelError>;

/// Main error type for celforge operations
#[derive(Error, Debug)]
pub enum CelError {
    // Tree Errors
    #[error("Type mismatch on key '{key}': expected {expected}, found {found}")]
    TypeMismatch {
        key: String,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("Fusion text parse error at line {line}, column {column}: {reason}")]
    Parse {
        line: usize,
        column: usize,
        reason: String,
    },

    // Invariant Errors
    #[error("Cannot remove the last keyzone")]
    LastKeyzone,

    #[error("Cannot remove the last audio file")]
    LastAudioFile,

    #[error("Keymap has no keyzones")]
    EmptyKeymap,

    #[error("{what} index {index} out of range (len {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Invalid short name: '{name}'")]
    InvalidShortName { name: String },

    // Collaborator Errors
    #[error("Audio encoding failed: {reason}")]
    Encoder { reason: String },

    // File Errors
    #[error("Failed to read file: {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}: {source}")]
    FileWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Serialization Errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CelError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            CelError::TypeMismatch { .. } => "TYPE_MISMATCH",
            CelError::Parse { .. } => "PARSE_ERROR",
            CelError::LastKeyzone => "LAST_KEYZONE",
            CelError::LastAudioFile => "LAST_AUDIO_FILE",
            CelError::EmptyKeymap => "EMPTY_KEYMAP",
            CelError::IndexOutOfRange { .. } => "INDEX_OUT_OF_RANGE",
            CelError::InvalidShortName { .. } => "INVALID_SHORT_NAME",
            CelError::Encoder { .. } => "ENCODER_ERROR",
            CelError::FileReadError { .. } => "FILE_READ_ERROR",
            CelError::FileWriteError { .. } => "FILE_WRITE_ERROR",
            CelError::Json(_) => "JSON_ERROR",
            CelError::Io(_) => "IO_ERROR",
        }
    }

    /// Returns true when the operation was refused and the data left untouched.
    pub fn is_refusal(&self) -> bool {
        matches!(
            self,
            CelError::LastKeyzone
                | CelError::LastAudioFile
                | CelError::IndexOutOfRange { .. }
                | CelError::InvalidShortName { .. }
        )
    }

    /// Returns a user-friendly recovery suggestion.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            CelError::LastKeyzone => Some("Add another keyzone before removing this one."),
            CelError::LastAudioFile => {
                Some("Add another audio file before removing this one.")
            }
            CelError::Parse { .. } => {
                Some("Check the fusion file for unbalanced parentheses or quotes.")
            }
            CelError::InvalidShortName { .. } => {
                Some("Short names may only contain letters, digits and '_'.")
            }
            CelError::TypeMismatch { .. } => {
                Some("The fusion file stores this field with an unexpected type; re-export it.")
            }
            _ => None,
        }
    }
}
