//! Error types for the pecha serializer
//!
//! Every failure is surfaced to the caller. Nothing here is recovered
//! internally: a document with a dropped or misplaced annotation is worse
//! than no document.

use thiserror::Error;

/// Serializer-wide result type
pub type Result<T> = std::result::Result<T, SerializeError>;

/// Serializer error type
#[derive(Error, Debug)]
pub enum SerializeError {
    /// Volume id missing from the offset table (or never given a base text)
    #[error("Unknown volume: {0}")]
    UnknownVolume(String),

    /// Span that is negative, inverted, or outside its base text after adaptation
    #[error("Invalid span {start}..{end}: {reason}")]
    InvalidSpan {
        start: i64,
        end: i64,
        reason: String,
    },

    #[error("Unsupported annotation type: {0}")]
    UnsupportedAnnotationType(String),

    /// Known annotation type missing a field its payload needs
    #[error("Malformed {kind} annotation: {reason}")]
    MalformedAnnotation { kind: String, reason: String },

    /// Insertion point past the end of the base text
    #[error("Offset {offset} out of range for volume {volume_id} (length {len})")]
    OffsetOutOfRange {
        volume_id: String,
        offset: usize,
        len: usize,
    },

    #[error("Template fetch failed: {0}")]
    TemplateFetchError(String),

    #[error("Conversion failed: {0}")]
    ConversionError(String),

    #[error("Conversion timed out after {0} seconds")]
    ConversionTimeout(u64),

    #[error("Invalid pecha id: {0:?}")]
    InvalidPechaId(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bundle error: {0}")]
    Bundle(#[from] serde_json::Error),

    #[error("Task join error: {0}")]
    Task(String),
}

impl SerializeError {
    pub(crate) fn invalid_span(start: i64, end: i64, reason: impl Into<String>) -> Self {
        SerializeError::InvalidSpan {
            start,
            end,
            reason: reason.into(),
        }
    }
}
