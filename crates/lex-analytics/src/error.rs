//! Custom error types for the analytics engine.
//!
//! Two kinds of failure exist:
//!
//! - [`AnalyticsError`] is a plain `thiserror` error used for input
//!   violations (an empty dataset at profiling or synthesis time) and for
//!   internal failures inside a stage.
//! - [`Diagnostic`] wraps an internal failure together with a usable
//!   fallback payload. Stages that must never fail toward their caller
//!   (fuzzy scoring, clustering, scenario synthesis) return
//!   [`Analysis<T>`], so callers always receive data but can still tell
//!   whether a fallback was substituted.
//!
//! Errors are serializable so they can be handed to the UI layer as-is.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::fmt;
use thiserror::Error;
use tracing::warn;

/// The main error type for the analytics engine.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// Analysis was cancelled by the caller.
    #[error("Analysis cancelled")]
    Cancelled,

    /// The dataset has no records.
    #[error("Empty dataset: at least one record is required")]
    EmptyDataset,

    /// Synthetic generation was asked to work from an empty dataset.
    #[error("no source records")]
    NoSourceRecords,

    /// Invalid configuration or arguments.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A feature vector contained a non-finite or mis-sized coordinate.
    #[error("Invalid feature vector: {0}")]
    InvalidVector(String),

    /// Analysis inputs are internally inconsistent.
    #[error("Inconsistent analysis input: {0}")]
    InconsistentInput(String),

    /// Internal error (e.g., worker thread join failure).
    #[error("Internal error: {0}")]
    Internal(String),

    /// Polars error wrapper (DataFrame ingestion).
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<AnalyticsError>,
    },
}

impl AnalyticsError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        AnalyticsError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Cancelled => "CANCELLED",
            Self::EmptyDataset => "EMPTY_DATASET",
            Self::NoSourceRecords => "NO_SOURCE_RECORDS",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::InvalidVector(_) => "INVALID_VECTOR",
            Self::InconsistentInput(_) => "INCONSISTENT_INPUT",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error represents a cancellation.
    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::Cancelled => true,
            Self::WithContext { source, .. } => source.is_cancelled(),
            _ => false,
        }
    }

    /// Input errors are raised at ingestion and are never replaced by a fallback.
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::EmptyDataset | Self::NoSourceRecords => true,
            Self::WithContext { source, .. } => source.is_input_error(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for AnalyticsError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AnalyticsError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for analytics operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

// =============================================================================
// Fallback-carrying results
// =============================================================================

/// An internal failure paired with the neutral payload that replaced the
/// real result.
#[derive(Debug)]
pub struct Diagnostic<T> {
    /// Usable data substituted for the failed computation.
    pub fallback: T,
    /// What went wrong.
    pub cause: AnalyticsError,
}

impl<T> Diagnostic<T> {
    pub fn new(fallback: T, cause: AnalyticsError) -> Self {
        Self { fallback, cause }
    }
}

impl<T> fmt::Display for Diagnostic<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fallback substituted: {}", self.cause)
    }
}

/// Outcome of a stage that never fails toward its caller.
pub type Analysis<T> = std::result::Result<T, Diagnostic<T>>;

/// Accessors shared by every [`Analysis`] outcome.
pub trait AnalysisExt<T> {
    /// The computed value, or the fallback when the computation failed.
    fn value(self) -> T;
    /// Borrowing variant of [`value`](Self::value).
    fn value_ref(&self) -> &T;
    /// Whether a fallback payload was substituted.
    fn used_fallback(&self) -> bool;
    /// The swallowed cause, if any.
    fn cause(&self) -> Option<&AnalyticsError>;
}

impl<T> AnalysisExt<T> for Analysis<T> {
    fn value(self) -> T {
        match self {
            Ok(value) => value,
            Err(diagnostic) => diagnostic.fallback,
        }
    }

    fn value_ref(&self) -> &T {
        match self {
            Ok(value) => value,
            Err(diagnostic) => &diagnostic.fallback,
        }
    }

    fn used_fallback(&self) -> bool {
        self.is_err()
    }

    fn cause(&self) -> Option<&AnalyticsError> {
        self.as_ref().err().map(|d| &d.cause)
    }
}

/// Convert a stage result into an [`Analysis`], logging the swallowed cause.
pub(crate) fn recover<T>(
    stage: &str,
    result: Result<T>,
    fallback: impl FnOnce(&AnalyticsError) -> T,
) -> Analysis<T> {
    result.map_err(|cause| {
        if cause.is_cancelled() {
            warn!("{} cancelled; returning fallback", stage);
        } else {
            warn!("{} failed, substituting fallback: {}", stage, cause);
        }
        let payload = fallback(&cause);
        Diagnostic::new(payload, cause)
    })
}
