//! Pipeline module.
//!
//! This module provides the analytics engine and its progress reporting.

mod engine;
pub mod progress;

pub use engine::{AnalyticsEngine, AnalyticsEngineBuilder};
pub use progress::{
    AnalysisStage, CancellationToken, ClosureProgressReporter, ProgressReporter, ProgressUpdate,
};
