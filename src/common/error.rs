//! Error types for footstep_planner

use thiserror::Error;

/// Main error type for footstep planning
///
/// Only misuse and configuration problems are errors. A search that runs out
/// of candidates is reported through
/// [`SearchOutcome`](crate::footstep_planning::SearchOutcome) instead.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// Leg identifier that is neither LEFT nor RIGHT
    #[error("Invalid leg identifier: {0}")]
    InvalidLeg(u8),
    /// Search requested before goal stances were installed
    #[error("Goal state is not set")]
    GoalNotSet,
    /// Configuration file could not be parsed
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Visualization error
    #[error("Visualization error: {0}")]
    VisualizationError(String),
}

/// Result type alias for planner operations
pub type PlannerResult<T> = Result<T, PlannerError>;
