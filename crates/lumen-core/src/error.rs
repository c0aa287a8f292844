//! Error kinds surfaced by the planning pipeline.

use thiserror::Error;

/// Failures produced by the planning pipeline.
///
/// Every failure carries a human-readable message and propagates to the
/// boundary unchanged; a request either yields a complete solution or exactly
/// one of these kinds, never a partial success.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Invalid or degenerate input polygon.
    #[error("invalid polygon: {0}")]
    Geometry(String),
    /// The road-data provider found nothing inside the area.
    #[error("no road data: {0}")]
    NoRoadData(String),
    /// Discretization produced no points.
    #[error("sampling produced no points: {0}")]
    Sampling(String),
    /// A coordinate transform rejected its input.
    #[error("projection failed: {0}")]
    Projection(String),
    /// Invalid model parameters: bad `p`, empty catalog, negative budget.
    #[error("invalid model: {0}")]
    Model(String),
    /// The solver backend could not run at all.
    #[error("solver unavailable: {0}")]
    SolverUnavailable(String),
    /// The model admits no feasible assignment.
    #[error("infeasible: {0}")]
    Infeasible(String),
    /// The time budget elapsed without any usable result.
    #[error("solver timed out: {0}")]
    SolverTimeout(String),
}
