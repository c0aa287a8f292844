//! Narrow contract against the MILP solving backend.
//!
//! The pipeline builds boolean-variable models with sparse linear constraints
//! and hands them to a [`SolverBackend`]. The backend's internal search is
//! opaque; only this input/output contract is consumed.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Minimize,
    Maximize,
}

/// Constraint comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmp {
    LessEq,
    Eq,
    GreaterEq,
}

/// One sparse linear constraint over boolean columns.
#[derive(Debug, Clone)]
pub struct LinearConstraint {
    /// `(column, coefficient)` pairs.
    pub terms: Vec<(usize, f64)>,
    pub cmp: Cmp,
    pub rhs: f64,
}

/// A boolean linear model.
///
/// Columns are addressed by dense integer position, never by unordered keys,
/// so variable identity is stable during constraint construction.
#[derive(Debug, Clone)]
pub struct MilpModel {
    pub num_cols: usize,
    /// Sparse objective `(column, coefficient)` pairs.
    pub objective: Vec<(usize, f64)>,
    pub sense: Sense,
    pub constraints: Vec<LinearConstraint>,
    /// Wall-clock budget for the solve call.
    pub time_limit: Duration,
}

impl MilpModel {
    pub fn new(num_cols: usize, sense: Sense, time_limit: Duration) -> Self {
        Self {
            num_cols,
            objective: Vec::new(),
            sense,
            constraints: Vec::new(),
            time_limit,
        }
    }

    pub fn add(&mut self, terms: Vec<(usize, f64)>, cmp: Cmp, rhs: f64) {
        self.constraints.push(LinearConstraint { terms, cmp, rhs });
    }
}

/// Terminal state reported by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolveStatus {
    /// Proven optimal within numeric tolerance.
    Optimal,
    /// Best incumbent of a time-limited search; may be non-optimal.
    Feasible,
    /// No assignment satisfies the constraints.
    Infeasible,
}

/// Column values plus status for one solve call.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    /// One value per column; empty when infeasible.
    pub values: Vec<f64>,
    pub objective: f64,
}

impl SolveOutcome {
    /// Whether a boolean column is set in the solution.
    pub fn is_set(&self, col: usize) -> bool {
        self.values[col] > 0.5
    }
}

/// Contract every solving backend implements.
///
/// One attempt per model, no internal retry. A backend that exhausts the
/// model's wall-clock budget returns its best incumbent as
/// [`SolveStatus::Feasible`], or [`PlanError::SolverTimeout`] when it has
/// none. Implementations must be shareable across request threads.
pub trait SolverBackend: Send + Sync {
    fn solve(&self, model: &MilpModel) -> Result<SolveOutcome, PlanError>;

    /// Backend name for logging.
    fn name(&self) -> &str;
}
