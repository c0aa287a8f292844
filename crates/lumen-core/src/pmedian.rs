//! p-median facility location: open exactly `p` sites minimizing total
//! assignment distance.

use std::time::Duration;

use crate::distance::DistanceMatrix;
use crate::error::PlanError;
use crate::solve::{Cmp, MilpModel, Sense, SolveOutcome, SolveStatus};

// Column layout: open[j] = j, assign[i, j] = n + i * n + j.
fn open_col(j: usize) -> usize {
    j
}

fn assign_col(n: usize, i: usize, j: usize) -> usize {
    n + i * n + j
}

/// Build the p-median model over a square candidate distance matrix.
///
/// The candidate set doubles as the demand set. Parameter validation happens
/// here, before any variable or constraint exists.
pub fn build_p_median(
    dist: &DistanceMatrix,
    p: usize,
    time_limit: Duration,
) -> Result<MilpModel, PlanError> {
    let n = dist.rows();
    if n == 0 || dist.cols() != n {
        return Err(PlanError::Model(format!(
            "p-median needs a square non-empty distance matrix, got {}x{}",
            dist.rows(),
            dist.cols()
        )));
    }
    if p < 1 || p > n {
        return Err(PlanError::Model(format!(
            "p must be between 1 and {n}, got {p}"
        )));
    }

    let mut model = MilpModel::new(n + n * n, Sense::Minimize, time_limit);
    for i in 0..n {
        for j in 0..n {
            model.objective.push((assign_col(n, i, j), dist.get(i, j)));
        }
    }

    // Each demand point is served by exactly one site.
    for i in 0..n {
        let row = (0..n).map(|j| (assign_col(n, i, j), 1.0)).collect();
        model.add(row, Cmp::Eq, 1.0);
    }
    // Assignment only to open sites.
    for i in 0..n {
        for j in 0..n {
            model.add(
                vec![(assign_col(n, i, j), 1.0), (open_col(j), -1.0)],
                Cmp::LessEq,
                0.0,
            );
        }
    }
    // Exactly p sites open.
    let row = (0..n).map(|j| (open_col(j), 1.0)).collect();
    model.add(row, Cmp::Eq, p as f64);

    Ok(model)
}

/// Decoded p-median result.
#[derive(Debug, Clone)]
pub struct PMedianSolution {
    /// Indices of the opened candidate sites.
    pub selected: Vec<usize>,
    /// For each demand index, the site serving it.
    pub assignment: Vec<usize>,
    pub objective: f64,
    pub status: SolveStatus,
}

/// Read the solved columns back into site selections and assignments.
pub fn decode_p_median(outcome: &SolveOutcome, n: usize) -> Result<PMedianSolution, PlanError> {
    if outcome.status == SolveStatus::Infeasible {
        return Err(PlanError::Infeasible(
            "no assignment satisfies the p-median constraints".into(),
        ));
    }
    if outcome.values.len() != n + n * n {
        return Err(PlanError::SolverUnavailable(format!(
            "backend returned {} columns, expected {}",
            outcome.values.len(),
            n + n * n
        )));
    }

    let selected: Vec<usize> = (0..n).filter(|&j| outcome.is_set(open_col(j))).collect();
    let assignment: Vec<usize> = (0..n)
        .map(|i| {
            let mut best = 0;
            let mut best_value = f64::NEG_INFINITY;
            for j in 0..n {
                let value = outcome.values[assign_col(n, i, j)];
                if value > best_value {
                    best_value = value;
                    best = j;
                }
            }
            best
        })
        .collect();

    Ok(PMedianSolution {
        selected,
        assignment,
        objective: outcome.objective,
        status: outcome.status,
    })
}
