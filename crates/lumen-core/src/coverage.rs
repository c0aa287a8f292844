//! Budget-constrained coverage: choose lamp installations maximizing covered
//! demand minus cost, under a total budget.

use std::time::Duration;

use crate::distance::DistanceMatrix;
use crate::error::PlanError;
use crate::models::LampType;
use crate::solve::{Cmp, MilpModel, Sense, SolveOutcome, SolveStatus};

/// Mode-B parameters; tolerance and weight come from [`crate::PlannerConfig`].
#[derive(Debug, Clone)]
pub struct CoverageParams {
    pub max_budget: f64,
    /// Two active lamps must be at least `overlap_tolerance * (r1 + r2)`
    /// apart.
    pub overlap_tolerance: f64,
    /// Objective reward per covered demand piece.
    pub coverage_weight: i64,
    /// Fixed-point multiplier turning currency into integer coefficients.
    pub cost_scale: f64,
}

// Column layout: x[j, l] = j * L + l, y[i] = J * L + i.
fn x_col(num_l: usize, j: usize, l: usize) -> usize {
    j * num_l + l
}

fn y_col(num_j: usize, num_l: usize, i: usize) -> usize {
    num_j * num_l + i
}

fn scaled_costs(catalog: &[LampType], cost_scale: f64) -> Result<Vec<i64>, PlanError> {
    catalog
        .iter()
        .map(|t| {
            if !t.cost.is_finite() || t.cost < 0.0 {
                return Err(PlanError::Model(format!(
                    "lamp type {} has invalid cost {}",
                    t.id, t.cost
                )));
            }
            Ok((t.cost * cost_scale).round() as i64)
        })
        .collect()
}

/// Build the coverage model.
///
/// `cand` is the square candidate-to-candidate matrix used by the spacing
/// rule; `reach` is candidates x demand pieces and decides which
/// installations can illuminate which piece. Pieces no installation can reach
/// are fixed uncovered rather than left to the solver.
pub fn build_coverage(
    cand: &DistanceMatrix,
    reach: &DistanceMatrix,
    catalog: &[LampType],
    params: &CoverageParams,
    time_limit: Duration,
) -> Result<MilpModel, PlanError> {
    let num_j = cand.rows();
    let num_i = reach.cols();
    let num_l = catalog.len();
    if num_l == 0 {
        return Err(PlanError::Model("lamp catalog is empty".into()));
    }
    if num_j == 0 || cand.cols() != num_j || reach.rows() != num_j || num_i == 0 {
        return Err(PlanError::Model(format!(
            "inconsistent matrices: candidates {}x{}, reach {}x{}",
            cand.rows(),
            cand.cols(),
            reach.rows(),
            reach.cols()
        )));
    }
    if !params.max_budget.is_finite() || params.max_budget < 0.0 {
        return Err(PlanError::Model(format!(
            "budget must be non-negative, got {}",
            params.max_budget
        )));
    }

    let costs = scaled_costs(catalog, params.cost_scale)?;
    let budget_scaled = (params.max_budget * params.cost_scale).round();

    let mut model = MilpModel::new(num_j * num_l + num_i, Sense::Maximize, time_limit);

    // Total installation cost stays within budget, in fixed-point currency.
    let mut budget_row = Vec::with_capacity(num_j * num_l);
    for j in 0..num_j {
        for (l, &cost) in costs.iter().enumerate() {
            budget_row.push((x_col(num_l, j, l), cost as f64));
        }
    }
    model.add(budget_row, Cmp::LessEq, budget_scaled);

    // Overlapping installations cannot both be active.
    for j1 in 0..num_j {
        for j2 in (j1 + 1)..num_j {
            let separation = cand.get(j1, j2);
            for (l1, t1) in catalog.iter().enumerate() {
                for (l2, t2) in catalog.iter().enumerate() {
                    let min_allowed = params.overlap_tolerance * (t1.radius_m + t2.radius_m);
                    if separation < min_allowed {
                        model.add(
                            vec![(x_col(num_l, j1, l1), 1.0), (x_col(num_l, j2, l2), 1.0)],
                            Cmp::LessEq,
                            1.0,
                        );
                    }
                }
            }
        }
    }

    // A piece counts as covered only when some active installation reaches it.
    for i in 0..num_i {
        let covering: Vec<(usize, f64)> = (0..num_j)
            .flat_map(|j| {
                catalog.iter().enumerate().filter_map(move |(l, t)| {
                    (reach.get(j, i) <= t.radius_m).then_some((x_col(num_l, j, l), -1.0))
                })
            })
            .collect();
        if covering.is_empty() {
            model.add(vec![(y_col(num_j, num_l, i), 1.0)], Cmp::Eq, 0.0);
        } else {
            let mut row = vec![(y_col(num_j, num_l, i), 1.0)];
            row.extend(covering);
            model.add(row, Cmp::LessEq, 0.0);
        }
    }

    // Reward covered pieces, charge fixed-point costs.
    for i in 0..num_i {
        model
            .objective
            .push((y_col(num_j, num_l, i), params.coverage_weight as f64));
    }
    for j in 0..num_j {
        for l in 0..num_l {
            model.objective.push((x_col(num_l, j, l), -(costs[l] as f64)));
        }
    }

    Ok(model)
}

/// Decoded coverage result.
#[derive(Debug, Clone)]
pub struct CoverageSolution {
    /// Active `(candidate, lamp type)` installations.
    pub active: Vec<(usize, usize)>,
    /// Covered indicator per demand piece.
    pub covered: Vec<bool>,
    /// Total cost in the original currency, un-scaled.
    pub total_cost: f64,
    pub objective: f64,
    pub status: SolveStatus,
}

pub fn decode_coverage(
    outcome: &SolveOutcome,
    num_j: usize,
    num_i: usize,
    catalog: &[LampType],
    cost_scale: f64,
) -> Result<CoverageSolution, PlanError> {
    // The empty placement is always feasible within a non-negative budget, so
    // a backend reporting infeasibility is misbehaving.
    if outcome.status == SolveStatus::Infeasible {
        return Err(PlanError::Infeasible(
            "coverage model reported infeasible despite the empty placement".into(),
        ));
    }
    let num_l = catalog.len();
    if outcome.values.len() != num_j * num_l + num_i {
        return Err(PlanError::SolverUnavailable(format!(
            "backend returned {} columns, expected {}",
            outcome.values.len(),
            num_j * num_l + num_i
        )));
    }

    let mut active = Vec::new();
    let mut total_scaled = 0i64;
    for j in 0..num_j {
        for (l, t) in catalog.iter().enumerate() {
            if outcome.is_set(x_col(num_l, j, l)) {
                active.push((j, l));
                total_scaled += (t.cost * cost_scale).round() as i64;
            }
        }
    }
    let covered = (0..num_i)
        .map(|i| outcome.is_set(y_col(num_j, num_l, i)))
        .collect();

    Ok(CoverageSolution {
        active,
        covered,
        total_cost: total_scaled as f64 / cost_scale,
        objective: outcome.objective,
        status: outcome.status,
    })
}
