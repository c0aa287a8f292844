//! Boolean linear models solved with the bundled pure-Rust MILP solver.

use std::sync::mpsc;
use std::thread;

use good_lp::{constraint, default_solver, variable, variables, Expression, ResolutionError,
    Solution, SolverModel, Variable};
use lumen_core::error::PlanError;
use lumen_core::solve::{Cmp, MilpModel, Sense, SolveOutcome, SolveStatus, SolverBackend};

/// Solves [`MilpModel`]s with `good_lp`'s bundled `microlp` solver.
///
/// The model's wall-clock limit is enforced by running the search on a worker
/// thread and abandoning it on timeout. The search itself cannot be
/// interrupted and yields no incumbent early, so hitting the limit surfaces
/// as [`PlanError::SolverTimeout`] while the abandoned worker finishes in the
/// background and its result is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoodLpBackend;

impl GoodLpBackend {
    pub fn new() -> Self {
        Self
    }
}

fn solve_blocking(model: &MilpModel) -> Result<SolveOutcome, PlanError> {
    let mut vars = variables!();
    let cols: Vec<Variable> = (0..model.num_cols)
        .map(|_| vars.add(variable().binary()))
        .collect();

    let mut objective = Expression::from(0.0);
    for &(col, coeff) in &model.objective {
        objective += coeff * cols[col];
    }

    let mut problem = match model.sense {
        Sense::Minimize => vars.minimise(objective).using(default_solver),
        Sense::Maximize => vars.maximise(objective).using(default_solver),
    };
    for c in &model.constraints {
        let mut lhs = Expression::from(0.0);
        for &(col, coeff) in &c.terms {
            lhs += coeff * cols[col];
        }
        problem = match c.cmp {
            Cmp::LessEq => problem.with(constraint!(lhs <= c.rhs)),
            Cmp::Eq => problem.with(constraint!(lhs == c.rhs)),
            Cmp::GreaterEq => problem.with(constraint!(lhs >= c.rhs)),
        };
    }

    let solution = match problem.solve() {
        Ok(solution) => solution,
        Err(ResolutionError::Infeasible) => {
            return Ok(SolveOutcome {
                status: SolveStatus::Infeasible,
                values: Vec::new(),
                objective: 0.0,
            });
        }
        Err(other) => {
            return Err(PlanError::SolverUnavailable(format!("{other:?}")));
        }
    };

    let values: Vec<f64> = cols.iter().map(|&v| solution.value(v)).collect();
    let objective = model
        .objective
        .iter()
        .map(|&(col, coeff)| coeff * values[col])
        .sum();
    Ok(SolveOutcome {
        status: SolveStatus::Optimal,
        values,
        objective,
    })
}

impl SolverBackend for GoodLpBackend {
    fn solve(&self, model: &MilpModel) -> Result<SolveOutcome, PlanError> {
        let (tx, rx) = mpsc::channel();
        let owned = model.clone();
        thread::spawn(move || {
            let _ = tx.send(solve_blocking(&owned));
        });

        match rx.recv_timeout(model.time_limit) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                tracing::warn!(
                    limit_secs = model.time_limit.as_secs_f64(),
                    cols = model.num_cols,
                    "abandoning solve after time limit"
                );
                Err(PlanError::SolverTimeout(format!(
                    "no solution within {:.1}s",
                    model.time_limit.as_secs_f64()
                )))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(PlanError::SolverUnavailable(
                "solver worker terminated unexpectedly".into(),
            )),
        }
    }

    fn name(&self) -> &str {
        "good_lp-microlp"
    }
}
