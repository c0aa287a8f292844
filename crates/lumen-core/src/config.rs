//! Tunable parameters for the planning pipeline.

use serde::{Deserialize, Serialize};

/// Knobs controlling discretization and model construction.
///
/// The overlap tolerance and the coverage weight have no derivation from
/// first principles; they live here instead of being buried as constants so
/// deployments can tune them and tests can probe their sensitivity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Spacing between candidate lamp sites, in meters. Drives solver size.
    pub candidate_spacing_m: f64,
    /// Spacing between demand pieces, in meters. Drives coverage granularity.
    pub demand_spacing_m: f64,
    /// Hard cap on the candidate count. Excess candidates are thinned by a
    /// deterministic stride so identical input yields identical sites.
    pub max_candidates: usize,
    /// Two active lamps must be at least `overlap_tolerance * (r1 + r2)`
    /// apart.
    pub overlap_tolerance: f64,
    /// Objective reward per covered demand piece. Must outweigh any feasible
    /// cost delta while staying inside the backend's integer range.
    pub coverage_weight: i64,
    /// Fixed-point multiplier applied to currency amounts before they reach
    /// integer-coefficient backends: 100 keeps cents exact.
    pub cost_scale: f64,
    /// Decimal places kept when rounding planar distances.
    pub distance_decimals: u32,
    /// Wall-clock budget for a single solve call, in seconds.
    pub solver_time_limit_secs: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            candidate_spacing_m: 25.0,
            demand_spacing_m: 3.0,
            max_candidates: 150,
            overlap_tolerance: 0.6,
            coverage_weight: 10_000,
            cost_scale: 100.0,
            distance_decimals: 2,
            solver_time_limit_secs: 30.0,
        }
    }
}
