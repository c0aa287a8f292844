//! Shapes solved assignments into the geographic response payload.

use crate::coverage::CoverageSolution;
use crate::lamps::TypedLamp;
use crate::models::{LampType, OptimizeResponse, PlanMetrics, PlannedLamp, SamplePoint};
use crate::pmedian::PMedianSolution;

/// Round for stable presentation.
fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Response for a solved p-median request.
///
/// Each sample already carries its geographic coordinate from the shared
/// inverse projection, so placements report (lon, lat) directly.
pub fn pmedian_response(
    lamps: &[TypedLamp],
    candidates: &[SamplePoint],
    solution: &PMedianSolution,
) -> OptimizeResponse {
    let placements: Vec<PlannedLamp> = lamps
        .iter()
        .map(|lamp| PlannedLamp {
            candidate: lamp.candidate,
            lon: candidates[lamp.candidate].lon,
            lat: candidates[lamp.candidate].lat,
            lamp_type: lamp.type_id.clone(),
            radius_m: lamp.radius_m,
            cost: lamp.cost,
            color: lamp.color.clone(),
            under_covered: lamp.under_covered,
        })
        .collect();
    let total_cost = placements.iter().map(|p| p.cost).sum::<f64>();

    OptimizeResponse {
        metrics: PlanMetrics {
            objective: round2(solution.objective),
            total_cost: round2(total_cost),
            coverage_pct: None,
            covered_length_m: None,
            covered_pieces: None,
            total_pieces: None,
        },
        status: solution.status,
        lamps: placements,
    }
}

/// Response for a solved coverage request.
///
/// Coverage is counted per demand piece; covered length approximates it by
/// piece count times the demand spacing.
pub fn coverage_response(
    solution: &CoverageSolution,
    candidates: &[SamplePoint],
    catalog: &[LampType],
    demand_spacing_m: f64,
    total_pieces: usize,
) -> OptimizeResponse {
    let placements: Vec<PlannedLamp> = solution
        .active
        .iter()
        .map(|&(j, l)| {
            let t = &catalog[l];
            PlannedLamp {
                candidate: j,
                lon: candidates[j].lon,
                lat: candidates[j].lat,
                lamp_type: t.id.clone(),
                radius_m: t.radius_m,
                cost: t.cost,
                color: t.color.clone(),
                under_covered: false,
            }
        })
        .collect();

    let covered_pieces = solution.covered.iter().filter(|&&c| c).count();
    let coverage_pct = if total_pieces == 0 {
        0.0
    } else {
        covered_pieces as f64 / total_pieces as f64 * 100.0
    };

    OptimizeResponse {
        metrics: PlanMetrics {
            objective: round2(solution.objective),
            total_cost: round2(solution.total_cost),
            coverage_pct: Some(round2(coverage_pct)),
            covered_length_m: Some(round2(covered_pieces as f64 * demand_spacing_m)),
            covered_pieces: Some(covered_pieces),
            total_pieces: Some(total_pieces),
        },
        status: solution.status,
        lamps: placements,
    }
}
