//! Invariant checks on decoded solutions, driven through the real backend.

use std::time::Duration;

use lumen_core::coverage::{build_coverage, decode_coverage, CoverageParams};
use lumen_core::distance::{planar_distance, DistanceMatrix};
use lumen_core::models::{LampType, SamplePoint};
use lumen_core::pmedian::{build_p_median, decode_p_median};
use lumen_core::solve::{SolveStatus, SolverBackend};
use lumen_solver::GoodLpBackend;

fn points(xs: &[f64]) -> Vec<SamplePoint> {
    xs.iter()
        .map(|&x| SamplePoint {
            x,
            y: 0.0,
            lon: 0.0,
            lat: 0.0,
        })
        .collect()
}

fn lamp(id: &str, radius_m: f64, cost: f64) -> LampType {
    LampType {
        id: id.into(),
        radius_m,
        cost,
        color: None,
    }
}

const LIMIT: Duration = Duration::from_secs(30);

#[test]
fn p_median_objective_matches_recomputed_assignment_distances() {
    let sites = points(&[0.0, 25.0, 50.0, 75.0, 100.0]);
    let dist = DistanceMatrix::between(&sites, &sites, 2);
    let model = build_p_median(&dist, 2, LIMIT).unwrap();
    let outcome = GoodLpBackend::new().solve(&model).unwrap();
    let solution = decode_p_median(&outcome, sites.len()).unwrap();

    assert_eq!(solution.status, SolveStatus::Optimal);
    assert_eq!(solution.selected.len(), 2);
    assert!(solution
        .assignment
        .iter()
        .all(|site| solution.selected.contains(site)));

    let recomputed: f64 = solution
        .assignment
        .iter()
        .enumerate()
        .map(|(i, &j)| dist.get(i, j))
        .sum();
    let relative = (solution.objective - recomputed).abs() / recomputed.max(1.0);
    assert!(relative < 1e-6, "objective {} vs recomputed {recomputed}", solution.objective);
    assert!((recomputed - 75.0).abs() < 1e-6);
}

#[test]
fn every_p_in_range_selects_exactly_p_sites() {
    let sites = points(&[0.0, 25.0, 50.0, 75.0, 100.0]);
    let dist = DistanceMatrix::between(&sites, &sites, 2);
    for p in 1..=sites.len() {
        let model = build_p_median(&dist, p, LIMIT).unwrap();
        let outcome = GoodLpBackend::new().solve(&model).unwrap();
        let solution = decode_p_median(&outcome, sites.len()).unwrap();
        assert_eq!(solution.selected.len(), p, "p={p}");
        assert_eq!(solution.assignment.len(), sites.len());
    }
}

#[test]
fn active_coverage_placements_respect_the_spacing_rule() {
    // Candidates every 20 m with 20 m lamps: the 0.6 tolerance forbids
    // neighbors, so the solver must skip at least every other site.
    let cand = points(&[0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
    let demand = points(&(0..=20).map(|i| i as f64 * 5.0).collect::<Vec<_>>());
    let catalog = vec![lamp("led", 20.0, 10.0)];
    let params = CoverageParams {
        max_budget: 1000.0,
        overlap_tolerance: 0.6,
        coverage_weight: 10_000,
        cost_scale: 100.0,
    };
    let cand_m = DistanceMatrix::between(&cand, &cand, 2);
    let reach = DistanceMatrix::between(&cand, &demand, 2);
    let model = build_coverage(&cand_m, &reach, &catalog, &params, LIMIT).unwrap();
    let outcome = GoodLpBackend::new().solve(&model).unwrap();
    let solution = decode_coverage(&outcome, cand.len(), demand.len(), &catalog, 100.0).unwrap();

    assert!(!solution.active.is_empty());
    for (a, &(j1, l1)) in solution.active.iter().enumerate() {
        for &(j2, l2) in &solution.active[a + 1..] {
            let separation = planar_distance(&cand[j1], &cand[j2]);
            let min_allowed =
                params.overlap_tolerance * (catalog[l1].radius_m + catalog[l2].radius_m);
            assert!(
                separation >= min_allowed - 1e-6,
                "sites {j1} and {j2} are {separation} m apart, need {min_allowed}"
            );
        }
    }

    // Soundness: a covered piece really is within reach of an active lamp.
    for (i, &covered) in solution.covered.iter().enumerate() {
        if covered {
            assert!(
                solution
                    .active
                    .iter()
                    .any(|&(j, l)| reach.get(j, i) <= catalog[l].radius_m),
                "piece {i} marked covered with no lamp in range"
            );
        }
    }
}

#[test]
fn coverage_weight_must_outweigh_costs_to_place_anything() {
    let cand = points(&[0.0, 50.0, 100.0]);
    let demand = points(&(0..=20).map(|i| i as f64 * 5.0).collect::<Vec<_>>());
    let catalog = vec![lamp("led", 20.0, 10.0)];
    let cand_m = DistanceMatrix::between(&cand, &cand, 2);
    let reach = DistanceMatrix::between(&cand, &demand, 2);

    // A reward of 1 per piece never beats a scaled cost of 1000: the empty
    // placement wins.
    let weak = CoverageParams {
        max_budget: 100.0,
        overlap_tolerance: 0.6,
        coverage_weight: 1,
        cost_scale: 100.0,
    };
    let model = build_coverage(&cand_m, &reach, &catalog, &weak, LIMIT).unwrap();
    let outcome = GoodLpBackend::new().solve(&model).unwrap();
    let solution = decode_coverage(&outcome, cand.len(), demand.len(), &catalog, 100.0).unwrap();
    assert!(solution.active.is_empty());
    assert_eq!(solution.total_cost, 0.0);

    // The default weight dominates and lamps get placed.
    let strong = CoverageParams {
        coverage_weight: 10_000,
        ..weak
    };
    let model = build_coverage(&cand_m, &reach, &catalog, &strong, LIMIT).unwrap();
    let outcome = GoodLpBackend::new().solve(&model).unwrap();
    let solution = decode_coverage(&outcome, cand.len(), demand.len(), &catalog, 100.0).unwrap();
    assert!(!solution.active.is_empty());
}
