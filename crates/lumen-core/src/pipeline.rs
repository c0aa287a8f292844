//! Request-scoped orchestration of the full planning flow.
//!
//! Stages run strictly in order: validate polygon, fetch roads, project,
//! dissolve, sample, build distances, formulate, solve, report. Each stage's
//! output is immutable input to the next and nothing survives the request.

use std::time::Duration;

use crate::config::PlannerConfig;
use crate::coverage::{self, CoverageParams};
use crate::distance::DistanceMatrix;
use crate::error::PlanError;
use crate::geometry;
use crate::lamps;
use crate::models::{OptimizeRequest, OptimizeResponse, PlanMode, SamplePoint};
use crate::pmedian;
use crate::report;
use crate::roads::RoadDataProvider;
use crate::sampling;
use crate::solve::SolverBackend;
use crate::spatial::MercatorProjection;

/// Runs optimization requests end to end.
///
/// Holds only immutable configuration and the shared projection, so one
/// instance serves concurrent requests.
pub struct Planner {
    config: PlannerConfig,
    projection: MercatorProjection,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(PlannerConfig::default())
    }
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            config,
            projection: MercatorProjection::new(),
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn projection(&self) -> &MercatorProjection {
        &self.projection
    }

    /// Plan lamp placements for one request.
    pub fn plan(
        &self,
        request: &OptimizeRequest,
        roads: &dyn RoadDataProvider,
        solver: &dyn SolverBackend,
    ) -> Result<OptimizeResponse, PlanError> {
        let area = geometry::validate_polygon(&request.polygon)?;
        let segments = roads.fetch_roads(&area, request.network)?;
        tracing::info!(segments = segments.len(), "fetched road geometry");

        let projected = segments
            .iter()
            .map(|s| self.projection.project_line(&s.geometry))
            .collect::<Result<Vec<_>, _>>()?;
        let lines = geometry::dissolve_roads(&projected);
        tracing::debug!(
            raw = projected.len(),
            dissolved = lines.len(),
            "dissolved road network"
        );

        let mut catalog = request.lamp_types.clone();
        catalog.sort_by(|a, b| a.id.cmp(&b.id));
        if catalog.is_empty() {
            return Err(PlanError::Model("lamp catalog is empty".into()));
        }

        let time_limit = Duration::from_secs_f64(self.config.solver_time_limit_secs);
        let candidate_spacing = request
            .candidate_spacing_m
            .unwrap_or(self.config.candidate_spacing_m);
        let candidates = thin_candidates(
            sampling::sample_along_lines(&lines, candidate_spacing, &self.projection)?,
            self.config.max_candidates,
        );

        match request.mode {
            PlanMode::PMedian { p } => {
                let dist =
                    DistanceMatrix::between(&candidates, &candidates, self.config.distance_decimals);
                let model = pmedian::build_p_median(&dist, p, time_limit)?;
                tracing::info!(
                    candidates = candidates.len(),
                    p,
                    constraints = model.constraints.len(),
                    backend = solver.name(),
                    "solving p-median model"
                );
                let outcome = solver.solve(&model)?;
                let solution = pmedian::decode_p_median(&outcome, candidates.len())?;
                let lamps = lamps::assign_lamp_types(
                    &solution.selected,
                    &candidates,
                    &solution.assignment,
                    &catalog,
                )?;
                Ok(report::pmedian_response(&lamps, &candidates, &solution))
            }
            PlanMode::Coverage { max_budget } => {
                let demand_spacing = request
                    .demand_spacing_m
                    .unwrap_or(self.config.demand_spacing_m);
                let demand =
                    sampling::sample_along_lines(&lines, demand_spacing, &self.projection)?;
                let cand =
                    DistanceMatrix::between(&candidates, &candidates, self.config.distance_decimals);
                let reach =
                    DistanceMatrix::between(&candidates, &demand, self.config.distance_decimals);
                let params = CoverageParams {
                    max_budget,
                    overlap_tolerance: self.config.overlap_tolerance,
                    coverage_weight: self.config.coverage_weight,
                    cost_scale: self.config.cost_scale,
                };
                let model = coverage::build_coverage(&cand, &reach, &catalog, &params, time_limit)?;
                tracing::info!(
                    candidates = candidates.len(),
                    pieces = demand.len(),
                    types = catalog.len(),
                    constraints = model.constraints.len(),
                    backend = solver.name(),
                    "solving coverage model"
                );
                let outcome = solver.solve(&model)?;
                let solution = coverage::decode_coverage(
                    &outcome,
                    candidates.len(),
                    demand.len(),
                    &catalog,
                    self.config.cost_scale,
                )?;
                Ok(report::coverage_response(
                    &solution,
                    &candidates,
                    &catalog,
                    demand_spacing,
                    demand.len(),
                ))
            }
        }
    }
}

/// Deterministic stride thinning: identical input always keeps the same
/// sites, unlike random subsampling.
fn thin_candidates(points: Vec<SamplePoint>, max: usize) -> Vec<SamplePoint> {
    if max == 0 || points.len() <= max {
        return points;
    }
    tracing::debug!(from = points.len(), to = max, "thinning candidate set");
    (0..max).map(|i| points[i * points.len() / max]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LampType, RoadSegment};
    use crate::roads::StaticRoadProvider;
    use crate::solve::{MilpModel, SolveOutcome, SolveStatus};
    use crate::spatial::EARTH_RADIUS_M;
    use geo::LineString;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Straight 100 m road on the equator plus a polygon around it.
    fn fixture() -> (StaticRoadProvider, Vec<[f64; 2]>) {
        let end_lon = (100.0 / EARTH_RADIUS_M).to_degrees();
        let provider = StaticRoadProvider::new(vec![RoadSegment {
            id: "0".into(),
            osm_id: None,
            highway: Some("residential".into()),
            length_m: 100.0,
            geometry: LineString::from(vec![(0.0, 0.0), (end_lon, 0.0)]),
        }]);
        let polygon = vec![
            [-1e-4, -1e-4],
            [end_lon + 1e-4, -1e-4],
            [end_lon + 1e-4, 1e-4],
            [-1e-4, 1e-4],
        ];
        (provider, polygon)
    }

    fn catalog() -> Vec<LampType> {
        vec![LampType {
            id: "led".into(),
            radius_m: 60.0,
            cost: 10.0,
            color: None,
        }]
    }

    struct RecordingStub {
        called: AtomicBool,
        outcome: Option<SolveOutcome>,
    }

    impl RecordingStub {
        fn failing() -> Self {
            Self {
                called: AtomicBool::new(false),
                outcome: None,
            }
        }

        fn returning(outcome: SolveOutcome) -> Self {
            Self {
                called: AtomicBool::new(false),
                outcome: Some(outcome),
            }
        }
    }

    impl SolverBackend for RecordingStub {
        fn solve(&self, _model: &MilpModel) -> Result<SolveOutcome, PlanError> {
            self.called.store(true, Ordering::SeqCst);
            match &self.outcome {
                Some(outcome) => Ok(outcome.clone()),
                None => Err(PlanError::SolverUnavailable("stub".into())),
            }
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn request(mode: PlanMode, polygon: Vec<[f64; 2]>, lamp_types: Vec<LampType>) -> OptimizeRequest {
        OptimizeRequest {
            polygon,
            lamp_types,
            mode,
            network: Default::default(),
            candidate_spacing_m: None,
            demand_spacing_m: None,
        }
    }

    #[test]
    fn invalid_p_fails_before_the_solver_runs() {
        let (provider, polygon) = fixture();
        let planner = Planner::default();
        let stub = RecordingStub::failing();
        for p in [0, 6] {
            let err = planner
                .plan(
                    &request(PlanMode::PMedian { p }, polygon.clone(), catalog()),
                    &provider,
                    &stub,
                )
                .unwrap_err();
            assert!(matches!(err, PlanError::Model(_)), "p={p} gave {err:?}");
        }
        assert!(!stub.called.load(Ordering::SeqCst));
    }

    #[test]
    fn empty_catalog_fails_before_the_solver_runs() {
        let (provider, polygon) = fixture();
        let planner = Planner::default();
        let stub = RecordingStub::failing();
        let err = planner
            .plan(
                &request(PlanMode::PMedian { p: 1 }, polygon, Vec::new()),
                &provider,
                &stub,
            )
            .unwrap_err();
        assert!(matches!(err, PlanError::Model(_)));
        assert!(!stub.called.load(Ordering::SeqCst));
    }

    #[test]
    fn time_limited_status_propagates_to_the_response() {
        // 5 candidates at the default 25 m spacing.
        let n = 5;
        let mut values = vec![0.0; n + n * n];
        values[0] = 1.0;
        values[1] = 1.0;
        for i in 0..n {
            values[n + i * n] = 1.0;
        }
        let stub = RecordingStub::returning(SolveOutcome {
            status: SolveStatus::Feasible,
            values,
            objective: 250.0,
        });

        let (provider, polygon) = fixture();
        let planner = Planner::default();
        let response = planner
            .plan(
                &request(PlanMode::PMedian { p: 2 }, polygon, catalog()),
                &provider,
                &stub,
            )
            .unwrap();
        assert_eq!(response.status, SolveStatus::Feasible);
    }

    #[test]
    fn thinning_is_deterministic_and_keeps_the_first_site() {
        let points: Vec<SamplePoint> = (0..10)
            .map(|i| SamplePoint {
                x: i as f64,
                y: 0.0,
                lon: 0.0,
                lat: 0.0,
            })
            .collect();
        let a = thin_candidates(points.clone(), 4);
        let b = thin_candidates(points, 4);
        assert_eq!(a, b);
        assert_eq!(a.len(), 4);
        assert_eq!(a[0].x, 0.0);
    }
}
