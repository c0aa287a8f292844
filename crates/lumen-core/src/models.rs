//! Core data models for lamp placement planning.

use geo::LineString;
use serde::{Deserialize, Serialize};

use crate::roads::NetworkFilter;
use crate::solve::SolveStatus;

/// One entry of the lamp-type catalog supplied with a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LampType {
    pub id: String,
    /// Radius within which this type adequately illuminates a point.
    pub radius_m: f64,
    /// Installation cost in the request's currency unit.
    pub cost: f64,
    #[serde(default)]
    pub color: Option<String>,
}

/// A road polyline as delivered by the road-data provider, in geographic
/// coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadSegment {
    pub id: String,
    #[serde(default)]
    pub osm_id: Option<i64>,
    /// Highway classification, e.g. `residential` or `footway`.
    #[serde(default)]
    pub highway: Option<String>,
    pub length_m: f64,
    pub geometry: LineString<f64>,
}

/// A discretized road point in the planar frame, carrying its original
/// geographic coordinate for reporting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    /// Planar easting in meters.
    pub x: f64,
    /// Planar northing in meters.
    pub y: f64,
    pub lon: f64,
    pub lat: f64,
}

/// Which formulation to run and its mode-specific parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PlanMode {
    /// Open exactly `p` facilities minimizing total assignment distance.
    PMedian { p: usize },
    /// Maximize covered demand under a total-cost budget.
    Coverage { max_budget: f64 },
}

/// Request payload handed over by the API layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeRequest {
    /// Closed or open ring of (lon, lat) vertices.
    pub polygon: Vec<[f64; 2]>,
    pub lamp_types: Vec<LampType>,
    #[serde(flatten)]
    pub mode: PlanMode,
    #[serde(default)]
    pub network: NetworkFilter,
    /// Overrides the configured candidate spacing when present.
    #[serde(default)]
    pub candidate_spacing_m: Option<f64>,
    /// Overrides the configured demand spacing when present.
    #[serde(default)]
    pub demand_spacing_m: Option<f64>,
}

/// One placed lamp in the response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedLamp {
    /// Index of the chosen candidate site.
    pub candidate: usize,
    pub lon: f64,
    pub lat: f64,
    pub lamp_type: String,
    pub radius_m: f64,
    pub cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Set when no catalog entry reached every assigned point and the
    /// largest-radius fallback was used.
    #[serde(default)]
    pub under_covered: bool,
}

/// Aggregate metrics, rounded for stable presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanMetrics {
    pub objective: f64,
    pub total_cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage_pct: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub covered_length_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub covered_pieces: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pieces: Option<usize>,
}

/// Response payload returned to the API layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeResponse {
    pub lamps: Vec<PlannedLamp>,
    pub metrics: PlanMetrics,
    /// `Feasible` marks a time-limited, possibly non-optimal result.
    pub status: SolveStatus,
}
