//! Street-lamp placement planning core.
//!
//! Turns a user-drawn polygon plus a road network into a discrete
//! facility-location or budget-coverage model, drives a MILP backend through
//! a narrow contract, and maps the solved assignment back to geographic
//! space. The HTTP layer, road-data retrieval, and the solver's internal
//! search live behind the [`roads::RoadDataProvider`] and
//! [`solve::SolverBackend`] traits.

pub mod config;
pub mod coverage;
pub mod distance;
pub mod error;
pub mod geometry;
pub mod lamps;
pub mod models;
pub mod pipeline;
pub mod pmedian;
pub mod report;
pub mod roads;
pub mod sampling;
pub mod solve;
pub mod spatial;

pub use config::PlannerConfig;
pub use error::PlanError;
pub use models::{
    LampType, OptimizeRequest, OptimizeResponse, PlanMetrics, PlanMode, PlannedLamp, RoadSegment,
    SamplePoint,
};
pub use pipeline::Planner;
pub use roads::{NetworkFilter, RoadDataProvider, StaticRoadProvider};
pub use solve::{MilpModel, SolveOutcome, SolveStatus, SolverBackend};
pub use spatial::MercatorProjection;
