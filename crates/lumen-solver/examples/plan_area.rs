//! Plan lamps for a small fixture network and print the responses.
//!
//! Run with `cargo run -p lumen-solver --example plan_area`.

use geo::LineString;
use lumen_core::models::{LampType, OptimizeRequest, PlanMode, RoadSegment};
use lumen_core::roads::StaticRoadProvider;
use lumen_core::spatial::EARTH_RADIUS_M;
use lumen_core::Planner;
use lumen_solver::GoodLpBackend;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Two residential streets meeting at a corner, ~200 m of road in total.
    let meters = |m: f64| (m / EARTH_RADIUS_M).to_degrees();
    let provider = StaticRoadProvider::new(vec![
        RoadSegment {
            id: "0".into(),
            osm_id: None,
            highway: Some("residential".into()),
            length_m: 120.0,
            geometry: LineString::from(vec![(0.0, 0.0), (meters(120.0), 0.0)]),
        },
        RoadSegment {
            id: "1".into(),
            osm_id: None,
            highway: Some("residential".into()),
            length_m: 80.0,
            geometry: LineString::from(vec![(meters(120.0), 0.0), (meters(120.0), meters(80.0))]),
        },
    ]);
    let polygon = vec![
        [meters(-20.0), meters(-20.0)],
        [meters(140.0), meters(-20.0)],
        [meters(140.0), meters(100.0)],
        [meters(-20.0), meters(100.0)],
    ];
    let catalog = vec![
        LampType {
            id: "led-small".into(),
            radius_m: 18.0,
            cost: 90.0,
            color: Some("#ffd27f".into()),
        },
        LampType {
            id: "led-large".into(),
            radius_m: 35.0,
            cost: 160.0,
            color: Some("#fff1c9".into()),
        },
    ];

    let planner = Planner::default();
    let backend = GoodLpBackend::new();

    let pmedian = planner.plan(
        &OptimizeRequest {
            polygon: polygon.clone(),
            lamp_types: catalog.clone(),
            mode: PlanMode::PMedian { p: 3 },
            network: Default::default(),
            candidate_spacing_m: None,
            demand_spacing_m: None,
        },
        &provider,
        &backend,
    )?;
    println!("p-median:\n{}", serde_json::to_string_pretty(&pmedian)?);

    let coverage = planner.plan(
        &OptimizeRequest {
            polygon,
            lamp_types: catalog,
            mode: PlanMode::Coverage { max_budget: 450.0 },
            network: Default::default(),
            candidate_spacing_m: None,
            demand_spacing_m: Some(4.0),
        },
        &provider,
        &backend,
    )?;
    println!("coverage:\n{}", serde_json::to_string_pretty(&coverage)?);

    Ok(())
}
