//! Road-data provider contract and an in-memory implementation.

use geo::{BoundingRect, Intersects, Polygon};
use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::models::RoadSegment;

/// Road classes requested from the provider, mirroring the network-type
/// filters of common map data sources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkFilter {
    #[default]
    Drive,
    Walk,
    Bike,
    All,
}

impl NetworkFilter {
    /// Whether a highway classification belongs to this network. Unknown or
    /// missing classes are admitted.
    pub fn admits(&self, highway: Option<&str>) -> bool {
        let class = highway.unwrap_or("unclassified");
        match self {
            NetworkFilter::All => true,
            NetworkFilter::Drive => !matches!(
                class,
                "footway" | "path" | "pedestrian" | "cycleway" | "steps"
            ),
            NetworkFilter::Walk => !matches!(
                class,
                "motorway" | "motorway_link" | "trunk" | "trunk_link"
            ),
            NetworkFilter::Bike => !matches!(class, "motorway" | "motorway_link" | "steps"),
        }
    }
}

/// Supplies road geometry for a polygon, in geographic coordinates.
///
/// Retrieval latency is unbounded from the pipeline's point of view, so
/// implementations own their transport timeout and any retry policy; the
/// pipeline performs exactly one call per request and propagates
/// [`PlanError::NoRoadData`] when the area is empty.
pub trait RoadDataProvider: Send + Sync {
    fn fetch_roads(
        &self,
        area: &Polygon<f64>,
        filter: NetworkFilter,
    ) -> Result<Vec<RoadSegment>, PlanError>;
}

/// Provider backed by a fixed in-memory segment set.
///
/// Returns the stored segments that intersect the query polygon; used for
/// offline planning and as the test fixture.
pub struct StaticRoadProvider {
    segments: Vec<RoadSegment>,
}

impl StaticRoadProvider {
    pub fn new(segments: Vec<RoadSegment>) -> Self {
        Self { segments }
    }
}

impl RoadDataProvider for StaticRoadProvider {
    fn fetch_roads(
        &self,
        area: &Polygon<f64>,
        filter: NetworkFilter,
    ) -> Result<Vec<RoadSegment>, PlanError> {
        let area_bbox = area
            .bounding_rect()
            .ok_or_else(|| PlanError::Geometry("query polygon has no extent".into()))?;

        let hits: Vec<RoadSegment> = self
            .segments
            .iter()
            .filter(|s| filter.admits(s.highway.as_deref()))
            .filter(|s| {
                // Cheap bbox reject before the exact test.
                s.geometry
                    .bounding_rect()
                    .is_some_and(|b| b.intersects(&area_bbox))
            })
            .filter(|s| s.geometry.intersects(area))
            .cloned()
            .collect();

        if hits.is_empty() {
            return Err(PlanError::NoRoadData(
                "no road segments intersect the selected area".into(),
            ));
        }
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::LineString;

    fn segment(id: &str, highway: Option<&str>, coords: Vec<(f64, f64)>) -> RoadSegment {
        RoadSegment {
            id: id.into(),
            osm_id: None,
            highway: highway.map(String::from),
            length_m: 0.0,
            geometry: LineString::from(coords),
        }
    }

    fn unit_area() -> Polygon<f64> {
        crate::geometry::validate_polygon(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]])
            .unwrap()
    }

    #[test]
    fn drive_filter_excludes_footways() {
        assert!(NetworkFilter::Drive.admits(Some("residential")));
        assert!(NetworkFilter::Drive.admits(None));
        assert!(!NetworkFilter::Drive.admits(Some("footway")));
        assert!(NetworkFilter::All.admits(Some("footway")));
    }

    #[test]
    fn returns_only_intersecting_segments() {
        let provider = StaticRoadProvider::new(vec![
            segment("in", Some("residential"), vec![(0.2, 0.5), (0.8, 0.5)]),
            segment("out", Some("residential"), vec![(5.0, 5.0), (6.0, 5.0)]),
        ]);
        let roads = provider
            .fetch_roads(&unit_area(), NetworkFilter::Drive)
            .unwrap();
        assert_eq!(roads.len(), 1);
        assert_eq!(roads[0].id, "in");
    }

    #[test]
    fn empty_area_is_a_no_road_data_error() {
        let provider = StaticRoadProvider::new(vec![segment(
            "far",
            Some("residential"),
            vec![(5.0, 5.0), (6.0, 5.0)],
        )]);
        let err = provider
            .fetch_roads(&unit_area(), NetworkFilter::Drive)
            .unwrap_err();
        assert!(matches!(err, PlanError::NoRoadData(_)));
    }

    #[test]
    fn filter_mismatch_can_empty_the_result() {
        let provider = StaticRoadProvider::new(vec![segment(
            "walkway",
            Some("footway"),
            vec![(0.2, 0.5), (0.8, 0.5)],
        )]);
        assert!(provider
            .fetch_roads(&unit_area(), NetworkFilter::Drive)
            .is_err());
        assert!(provider
            .fetch_roads(&unit_area(), NetworkFilter::Walk)
            .is_ok());
    }
}
