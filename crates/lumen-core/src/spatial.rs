//! Planar projection shared by every stage of the pipeline.
//!
//! All metric computation happens in spherical-Mercator meters (EPSG:3857
//! convention). Mixing angular and planar scales silently corrupts spacing
//! and coverage checks, so no stage converts coordinates on its own.

use geo::{Coord, LineString};

use crate::error::PlanError;

/// Radius of the spherical-Mercator reference sphere in meters.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Latitude bound beyond which the Mercator transform degenerates.
const MAX_LATITUDE_DEG: f64 = 85.06;

/// Forward/inverse transform between geographic (lon, lat) degrees and
/// planar (x, y) meters.
///
/// Constructed once and passed by reference into every component that
/// touches coordinates. The transform holds no state and is safe to share
/// across concurrent requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct MercatorProjection;

impl MercatorProjection {
    pub fn new() -> Self {
        Self
    }

    /// Geographic degrees to planar meters.
    pub fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), PlanError> {
        if !lon.is_finite() || !lat.is_finite() {
            return Err(PlanError::Projection(format!(
                "non-finite coordinate ({lon}, {lat})"
            )));
        }
        if lat.abs() > MAX_LATITUDE_DEG {
            return Err(PlanError::Projection(format!(
                "latitude {lat} outside Mercator bounds"
            )));
        }
        let x = EARTH_RADIUS_M * lon.to_radians();
        let y = EARTH_RADIUS_M
            * (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0)
                .tan()
                .ln();
        Ok((x, y))
    }

    /// Planar meters back to geographic degrees.
    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let lon = (x / EARTH_RADIUS_M).to_degrees();
        let lat = (2.0 * (y / EARTH_RADIUS_M).exp().atan() - std::f64::consts::FRAC_PI_2)
            .to_degrees();
        (lon, lat)
    }

    /// Project a geographic line into the planar frame.
    pub fn project_line(&self, line: &LineString<f64>) -> Result<LineString<f64>, PlanError> {
        let coords = line
            .coords()
            .map(|c| self.forward(c.x, c.y).map(|(x, y)| Coord { x, y }))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(LineString::new(coords))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_recovers_geographic_point() {
        let projection = MercatorProjection::new();
        let (lon, lat) = (-117.8265, 33.6846);
        let (x, y) = projection.forward(lon, lat).unwrap();
        let (lon2, lat2) = projection.inverse(x, y);
        assert!((lon - lon2).abs() < 1e-6, "lon drifted to {lon2}");
        assert!((lat - lat2).abs() < 1e-6, "lat drifted to {lat2}");
    }

    #[test]
    fn origin_maps_to_origin() {
        let projection = MercatorProjection::new();
        let (x, y) = projection.forward(0.0, 0.0).unwrap();
        assert!(x.abs() < 1e-9);
        assert!(y.abs() < 1e-9);
    }

    #[test]
    fn one_degree_of_longitude_at_equator_is_about_111km() {
        let projection = MercatorProjection::new();
        let (x, _) = projection.forward(1.0, 0.0).unwrap();
        assert!((x - 111_319.0).abs() < 1.0, "got {x}");
    }

    #[test]
    fn rejects_polar_and_non_finite_input() {
        let projection = MercatorProjection::new();
        assert!(projection.forward(0.0, 89.0).is_err());
        assert!(projection.forward(f64::NAN, 0.0).is_err());
    }
}
