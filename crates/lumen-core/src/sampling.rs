//! Deterministic discretization of road geometry into point sets.

use geo::{Coord, LineString};

use crate::error::PlanError;
use crate::models::SamplePoint;
use crate::spatial::MercatorProjection;

const EPS_M: f64 = 1e-9;

/// Sample points along planar road lines at a fixed spacing.
///
/// Each line is walked from 0 to its length in `spacing_m` increments and the
/// terminal point is always included; lines shorter than the spacing emit
/// only their midpoint. Point order follows line order, so dissolved input
/// makes the output reproducible. The geographic back-reference on every
/// sample comes from the shared inverse projection.
///
/// Callers invoke this twice per request: coarsely for candidate sites and
/// finely for demand pieces.
pub fn sample_along_lines(
    lines: &[LineString<f64>],
    spacing_m: f64,
    projection: &MercatorProjection,
) -> Result<Vec<SamplePoint>, PlanError> {
    if !(spacing_m > 0.0) {
        return Err(PlanError::Sampling(format!(
            "spacing must be positive, got {spacing_m}"
        )));
    }

    let mut samples = Vec::new();
    for line in lines {
        let length = line_length_m(line);
        if length <= EPS_M {
            continue;
        }
        if length < spacing_m {
            samples.push(to_sample(point_at(line, length / 2.0), projection));
            continue;
        }
        let mut offset = 0.0;
        while offset < length - EPS_M {
            samples.push(to_sample(point_at(line, offset), projection));
            offset += spacing_m;
        }
        samples.push(to_sample(point_at(line, length), projection));
    }

    if samples.is_empty() {
        return Err(PlanError::Sampling(
            "road network yielded no sample points".into(),
        ));
    }
    Ok(samples)
}

fn to_sample(c: Coord<f64>, projection: &MercatorProjection) -> SamplePoint {
    let (lon, lat) = projection.inverse(c.x, c.y);
    SamplePoint {
        x: c.x,
        y: c.y,
        lon,
        lat,
    }
}

fn line_length_m(line: &LineString<f64>) -> f64 {
    line.0
        .windows(2)
        .map(|pair| (pair[1].x - pair[0].x).hypot(pair[1].y - pair[0].y))
        .sum()
}

/// Coordinate at `offset` meters along the line, clamped to its end.
fn point_at(line: &LineString<f64>, offset: f64) -> Coord<f64> {
    let mut remaining = offset.max(0.0);
    for pair in line.0.windows(2) {
        let seg = (pair[1].x - pair[0].x).hypot(pair[1].y - pair[0].y);
        if seg <= EPS_M {
            continue;
        }
        if remaining <= seg {
            let t = remaining / seg;
            return Coord {
                x: pair[0].x + t * (pair[1].x - pair[0].x),
                y: pair[0].y + t * (pair[1].y - pair[0].y),
            };
        }
        remaining -= seg;
    }
    line.0[line.0.len() - 1]
}
