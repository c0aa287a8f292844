//! Polygon validation and road-network dissolve.

use std::collections::{BTreeMap, BTreeSet};

use geo::algorithm::line_intersection::line_intersection;
use geo::{Area, Coord, Line, LineString, Polygon};

use crate::error::PlanError;

/// Resolution of the dissolve's geometric keys, in meters.
const QUANT_M: f64 = 1e-3;

/// Validate a user-drawn ring of (lon, lat) vertices.
///
/// Accepts open rings and closes them; rejects rings with fewer than three
/// distinct vertices, self-intersections, or zero area.
pub fn validate_polygon(coords: &[[f64; 2]]) -> Result<Polygon<f64>, PlanError> {
    let mut ring: Vec<Coord<f64>> = coords.iter().map(|c| Coord { x: c[0], y: c[1] }).collect();
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }

    let mut distinct: Vec<Coord<f64>> = Vec::new();
    for c in &ring {
        if !distinct.contains(c) {
            distinct.push(*c);
        }
    }
    if distinct.len() < 3 {
        return Err(PlanError::Geometry(format!(
            "polygon needs at least 3 distinct points, got {}",
            distinct.len()
        )));
    }

    let mut closed = ring.clone();
    closed.push(ring[0]);

    let segments: Vec<Line<f64>> = closed
        .windows(2)
        .filter(|pair| pair[0] != pair[1])
        .map(|pair| Line::new(pair[0], pair[1]))
        .collect();
    let n = segments.len();
    for i in 0..n {
        for j in (i + 1)..n {
            // Consecutive segments legitimately share a vertex.
            if j == i + 1 || (i == 0 && j == n - 1) {
                continue;
            }
            if line_intersection(segments[i], segments[j]).is_some() {
                return Err(PlanError::Geometry("polygon is self-intersecting".into()));
            }
        }
    }

    let polygon = Polygon::new(LineString::new(closed), Vec::new());
    if polygon.unsigned_area() <= f64::EPSILON {
        return Err(PlanError::Geometry("polygon area is zero".into()));
    }
    Ok(polygon)
}

fn quantize(c: &Coord<f64>) -> (i64, i64) {
    ((c.x / QUANT_M).round() as i64, (c.y / QUANT_M).round() as i64)
}

fn unquantize(k: (i64, i64)) -> Coord<f64> {
    Coord {
        x: k.0 as f64 * QUANT_M,
        y: k.1 as f64 * QUANT_M,
    }
}

fn canonical(a: (i64, i64), b: (i64, i64)) -> ((i64, i64), (i64, i64)) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Merge duplicate and overlapping road polylines into maximal
/// non-overlapping chains.
///
/// Works on planar geometry quantized to millimeters: polylines explode into
/// direction-canonical atomic edges, duplicates collapse, and the remaining
/// edges are stitched back together at degree-2 junctions. Output order is a
/// function of the geometry alone, so identical input always yields identical
/// chains for downstream sampling.
pub fn dissolve_roads(lines: &[LineString<f64>]) -> Vec<LineString<f64>> {
    let mut edges: BTreeSet<((i64, i64), (i64, i64))> = BTreeSet::new();
    for line in lines {
        for pair in line.0.windows(2) {
            let a = quantize(&pair[0]);
            let b = quantize(&pair[1]);
            if a != b {
                edges.insert(canonical(a, b));
            }
        }
    }

    let mut adjacency: BTreeMap<(i64, i64), Vec<(i64, i64)>> = BTreeMap::new();
    for &(a, b) in &edges {
        adjacency.entry(a).or_default().push(b);
        adjacency.entry(b).or_default().push(a);
    }
    for neighbors in adjacency.values_mut() {
        neighbors.sort_unstable();
    }

    let mut used: BTreeSet<((i64, i64), (i64, i64))> = BTreeSet::new();
    let mut chains: Vec<Vec<(i64, i64)>> = Vec::new();
    let walk = |start: (i64, i64),
                    first: (i64, i64),
                    used: &mut BTreeSet<((i64, i64), (i64, i64))>,
                    chains: &mut Vec<Vec<(i64, i64)>>| {
        if used.contains(&canonical(start, first)) {
            return;
        }
        used.insert(canonical(start, first));
        let mut chain = vec![start, first];
        let mut prev = start;
        let mut cur = first;
        while adjacency[&cur].len() == 2 {
            let neighbors = &adjacency[&cur];
            let next = if neighbors[0] == prev {
                neighbors[1]
            } else {
                neighbors[0]
            };
            if used.contains(&canonical(cur, next)) {
                break;
            }
            used.insert(canonical(cur, next));
            chain.push(next);
            prev = cur;
            cur = next;
        }
        chains.push(chain);
    };

    // Chains first grow outward from junctions and dead ends; whatever
    // remains afterwards is a pure cycle.
    for (&node, neighbors) in &adjacency {
        if neighbors.len() != 2 {
            for &next in neighbors {
                walk(node, next, &mut used, &mut chains);
            }
        }
    }
    for (&node, neighbors) in &adjacency {
        for &next in neighbors {
            walk(node, next, &mut used, &mut chains);
        }
    }

    chains.sort_unstable();
    chains
        .into_iter()
        .map(|chain| LineString::new(chain.into_iter().map(unquantize).collect()))
        .collect()
}
