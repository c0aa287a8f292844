//! Greedy lamp typing for opened p-median facilities.

use crate::distance::planar_distance;
use crate::error::PlanError;
use crate::models::{LampType, SamplePoint};

/// A lamp chosen for one opened candidate site.
#[derive(Debug, Clone)]
pub struct TypedLamp {
    pub candidate: usize,
    pub type_id: String,
    pub radius_m: f64,
    pub cost: f64,
    pub color: Option<String>,
    /// Set when the fallback type does not reach every assigned point.
    pub under_covered: bool,
}

/// Pick a lamp type for every opened site.
///
/// Two-phase policy per facility: the required radius is the farthest
/// assigned point; among catalog entries that reach it, take the cheapest.
/// When none reaches, fall back to the largest radius in the catalog and
/// flag the placement instead of silently accepting the gap.
///
/// The catalog must already be sorted by id so cost and radius ties resolve
/// the same way on every run.
pub fn assign_lamp_types(
    selected: &[usize],
    points: &[SamplePoint],
    assignment: &[usize],
    catalog: &[LampType],
) -> Result<Vec<TypedLamp>, PlanError> {
    if catalog.is_empty() {
        return Err(PlanError::Model("lamp catalog is empty".into()));
    }

    let mut lamps = Vec::with_capacity(selected.len());
    for &j in selected {
        let required = assignment
            .iter()
            .enumerate()
            .filter(|&(_, &site)| site == j)
            .map(|(i, _)| planar_distance(&points[i], &points[j]))
            .fold(0.0, f64::max);

        let cheapest_reaching = catalog
            .iter()
            .filter(|t| t.radius_m >= required)
            .fold(None::<&LampType>, |best, t| match best {
                Some(b) if b.cost <= t.cost => Some(b),
                _ => Some(t),
            });

        let (chosen, under_covered) = match cheapest_reaching {
            Some(t) => (t, false),
            None => {
                let widest = catalog
                    .iter()
                    .fold(&catalog[0], |best, t| {
                        if t.radius_m > best.radius_m {
                            t
                        } else {
                            best
                        }
                    });
                tracing::warn!(
                    candidate = j,
                    required_radius_m = required,
                    fallback = %widest.id,
                    "no lamp type reaches every assigned point"
                );
                (widest, true)
            }
        };

        lamps.push(TypedLamp {
            candidate: j,
            type_id: chosen.id.clone(),
            radius_m: chosen.radius_m,
            cost: chosen.cost,
            color: chosen.color.clone(),
            under_covered,
        });
    }
    Ok(lamps)
}
