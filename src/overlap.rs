//! Pairwise and full-set intersection of reachability polygons.
//!
//! Every pair is evaluated independently; one bad polygon only costs the
//! pairs it participates in. The full-set pass folds in input order and
//! gives up the moment the accumulated intersection runs dry.

use geo::{BooleanOps, MultiPolygon};

use crate::error::GeometryError;
use crate::geometry;

/// How many participants a region has: exactly two, or all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    Pairwise,
    Full,
}

/// One computed overlap region.
///
/// `label` is derived deterministically from participant names in input
/// order; downstream grouping relies on that determinism.
#[derive(Debug, Clone)]
pub struct OverlapRegion {
    pub label: String,
    pub participants: Vec<String>,
    /// Presentation strings, one per participant: `"{name} ({minutes} min)"`.
    pub areas: Vec<String>,
    pub geometry: MultiPolygon<f64>,
    pub kind: RegionKind,
}

/// One entry of the resolved, input-ordered polygon set.
#[derive(Debug, Clone, Copy)]
pub struct OverlapInput<'a> {
    pub name: &'a str,
    pub minutes: u32,
    pub geometry: &'a MultiPolygon<f64>,
}

impl OverlapInput<'_> {
    fn area_label(&self) -> String {
        format!("{} ({} min)", self.name, self.minutes)
    }
}

/// Planar intersection of two validated multipolygons.
///
/// `Ok(None)` means the shapes simply do not overlap; `Err` means one of
/// them was malformed and the pair cannot be evaluated.
pub fn intersect(
    a: &MultiPolygon<f64>,
    b: &MultiPolygon<f64>,
) -> Result<Option<MultiPolygon<f64>>, GeometryError> {
    geometry::validate(a)?;
    geometry::validate(b)?;
    let result = a.intersection(b);
    if result.0.is_empty() {
        Ok(None)
    } else {
        Ok(Some(result))
    }
}

/// First comma-separated component of a place name, for compact labels.
fn short_name(name: &str) -> &str {
    name.split(',').next().unwrap_or(name).trim()
}

/// Compute all overlap regions for the input-ordered polygon set.
///
/// Pairwise regions come first, in pair order `(i, j)` with `i < j`; the
/// all-participants region (N >= 3 only) comes last.
pub fn compute_overlaps(entries: &[OverlapInput]) -> Vec<OverlapRegion> {
    let mut regions = Vec::new();
    if entries.len() < 2 {
        return regions;
    }

    for i in 0..entries.len() - 1 {
        for j in i + 1..entries.len() {
            let (a, b) = (&entries[i], &entries[j]);
            match intersect(a.geometry, b.geometry) {
                Ok(Some(geometry)) => {
                    regions.push(OverlapRegion {
                        label: format!(
                            "Overlap between {} & {}",
                            short_name(a.name),
                            short_name(b.name)
                        ),
                        participants: vec![a.name.to_string(), b.name.to_string()],
                        areas: vec![a.area_label(), b.area_label()],
                        geometry,
                        kind: RegionKind::Pairwise,
                    });
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(
                        first = a.name,
                        second = b.name,
                        %err,
                        "skipping overlap pair"
                    );
                }
            }
        }
    }

    if entries.len() >= 3 {
        if let Some(geometry) = full_overlap(entries) {
            regions.push(OverlapRegion {
                label: "All Locations Overlap".to_string(),
                participants: entries.iter().map(|e| e.name.to_string()).collect(),
                areas: entries.iter().map(|e| e.area_label()).collect(),
                geometry,
                kind: RegionKind::Full,
            });
        }
    }

    regions
}

/// Fold intersection across all entries in input order.
///
/// Short-circuits to `None` as soon as the accumulated region is empty or
/// a step fails; no reattempt with a different order.
fn full_overlap(entries: &[OverlapInput]) -> Option<MultiPolygon<f64>> {
    let mut accumulated = match intersect(entries[0].geometry, entries[1].geometry) {
        Ok(Some(geometry)) => geometry,
        Ok(None) => return None,
        Err(err) => {
            tracing::warn!(%err, "skipping full-overlap pass");
            return None;
        }
    };

    for entry in &entries[2..] {
        accumulated = match intersect(&accumulated, entry.geometry) {
            Ok(Some(geometry)) => geometry,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(name = entry.name, %err, "skipping full-overlap pass");
                return None;
            }
        };
    }

    Some(accumulated)
}
