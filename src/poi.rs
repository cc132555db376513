//! Points of interest and their matching against overlap regions.
//!
//! The POI list is static for the session, loaded once from a JSON file.
//! Matching only runs when the caller's toggle is on.

use std::fs;
use std::path::PathBuf;

use geo::{Contains, Point};
use serde::{Deserialize, Serialize};

use crate::error::PoiSourceError;
use crate::geometry;
use crate::overlap::OverlapRegion;
use crate::traits::PoiSource;

/// A fixed point of interest with a display fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermanentLocation {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub fact: String,
}

/// JSON-file-backed POI source.
#[derive(Debug, Clone)]
pub struct FilePoiSource {
    pub path: PathBuf,
}

impl FilePoiSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PoiSource for FilePoiSource {
    fn load(&self) -> Result<Vec<PermanentLocation>, PoiSourceError> {
        let body = fs::read_to_string(&self.path)?;
        let locations: Vec<PermanentLocation> = serde_json::from_str(&body)?;
        Ok(locations)
    }
}

/// One POI matched to the first overlap region containing it.
#[derive(Debug, Clone, PartialEq)]
pub struct PoiMatch {
    pub poi: PermanentLocation,
    pub region_label: String,
}

/// Matches grouped by region label for presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct PoiGroup {
    pub region_label: String,
    pub pois: Vec<PermanentLocation>,
}

/// Test each POI against the regions in production order.
///
/// The first region containing a POI claims it; later regions never see
/// it. With the toggle off the result is empty regardless of input. A
/// malformed region geometry counts as non-containment for that pair only.
pub fn match_pois(
    pois: &[PermanentLocation],
    regions: &[OverlapRegion],
    enabled: bool,
) -> Vec<PoiMatch> {
    if !enabled {
        return Vec::new();
    }

    let mut matches = Vec::new();
    for poi in pois {
        if poi.name.is_empty() || !poi.lat.is_finite() || !poi.lng.is_finite() {
            continue;
        }
        let point = Point::new(poi.lng, poi.lat);
        for region in regions {
            if let Err(err) = geometry::validate(&region.geometry) {
                tracing::warn!(poi = %poi.name, region = %region.label, %err, "skipping containment test");
                continue;
            }
            if region.geometry.contains(&point) {
                matches.push(PoiMatch {
                    poi: poi.clone(),
                    region_label: region.label.clone(),
                });
                break;
            }
        }
    }
    matches
}

/// Group matches by region label, in order of first appearance.
pub fn group_matches(matches: &[PoiMatch]) -> Vec<PoiGroup> {
    let mut groups: Vec<PoiGroup> = Vec::new();
    for entry in matches {
        match groups
            .iter_mut()
            .find(|group| group.region_label == entry.region_label)
        {
            Some(group) => group.pois.push(entry.poi.clone()),
            None => groups.push(PoiGroup {
                region_label: entry.region_label.clone(),
                pois: vec![entry.poi.clone()],
            }),
        }
    }
    groups
}
