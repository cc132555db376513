//! The current set of reachability requests and its rebuild pipeline.
//!
//! Every mutation of the set triggers one full rebuild: resolve each
//! location to a polygon (cache or provider, circle fallback on failure),
//! compute overlaps, match POIs. There is no incremental diffing at this
//! scale; a generation counter keeps stale rebuilds from being presented.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use rayon::prelude::*;

use crate::cache::IsochroneKey;
use crate::fetch::IsochroneFetcher;
use crate::geometry::{self, Isochrone};
use crate::overlap::{self, OverlapInput, OverlapRegion};
use crate::poi::{self, PermanentLocation, PoiGroup};
use crate::traits::{IsochroneProvider, PoiSource, TravelMode};

/// One user-entered reachability request.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub name: String,
    pub lng: f64,
    pub lat: f64,
    pub minutes: u32,
    pub mode: TravelMode,
}

/// A location resolved to a polygon, input order preserved.
#[derive(Debug, Clone)]
pub struct ResolvedLocation {
    pub location: Location,
    pub isochrone: Isochrone,
    /// True when the polygon is the constant-speed circle fallback rather
    /// than anything the provider produced.
    pub fallback: bool,
    /// Stable palette slot for presentation, assigned in input order.
    pub color_index: usize,
}

/// Result of one complete rebuild pass.
#[derive(Debug, Clone)]
pub struct RebuildOutcome {
    pub generation: u64,
    pub resolved: Vec<ResolvedLocation>,
    pub regions: Vec<OverlapRegion>,
    pub poi_groups: Vec<PoiGroup>,
}

/// Owns the location list and orchestrates rebuilds.
#[derive(Debug)]
pub struct ReachabilitySet<G, T> {
    locations: Mutex<Vec<Location>>,
    pois: Mutex<Vec<PermanentLocation>>,
    show_pois: AtomicBool,
    fetcher: IsochroneFetcher<G, T>,
    generation: AtomicU64,
}

impl<G, T> ReachabilitySet<G, T>
where
    G: IsochroneProvider + Sync,
    T: IsochroneProvider + Sync,
{
    pub fn new(fetcher: IsochroneFetcher<G, T>) -> Self {
        Self {
            locations: Mutex::new(Vec::new()),
            pois: Mutex::new(Vec::new()),
            show_pois: AtomicBool::new(false),
            fetcher,
            generation: AtomicU64::new(0),
        }
    }

    /// Load POIs once at startup. A failed source is a status-line event,
    /// not a fault: the set continues with zero POIs.
    pub fn load_pois<S: PoiSource>(&self, source: &S) {
        match source.load() {
            Ok(pois) => {
                tracing::info!(count = pois.len(), "loaded permanent locations");
                *lock(&self.pois) = pois;
            }
            Err(err) => {
                tracing::warn!(%err, "permanent locations unavailable, continuing without");
                lock(&self.pois).clear();
            }
        }
    }

    pub fn locations(&self) -> Vec<Location> {
        lock(&self.locations).clone()
    }

    pub fn set_show_pois(&self, show: bool) -> Option<RebuildOutcome> {
        self.show_pois.store(show, Ordering::SeqCst);
        self.rebuild()
    }

    pub fn add_location(&self, location: Location) -> Option<RebuildOutcome> {
        lock(&self.locations).push(location);
        self.rebuild()
    }

    pub fn remove_location(&self, index: usize) -> Option<RebuildOutcome> {
        {
            let mut locations = lock(&self.locations);
            if index < locations.len() {
                locations.remove(index);
            } else {
                tracing::warn!(index, len = locations.len(), "remove_location out of range");
            }
        }
        self.rebuild()
    }

    pub fn update_location(&self, index: usize, location: Location) -> Option<RebuildOutcome> {
        {
            let mut locations = lock(&self.locations);
            match locations.get_mut(index) {
                Some(slot) => *slot = location,
                None => {
                    tracing::warn!(index, len = locations.len(), "update_location out of range")
                }
            }
        }
        self.rebuild()
    }

    /// Operator action: drop every cached isochrone, then rebuild so fresh
    /// data is fetched.
    pub fn clear_cache(&self) -> Option<RebuildOutcome> {
        self.fetcher.cache().clear();
        self.rebuild()
    }

    /// One full rebuild pass.
    ///
    /// Locations are resolved concurrently but assembled in input order.
    /// Returns `None` when a newer rebuild started while this one was in
    /// flight: its cache writes stand, its results are never presented.
    pub fn rebuild(&self) -> Option<RebuildOutcome> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let snapshot = self.locations();

        let resolved: Vec<ResolvedLocation> = snapshot
            .par_iter()
            .enumerate()
            .map(|(index, location)| self.resolve_one(index, location))
            .collect();

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "discarding stale rebuild");
            return None;
        }

        let inputs: Vec<OverlapInput> = resolved
            .iter()
            .map(|entry| OverlapInput {
                name: &entry.location.name,
                minutes: entry.location.minutes,
                geometry: &entry.isochrone.geometry,
            })
            .collect();
        let regions = overlap::compute_overlaps(&inputs);

        let pois = lock(&self.pois).clone();
        let matches = poi::match_pois(&pois, &regions, self.show_pois.load(Ordering::SeqCst));
        let poi_groups = poi::group_matches(&matches);

        tracing::info!(
            generation,
            locations = resolved.len(),
            regions = regions.len(),
            matched_pois = matches.len(),
            cached = self.fetcher.cache().len(),
            "rebuild complete"
        );

        Some(RebuildOutcome {
            generation,
            resolved,
            regions,
            poi_groups,
        })
    }

    fn resolve_one(&self, index: usize, location: &Location) -> ResolvedLocation {
        let key = IsochroneKey::new(location.lng, location.lat, location.minutes, location.mode);
        match self.fetcher.fetch(key) {
            Ok(isochrone) if !isochrone.geometry.0.is_empty() => ResolvedLocation {
                location: location.clone(),
                isochrone,
                fallback: false,
                color_index: index,
            },
            Ok(_) => {
                tracing::warn!(name = %location.name, "empty isochrone, using circle fallback");
                self.fallback_for(index, location)
            }
            Err(err) => {
                tracing::warn!(name = %location.name, %err, "isochrone fetch failed, using circle fallback");
                self.fallback_for(index, location)
            }
        }
    }

    fn fallback_for(&self, index: usize, location: &Location) -> ResolvedLocation {
        let radius_km = geometry::fallback_radius_km(location.minutes, location.mode);
        let circle = geometry::circle(location.lng, location.lat, radius_km);
        ResolvedLocation {
            location: location.clone(),
            isochrone: Isochrone::approximate(circle, location.minutes, location.mode),
            fallback: true,
            color_index: index,
        }
    }
}

fn lock<'a, V>(mutex: &'a Mutex<V>) -> std::sync::MutexGuard<'a, V> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
