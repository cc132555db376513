//! In-memory isochrone cache keyed by normalized request fingerprints.
//!
//! The cache is the single source of truth consulted before any network
//! fetch. It is unbounded for the session; the only way entries leave is
//! the operator's explicit clear.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use crate::geometry::Isochrone;
use crate::traits::TravelMode;

/// Normalized fingerprint of one isochrone request.
///
/// Coordinates are stored in microdegrees (6 decimal places) so equality
/// and hashing are exact: two requests that differ only beyond the sixth
/// decimal place are the same request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IsochroneKey {
    lng_e6: i64,
    lat_e6: i64,
    minutes: u32,
    mode: TravelMode,
}

impl IsochroneKey {
    pub fn new(lng: f64, lat: f64, minutes: u32, mode: TravelMode) -> Self {
        Self {
            lng_e6: (lng * 1e6).round() as i64,
            lat_e6: (lat * 1e6).round() as i64,
            minutes,
            mode,
        }
    }

    pub fn lng(&self) -> f64 {
        self.lng_e6 as f64 / 1e6
    }

    pub fn lat(&self) -> f64 {
        self.lat_e6 as f64 / 1e6
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn mode(&self) -> TravelMode {
        self.mode
    }
}

impl fmt::Display for IsochroneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.6}|{:.6}|{}|{}",
            self.lng(),
            self.lat(),
            self.minutes,
            self.mode
        )
    }
}

/// Session-lifetime isochrone cache.
///
/// Lookups never touch the network. `put` overwrites unconditionally.
/// `clear` swaps in an empty map under the lock, so a reader observes
/// either the full old contents or nothing.
#[derive(Debug, Default)]
pub struct IsochroneCache {
    entries: Mutex<HashMap<IsochroneKey, Isochrone>>,
}

impl IsochroneCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &IsochroneKey) -> Option<Isochrone> {
        let entries = self.lock();
        let hit = entries.get(key).cloned();
        if hit.is_some() {
            tracing::debug!(%key, "isochrone cache hit");
        } else {
            tracing::debug!(%key, "isochrone cache miss");
        }
        hit
    }

    pub fn put(&self, key: IsochroneKey, isochrone: Isochrone) {
        let mut entries = self.lock();
        entries.insert(key, isochrone);
        tracing::debug!(%key, total = entries.len(), "stored isochrone");
    }

    pub fn clear(&self) {
        let mut entries = self.lock();
        *entries = HashMap::new();
        tracing::debug!("isochrone cache cleared");
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn keys(&self) -> Vec<IsochroneKey> {
        self.lock().keys().copied().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<IsochroneKey, Isochrone>> {
        // A poisoned lock only means some other thread panicked mid-write;
        // the map itself is still a usable cache.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
