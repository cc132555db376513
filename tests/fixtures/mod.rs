//! Shared test fixtures: in-memory isochrone providers and builders.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use geo::{Coordinate, LineString, MultiPolygon, Polygon};

use reachmap::error::ProviderError;
use reachmap::manager::Location;
use reachmap::poi::PermanentLocation;
use reachmap::traits::{IsochroneProvider, PoiSource, TravelMode};

/// Axis-aligned square multipolygon centered on `(lng, lat)`.
pub fn square(lng: f64, lat: f64, half_side: f64) -> MultiPolygon<f64> {
    MultiPolygon(vec![Polygon::new(
        LineString(vec![
            Coordinate { x: lng - half_side, y: lat - half_side },
            Coordinate { x: lng + half_side, y: lat - half_side },
            Coordinate { x: lng + half_side, y: lat + half_side },
            Coordinate { x: lng - half_side, y: lat + half_side },
            Coordinate { x: lng - half_side, y: lat - half_side },
        ]),
        Vec::new(),
    )])
}

pub fn location(name: &str, lng: f64, lat: f64, minutes: u32, mode: TravelMode) -> Location {
    Location {
        name: name.to_string(),
        lng,
        lat,
        minutes,
        mode,
    }
}

pub fn poi(name: &str, lng: f64, lat: f64) -> PermanentLocation {
    PermanentLocation {
        name: name.to_string(),
        lat,
        lng,
        fact: String::new(),
    }
}

/// Provider returning a square that grows with the requested duration.
///
/// Counts calls and records the minutes each call asked for, so tests can
/// assert on cache hits and capping.
#[derive(Debug, Default)]
pub struct SquareProvider {
    /// Half-side degrees per requested minute.
    pub degrees_per_minute: f64,
    pub calls: AtomicUsize,
    pub requested_minutes: Mutex<Vec<u32>>,
}

impl SquareProvider {
    pub fn new(degrees_per_minute: f64) -> Self {
        Self {
            degrees_per_minute,
            calls: AtomicUsize::new(0),
            requested_minutes: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl IsochroneProvider for SquareProvider {
    fn isochrone(
        &self,
        lng: f64,
        lat: f64,
        minutes: u32,
        _mode: TravelMode,
    ) -> Result<MultiPolygon<f64>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested_minutes
            .lock()
            .expect("fixture lock")
            .push(minutes);
        Ok(square(lng, lat, minutes as f64 * self.degrees_per_minute))
    }
}

/// Provider that always reports an upstream failure.
#[derive(Debug, Default)]
pub struct FailingProvider;

impl IsochroneProvider for FailingProvider {
    fn isochrone(
        &self,
        _lng: f64,
        _lat: f64,
        _minutes: u32,
        _mode: TravelMode,
    ) -> Result<MultiPolygon<f64>, ProviderError> {
        Err(ProviderError::Status {
            status: 500,
            body: "upstream unavailable".to_string(),
        })
    }
}

/// Provider that fails only for one marker duration, for partial-batch
/// scenarios.
#[derive(Debug)]
pub struct FlakyProvider {
    pub inner: SquareProvider,
    pub fail_minutes: u32,
}

impl IsochroneProvider for FlakyProvider {
    fn isochrone(
        &self,
        lng: f64,
        lat: f64,
        minutes: u32,
        mode: TravelMode,
    ) -> Result<MultiPolygon<f64>, ProviderError> {
        if minutes == self.fail_minutes {
            return Err(ProviderError::Status {
                status: 502,
                body: "bad gateway".to_string(),
            });
        }
        self.inner.isochrone(lng, lat, minutes, mode)
    }
}

/// Provider that sleeps before answering, to shuffle completion order.
#[derive(Debug)]
pub struct SlowProvider {
    pub inner: SquareProvider,
    /// Sleep `minutes * millis_per_minute` before answering.
    pub millis_per_minute: u64,
}

impl IsochroneProvider for SlowProvider {
    fn isochrone(
        &self,
        lng: f64,
        lat: f64,
        minutes: u32,
        mode: TravelMode,
    ) -> Result<MultiPolygon<f64>, ProviderError> {
        std::thread::sleep(std::time::Duration::from_millis(
            minutes as u64 * self.millis_per_minute,
        ));
        self.inner.isochrone(lng, lat, minutes, mode)
    }
}

/// In-memory POI source.
#[derive(Debug, Clone)]
pub struct StaticPoiSource(pub Vec<PermanentLocation>);

impl PoiSource for StaticPoiSource {
    fn load(&self) -> Result<Vec<PermanentLocation>, reachmap::error::PoiSourceError> {
        Ok(self.0.clone())
    }
}
