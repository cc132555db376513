//! Core domain traits for the reachability pipeline.
//!
//! These are intentionally minimal. Concrete HTTP clients live in their
//! own modules; tests substitute in-memory implementations.

use geo::MultiPolygon;

use crate::error::{GeocodeError, PoiSourceError, ProviderError};
use crate::geocode::Place;
use crate::poi::PermanentLocation;

/// Travel mode for an isochrone request.
///
/// `WalkingTrain` is served by a transit-capable provider; the other modes
/// share a general travel-time provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TravelMode {
    Driving,
    Walking,
    Cycling,
    WalkingTrain,
}

impl TravelMode {
    /// Wire/display name, e.g. `driving` or `walking+train`.
    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Cycling => "cycling",
            TravelMode::WalkingTrain => "walking+train",
        }
    }

    /// Assumed average speed in km/h, used for the circle fallback when a
    /// provider yields nothing.
    pub fn fallback_speed_kmh(self) -> f64 {
        match self {
            TravelMode::Driving => 60.0,
            TravelMode::Walking => 5.0,
            TravelMode::Cycling => 15.0,
            TravelMode::WalkingTrain => 45.0,
        }
    }
}

impl std::fmt::Display for TravelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fetches a reachability polygon from an upstream travel-time service.
///
/// `minutes` is the duration actually sent upstream; capping and
/// extrapolation beyond a provider's limit are the caller's concern.
pub trait IsochroneProvider {
    fn isochrone(
        &self,
        lng: f64,
        lat: f64,
        minutes: u32,
        mode: TravelMode,
    ) -> Result<MultiPolygon<f64>, ProviderError>;
}

impl<P: IsochroneProvider + ?Sized> IsochroneProvider for &P {
    fn isochrone(
        &self,
        lng: f64,
        lat: f64,
        minutes: u32,
        mode: TravelMode,
    ) -> Result<MultiPolygon<f64>, ProviderError> {
        (**self).isochrone(lng, lat, minutes, mode)
    }
}

/// Forward geocoding: free-text query to candidate places.
pub trait Geocoder {
    fn search(&self, query: &str) -> Result<Vec<Place>, GeocodeError>;
}

/// Source of the static points of interest, loaded once at startup.
pub trait PoiSource {
    fn load(&self) -> Result<Vec<PermanentLocation>, PoiSourceError>;
}
