//! Error types for the reachability pipeline.
//!
//! Each error is scoped to one pipeline item (one location, one polygon
//! pair, one POI, one search query). Callers isolate failures at the item
//! boundary and keep processing siblings.

use std::fmt;
use std::io;

/// Upstream isochrone service failure.
#[derive(Debug)]
pub enum ProviderError {
    /// Transport-level failure (connect, timeout, TLS).
    Http(reqwest::Error),
    /// Non-success response, carrying the upstream status and body text.
    Status { status: u16, body: String },
    /// Response decoded but held no usable polygon feature.
    EmptyResponse,
    /// Response body could not be decoded into the expected geometry.
    Decode(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Http(err) => write!(f, "isochrone request failed: {err}"),
            ProviderError::Status { status, body } => {
                write!(f, "isochrone provider returned status {status}: {body}")
            }
            ProviderError::EmptyResponse => write!(f, "isochrone response held no features"),
            ProviderError::Decode(msg) => write!(f, "isochrone response not decodable: {msg}"),
        }
    }
}

impl std::error::Error for ProviderError {}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Http(err)
    }
}

/// Intersection or containment test failed on malformed polygon input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// The multipolygon holds no rings at all.
    Empty,
    /// A ring coordinate is NaN or infinite.
    NonFiniteCoordinate,
    /// A ring closes with fewer points than a polygon needs.
    DegenerateRing { points: usize },
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::Empty => write!(f, "polygon has no rings"),
            GeometryError::NonFiniteCoordinate => write!(f, "polygon has a non-finite coordinate"),
            GeometryError::DegenerateRing { points } => {
                write!(f, "ring has only {points} points")
            }
        }
    }
}

impl std::error::Error for GeometryError {}

/// Forward geocoding query failure.
#[derive(Debug)]
pub enum GeocodeError {
    Http(reqwest::Error),
    Status { status: u16, body: String },
}

impl fmt::Display for GeocodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeocodeError::Http(err) => write!(f, "geocode request failed: {err}"),
            GeocodeError::Status { status, body } => {
                write!(f, "geocoder returned status {status}: {body}")
            }
        }
    }
}

impl std::error::Error for GeocodeError {}

impl From<reqwest::Error> for GeocodeError {
    fn from(err: reqwest::Error) -> Self {
        GeocodeError::Http(err)
    }
}

/// Permanent-location source failed to load.
#[derive(Debug)]
pub enum PoiSourceError {
    Io(io::Error),
    Decode(serde_json::Error),
}

impl fmt::Display for PoiSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoiSourceError::Io(err) => write!(f, "could not read permanent locations: {err}"),
            PoiSourceError::Decode(err) => {
                write!(f, "could not decode permanent locations: {err}")
            }
        }
    }
}

impl std::error::Error for PoiSourceError {}

impl From<io::Error> for PoiSourceError {
    fn from(err: io::Error) -> Self {
        PoiSourceError::Io(err)
    }
}

impl From<serde_json::Error> for PoiSourceError {
    fn from(err: serde_json::Error) -> Self {
        PoiSourceError::Decode(err)
    }
}
