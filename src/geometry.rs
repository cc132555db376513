//! Reachability polygon type and the geometry helpers behind it.
//!
//! Coordinates are degree-based longitude/latitude throughout. Boolean
//! operations treat them as planar, which is the accuracy trade-off the
//! whole pipeline accepts.

use geo::{Coordinate, LineString, MultiPolygon, Polygon};
use geojson::FeatureCollection;

use crate::error::{GeometryError, ProviderError};
use crate::traits::TravelMode;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Ring segments used when approximating reachability with a circle.
const CIRCLE_SEGMENTS: usize = 64;

/// A reachability polygon for one origin, duration, and mode.
///
/// `minutes` is always the duration the caller asked for, even when the
/// geometry was extrapolated from a shorter provider contour.
#[derive(Debug, Clone, PartialEq)]
pub struct Isochrone {
    pub geometry: MultiPolygon<f64>,
    pub minutes: u32,
    pub mode: TravelMode,
    /// True when the geometry is an approximation (extrapolated beyond the
    /// provider cap, or a constant-speed circle) rather than a measured
    /// travel-time contour.
    pub approximate: bool,
}

impl Isochrone {
    pub fn new(geometry: MultiPolygon<f64>, minutes: u32, mode: TravelMode) -> Self {
        Self {
            geometry,
            minutes,
            mode,
            approximate: false,
        }
    }

    pub fn approximate(geometry: MultiPolygon<f64>, minutes: u32, mode: TravelMode) -> Self {
        Self {
            geometry,
            minutes,
            mode,
            approximate: true,
        }
    }
}

/// Reject geometry the boolean ops cannot be trusted with.
///
/// An empty multipolygon, a non-finite coordinate, or a ring with fewer
/// than four points all count as malformed.
pub fn validate(geometry: &MultiPolygon<f64>) -> Result<(), GeometryError> {
    if geometry.0.is_empty() {
        return Err(GeometryError::Empty);
    }
    for polygon in &geometry.0 {
        for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
            if ring.0.len() < 4 {
                return Err(GeometryError::DegenerateRing {
                    points: ring.0.len(),
                });
            }
            for coord in &ring.0 {
                if !coord.x.is_finite() || !coord.y.is_finite() {
                    return Err(GeometryError::NonFiniteCoordinate);
                }
            }
        }
    }
    Ok(())
}

/// Scale every ring coordinate radially about `(lng, lat)` by `factor`.
///
/// Used to extrapolate a provider-capped contour out to the requested
/// duration. Operates on raw degrees, same as the contour itself.
pub fn scale_about(
    geometry: &MultiPolygon<f64>,
    lng: f64,
    lat: f64,
    factor: f64,
) -> MultiPolygon<f64> {
    let scale_ring = |ring: &LineString<f64>| {
        LineString(
            ring.0
                .iter()
                .map(|coord| Coordinate {
                    x: lng + (coord.x - lng) * factor,
                    y: lat + (coord.y - lat) * factor,
                })
                .collect(),
        )
    };

    MultiPolygon(
        geometry
            .0
            .iter()
            .map(|polygon| {
                Polygon::new(
                    scale_ring(polygon.exterior()),
                    polygon.interiors().iter().map(scale_ring).collect(),
                )
            })
            .collect(),
    )
}

/// Constant-speed circular approximation of reachability.
///
/// Converts the radius to degrees per axis (longitude shrinks with
/// latitude) and closes a ring of [`CIRCLE_SEGMENTS`] segments.
pub fn circle(lng: f64, lat: f64, radius_km: f64) -> MultiPolygon<f64> {
    let km_per_degree = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;
    let lat_degrees = radius_km / km_per_degree;
    let lng_degrees = lat_degrees / lat.to_radians().cos().max(1e-6);

    let mut ring = Vec::with_capacity(CIRCLE_SEGMENTS + 1);
    for i in 0..=CIRCLE_SEGMENTS {
        let angle = 2.0 * std::f64::consts::PI * (i as f64) / (CIRCLE_SEGMENTS as f64);
        ring.push(Coordinate {
            x: lng + lng_degrees * angle.cos(),
            y: lat + lat_degrees * angle.sin(),
        });
    }

    MultiPolygon(vec![Polygon::new(LineString(ring), Vec::new())])
}

/// Radius in km covered in `minutes` at the mode's assumed speed.
pub fn fallback_radius_km(minutes: u32, mode: TravelMode) -> f64 {
    (minutes as f64 / 60.0) * mode.fallback_speed_kmh()
}

/// Pull the contour polygon out of a provider's GeoJSON response.
///
/// Providers return a FeatureCollection whose first feature carries the
/// contour geometry as a Polygon or MultiPolygon.
pub fn contour_from_features(
    collection: &FeatureCollection,
) -> Result<MultiPolygon<f64>, ProviderError> {
    let geometry = collection
        .features
        .first()
        .and_then(|feature| feature.geometry.as_ref())
        .ok_or(ProviderError::EmptyResponse)?;

    match &geometry.value {
        value @ geojson::Value::Polygon(_) => geo::Polygon::<f64>::try_from(value)
            .map(|polygon| MultiPolygon(vec![polygon]))
            .map_err(|err| ProviderError::Decode(err.to_string())),
        value @ geojson::Value::MultiPolygon(_) => geo::MultiPolygon::<f64>::try_from(value)
            .map_err(|err| ProviderError::Decode(err.to_string())),
        _ => Err(ProviderError::Decode(
            "expected polygon geometry".to_string(),
        )),
    }
}
