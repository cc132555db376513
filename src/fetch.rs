//! Fetch-or-cache resolution of a single isochrone request.
//!
//! Routes transit requests to the transit provider and everything else to
//! the general provider, applying that provider's duration cap and
//! extrapolating past it when the caller asked for more.

use std::sync::Arc;

use crate::cache::{IsochroneCache, IsochroneKey};
use crate::error::ProviderError;
use crate::geometry::{self, Isochrone};
use crate::traits::{IsochroneProvider, TravelMode};

/// Duration cap of the general travel-time provider, in minutes.
pub const GENERAL_PROVIDER_CAP_MINUTES: u32 = 60;

/// Scale factor for extrapolating a capped contour to the requested
/// duration.
///
/// Deliberately super-linear (`r * sqrt(r)` for the duration ratio `r`):
/// reachable area grows faster than linearly with time. The result is an
/// approximation, not measured travel time.
pub fn extrapolation_factor(requested: u32, capped: u32) -> f64 {
    let ratio = requested as f64 / capped as f64;
    ratio * ratio.sqrt()
}

/// Resolves isochrone requests against the cache, then the providers.
///
/// Every successful fetch, extrapolated or not, lands in the cache under
/// the originally requested fingerprint before being returned.
#[derive(Debug)]
pub struct IsochroneFetcher<G, T> {
    general: G,
    transit: T,
    cache: Arc<IsochroneCache>,
    cap_minutes: u32,
}

impl<G, T> IsochroneFetcher<G, T>
where
    G: IsochroneProvider,
    T: IsochroneProvider,
{
    pub fn new(general: G, transit: T, cache: Arc<IsochroneCache>) -> Self {
        Self {
            general,
            transit,
            cache,
            cap_minutes: GENERAL_PROVIDER_CAP_MINUTES,
        }
    }

    /// Override the general provider's duration cap.
    pub fn with_cap(general: G, transit: T, cache: Arc<IsochroneCache>, cap_minutes: u32) -> Self {
        Self {
            general,
            transit,
            cache,
            cap_minutes,
        }
    }

    pub fn cache(&self) -> &IsochroneCache {
        &self.cache
    }

    /// Resolve one request: cache hit, or provider fetch + cache store.
    ///
    /// Provider failures propagate; substituting a fallback polygon is the
    /// caller's decision.
    pub fn fetch(&self, key: IsochroneKey) -> Result<Isochrone, ProviderError> {
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }

        let isochrone = match key.mode() {
            TravelMode::WalkingTrain => {
                let contour =
                    self.transit
                        .isochrone(key.lng(), key.lat(), key.minutes(), key.mode())?;
                Isochrone::new(contour, key.minutes(), key.mode())
            }
            _ => self.fetch_general(&key)?,
        };

        self.cache.put(key, isochrone.clone());
        Ok(isochrone)
    }

    fn fetch_general(&self, key: &IsochroneKey) -> Result<Isochrone, ProviderError> {
        let capped = key.minutes().min(self.cap_minutes);
        let contour = self
            .general
            .isochrone(key.lng(), key.lat(), capped, key.mode())?;

        if key.minutes() > capped {
            let factor = extrapolation_factor(key.minutes(), capped);
            tracing::warn!(
                %key,
                capped,
                factor,
                "extrapolating isochrone beyond provider cap"
            );
            let scaled = geometry::scale_about(&contour, key.lng(), key.lat(), factor);
            Ok(Isochrone::approximate(scaled, key.minutes(), key.mode()))
        } else {
            Ok(Isochrone::new(contour, key.minutes(), key.mode()))
        }
    }
}
