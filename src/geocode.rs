//! Forward geocoding against Nominatim, plus keystroke debouncing.

use std::time::{Duration, Instant};

use serde::Deserialize;

use crate::error::GeocodeError;
use crate::traits::Geocoder;

/// Queries shorter than this return an empty list without network access.
pub const MIN_QUERY_LEN: usize = 3;

/// Quiet period a query must survive before it fires.
pub const QUIET_PERIOD: Duration = Duration::from_millis(300);

/// One geocoding candidate, in upstream relevance order.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub name: String,
    pub lng: f64,
    pub lat: f64,
    pub place_type: String,
    pub importance: f64,
}

#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Maximum suggestions per query.
    pub limit: u32,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "reachmap".to_string(),
            timeout_secs: 10,
            limit: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NominatimClient {
    config: NominatimConfig,
    client: reqwest::blocking::Client,
}

// Nominatim serializes coordinates as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    display_name: String,
    lat: String,
    lon: String,
    #[serde(rename = "type", default)]
    place_type: String,
    #[serde(default)]
    importance: f64,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl Geocoder for NominatimClient {
    fn search(&self, query: &str) -> Result<Vec<Place>, GeocodeError> {
        if query.chars().count() < MIN_QUERY_LEN {
            return Ok(Vec::new());
        }

        let url = format!("{}/search", self.config.base_url);
        let limit = self.config.limit.to_string();
        let response = self
            .client
            .get(url)
            .query(&[
                ("format", "json"),
                ("q", query),
                ("limit", limit.as_str()),
                ("addressdetails", "1"),
                ("namedetails", "1"),
                ("accept-language", "en"),
            ])
            .header(reqwest::header::USER_AGENT, self.config.user_agent.as_str())
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        let places = response.json::<Vec<NominatimPlace>>()?;
        Ok(places
            .into_iter()
            .filter_map(|place| {
                let lat = place.lat.parse::<f64>().ok()?;
                let lng = place.lon.parse::<f64>().ok()?;
                Some(Place {
                    name: place.display_name,
                    lng,
                    lat,
                    place_type: place.place_type,
                    importance: place.importance,
                })
            })
            .collect())
    }
}

/// Latest-wins debouncer for keystroke-driven searches.
///
/// Holds at most one pending query; each submission restarts the quiet
/// period. `poll` hands the query out once it has been idle long enough.
/// Time is passed in so callers drive the clock.
#[derive(Debug)]
pub struct SearchDebouncer {
    quiet_period: Duration,
    pending: Option<(Instant, String)>,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchDebouncer {
    pub fn new() -> Self {
        Self::with_quiet_period(QUIET_PERIOD)
    }

    pub fn with_quiet_period(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: None,
        }
    }

    /// Replace any pending query with this one, restarting the timer.
    pub fn submit(&mut self, query: impl Into<String>, now: Instant) {
        self.pending = Some((now, query.into()));
    }

    /// The pending query, if its quiet period has elapsed. Returns it at
    /// most once.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((submitted, _)) if now.duration_since(*submitted) >= self.quiet_period => {
                self.pending.take().map(|(_, query)| query)
            }
            _ => None,
        }
    }
}
