//! Mapbox isochrone HTTP adapter (driving, walking, cycling).

use geo::MultiPolygon;
use geojson::FeatureCollection;

use crate::error::ProviderError;
use crate::geometry;
use crate::traits::{IsochroneProvider, TravelMode};

#[derive(Debug, Clone)]
pub struct MapboxConfig {
    pub base_url: String,
    pub access_token: String,
    pub timeout_secs: u64,
}

impl MapboxConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            ..Self::default()
        }
    }
}

impl Default for MapboxConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.mapbox.com".to_string(),
            access_token: String::new(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MapboxClient {
    config: MapboxConfig,
    client: reqwest::blocking::Client,
}

impl MapboxClient {
    pub fn new(config: MapboxConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn profile(mode: TravelMode) -> &'static str {
        match mode {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Cycling => "cycling",
            // Transit requests are routed to the transit provider; if one
            // slips through, the walking profile is the closest match.
            TravelMode::WalkingTrain => "walking",
        }
    }
}

impl IsochroneProvider for MapboxClient {
    fn isochrone(
        &self,
        lng: f64,
        lat: f64,
        minutes: u32,
        mode: TravelMode,
    ) -> Result<MultiPolygon<f64>, ProviderError> {
        let url = format!(
            "{}/isochrone/v1/mapbox/{}/{:.6},{:.6}?contours_minutes={}&polygons=true&access_token={}",
            self.config.base_url,
            Self::profile(mode),
            lng,
            lat,
            minutes,
            self.config.access_token
        );

        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        let collection = response.json::<FeatureCollection>()?;
        geometry::contour_from_features(&collection)
    }
}
