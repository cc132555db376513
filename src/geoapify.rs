//! Geoapify isoline HTTP adapter, used for the walking+train mode.
//!
//! Geoapify takes its range in seconds and has no hard duration cap the
//! way the general provider does.

use geo::MultiPolygon;
use geojson::FeatureCollection;

use crate::error::ProviderError;
use crate::geometry;
use crate::traits::{IsochroneProvider, TravelMode};

#[derive(Debug, Clone)]
pub struct GeoapifyConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl GeoapifyConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }
}

impl Default for GeoapifyConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.geoapify.com".to_string(),
            api_key: String::new(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeoapifyClient {
    config: GeoapifyConfig,
    client: reqwest::blocking::Client,
}

impl GeoapifyClient {
    pub fn new(config: GeoapifyConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl IsochroneProvider for GeoapifyClient {
    fn isochrone(
        &self,
        lng: f64,
        lat: f64,
        minutes: u32,
        _mode: TravelMode,
    ) -> Result<MultiPolygon<f64>, ProviderError> {
        let url = format!(
            "{}/v1/isoline?lat={:.6}&lon={:.6}&type=time&mode=transit&range={}&format=geojson&apiKey={}",
            self.config.base_url,
            lat,
            lng,
            minutes * 60,
            self.config.api_key
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
