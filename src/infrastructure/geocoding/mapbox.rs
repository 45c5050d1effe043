//! Mapbox forward-geocoding adapter.
//!
//! Owns transport details only: URL building, timeout, status mapping and
//! decoding of the first feature's `center` (`[lng, lat]`).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::application::ports::geocoder::{GeocodeError, Geocoder};
use crate::domain::places::place::Coordinates;

const ENDPOINT: &str = "geocoding/v5/mapbox.places";

pub struct MapboxGeocoder {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    center: Option<[f64; 2]>,
}

impl MapboxGeocoder {
    pub fn new(base_url: &str, access_token: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        })
    }

    fn url_for(&self, address: &str) -> String {
        format!(
            "{}/{}/{}.json",
            self.base_url,
            ENDPOINT,
            urlencoding::encode(address)
        )
    }
}

fn first_coordinates(body: &[u8]) -> Result<Coordinates, GeocodeError> {
    let decoded: FeatureCollection = serde_json::from_slice(body)
        .map_err(|e| GeocodeError::Transport(anyhow::anyhow!("invalid geocoder payload: {e}")))?;
    let [lng, lat] = decoded
        .features
        .into_iter()
        .find_map(|f| f.center)
        .ok_or(GeocodeError::NotFound)?;
    Ok(Coordinates { lat, lng })
}

#[async_trait]
impl Geocoder for MapboxGeocoder {
    async fn coordinates_for(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        let resp = self
            .client
            .get(self.url_for(address))
            .query(&[("access_token", self.access_token.as_str()), ("limit", "1")])
            .send()
            .await
            .map_err(|e| GeocodeError::Transport(anyhow::anyhow!("request failed: {e}")))?;
        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(GeocodeError::NotFound);
        }
        if !status.is_success() {
            tracing::warn!(%status, "geocoder_upstream_error");
            return Err(GeocodeError::Transport(anyhow::anyhow!(
                "upstream returned status {status}"
            )));
        }
        let body = resp
            .bytes()
            .await
            .map_err(|e| GeocodeError::Transport(anyhow::anyhow!("failed to read body: {e}")))?;
        first_coordinates(&body)
    }
}
