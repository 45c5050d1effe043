use async_trait::async_trait;

use crate::domain::places::place::Coordinates;

#[derive(thiserror::Error, Debug)]
pub enum GeocodeError {
    #[error("could not find location for the specified address")]
    NotFound,
    #[error("geocoding service request failed")]
    Transport(#[source] anyhow::Error),
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn coordinates_for(&self, address: &str) -> Result<Coordinates, GeocodeError>;
}
