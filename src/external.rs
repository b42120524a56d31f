pub mod geolocation;
pub mod google_maps;

use std::sync::Arc;

use async_trait::async_trait;

use crate::entities::{Coordinates, DirectionsRequest, DirectionsResult};
use crate::error::Error;

pub use google_maps::{Geometry, GoogleMaps, Place, PlaceSuggestion, PlaceSuggestions};

#[async_trait]
pub trait MapProvider {
    /// Failing here leaves the whole UI unusable.
    async fn load(&self) -> Result<(), Error>;
}

#[async_trait]
pub trait DirectionsProvider {
    async fn route(&self, request: DirectionsRequest) -> Result<DirectionsResult, Error>;
}

#[async_trait]
pub trait PlacesProvider {
    async fn find_place_suggestions(
        &self,
        input: String,
        location: Option<Coordinates>,
        session_token: String,
    ) -> Result<PlaceSuggestions, Error>;

    async fn find_place(&self, id: String, session_token: String) -> Result<Place, Error>;

    async fn geocode(&self, address: String) -> Result<Coordinates, Error>;
}

#[async_trait]
pub trait GeolocationProvider {
    async fn current_position(&self) -> Result<Coordinates, Error>;
}

pub type DynMapProvider = Arc<dyn MapProvider + Send + Sync>;
pub type DynDirectionsProvider = Arc<dyn DirectionsProvider + Send + Sync>;
pub type DynPlacesProvider = Arc<dyn PlacesProvider + Send + Sync>;
pub type DynGeolocationProvider = Arc<dyn GeolocationProvider + Send + Sync>;
