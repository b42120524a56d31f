use async_trait::async_trait;

use crate::entities::{Coordinates, MapView, RouteCollection, RouteRequest, Stop};
use crate::error::Error;
use crate::external::{Place, PlaceSuggestions};

#[async_trait]
pub trait MapAPI {
    async fn load_map(&self) -> Result<MapView, Error>;
    async fn map_view(&self) -> Result<MapView, Error>;
    async fn toggle_panel(&self) -> Result<MapView, Error>;
    /// `None` means the client could not, or would not, share its position.
    async fn report_location(&self, position: Option<Coordinates>) -> Result<MapView, Error>;
    async fn find_place_suggestions(&self, input: String) -> Result<PlaceSuggestions, Error>;
    async fn find_place(&self, id: String) -> Result<Place, Error>;
}

#[async_trait]
pub trait RouteRequestAPI {
    async fn route_request(&self) -> Result<RouteRequest, Error>;
    async fn set_origin(&self, value: String) -> Result<RouteRequest, Error>;
    async fn set_destination(&self, value: String) -> Result<RouteRequest, Error>;
    async fn set_origin_to_current_location(&self) -> Result<RouteRequest, Error>;
    async fn add_waypoint(&self, stop: Stop) -> Result<RouteRequest, Error>;
    async fn remove_waypoint(&self, index: usize) -> Result<RouteRequest, Error>;
    async fn compute_route(&self) -> Result<RouteRequest, Error>;
    async fn clear_route(&self) -> Result<RouteRequest, Error>;
}

#[async_trait]
pub trait SavedRouteAPI {
    async fn list_routes(&self) -> Result<RouteCollection, Error>;
    async fn save_route(&self, name: String) -> Result<RouteCollection, Error>;
    async fn load_route(&self, index: usize) -> Result<RouteRequest, Error>;
    async fn delete_route(&self, index: usize) -> Result<RouteCollection, Error>;
}

pub trait API: MapAPI + RouteRequestAPI + SavedRouteAPI {}
