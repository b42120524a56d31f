mod app_state;
mod coordinates;
mod directions;
mod map_view;
mod route_request;
mod saved_route;
mod stop;
mod waypoints;

pub use app_state::AppState;
pub use coordinates::Coordinates;
pub use directions::{DirectionsRequest, DirectionsResult, TravelMode};
pub use map_view::{MapControls, MapStatus, MapView, Marker, MarkerIcon, DEFAULT_ZOOM};
pub use route_request::{RouteRequest, Status as RequestStatus, Ticket};
pub use saved_route::{RouteCollection, SavedRoute, FALLBACK_ROUTE_NAME};
pub use stop::Stop;
pub use waypoints::Waypoints;
