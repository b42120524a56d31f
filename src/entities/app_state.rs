use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{
    Coordinates, MapControls, MapStatus, MapView, Marker, RouteCollection, RouteRequest,
    SavedRoute, DEFAULT_ZOOM,
};
use crate::error::{invalid_state_error, provider_load_error, Error};

/// Everything the UI shows, in one place.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppState {
    pub map: MapStatus,
    pub user_location: Option<Coordinates>,
    pub panel_open: bool,
    pub request: RouteRequest,
    pub routes: RouteCollection,
    pub session_token: Uuid,
}

impl AppState {
    pub fn new(routes: RouteCollection) -> Self {
        Self {
            map: MapStatus::Loading,
            user_location: None,
            panel_open: false,
            request: RouteRequest::new(),
            routes,
            session_token: Uuid::new_v4(),
        }
    }

    pub fn ensure_loaded(&self) -> Result<(), Error> {
        match self.map {
            MapStatus::Loaded => Ok(()),
            MapStatus::Loading => Err(invalid_state_error()),
            MapStatus::Failed { message: _ } => Err(provider_load_error()),
        }
    }

    /// A fresh map instance starts with no route.
    pub fn map_loaded(&mut self) {
        self.map = MapStatus::Loaded;
        self.request.clear();
    }

    pub fn map_failed(&mut self, err: &Error) {
        self.map = MapStatus::Failed {
            message: err.message.clone(),
        };
    }

    pub fn toggle_panel(&mut self) -> bool {
        self.panel_open = !self.panel_open;
        self.panel_open
    }

    pub fn set_origin_to_current_location(&mut self) -> bool {
        match self.user_location {
            Some(location) => {
                self.request.set_origin_to(location);
                true
            }
            None => false,
        }
    }

    pub fn save_route(&mut self, name: &str) -> &SavedRoute {
        let route = SavedRoute::from_request(name, &self.request);
        self.routes = std::mem::take(&mut self.routes).add(route);

        let last = self.routes.len() - 1;
        &self.routes.routes()[last]
    }

    pub fn delete_route(&mut self, index: usize) -> Result<(), Error> {
        self.routes = self.routes.clone().remove_at(index)?;
        Ok(())
    }

    /// Loading a saved route also closes the side panel.
    pub fn load_route(&mut self, index: usize) -> Result<(), Error> {
        let route = self.routes.get(index)?.clone();
        self.request.load_from_saved(&route);
        self.panel_open = false;
        Ok(())
    }

    /// `waypoint_positions` are the waypoints that resolved to coordinates, in order.
    pub fn view(&self, waypoint_positions: Vec<Coordinates>) -> MapView {
        let mut markers: Vec<Marker> = self
            .user_location
            .into_iter()
            .map(Marker::user_location)
            .collect();
        markers.extend(waypoint_positions.into_iter().map(Marker::waypoint));

        MapView {
            center: self.user_location,
            zoom: DEFAULT_ZOOM,
            controls: MapControls::default(),
            markers,
            directions: self.request.last_result.clone(),
            panel_open: self.panel_open,
            origin: self.request.origin.clone(),
            destination: self.request.destination.clone(),
            status: self.request.status.clone(),
        }
    }
}

#[test]
fn operations_blocked_until_map_loads() {
    use crate::error::{upstream_error, PROVIDER_LOAD_ERROR};

    let mut state = AppState::new(RouteCollection::new());
    assert!(state.ensure_loaded().is_err());

    state.map_failed(&upstream_error());
    assert!(state.ensure_loaded().unwrap_err().is(PROVIDER_LOAD_ERROR));

    state.map_loaded();
    assert!(state.ensure_loaded().is_ok());
}

#[test]
fn map_load_clears_route() {
    let mut state = AppState::new(RouteCollection::new());
    state.request.set_origin("A");
    state.request.set_destination("B");

    state.map_loaded();
    assert!(state.request.origin.is_empty());
    assert!(!state.request.is_ready());
}

#[test]
fn current_location_becomes_origin() {
    let mut state = AppState::new(RouteCollection::new());
    assert!(!state.set_origin_to_current_location());
    assert!(state.request.origin.is_empty());

    state.user_location = Some(Coordinates::new(41.38, 2.17));
    assert!(state.set_origin_to_current_location());
    assert_eq!(state.request.origin, "41.38,2.17");
}

#[test]
fn loading_saved_route_closes_panel() {
    let mut state = AppState::new(RouteCollection::new());
    state.request.set_origin("A");
    state.request.set_destination("B");
    state.save_route("");

    state.request.clear();
    state.toggle_panel();
    state.load_route(0).unwrap();

    assert!(!state.panel_open);
    assert_eq!(state.request.origin, "A");
    assert!(state.load_route(4).is_err());
}

#[test]
fn delete_out_of_range_keeps_routes() {
    let mut state = AppState::new(RouteCollection::new());
    state.save_route("R1");
    state.save_route("R2");

    assert!(state.delete_route(2).is_err());
    assert_eq!(state.routes.len(), 2);

    state.delete_route(0).unwrap();
    assert_eq!(state.routes.get(0).unwrap().name, "R2");
}

#[test]
fn view_lists_user_then_waypoints() {
    use crate::entities::MarkerIcon;

    let mut state = AppState::new(RouteCollection::new());
    state.user_location = Some(Coordinates::new(1.0, 1.0));

    let view = state.view(vec![Coordinates::new(2.0, 2.0), Coordinates::new(3.0, 3.0)]);

    assert_eq!(view.center, Some(Coordinates::new(1.0, 1.0)));
    assert_eq!(view.zoom, 15);
    assert_eq!(view.markers.len(), 3);
    assert_eq!(view.markers[0].icon, MarkerIcon::UserLocation);
    assert_eq!(view.markers[2].position, Coordinates::new(3.0, 3.0));
    assert!(!view.controls.zoom && !view.controls.fullscreen);
}
