mod map_api;
mod route_request_api;
mod saved_route_api;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    api::API,
    config::Config,
    entities::AppState,
    external::{
        geolocation::FixedGeolocation, DynDirectionsProvider, DynGeolocationProvider,
        DynMapProvider, DynPlacesProvider, GoogleMaps,
    },
    storage::RouteStore,
};

#[derive(Clone)]
pub struct Providers {
    pub map: DynMapProvider,
    pub directions: DynDirectionsProvider,
    pub places: DynPlacesProvider,
    pub geolocation: DynGeolocationProvider,
}

impl Providers {
    pub fn google(config: &Config) -> Self {
        let maps = Arc::new(GoogleMaps::new(config));

        Self {
            map: maps.clone(),
            directions: maps.clone(),
            places: maps,
            geolocation: Arc::new(FixedGeolocation::new(config.fixed_location)),
        }
    }
}

/// Single owner of the application state. Provider calls run with the state unlocked.
pub struct Engine {
    state: Mutex<AppState>,
    store: RouteStore,
    providers: Providers,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub fn new(store: RouteStore, providers: Providers) -> Self {
        let routes = store.load_all();

        tracing::info!("loaded {} saved routes", routes.len());

        Self {
            state: Mutex::new(AppState::new(routes)),
            store,
            providers,
        }
    }
}

impl API for Engine {}
