use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Notify;
use tokio_test::block_on;

use super::{Engine, Providers};
use crate::{
    api::MapAPI,
    entities::{Coordinates, DirectionsRequest, DirectionsResult},
    error::{geolocation_error, invalid_input_error, provider_load_error, upstream_error, Error},
    external::{
        DirectionsProvider, Geometry, GeolocationProvider, MapProvider, Place, PlaceSuggestion,
        PlaceSuggestions, PlacesProvider,
    },
    storage::{MemoryStorage, RouteStore},
};

#[derive(Default)]
struct Fake {
    fail_load: bool,
    fail_directions: bool,
    position: Option<Coordinates>,
    geocoded: HashMap<String, Coordinates>,
    hold: Option<Arc<Notify>>,
    directions_calls: AtomicUsize,
    requests: std::sync::Mutex<Vec<DirectionsRequest>>,
    sessions: std::sync::Mutex<Vec<String>>,
}

#[derive(Clone, Default)]
pub struct FakeProviders {
    fake: Arc<Fake>,
    pub storage: Arc<MemoryStorage>,
}

impl FakeProviders {
    fn configure(mut self, f: impl FnOnce(&mut Fake)) -> Self {
        let fake = Arc::get_mut(&mut self.fake).expect("configure before building the engine");
        f(fake);
        self
    }

    pub fn failing_load(self) -> Self {
        self.configure(|fake| fake.fail_load = true)
    }

    pub fn failing_directions(self) -> Self {
        self.configure(|fake| fake.fail_directions = true)
    }

    pub fn located_at(self, position: Coordinates) -> Self {
        self.configure(|fake| fake.position = Some(position))
    }

    pub fn geocoding(self, address: &str, position: Coordinates) -> Self {
        self.configure(|fake| {
            fake.geocoded.insert(address.into(), position);
        })
    }

    /// Directions calls wait until the returned handle is notified.
    pub fn holding_directions(self) -> (Self, Arc<Notify>) {
        let notify = Arc::new(Notify::new());
        let hold = notify.clone();
        (self.configure(|fake| fake.hold = Some(hold)), notify)
    }

    pub fn with_storage(mut self, storage: Arc<MemoryStorage>) -> Self {
        self.storage = storage;
        self
    }

    pub fn directions_calls(&self) -> usize {
        self.fake.directions_calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<DirectionsRequest> {
        self.fake.requests.lock().unwrap().last().cloned()
    }

    /// Session tokens sent with each places call, in call order.
    pub fn sessions(&self) -> Vec<String> {
        self.fake.sessions.lock().unwrap().clone()
    }

    pub fn engine(&self) -> Engine {
        let providers = Providers {
            map: self.fake.clone(),
            directions: self.fake.clone(),
            places: self.fake.clone(),
            geolocation: self.fake.clone(),
        };

        Engine::new(RouteStore::new(self.storage.clone()), providers)
    }
}

pub fn loaded_engine(fakes: FakeProviders) -> (FakeProviders, Engine) {
    let engine = fakes.engine();
    block_on(engine.load_map()).unwrap();
    (fakes, engine)
}

#[async_trait]
impl MapProvider for Fake {
    async fn load(&self) -> Result<(), Error> {
        if self.fail_load {
            return Err(provider_load_error());
        }
        Ok(())
    }
}

#[async_trait]
impl DirectionsProvider for Fake {
    async fn route(&self, request: DirectionsRequest) -> Result<DirectionsResult, Error> {
        self.directions_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        if let Some(hold) = &self.hold {
            hold.notified().await;
        }

        if self.fail_directions {
            return Err(upstream_error());
        }

        Ok(DirectionsResult(serde_json::json!({
            "status": "OK",
            "origin": request.origin,
            "destination": request.destination,
        })))
    }
}

#[async_trait]
impl PlacesProvider for Fake {
    async fn find_place_suggestions(
        &self,
        input: String,
        _location: Option<Coordinates>,
        session_token: String,
    ) -> Result<PlaceSuggestions, Error> {
        self.sessions.lock().unwrap().push(session_token);

        Ok(vec![PlaceSuggestion {
            place_id: format!("id-{}", input),
            description: input,
        }])
    }

    async fn find_place(&self, id: String, session_token: String) -> Result<Place, Error> {
        self.sessions.lock().unwrap().push(session_token);

        let location = self
            .geocoded
            .get(&id)
            .copied()
            .ok_or_else(invalid_input_error)?;

        Ok(Place {
            place_id: id.clone(),
            formatted_address: id,
            geometry: Geometry { location },
        })
    }

    async fn geocode(&self, address: String) -> Result<Coordinates, Error> {
        self.geocoded
            .get(&address)
            .copied()
            .ok_or_else(invalid_input_error)
    }
}

#[async_trait]
impl GeolocationProvider for Fake {
    async fn current_position(&self) -> Result<Coordinates, Error> {
        self.position.ok_or_else(geolocation_error)
    }
}
