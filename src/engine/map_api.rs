use super::Engine;

use async_trait::async_trait;
use futures::future::join_all;
use uuid::Uuid;

use crate::{
    api::MapAPI,
    entities::{Coordinates, MapView, Stop},
    error::Error,
    external::{Place, PlaceSuggestions},
};

#[async_trait]
impl MapAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn load_map(&self) -> Result<MapView, Error> {
        if let Err(err) = self.providers.map.load().await {
            tracing::error!("map provider failed to load: {}", err);
            self.state.lock().await.map_failed(&err);
            return Err(err);
        }

        self.state.lock().await.map_loaded();

        // one position request per map instance
        match self.providers.geolocation.current_position().await {
            Ok(position) => self.state.lock().await.user_location = Some(position),
            Err(err) => tracing::warn!("no user location: {}", err),
        }

        self.map_view().await
    }

    #[tracing::instrument(skip(self))]
    async fn map_view(&self) -> Result<MapView, Error> {
        let state = self.state.lock().await.clone();
        state.ensure_loaded()?;

        let lookups = state.request.waypoints.iter().map(|stop| self.marker_position(stop));
        let positions: Vec<Coordinates> = join_all(lookups).await.into_iter().flatten().collect();

        Ok(state.view(positions))
    }

    #[tracing::instrument(skip(self))]
    async fn toggle_panel(&self) -> Result<MapView, Error> {
        {
            let mut state = self.state.lock().await;
            state.ensure_loaded()?;
            state.toggle_panel();
        }

        self.map_view().await
    }

    #[tracing::instrument(skip(self))]
    async fn report_location(&self, position: Option<Coordinates>) -> Result<MapView, Error> {
        {
            let mut state = self.state.lock().await;
            state.ensure_loaded()?;

            match position {
                Some(position) => state.user_location = Some(position),
                None => tracing::warn!("client reported no location"),
            }
        }

        self.map_view().await
    }

    #[tracing::instrument(skip(self))]
    async fn find_place_suggestions(&self, input: String) -> Result<PlaceSuggestions, Error> {
        let (location, session_token) = {
            let state = self.state.lock().await;
            state.ensure_loaded()?;
            (state.user_location, state.session_token.to_string())
        };

        self.providers
            .places
            .find_place_suggestions(input, location, session_token)
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn find_place(&self, id: String) -> Result<Place, Error> {
        let session_token = {
            let mut state = self.state.lock().await;
            state.ensure_loaded()?;

            // a details lookup ends the autocomplete session
            let token = state.session_token;
            state.session_token = Uuid::new_v4();
            token.to_string()
        };

        self.providers.places.find_place(id, session_token).await
    }
}

impl Engine {
    async fn marker_position(&self, stop: &Stop) -> Option<Coordinates> {
        match stop {
            Stop::Coordinates(coordinates) => Some(*coordinates),
            Stop::Address(address) => match self.providers.places.geocode(address.clone()).await {
                Ok(coordinates) => Some(coordinates),
                Err(err) => {
                    tracing::debug!("no marker for stop {:?}: {}", address, err);
                    None
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::api::MapAPI;
    use crate::engine::testing::{loaded_engine, FakeProviders};
    use crate::entities::{Coordinates, MarkerIcon};
    use crate::error::PROVIDER_LOAD_ERROR;
    use tokio_test::block_on;

    #[test]
    fn load_failure_blocks_everything() {
        let fakes = FakeProviders::default().failing_load();
        let engine = fakes.engine();

        let err = block_on(engine.load_map()).unwrap_err();
        assert!(err.is(PROVIDER_LOAD_ERROR));
        assert!(block_on(engine.map_view()).unwrap_err().is(PROVIDER_LOAD_ERROR));
    }

    #[test]
    fn denied_geolocation_leaves_center_unset() {
        let fakes = FakeProviders::default();
        let engine = fakes.engine();

        let view = block_on(engine.load_map()).unwrap();
        assert_eq!(view.center, None);
        assert!(view.markers.is_empty());
    }

    #[test]
    fn user_location_centers_map() {
        let here = Coordinates::new(41.38, 2.17);
        let (_, engine) = loaded_engine(FakeProviders::default().located_at(here));

        let view = block_on(engine.map_view()).unwrap();
        assert_eq!(view.center, Some(here));
        assert_eq!(view.markers[0].icon, MarkerIcon::UserLocation);
    }

    #[test]
    fn address_waypoints_are_geocoded_for_markers() {
        use crate::api::RouteRequestAPI;

        let (_, engine) = loaded_engine(
            FakeProviders::default().geocoding("Sants", Coordinates::new(41.37, 2.13)),
        );

        block_on(engine.add_waypoint("Sants".into())).unwrap();
        block_on(engine.add_waypoint("Nowhere".into())).unwrap();
        block_on(engine.add_waypoint(Coordinates::new(1.0, 2.0).into())).unwrap();

        let view = block_on(engine.map_view()).unwrap();
        let positions: Vec<Coordinates> = view.markers.iter().map(|m| m.position).collect();
        assert_eq!(
            positions,
            vec![Coordinates::new(41.37, 2.13), Coordinates::new(1.0, 2.0)]
        );
    }

    #[test]
    fn toggle_panel_flips_visibility() {
        let (_, engine) = loaded_engine(FakeProviders::default());

        assert!(block_on(engine.toggle_panel()).unwrap().panel_open);
        assert!(!block_on(engine.toggle_panel()).unwrap().panel_open);
    }

    #[test]
    fn reported_location_is_kept() {
        let (_, engine) = loaded_engine(FakeProviders::default());

        let view = block_on(engine.report_location(None)).unwrap();
        assert_eq!(view.center, None);

        let here = Coordinates::new(1.0, 1.0);
        let view = block_on(engine.report_location(Some(here))).unwrap();
        assert_eq!(view.center, Some(here));
    }

    #[test]
    fn place_details_end_the_autocomplete_session() {
        let (fakes, engine) = loaded_engine(
            FakeProviders::default().geocoding("sf", Coordinates::new(41.4036, 2.1744)),
        );

        block_on(engine.find_place_suggestions("Sagr".into())).unwrap();
        block_on(engine.find_place_suggestions("Sagrada".into())).unwrap();
        let place = block_on(engine.find_place("sf".into())).unwrap();
        assert_eq!(place.geometry.location, Coordinates::new(41.4036, 2.1744));

        block_on(engine.find_place_suggestions("Tibi".into())).unwrap();

        let sessions = fakes.sessions();
        assert_eq!(sessions.len(), 4);
        assert_eq!(sessions[0], sessions[1]);
        assert_eq!(sessions[1], sessions[2]);
        assert_ne!(sessions[2], sessions[3]);
    }
}
