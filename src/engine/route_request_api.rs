use super::Engine;

use async_trait::async_trait;

use crate::{
    api::RouteRequestAPI,
    entities::{RouteRequest, Stop},
    error::Error,
};

#[async_trait]
impl RouteRequestAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn route_request(&self) -> Result<RouteRequest, Error> {
        let state = self.state.lock().await;
        state.ensure_loaded()?;

        Ok(state.request.clone())
    }

    #[tracing::instrument(skip(self))]
    async fn set_origin(&self, value: String) -> Result<RouteRequest, Error> {
        let mut state = self.state.lock().await;
        state.ensure_loaded()?;
        state.request.set_origin(&value);

        Ok(state.request.clone())
    }

    #[tracing::instrument(skip(self))]
    async fn set_destination(&self, value: String) -> Result<RouteRequest, Error> {
        let mut state = self.state.lock().await;
        state.ensure_loaded()?;
        state.request.set_destination(&value);

        Ok(state.request.clone())
    }

    #[tracing::instrument(skip(self))]
    async fn set_origin_to_current_location(&self) -> Result<RouteRequest, Error> {
        let mut state = self.state.lock().await;
        state.ensure_loaded()?;

        if !state.set_origin_to_current_location() {
            tracing::debug!("no user location yet, origin unchanged");
        }

        Ok(state.request.clone())
    }

    #[tracing::instrument(skip(self))]
    async fn add_waypoint(&self, stop: Stop) -> Result<RouteRequest, Error> {
        let mut state = self.state.lock().await;
        state.ensure_loaded()?;
        state.request.add_waypoint(stop)?;

        Ok(state.request.clone())
    }

    #[tracing::instrument(skip(self))]
    async fn remove_waypoint(&self, index: usize) -> Result<RouteRequest, Error> {
        let mut state = self.state.lock().await;
        state.ensure_loaded()?;
        state.request.remove_waypoint(index)?;

        Ok(state.request.clone())
    }

    /// Provider failures are not returned; they leave the request `Failed` with no result.
    #[tracing::instrument(skip(self))]
    async fn compute_route(&self) -> Result<RouteRequest, Error> {
        let ticket = {
            let mut state = self.state.lock().await;
            state.ensure_loaded()?;

            match state.request.begin_compute() {
                Some(ticket) => ticket,
                None => return Ok(state.request.clone()),
            }
        };

        let outcome = self.providers.directions.route(ticket.request.clone()).await;

        let mut state = self.state.lock().await;
        state.request.resolve(ticket, outcome);

        Ok(state.request.clone())
    }

    #[tracing::instrument(skip(self))]
    async fn clear_route(&self) -> Result<RouteRequest, Error> {
        let mut state = self.state.lock().await;
        state.ensure_loaded()?;
        state.request.clear();

        Ok(state.request.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::api::RouteRequestAPI;
    use crate::engine::testing::{loaded_engine, FakeProviders};
    use crate::entities::{Coordinates, RequestStatus, Stop, TravelMode};
    use tokio_test::block_on;

    #[test]
    fn clear_then_compute_calls_no_provider() {
        let (fakes, engine) = loaded_engine(FakeProviders::default());

        block_on(engine.set_origin("A".into())).unwrap();
        block_on(engine.set_destination("B".into())).unwrap();
        block_on(engine.clear_route()).unwrap();

        let request = block_on(engine.compute_route()).unwrap();
        assert_eq!(request.status, RequestStatus::Idle);
        assert_eq!(fakes.directions_calls(), 0);
    }

    #[test]
    fn compute_resolves_with_bicycle_request() {
        let (fakes, engine) = loaded_engine(FakeProviders::default());

        block_on(engine.set_origin("A".into())).unwrap();
        let request = block_on(engine.set_destination("B".into())).unwrap();
        assert_eq!(request.status, RequestStatus::Ready);

        block_on(engine.add_waypoint("C".into())).unwrap();
        let request = block_on(engine.compute_route()).unwrap();

        assert_eq!(request.status, RequestStatus::Resolved);
        assert!(request.last_result.is_some());
        assert_eq!(fakes.directions_calls(), 1);

        let sent = fakes.last_request().unwrap();
        assert_eq!(sent.travel_mode, TravelMode::Bicycling);
        assert_eq!(sent.waypoints, vec![Stop::from("C")]);
    }

    #[test]
    fn provider_error_fails_without_result() {
        let (fakes, engine) = loaded_engine(FakeProviders::default().failing_directions());

        block_on(engine.set_origin("A".into())).unwrap();
        block_on(engine.set_destination("B".into())).unwrap();

        let request = block_on(engine.compute_route()).unwrap();
        assert_eq!(request.status, RequestStatus::Failed);
        assert_eq!(request.last_result, None);

        // no retry
        assert_eq!(fakes.directions_calls(), 1);
    }

    #[test]
    fn origin_from_current_location() {
        let (_, engine) =
            loaded_engine(FakeProviders::default().located_at(Coordinates::new(41.38, 2.17)));

        let request = block_on(engine.set_origin_to_current_location()).unwrap();
        assert_eq!(request.origin, "41.38,2.17");
    }

    #[test]
    fn remove_waypoint_out_of_range_errors() {
        use crate::error::INDEX_OUT_OF_RANGE_ERROR;

        let (_, engine) = loaded_engine(FakeProviders::default());
        block_on(engine.add_waypoint("C".into())).unwrap();

        let err = block_on(engine.remove_waypoint(3)).unwrap_err();
        assert!(err.is(INDEX_OUT_OF_RANGE_ERROR));

        let request = block_on(engine.remove_waypoint(0)).unwrap();
        assert!(request.waypoints.is_empty());
    }

    #[tokio::test]
    async fn state_stays_available_while_computing() {
        let (fakes, notify) = FakeProviders::default().holding_directions();
        let engine = Arc::new(fakes.engine());
        crate::api::MapAPI::load_map(engine.as_ref()).await.unwrap();

        engine.set_origin("A".into()).await.unwrap();
        engine.set_destination("B".into()).await.unwrap();

        let computing = tokio::spawn({
            let engine = engine.clone();
            async move { engine.compute_route().await }
        });

        while fakes.directions_calls() == 0 {
            tokio::task::yield_now().await;
        }

        let request = engine.route_request().await.unwrap();
        assert_eq!(request.status, RequestStatus::Computing);

        notify.notify_one();
        let request = computing.await.unwrap().unwrap();
        assert_eq!(request.status, RequestStatus::Resolved);
    }

    #[tokio::test]
    async fn edit_during_compute_discards_result() {
        let (fakes, notify) = FakeProviders::default().holding_directions();
        let engine = Arc::new(fakes.engine());
        crate::api::MapAPI::load_map(engine.as_ref()).await.unwrap();

        engine.set_origin("A".into()).await.unwrap();
        engine.set_destination("B".into()).await.unwrap();

        let computing = tokio::spawn({
            let engine = engine.clone();
            async move { engine.compute_route().await }
        });

        while fakes.directions_calls() == 0 {
            tokio::task::yield_now().await;
        }

        engine.set_destination("C".into()).await.unwrap();
        notify.notify_one();

        let request = computing.await.unwrap().unwrap();
        assert_eq!(request.status, RequestStatus::Ready);
        assert_eq!(request.last_result, None);
    }
}
