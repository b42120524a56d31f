use super::Engine;

use async_trait::async_trait;

use crate::{
    api::SavedRouteAPI,
    entities::{RouteCollection, RouteRequest},
    error::Error,
};

#[async_trait]
impl SavedRouteAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_routes(&self) -> Result<RouteCollection, Error> {
        let state = self.state.lock().await;
        state.ensure_loaded()?;

        Ok(state.routes.clone())
    }

    /// The collection changes in memory even when the write fails.
    #[tracing::instrument(skip(self))]
    async fn save_route(&self, name: String) -> Result<RouteCollection, Error> {
        let mut state = self.state.lock().await;
        state.ensure_loaded()?;

        let saved = state.save_route(&name);
        tracing::info!("saving route {:?}", saved.name);

        self.store.save_all(&state.routes)?;

        Ok(state.routes.clone())
    }

    #[tracing::instrument(skip(self))]
    async fn load_route(&self, index: usize) -> Result<RouteRequest, Error> {
        let mut state = self.state.lock().await;
        state.ensure_loaded()?;
        state.load_route(index)?;

        Ok(state.request.clone())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_route(&self, index: usize) -> Result<RouteCollection, Error> {
        let mut state = self.state.lock().await;
        state.ensure_loaded()?;
        state.delete_route(index)?;

        self.store.save_all(&state.routes)?;

        Ok(state.routes.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::api::{RouteRequestAPI, SavedRouteAPI};
    use crate::engine::testing::{loaded_engine, FakeProviders};
    use crate::entities::{Coordinates, RequestStatus, SavedRoute, Stop, FALLBACK_ROUTE_NAME};
    use crate::storage::{LocalStorage, MemoryStorage, RouteStore, ROUTES_KEY};
    use tokio_test::block_on;

    fn names(engine: &crate::engine::Engine) -> Vec<String> {
        block_on(engine.list_routes())
            .unwrap()
            .routes()
            .iter()
            .map(|r| r.name.clone())
            .collect()
    }

    #[test]
    fn save_persists_with_fallback_name() {
        let (fakes, engine) = loaded_engine(FakeProviders::default());

        block_on(engine.set_origin("A".into())).unwrap();
        block_on(engine.set_destination("B".into())).unwrap();
        block_on(engine.save_route("".into())).unwrap();

        let stored = RouteStore::new(fakes.storage.clone()).load_all();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored.get(0).unwrap().name, FALLBACK_ROUTE_NAME);
        assert_eq!(stored.get(0).unwrap().origin, "A");
    }

    #[test]
    fn delete_middle_route_persists_order() {
        let (fakes, engine) = loaded_engine(FakeProviders::default());

        for name in ["R1", "R2", "R3"] {
            block_on(engine.save_route(name.into())).unwrap();
        }

        block_on(engine.delete_route(1)).unwrap();
        assert_eq!(names(&engine), vec!["R1", "R3"]);

        let stored = RouteStore::new(fakes.storage.clone()).load_all();
        let stored: Vec<&str> = stored.routes().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(stored, vec!["R1", "R3"]);
    }

    #[test]
    fn delete_out_of_range_keeps_routes() {
        use crate::error::INDEX_OUT_OF_RANGE_ERROR;

        let (_, engine) = loaded_engine(FakeProviders::default());
        block_on(engine.save_route("R1".into())).unwrap();

        let err = block_on(engine.delete_route(5)).unwrap_err();
        assert!(err.is(INDEX_OUT_OF_RANGE_ERROR));
        assert_eq!(names(&engine), vec!["R1"]);
    }

    #[test]
    fn load_sets_fields_without_computing() {
        let storage = Arc::new(MemoryStorage::new());
        let saved = SavedRoute::new(
            "X",
            "A".into(),
            "B".into(),
            vec![Coordinates::new(1.0, 2.0).into()],
        );
        RouteStore::new(storage.clone())
            .save_all(&vec![saved].into())
            .unwrap();

        let (fakes, engine) = loaded_engine(FakeProviders::default().with_storage(storage));
        let request = block_on(engine.load_route(0)).unwrap();

        assert_eq!(request.origin, "A");
        assert_eq!(request.destination, "B");
        assert_eq!(
            request.waypoints.as_slice(),
            &[Stop::from(Coordinates::new(1.0, 2.0))]
        );
        assert_eq!(request.last_result, None);
        assert_eq!(request.status, RequestStatus::Ready);
        assert_eq!(fakes.directions_calls(), 0);
    }

    #[test]
    fn corrupt_storage_starts_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(ROUTES_KEY, "[{\"name\":").unwrap();

        let (_, engine) = loaded_engine(FakeProviders::default().with_storage(storage.clone()));
        assert!(names(&engine).is_empty());

        block_on(engine.save_route("R1".into())).unwrap();
        assert_eq!(RouteStore::new(storage).load_all().len(), 1);
    }
}
