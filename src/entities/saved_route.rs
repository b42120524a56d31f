use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{RouteRequest, Stop};
use crate::error::{index_out_of_range_error, Error};

pub const FALLBACK_ROUTE_NAME: &str = "Ruta sin nombre";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedRoute {
    pub name: String,
    pub origin: String,
    pub destination: String,
    #[serde(default)]
    pub waypoints: Vec<Stop>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl SavedRoute {
    pub fn new(name: &str, origin: String, destination: String, waypoints: Vec<Stop>) -> Self {
        let name = name.trim();
        let name = if name.is_empty() {
            FALLBACK_ROUTE_NAME
        } else {
            name
        };

        Self {
            name: name.into(),
            origin,
            destination,
            waypoints,
            saved_at: Some(Utc::now()),
        }
    }

    /// Snapshot of the in-progress request; the result is not kept.
    pub fn from_request(name: &str, request: &RouteRequest) -> Self {
        Self::new(
            name,
            request.origin.clone(),
            request.destination.clone(),
            request.waypoints.as_slice().to_vec(),
        )
    }
}

/// Saved routes in insertion order. Names need not be unique.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteCollection(Vec<SavedRoute>);

impl RouteCollection {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn add(mut self, route: SavedRoute) -> Self {
        self.0.push(route);
        self
    }

    /// Fails with an index-out-of-range error, dropping nothing, when `index` is past the end.
    pub fn remove_at(mut self, index: usize) -> Result<Self, Error> {
        if index >= self.0.len() {
            return Err(index_out_of_range_error(index, self.0.len()));
        }

        self.0.remove(index);
        Ok(self)
    }

    pub fn get(&self, index: usize) -> Result<&SavedRoute, Error> {
        self.0
            .get(index)
            .ok_or_else(|| index_out_of_range_error(index, self.0.len()))
    }

    pub fn routes(&self) -> &[SavedRoute] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<SavedRoute>> for RouteCollection {
    fn from(routes: Vec<SavedRoute>) -> Self {
        Self(routes)
    }
}

#[cfg(test)]
fn named(name: &str) -> SavedRoute {
    SavedRoute::new(name, "A".into(), "B".into(), vec![])
}

#[test]
fn empty_name_falls_back() {
    assert_eq!(named("").name, FALLBACK_ROUTE_NAME);
    assert_eq!(named("   ").name, FALLBACK_ROUTE_NAME);
    assert_eq!(named("Platja").name, "Platja");
}

#[test]
fn remove_at_keeps_order() {
    let routes = RouteCollection::new()
        .add(named("R1"))
        .add(named("R2"))
        .add(named("R3"));

    let routes = routes.remove_at(1).unwrap();
    let names: Vec<&str> = routes.routes().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["R1", "R3"]);
}

#[test]
fn remove_at_out_of_range_errors() {
    use crate::error::INDEX_OUT_OF_RANGE_ERROR;

    let routes = RouteCollection::new().add(named("R1"));
    let err = routes.clone().remove_at(1).unwrap_err();

    assert!(err.is(INDEX_OUT_OF_RANGE_ERROR));
    assert_eq!(routes.len(), 1);
}

#[test]
fn legacy_blob_without_timestamp_parses() {
    use crate::entities::Coordinates;

    let blob = r#"[{"name":"X","origin":"A","destination":"B","waypoints":[{"lat":1,"lng":2}]}]"#;
    let routes: RouteCollection = serde_json::from_str(blob).unwrap();

    let route = routes.get(0).unwrap();
    assert_eq!(route.saved_at, None);
    assert_eq!(route.waypoints, vec![Stop::from(Coordinates::new(1.0, 2.0))]);
}
