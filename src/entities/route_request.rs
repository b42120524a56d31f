use serde::{Deserialize, Serialize};

use crate::entities::{Coordinates, DirectionsRequest, DirectionsResult, SavedRoute, Stop, Waypoints};
use crate::error::Error;

/// The route being planned. Never persisted directly; see `SavedRoute`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RouteRequest {
    pub origin: String,
    pub destination: String,
    pub waypoints: Waypoints,
    pub last_result: Option<DirectionsResult>,
    pub status: Status,
    #[serde(skip)]
    generation: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Status {
    #[default]
    Idle,
    Ready,
    Computing,
    Resolved,
    Failed,
}

/// Issued by `begin_compute`; hands the provider's answer back to `resolve`.
#[derive(Clone, Debug, PartialEq)]
pub struct Ticket {
    generation: u64,
    pub request: DirectionsRequest,
}

impl RouteRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        !self.origin.is_empty() && !self.destination.is_empty()
    }

    pub fn set_origin(&mut self, value: &str) {
        self.origin = value.trim().into();
        self.edited();
    }

    pub fn set_destination(&mut self, value: &str) {
        self.destination = value.trim().into();
        self.edited();
    }

    pub fn set_origin_to(&mut self, coordinates: Coordinates) {
        self.set_origin(&coordinates.to_string());
    }

    pub fn add_waypoint(&mut self, stop: Stop) -> Result<(), Error> {
        self.waypoints.append(stop)?;
        self.edited();
        Ok(())
    }

    pub fn remove_waypoint(&mut self, index: usize) -> Result<Stop, Error> {
        let stop = self.waypoints.remove_at(index)?;
        self.edited();
        Ok(stop)
    }

    /// Returns `None` without touching the state unless origin and destination are both set.
    #[tracing::instrument(skip(self))]
    pub fn begin_compute(&mut self) -> Option<Ticket> {
        if !self.is_ready() {
            tracing::debug!("route request incomplete, skipping directions");
            return None;
        }

        self.status = Status::Computing;

        Some(Ticket {
            generation: self.generation,
            request: DirectionsRequest::bicycling(
                self.origin.clone(),
                self.destination.clone(),
                self.waypoints.as_slice().to_vec(),
            ),
        })
    }

    /// Applies a provider answer. Answers to requests issued before the latest edit, clear or
    /// load are dropped and `false` is returned; otherwise the last answer to arrive wins.
    #[tracing::instrument(skip(self, ticket, outcome))]
    pub fn resolve(&mut self, ticket: Ticket, outcome: Result<DirectionsResult, Error>) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!("discarding stale directions result");
            return false;
        }

        match outcome {
            Ok(result) => {
                self.status = Status::Resolved;
                self.last_result = Some(result);
            }
            Err(err) => {
                tracing::warn!("directions request failed: {}", err);
                self.status = Status::Failed;
                self.last_result = None;
            }
        }

        true
    }

    pub fn clear(&mut self) {
        let generation = self.generation + 1;
        *self = Self {
            generation,
            ..Self::default()
        };
    }

    pub fn load_from_saved(&mut self, route: &SavedRoute) {
        self.origin = route.origin.clone();
        self.destination = route.destination.clone();
        self.waypoints.replace_all(route.waypoints.clone());
        self.last_result = None;
        self.edited();
    }

    fn edited(&mut self) {
        self.generation += 1;
        self.status = if self.is_ready() {
            Status::Ready
        } else {
            Status::Idle
        };
    }
}

#[cfg(test)]
fn ok_result() -> Result<DirectionsResult, Error> {
    Ok(DirectionsResult(serde_json::json!({"status": "OK"})))
}

#[test]
fn origin_and_destination_make_ready() {
    let mut request = RouteRequest::new();
    assert_eq!(request.status, Status::Idle);

    request.set_origin("A");
    assert_eq!(request.status, Status::Idle);

    request.set_destination("B");
    assert_eq!(request.status, Status::Ready);

    request.set_origin("  ");
    assert_eq!(request.status, Status::Idle);
}

#[test]
fn waypoints_do_not_change_readiness() {
    let mut request = RouteRequest::new();
    request.add_waypoint("Sants".into()).unwrap();
    assert_eq!(request.status, Status::Idle);

    request.set_origin("A");
    request.set_destination("B");
    request.add_waypoint("Gràcia".into()).unwrap();
    assert_eq!(request.status, Status::Ready);
    assert_eq!(request.waypoints.len(), 2);
}

#[test]
fn compute_moves_through_computing_to_resolved() {
    use crate::entities::TravelMode;

    let mut request = RouteRequest::new();
    request.set_origin("A");
    request.set_destination("B");
    request.add_waypoint("C".into()).unwrap();

    let ticket = request.begin_compute().unwrap();
    assert_eq!(request.status, Status::Computing);
    assert_eq!(ticket.request.travel_mode, TravelMode::Bicycling);
    assert_eq!(ticket.request.waypoints, vec![Stop::from("C")]);

    assert!(request.resolve(ticket, ok_result()));
    assert_eq!(request.status, Status::Resolved);
    assert!(request.last_result.is_some());
}

#[test]
fn failed_compute_clears_result() {
    use crate::error::upstream_error;

    let mut request = RouteRequest::new();
    request.set_origin("A");
    request.set_destination("B");

    let ticket = request.begin_compute().unwrap();
    request.resolve(ticket, ok_result());

    let ticket = request.begin_compute().unwrap();
    request.resolve(ticket, Err(upstream_error()));
    assert_eq!(request.status, Status::Failed);
    assert_eq!(request.last_result, None);

    request.set_destination("C");
    assert_eq!(request.status, Status::Ready);
}

#[test]
fn cleared_request_does_not_compute() {
    let mut request = RouteRequest::new();
    request.set_origin("A");
    request.set_destination("B");
    request.clear();

    assert_eq!(request.status, Status::Idle);
    assert!(request.begin_compute().is_none());
    assert_eq!(request.status, Status::Idle);
}

#[test]
fn overlapping_computes_last_resolution_wins() {
    let mut request = RouteRequest::new();
    request.set_origin("A");
    request.set_destination("B");

    let first = request.begin_compute().unwrap();
    let second = request.begin_compute().unwrap();

    request.resolve(second, Ok(DirectionsResult(serde_json::json!(2))));
    request.resolve(first, Ok(DirectionsResult(serde_json::json!(1))));

    assert_eq!(request.last_result, Some(DirectionsResult(serde_json::json!(1))));
}

#[test]
fn result_after_clear_is_discarded() {
    let mut request = RouteRequest::new();
    request.set_origin("A");
    request.set_destination("B");

    let ticket = request.begin_compute().unwrap();
    request.clear();

    assert!(!request.resolve(ticket, ok_result()));
    assert_eq!(request.status, Status::Idle);
    assert_eq!(request.last_result, None);
}

#[test]
fn load_from_saved_overwrites_without_result() {
    use crate::entities::Coordinates;

    let mut request = RouteRequest::new();
    request.set_origin("Z");
    request.add_waypoint("Y".into()).unwrap();

    let saved = SavedRoute::new(
        "X",
        "A".into(),
        "B".into(),
        vec![Coordinates::new(1.0, 2.0).into()],
    );
    request.load_from_saved(&saved);

    assert_eq!(request.origin, "A");
    assert_eq!(request.destination, "B");
    assert_eq!(
        request.waypoints.as_slice(),
        &[Stop::from(Coordinates::new(1.0, 2.0))]
    );
    assert_eq!(request.last_result, None);
    assert_eq!(request.status, Status::Ready);
}
