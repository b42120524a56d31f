use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

/// An intermediate point the route passes through.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Stop {
    Coordinates(Coordinates),
    Address(String),
}

impl Stop {
    /// Coordinates usable as a map marker without a geocoding round trip.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            Self::Coordinates(coordinates) => Some(*coordinates),
            Self::Address(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Address(address) => address.trim().is_empty(),
            Self::Coordinates(_) => false,
        }
    }
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coordinates(coordinates) => coordinates.fmt(f),
            Self::Address(address) => f.write_str(address),
        }
    }
}

impl From<Coordinates> for Stop {
    fn from(coordinates: Coordinates) -> Self {
        Self::Coordinates(coordinates)
    }
}

impl From<&str> for Stop {
    fn from(address: &str) -> Self {
        Self::Address(address.into())
    }
}

#[test]
fn stop_json_is_untagged() {
    let stops: Vec<Stop> =
        serde_json::from_str(r#"["Carrer Gran 1", {"lat": 1, "lng": 2}]"#).unwrap();

    assert_eq!(stops[0], Stop::from("Carrer Gran 1"));
    assert_eq!(stops[1], Stop::from(Coordinates::new(1.0, 2.0)));
    assert_eq!(
        serde_json::to_string(&stops).unwrap(),
        r#"["Carrer Gran 1",{"lat":1.0,"lng":2.0}]"#
    );
}

#[test]
fn only_coordinate_stops_are_markers() {
    assert_eq!(Stop::from("Sants").coordinates(), None);
    assert_eq!(
        Stop::from(Coordinates::new(1.0, 2.0)).coordinates(),
        Some(Coordinates::new(1.0, 2.0))
    );
    assert!(Stop::from("  ").is_empty());
}
