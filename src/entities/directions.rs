use serde::{Deserialize, Serialize};

use crate::entities::Stop;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelMode {
    Bicycling,
}

impl TravelMode {
    /// Value of the provider's `mode` query parameter.
    pub fn as_query(&self) -> &'static str {
        match self {
            Self::Bicycling => "bicycling",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectionsRequest {
    pub origin: String,
    pub destination: String,
    pub travel_mode: TravelMode,
    pub waypoints: Vec<Stop>,
}

impl DirectionsRequest {
    /// Every request is made by bicycle.
    pub fn bicycling(origin: String, destination: String, waypoints: Vec<Stop>) -> Self {
        Self {
            origin,
            destination,
            travel_mode: TravelMode::Bicycling,
            waypoints,
        }
    }
}

/// Provider response, held as-is and handed back to the renderer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirectionsResult(pub serde_json::Value);
