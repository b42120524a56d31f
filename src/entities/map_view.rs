use serde::{Deserialize, Serialize};

use crate::entities::{Coordinates, DirectionsResult, RequestStatus};

pub const DEFAULT_ZOOM: u8 = 15;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum MapStatus {
    #[default]
    Loading,
    Loaded,
    Failed {
        message: String,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerIcon {
    /// Filled blue circle, scale 7, no stroke.
    UserLocation,
    Waypoint,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub position: Coordinates,
    pub icon: MarkerIcon,
}

impl Marker {
    pub fn user_location(position: Coordinates) -> Self {
        Self {
            position,
            icon: MarkerIcon::UserLocation,
        }
    }

    pub fn waypoint(position: Coordinates) -> Self {
        Self {
            position,
            icon: MarkerIcon::Waypoint,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MapControls {
    pub zoom: bool,
    pub street_view: bool,
    pub map_type: bool,
    pub fullscreen: bool,
}

/// Everything the map surface draws, rebuilt from state each time it is asked for.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: Option<Coordinates>,
    pub zoom: u8,
    pub controls: MapControls,
    pub markers: Vec<Marker>,
    pub directions: Option<DirectionsResult>,
    pub panel_open: bool,
    pub origin: String,
    pub destination: String,
    pub status: RequestStatus,
}
