use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{invalid_input_error, Error};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub lat: f64,
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Formats as the `"lat,lng"` pair the directions provider accepts as an origin.
impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl From<Coordinates> for String {
    fn from(coordinates: Coordinates) -> Self {
        coordinates.to_string()
    }
}

impl FromStr for Coordinates {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s.split_once(',').ok_or_else(invalid_input_error)?;
        let lat: f64 = lat.trim().parse().map_err(|_| invalid_input_error())?;
        let lng: f64 = lng.trim().parse().map_err(|_| invalid_input_error())?;

        if !lat.is_finite() || !lng.is_finite() {
            return Err(invalid_input_error());
        }

        Ok(Self { lat, lng })
    }
}

// stored stops may carry their coordinates as strings
fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    let value: f64 = match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n,
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom)?,
    };

    if !value.is_finite() {
        return Err(serde::de::Error::custom("coordinate must be finite"));
    }

    Ok(value)
}

#[test]
fn coordinates_parse_lat_lng_pair() {
    let coordinates: Coordinates = "41.38, 2.17".parse().unwrap();
    assert_eq!(coordinates, Coordinates::new(41.38, 2.17));
    assert_eq!(coordinates.to_string(), "41.38,2.17");

    assert!("Plaça Catalunya".parse::<Coordinates>().is_err());
    assert!("41.38".parse::<Coordinates>().is_err());
}

#[test]
fn coordinates_coerce_numeric_strings() {
    let coordinates: Coordinates = serde_json::from_str(r#"{"lat":"1.5","lng":2}"#).unwrap();
    assert_eq!(coordinates, Coordinates::new(1.5, 2.0));

    assert!(serde_json::from_str::<Coordinates>(r#"{"lat":"north","lng":2}"#).is_err());
}

#[test]
fn coordinates_reject_non_finite_strings() {
    for raw in [
        r#"{"lat":"NaN","lng":"2"}"#,
        r#"{"lat":"1","lng":"inf"}"#,
        r#"{"lat":"-infinity","lng":2}"#,
    ] {
        assert!(serde_json::from_str::<Coordinates>(raw).is_err(), "{}", raw);
    }

    use crate::entities::Stop;
    assert!(serde_json::from_str::<Stop>(r#"{"lat":"NaN","lng":"2"}"#).is_err());
}
