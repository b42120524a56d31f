use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::entities::Coordinates;
use crate::error::{invalid_input_error, Error};

#[derive(Clone, Debug)]
pub struct Config {
    pub google_maps_api_base: String,
    pub google_maps_api_key: Option<String>,
    pub storage_dir: PathBuf,
    pub listen_addr: SocketAddr,
    pub fixed_location: Option<Coordinates>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            google_maps_api_base: "maps.googleapis.com".into(),
            google_maps_api_key: None,
            storage_dir: PathBuf::from(".rutes"),
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            fixed_location: None,
        }
    }
}

impl Config {
    /// Reads `.env` if present, then the process environment. A missing API key is not an
    /// error here; the map provider reports it when the map loads.
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        let defaults = Self::default();

        let listen_addr = match optional_var("RUTES_LISTEN_ADDR")? {
            Some(addr) => addr.parse().map_err(|_| invalid_input_error())?,
            None => defaults.listen_addr,
        };

        let fixed_location = match optional_var("RUTES_FIXED_LOCATION")? {
            Some(location) => Some(location.parse()?),
            None => None,
        };

        Ok(Self {
            google_maps_api_base: optional_var("GOOGLE_MAPS_API_BASE")?
                .unwrap_or(defaults.google_maps_api_base),
            google_maps_api_key: optional_var("GOOGLE_MAPS_API_KEY")?,
            storage_dir: optional_var("RUTES_STORAGE_DIR")?
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_dir),
            listen_addr,
            fixed_location,
        })
    }
}

fn optional_var(name: &str) -> Result<Option<String>, Error> {
    match env::var(name) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(err.into()),
    }
}
