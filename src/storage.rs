use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::entities::RouteCollection;
use crate::error::{storage_corrupt_error, storage_error, Error};

pub const ROUTES_KEY: &str = "rutesGuardades";

/// Synchronous string key/value store that survives restarts.
pub trait LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, Error>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), Error>;
}

pub type DynStorage = Arc<dyn LocalStorage + Send + Sync>;

/// One `<key>.json` file per key under `dir`.
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, Error> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;

        Ok(Self { dir })
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, Error> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), Error> {
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");

        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, Error> {
        let items = self.items.lock().map_err(storage_error)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), Error> {
        let mut items = self.items.lock().map_err(storage_error)?;
        items.insert(key.into(), value.into());
        Ok(())
    }
}

/// Saved routes kept as a single JSON array under one storage key.
#[derive(Clone)]
pub struct RouteStore {
    storage: DynStorage,
    key: String,
}

impl RouteStore {
    pub fn new(storage: DynStorage) -> Self {
        Self {
            storage,
            key: ROUTES_KEY.into(),
        }
    }

    /// Never fails: missing, unreadable or malformed data reads as an empty collection.
    #[tracing::instrument(skip(self), fields(key = %self.key))]
    pub fn load_all(&self) -> RouteCollection {
        match self.try_load_all() {
            Ok(routes) => routes,
            Err(err) => {
                tracing::warn!("ignoring stored routes: {}", err);
                RouteCollection::new()
            }
        }
    }

    fn try_load_all(&self) -> Result<RouteCollection, Error> {
        match self.storage.get_item(&self.key)? {
            Some(raw) => serde_json::from_str(&raw).map_err(storage_corrupt_error),
            None => Ok(RouteCollection::new()),
        }
    }

    /// Overwrites the stored collection in full.
    #[tracing::instrument(skip(self, routes), fields(key = %self.key, count = routes.len()))]
    pub fn save_all(&self, routes: &RouteCollection) -> Result<(), Error> {
        let raw = serde_json::to_string(routes)?;
        self.storage.set_item(&self.key, &raw)
    }
}

#[cfg(test)]
fn memory_store() -> (Arc<MemoryStorage>, RouteStore) {
    let storage = Arc::new(MemoryStorage::new());
    let store = RouteStore::new(storage.clone());
    (storage, store)
}

#[cfg(test)]
fn named(name: &str) -> crate::entities::SavedRoute {
    use crate::entities::{Coordinates, SavedRoute};

    SavedRoute::new(
        name,
        "41.38,2.17".into(),
        "Sagrada Família".into(),
        vec!["Arc de Triomf".into(), Coordinates::new(41.39, 2.18).into()],
    )
}

#[test]
fn missing_key_loads_empty() {
    let (_, store) = memory_store();
    assert!(store.load_all().is_empty());
}

#[test]
fn malformed_data_loads_empty() {
    let (storage, store) = memory_store();
    storage.set_item(ROUTES_KEY, "{not json").unwrap();
    assert!(store.load_all().is_empty());

    storage.set_item(ROUTES_KEY, r#"{"name":"X"}"#).unwrap();
    assert!(store.load_all().is_empty());
}

#[test]
fn add_remove_sequences_round_trip() {
    let (_, store) = memory_store();
    let mut routes = RouteCollection::new();

    for step in 0..6 {
        routes = routes.add(named(&format!("R{}", step)));
        if step % 3 == 2 {
            routes = routes.remove_at(0).unwrap();
        }

        store.save_all(&routes).unwrap();
        assert_eq!(store.load_all(), routes);
    }

    assert_eq!(routes.len(), 4);
}

#[test]
fn full_precision_coordinates_round_trip() {
    use crate::entities::{Coordinates, SavedRoute, Stop};

    let (_, store) = memory_store();
    let stops: Vec<Stop> = [
        (-27.897876157010998, -110.608577157477),
        (41.387917345678912, 2.1699187654321098),
        (0.12345678901234568, -179.99999999999997),
    ]
    .iter()
    .map(|&(lat, lng)| Coordinates::new(lat, lng).into())
    .collect();

    let routes = RouteCollection::new().add(SavedRoute::new(
        "precisa",
        "-27.897876157010998,-110.608577157477".into(),
        "B".into(),
        stops,
    ));
    store.save_all(&routes).unwrap();

    assert_eq!(store.load_all(), routes);
}

#[test]
fn load_all_is_idempotent() {
    let (_, store) = memory_store();
    store
        .save_all(&RouteCollection::new().add(named("R1")))
        .unwrap();

    assert_eq!(store.load_all(), store.load_all());
}

#[test]
fn delete_persists_exact_order() {
    let (storage, store) = memory_store();
    let routes = RouteCollection::new()
        .add(named("R1"))
        .add(named("R2"))
        .add(named("R3"));

    store.save_all(&routes.remove_at(1).unwrap()).unwrap();

    let raw = storage.get_item(ROUTES_KEY).unwrap().unwrap();
    let stored: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
    let names: Vec<&str> = stored.iter().filter_map(|r| r["name"].as_str()).collect();
    assert_eq!(names, vec!["R1", "R3"]);
}

#[test]
fn file_storage_survives_reopen() {
    let dir = std::env::temp_dir().join(format!("rutes-{}", uuid::Uuid::new_v4()));

    let store = RouteStore::new(Arc::new(FileStorage::new(&dir).unwrap()));
    let routes = RouteCollection::new().add(named("R1"));
    store.save_all(&routes).unwrap();

    let reopened = RouteStore::new(Arc::new(FileStorage::new(&dir).unwrap()));
    assert_eq!(reopened.load_all(), routes);

    fs::remove_dir_all(&dir).unwrap();
}
