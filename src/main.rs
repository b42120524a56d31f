use std::sync::Arc;

use rutes::config::Config;
use rutes::engine::{Engine, Providers};
use rutes::error::Error;
use rutes::server::serve;
use rutes::storage::{FileStorage, RouteStore};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    let storage = FileStorage::new(&config.storage_dir)?;
    let engine = Engine::new(RouteStore::new(Arc::new(storage)), Providers::google(&config));

    serve(engine, config.listen_addr).await
}
