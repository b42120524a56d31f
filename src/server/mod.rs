mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::api::API;
use crate::error::{server_error, Error};
use crate::server::handlers::{map, places, request, routes};

type DynAPI = Arc<dyn API + Send + Sync>;

pub fn router<T: API + Sync + Send + 'static>(api: T) -> Router {
    let api = Arc::new(api) as DynAPI;

    Router::new()
        .route("/map", get(map::view))
        .route("/map/load", post(map::load))
        .route("/map/panel", patch(map::toggle_panel))
        .route("/map/location", put(map::report_location))
        .route("/places/suggestions", get(places::find_suggestions))
        .route("/places/:id", get(places::find))
        .route("/request", get(request::find).delete(request::clear))
        .route("/request/origin", put(request::set_origin))
        .route(
            "/request/origin/current_location",
            patch(request::set_origin_to_current_location),
        )
        .route("/request/destination", put(request::set_destination))
        .route("/request/waypoints", post(request::add_waypoint))
        .route("/request/waypoints/:index", delete(request::remove_waypoint))
        .route("/request/compute", post(request::compute))
        .route("/routes", get(routes::list).post(routes::create))
        .route("/routes/:index", delete(routes::delete))
        .route("/routes/:index/load", post(routes::load))
        .layer(Extension(api))
}

pub async fn serve<T: API + Sync + Send + 'static>(
    api: T,
    addr: SocketAddr,
) -> Result<(), Error> {
    let app = router(api);

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .map_err(server_error)
}
