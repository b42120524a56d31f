use axum::extract::{Extension, Json, Path};
use serde::{Deserialize, Serialize};

use crate::api::RouteRequestAPI;
use crate::entities::{RouteRequest, Stop};
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct SetValueParams {
    value: String,
}

#[derive(Serialize, Deserialize)]
pub struct AddWaypointParams {
    stop: Stop,
}

pub async fn find(Extension(api): Extension<DynAPI>) -> Result<Json<RouteRequest>, Error> {
    let request = api.route_request().await?;

    Ok(request.into())
}

pub async fn set_origin(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<SetValueParams>,
) -> Result<Json<RouteRequest>, Error> {
    let request = api.set_origin(params.value).await?;

    Ok(request.into())
}

pub async fn set_origin_to_current_location(
    Extension(api): Extension<DynAPI>,
) -> Result<Json<RouteRequest>, Error> {
    let request = api.set_origin_to_current_location().await?;

    Ok(request.into())
}

pub async fn set_destination(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<SetValueParams>,
) -> Result<Json<RouteRequest>, Error> {
    let request = api.set_destination(params.value).await?;

    Ok(request.into())
}

pub async fn add_waypoint(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<AddWaypointParams>,
) -> Result<Json<RouteRequest>, Error> {
    let request = api.add_waypoint(params.stop).await?;

    Ok(request.into())
}

pub async fn remove_waypoint(
    Extension(api): Extension<DynAPI>,
    Path(index): Path<usize>,
) -> Result<Json<RouteRequest>, Error> {
    let request = api.remove_waypoint(index).await?;

    Ok(request.into())
}

pub async fn compute(Extension(api): Extension<DynAPI>) -> Result<Json<RouteRequest>, Error> {
    let request = api.compute_route().await?;

    Ok(request.into())
}

pub async fn clear(Extension(api): Extension<DynAPI>) -> Result<Json<RouteRequest>, Error> {
    let request = api.clear_route().await?;

    Ok(request.into())
}
