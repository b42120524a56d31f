use axum::extract::{Extension, Json, Path};
use serde::{Deserialize, Serialize};

use crate::api::SavedRouteAPI;
use crate::entities::{RouteCollection, RouteRequest};
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct CreateParams {
    #[serde(default)]
    name: String,
}

pub async fn list(Extension(api): Extension<DynAPI>) -> Result<Json<RouteCollection>, Error> {
    let routes = api.list_routes().await?;

    Ok(routes.into())
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<CreateParams>,
) -> Result<Json<RouteCollection>, Error> {
    let routes = api.save_route(params.name).await?;

    Ok(routes.into())
}

pub async fn load(
    Extension(api): Extension<DynAPI>,
    Path(index): Path<usize>,
) -> Result<Json<RouteRequest>, Error> {
    let request = api.load_route(index).await?;

    Ok(request.into())
}

pub async fn delete(
    Extension(api): Extension<DynAPI>,
    Path(index): Path<usize>,
) -> Result<Json<RouteCollection>, Error> {
    let routes = api.delete_route(index).await?;

    Ok(routes.into())
}
