use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::MapAPI;
use crate::entities::{Coordinates, MapView};
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct ReportLocationParams {
    position: Option<Coordinates>,
}

#[axum_macros::debug_handler]
pub async fn load(Extension(api): Extension<DynAPI>) -> Result<Json<MapView>, Error> {
    let view = api.load_map().await?;

    Ok(view.into())
}

pub async fn view(Extension(api): Extension<DynAPI>) -> Result<Json<MapView>, Error> {
    let view = api.map_view().await?;

    Ok(view.into())
}

pub async fn toggle_panel(Extension(api): Extension<DynAPI>) -> Result<Json<MapView>, Error> {
    let view = api.toggle_panel().await?;

    Ok(view.into())
}

pub async fn report_location(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<ReportLocationParams>,
) -> Result<Json<MapView>, Error> {
    let view = api.report_location(params.position).await?;

    Ok(view.into())
}
