use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::map::MapScene;
use crate::terminator::Terminator;
use crate::track::LatLng;
use crate::web::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TrackQuery {
    /// Index of the first point to return; earlier points are skipped.
    #[serde(default)]
    pub since: Option<usize>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TrackResponse {
    /// Length of the whole track.
    pub total: usize,
    pub points: Vec<LatLng>,
}

#[utoipa::path(
    get,
    path = "/api/map",
    responses(
        (status = 200, description = "Current map scene", body = MapScene)
    ),
    tag = "map"
)]
pub async fn scene(State(state): State<AppState>) -> Json<MapScene> {
    Json(state.scene.snapshot())
}

#[utoipa::path(
    get,
    path = "/api/map/track",
    params(TrackQuery),
    responses(
        (status = 200, description = "Drawn track, oldest point first", body = TrackResponse)
    ),
    tag = "map"
)]
pub async fn track(
    State(state): State<AppState>,
    Query(query): Query<TrackQuery>,
) -> Json<TrackResponse> {
    let (total, points) = state.scene.path_since(query.since.unwrap_or(0));
    Json(TrackResponse { total, points })
}

#[utoipa::path(
    get,
    path = "/api/map/terminator",
    responses(
        (status = 200, description = "Latest day/night terminator", body = Option<Terminator>)
    ),
    tag = "map"
)]
pub async fn terminator(State(state): State<AppState>) -> Json<Option<Terminator>> {
    Json(state.scene.terminator())
}
