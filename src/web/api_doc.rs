use utoipa::OpenApi;

use super::api::map::TrackResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::map::scene,
        super::api::map::track,
        super::api::map::terminator,
        super::api::status::status,
    ),
    components(
        schemas(
            TrackResponse,
            crate::map::MapScene,
            crate::map::ViewState,
            crate::map::FootprintState,
            crate::map::TooltipState,
            crate::map::FootprintRadius,
            crate::map::RadiusUnit,
            crate::format::TooltipText,
            crate::terminator::Terminator,
            crate::track::LatLng,
            crate::position::PositionSample,
            crate::session::SessionStatus,
            crate::session::CycleState,
        )
    ),
    info(
        title = "ISS Tracker API",
        description = "Live position, track and map overlays of the tracked satellite",
        version = "0.1.0"
    ),
    tags(
        (name = "map", description = "Map scene"),
        (name = "session", description = "Tracking session")
    )
)]
pub struct ApiDoc;
