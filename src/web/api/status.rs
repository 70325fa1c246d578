use axum::{extract::State, Json};

use crate::session::SessionStatus;
use crate::web::state::AppState;

#[utoipa::path(
    get,
    path = "/api/status",
    responses(
        (status = 200, description = "Tracking session status", body = SessionStatus)
    ),
    tag = "session"
)]
pub async fn status(State(state): State<AppState>) -> Json<SessionStatus> {
    Json(state.status.snapshot())
}
