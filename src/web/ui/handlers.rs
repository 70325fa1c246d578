use axum::{extract::State, response::IntoResponse};

use crate::config::MAX_ZOOM;
use crate::web::state::AppState;

use super::templates::DashboardTemplate;

pub async fn dashboard(State(state): State<AppState>) -> impl IntoResponse {
    DashboardTemplate {
        label: state.config.tracker.label.clone(),
        poll_interval_ms: state.config.tracker.poll_interval.as_millis() as u64,
        max_zoom: MAX_ZOOM,
    }
}
