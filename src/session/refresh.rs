use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::status::{CycleState, SessionStatus, StatusHandle};
use super::TrackerProfile;
use crate::format::TooltipText;
use crate::map::MapView;
use crate::position::{FetchError, PositionClient, PositionSample};
use crate::terminator::Terminator;
use crate::track::TrackStore;

/// One tracking session: the path so far, the first-fix latch and the map.
///
/// Each tick is a full `Idle -> Fetching -> Updating | Erroring -> Idle`
/// pass, either through [`cycle`](Self::cycle) or split into
/// [`begin_cycle`](Self::begin_cycle) and [`finish_cycle`](Self::finish_cycle)
/// so the fetch can run without holding the session.
pub struct RefreshLoop<C, V> {
    profile: TrackerProfile,
    client: Arc<C>,
    view: V,
    track: TrackStore,
    centered: bool,
    status: SessionStatus,
    status_handle: StatusHandle,
}

impl<C: PositionClient + 'static, V: MapView> RefreshLoop<C, V> {
    pub fn new(profile: TrackerProfile, client: C, view: V) -> Self {
        let status = SessionStatus {
            session_id: Uuid::new_v4(),
            state: CycleState::Idle,
            started_at: Utc::now(),
            first_fix_at: None,
            succeeded: 0,
            failed: 0,
            track_points: 0,
            last_sample: None,
        };
        let status_handle = StatusHandle::new(status.clone());

        Self {
            profile,
            client: Arc::new(client),
            view,
            track: TrackStore::new(),
            centered: false,
            status,
            status_handle,
        }
    }

    pub fn status_handle(&self) -> StatusHandle {
        self.status_handle.clone()
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn track(&self) -> &TrackStore {
        &self.track
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Show the loading tooltip until the first sample arrives.
    pub fn start(&mut self) {
        log::info!(
            "Tracking session {} started (label {})",
            self.status.session_id,
            self.profile.tooltip.label
        );
        self.view.set_tooltip(&TooltipText::loading());
        self.view.open_tooltip();
    }

    pub async fn cycle(&mut self) {
        let result = self.begin_cycle().await;
        self.finish_cycle(result);
    }

    /// Enter `Fetching` and hand back the request, detached from the session.
    pub fn begin_cycle(
        &mut self,
    ) -> impl Future<Output = Result<PositionSample, FetchError>> + Send + 'static {
        self.set_state(CycleState::Fetching);
        let client = Arc::clone(&self.client);
        async move { client.fetch_current_position().await }
    }

    /// Apply the outcome of the request started by [`begin_cycle`](Self::begin_cycle).
    pub fn finish_cycle(&mut self, result: Result<PositionSample, FetchError>) {
        match result {
            Ok(sample) => {
                self.set_state(CycleState::Updating);
                self.apply(sample);
            }
            Err(e) => {
                self.set_state(CycleState::Erroring);
                log::debug!("{}", e);
                self.status.failed += 1;
                self.view.set_tooltip(&TooltipText::fetch_failed());
            }
        }

        self.set_state(CycleState::Idle);
    }

    pub fn close_startup_tooltip(&mut self) {
        self.view.close_tooltip();
    }

    pub fn refresh_terminator(&mut self, now: DateTime<Utc>) {
        let terminator = Terminator::at(now, self.profile.terminator_resolution_deg);
        self.view.redraw_terminator(&terminator);
    }

    /// Force the loop back to `Idle`, e.g. after an in-flight fetch was abandoned.
    pub fn reset_state(&mut self) {
        self.set_state(CycleState::Idle);
    }

    fn apply(&mut self, sample: PositionSample) {
        let position = sample.position();

        if !self.centered {
            log::info!(
                "First fix for {} at {:.3}, {:.3}",
                sample.id,
                position.lat,
                position.lng
            );
            self.view.set_view(position, self.profile.zoom);
            self.centered = true;
            self.status.first_fix_at = Some(Utc::now());
        }

        self.track.append(position);

        self.view.move_marker(position);
        self.view.move_footprint(position);
        self.view
            .set_footprint_radius(self.profile.footprint.radius(sample.footprint));
        match self.profile.tooltip.render(&sample).text() {
            Ok(text) => self.view.set_tooltip(&text),
            Err(e) => log::warn!("Failed to render tooltip for {}: {}", sample.id, e),
        }
        if let Some(path) = self.track.drawable() {
            self.view.draw_path(path);
        }

        self.status.succeeded += 1;
        self.status.track_points = self.track.len();
        self.status.last_sample = Some(sample);
    }

    fn set_state(&mut self, state: CycleState) {
        self.status.state = state;
        self.status_handle.publish(&self.status);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;
    use crate::format::{DisplayField, TooltipFormat, VisibilityIcons};
    use crate::map::{FootprintRadius, FootprintScale, RadiusUnit};
    use crate::position::FetchError;
    use crate::track::LatLng;

    /// Replays queued results, failing once the queue is empty.
    struct StubClient {
        results: Mutex<VecDeque<Result<PositionSample, FetchError>>>,
    }

    impl StubClient {
        fn new(results: Vec<Result<PositionSample, FetchError>>) -> Self {
            Self {
                results: Mutex::new(results.into()),
            }
        }
    }

    impl PositionClient for StubClient {
        async fn fetch_current_position(&self) -> Result<PositionSample, FetchError> {
            self.results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(FetchError::new("no more samples")))
        }
    }

    #[derive(Default)]
    struct RecordingView {
        views: Vec<(LatLng, u8)>,
        marker: Option<LatLng>,
        footprint: Option<LatLng>,
        radius: Option<FootprintRadius>,
        tooltip: Option<TooltipText>,
        tooltip_open: bool,
        paths: Vec<Vec<LatLng>>,
        terminators: usize,
    }

    impl MapView for RecordingView {
        fn set_view(&mut self, center: LatLng, zoom: u8) {
            self.views.push((center, zoom));
        }
        fn move_marker(&mut self, position: LatLng) {
            self.marker = Some(position);
        }
        fn move_footprint(&mut self, position: LatLng) {
            self.footprint = Some(position);
        }
        fn set_footprint_radius(&mut self, radius: FootprintRadius) {
            self.radius = Some(radius);
        }
        fn set_tooltip(&mut self, content: &TooltipText) {
            self.tooltip = Some(content.clone());
        }
        fn open_tooltip(&mut self) {
            self.tooltip_open = true;
        }
        fn close_tooltip(&mut self) {
            self.tooltip_open = false;
        }
        fn draw_path(&mut self, path: &[LatLng]) {
            self.paths.push(path.to_vec());
        }
        fn redraw_terminator(&mut self, _terminator: &Terminator) {
            self.terminators += 1;
        }
    }

    fn profile() -> TrackerProfile {
        TrackerProfile {
            zoom: 4,
            footprint: FootprintScale::GroundRadius,
            tooltip: TooltipFormat {
                label: "ISS".into(),
                fields: DisplayField::ALL.to_vec(),
                icons: VisibilityIcons::default(),
            },
            terminator_resolution_deg: 2.0,
        }
    }

    fn iss_sample(latitude: f64, longitude: f64) -> PositionSample {
        PositionSample {
            id: "25544".into(),
            latitude,
            longitude,
            footprint: 4500.0,
            altitude: 400.5,
            velocity: Some(27500.0),
            timestamp: 1609459200,
            visibility: "daylight".into(),
        }
    }

    fn session(
        results: Vec<Result<PositionSample, FetchError>>,
    ) -> RefreshLoop<StubClient, RecordingView> {
        RefreshLoop::new(profile(), StubClient::new(results), RecordingView::default())
    }

    #[tokio::test]
    async fn test_successful_cycle_updates_map() {
        let mut session = session(vec![Ok(iss_sample(10.0, 20.0))]);

        session.cycle().await;

        assert_eq!(session.track().as_slice(), &[LatLng::new(10.0, 20.0)]);

        let view = session.view();
        assert_eq!(view.views, vec![(LatLng::new(10.0, 20.0), 4)]);
        assert_eq!(view.marker, Some(LatLng::new(10.0, 20.0)));
        assert_eq!(view.footprint, Some(LatLng::new(10.0, 20.0)));
        assert_eq!(
            view.radius,
            Some(FootprintRadius {
                unit: RadiusUnit::Meters,
                value: 2_250_000.0
            })
        );
        assert!(view.paths.is_empty());

        let html = &view.tooltip.as_ref().unwrap().html;
        for expected in ["25544", "10.000°", "20.000°", "400.500 km"] {
            assert!(html.contains(expected), "missing {expected} in {html}");
        }

        let status = session.status();
        assert_eq!(status.state, CycleState::Idle);
        assert_eq!(status.succeeded, 1);
        assert_eq!(status.failed, 0);
        assert_eq!(status.track_points, 1);
        assert!(status.first_fix_at.is_some());
    }

    #[tokio::test]
    async fn test_failed_cycle_shows_fixed_message() {
        let mut session = session(vec![
            Ok(iss_sample(10.0, 20.0)),
            Err(FetchError::new("429 Too Many Requests")),
        ]);

        session.cycle().await;
        let track_before = session.track().as_slice().to_vec();
        let marker_before = session.view().marker;

        session.cycle().await;

        assert_eq!(session.track().as_slice(), track_before.as_slice());
        assert_eq!(session.view().marker, marker_before);
        assert_eq!(
            session.view().tooltip.as_ref(),
            Some(&TooltipText::fetch_failed())
        );
        assert_eq!(session.status().failed, 1);
        assert_eq!(session.status().state, CycleState::Idle);
    }

    #[tokio::test]
    async fn test_failure_before_first_fix_leaves_track_empty() {
        let mut session = session(vec![Err(FetchError::new("connection refused"))]);

        session.cycle().await;

        assert!(session.track().is_empty());
        assert!(session.view().views.is_empty());
        assert_eq!(
            session.view().tooltip.as_ref(),
            Some(&TooltipText::fetch_failed())
        );
    }

    #[tokio::test]
    async fn test_recenters_only_on_first_success() {
        let mut session = session(vec![
            Ok(iss_sample(10.0, 20.0)),
            Ok(iss_sample(10.5, 21.0)),
        ]);

        session.cycle().await;
        session.cycle().await;

        assert_eq!(session.view().views.len(), 1);
        assert_eq!(session.view().views[0].0, LatLng::new(10.0, 20.0));
        assert_eq!(session.view().marker, Some(LatLng::new(10.5, 21.0)));
    }

    #[tokio::test]
    async fn test_latch_survives_failures() {
        let mut session = session(vec![
            Ok(iss_sample(1.0, 1.0)),
            Err(FetchError::new("timeout")),
            Ok(iss_sample(2.0, 2.0)),
        ]);

        for _ in 0..3 {
            session.cycle().await;
        }

        assert_eq!(session.view().views.len(), 1);
        assert_eq!(session.track().len(), 2);
    }

    #[tokio::test]
    async fn test_path_drawn_from_second_point() {
        let mut session = session(vec![
            Ok(iss_sample(1.0, 1.0)),
            Ok(iss_sample(2.0, 2.0)),
            Ok(iss_sample(2.0, 2.0)),
        ]);

        for _ in 0..3 {
            session.cycle().await;
        }

        let paths = &session.view().paths;
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0], vec![LatLng::new(1.0, 1.0), LatLng::new(2.0, 2.0)]);
        assert_eq!(paths[1].len(), 3);
    }

    #[tokio::test]
    async fn test_status_handle_follows_session() {
        let mut session = session(vec![Ok(iss_sample(10.0, 20.0))]);
        let handle = session.status_handle();

        session.cycle().await;

        let status = handle.snapshot();
        assert_eq!(status.session_id, session.status().session_id);
        assert_eq!(status.succeeded, 1);
        assert_eq!(
            status.last_sample.map(|s| s.position()),
            Some(LatLng::new(10.0, 20.0))
        );
    }

    #[test]
    fn test_start_opens_loading_tooltip() {
        let mut session = session(vec![]);
        session.start();
        assert_eq!(session.view().tooltip, Some(TooltipText::loading()));
        assert!(session.view().tooltip_open);

        session.close_startup_tooltip();
        assert!(!session.view().tooltip_open);
    }

    #[test]
    fn test_refresh_terminator_redraws() {
        let mut session = session(vec![]);
        session.refresh_terminator(Utc::now());
        session.refresh_terminator(Utc::now());
        assert_eq!(session.view().terminators, 2);
    }
}
