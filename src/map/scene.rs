use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{FootprintRadius, MapView, RadiusUnit};
use crate::format::TooltipText;
use crate::terminator::Terminator;
use crate::track::LatLng;

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ViewState {
    pub center: LatLng,
    pub zoom: u8,
    /// How many times the viewport was moved after construction.
    pub recenters: u32,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct FootprintState {
    pub center: LatLng,
    pub radius: FootprintRadius,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct TooltipState {
    pub content: TooltipText,
    pub open: bool,
}

/// Everything a browser needs to draw the map.
///
/// `revision` increases on every change so pollers can skip redraws. The path
/// and terminator polygon are not serialized with the scene; browsers fetch
/// them from their own endpoints when `path_len` or `terminator_at` change.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct MapScene {
    pub revision: u64,
    pub view: ViewState,
    pub marker: LatLng,
    pub footprint: FootprintState,
    pub tooltip: TooltipState,
    pub path_len: usize,
    pub terminator_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub path: Vec<LatLng>,
    #[serde(skip)]
    pub terminator: Option<Terminator>,
}

impl MapScene {
    pub fn new(zoom: u8) -> Self {
        let origin = LatLng::new(0.0, 0.0);
        Self {
            revision: 0,
            view: ViewState {
                center: origin,
                zoom,
                recenters: 0,
            },
            marker: origin,
            footprint: FootprintState {
                center: origin,
                radius: FootprintRadius {
                    unit: RadiusUnit::Meters,
                    value: 0.0,
                },
            },
            tooltip: TooltipState {
                content: TooltipText::loading(),
                open: false,
            },
            path_len: 0,
            terminator_at: None,
            path: Vec::new(),
            terminator: None,
        }
    }
}

/// A [`MapScene`] shared between the refresh loop and the web server.
#[derive(Debug, Clone)]
pub struct SharedScene {
    inner: Arc<Mutex<MapScene>>,
}

impl SharedScene {
    pub fn new(zoom: u8) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MapScene::new(zoom))),
        }
    }

    pub fn snapshot(&self) -> MapScene {
        self.lock().clone()
    }

    /// Path points from index `since` onward, plus the total length.
    pub fn path_since(&self, since: usize) -> (usize, Vec<LatLng>) {
        let scene = self.lock();
        let tail = scene.path.get(since..).unwrap_or_default().to_vec();
        (scene.path.len(), tail)
    }

    pub fn terminator(&self) -> Option<Terminator> {
        self.lock().terminator.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MapScene> {
        // Updates are single assignments, so a poisoned scene is still consistent.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self, apply: impl FnOnce(&mut MapScene)) {
        let mut scene = self.lock();
        apply(&mut scene);
        scene.revision += 1;
    }
}

impl MapView for SharedScene {
    fn set_view(&mut self, center: LatLng, zoom: u8) {
        self.update(|s| {
            s.view.center = center;
            s.view.zoom = zoom;
            s.view.recenters += 1;
        });
    }

    fn move_marker(&mut self, position: LatLng) {
        self.update(|s| s.marker = position);
    }

    fn move_footprint(&mut self, position: LatLng) {
        self.update(|s| s.footprint.center = position);
    }

    fn set_footprint_radius(&mut self, radius: FootprintRadius) {
        self.update(|s| s.footprint.radius = radius);
    }

    fn set_tooltip(&mut self, content: &TooltipText) {
        self.update(|s| s.tooltip.content = content.clone());
    }

    fn open_tooltip(&mut self) {
        self.update(|s| s.tooltip.open = true);
    }

    fn close_tooltip(&mut self) {
        self.update(|s| s.tooltip.open = false);
    }

    fn draw_path(&mut self, path: &[LatLng]) {
        self.update(|s| {
            s.path.clear();
            s.path.extend_from_slice(path);
            s.path_len = s.path.len();
        });
    }

    fn redraw_terminator(&mut self, terminator: &Terminator) {
        self.update(|s| {
            s.terminator_at = Some(terminator.computed_at);
            s.terminator = Some(terminator.clone());
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_scene_is_at_origin() {
        let scene = SharedScene::new(4).snapshot();
        assert_eq!(scene.revision, 0);
        assert_eq!(scene.view.zoom, 4);
        assert_eq!(scene.view.recenters, 0);
        assert_eq!(scene.marker, LatLng::new(0.0, 0.0));
        assert_eq!(scene.tooltip.content, TooltipText::loading());
        assert!(scene.path.is_empty());
    }

    #[test]
    fn test_updates_are_visible_through_clones() {
        let scene = SharedScene::new(4);
        let mut writer = scene.clone();

        writer.set_view(LatLng::new(10.0, 20.0), 4);
        writer.move_marker(LatLng::new(10.0, 20.0));
        writer.open_tooltip();

        let snapshot = scene.snapshot();
        assert_eq!(snapshot.revision, 3);
        assert_eq!(snapshot.view.recenters, 1);
        assert_eq!(snapshot.view.center, LatLng::new(10.0, 20.0));
        assert_eq!(snapshot.marker, LatLng::new(10.0, 20.0));
        assert!(snapshot.tooltip.open);
    }

    #[test]
    fn test_draw_path_replaces_previous() {
        let mut scene = SharedScene::new(4);
        let a = LatLng::new(1.0, 1.0);
        let b = LatLng::new(2.0, 2.0);
        let c = LatLng::new(3.0, 3.0);

        scene.draw_path(&[a, b]);
        scene.draw_path(&[a, b, c]);

        assert_eq!(scene.snapshot().path, vec![a, b, c]);
        assert_eq!(scene.path_since(1), (3, vec![b, c]));
        assert_eq!(scene.path_since(3), (3, vec![]));
        assert_eq!(scene.path_since(10), (3, vec![]));
    }

    #[test]
    fn test_scene_serializes_for_browser() {
        let mut scene = SharedScene::new(4);
        scene.set_tooltip(&TooltipText::fetch_failed());
        let json = serde_json::to_value(scene.snapshot()).unwrap();
        assert_eq!(json["view"]["zoom"], 4);
        assert_eq!(json["footprint"]["radius"]["unit"], "meters");
        assert!(json["tooltip"]["content"]["html"]
            .as_str()
            .unwrap()
            .contains("Try again later."));
        assert_eq!(json["path_len"], 0);
        assert!(json["terminator_at"].is_null());
    }

    #[test]
    fn test_scene_payload_omits_path_and_polygon() {
        let mut scene = SharedScene::new(4);
        scene.draw_path(&[LatLng::new(1.0, 1.0), LatLng::new(2.0, 2.0)]);
        let terminator = Terminator::at(Utc::now(), 10.0);
        scene.redraw_terminator(&terminator);

        let json = serde_json::to_value(scene.snapshot()).unwrap();
        assert!(json.get("path").is_none());
        assert!(json.get("terminator").is_none());
        assert_eq!(json["path_len"], 2);
        assert_eq!(
            json["terminator_at"],
            serde_json::to_value(terminator.computed_at).unwrap()
        );
        assert_eq!(scene.terminator(), Some(terminator));
    }
}
