use super::{FootprintRadius, MapView};
use crate::format::TooltipText;
use crate::terminator::Terminator;
use crate::track::LatLng;

/// Logs map updates instead of drawing them.
///
/// Used by `watch` for headless tracking; only the tooltip is logged at
/// `info`, since it already carries the position.
#[derive(Debug, Default)]
pub struct ConsoleView {
    last_tooltip: Option<String>,
}

impl ConsoleView {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MapView for ConsoleView {
    fn set_view(&mut self, center: LatLng, zoom: u8) {
        log::info!(
            "Centering map on {:.3}, {:.3} (zoom {})",
            center.lat,
            center.lng,
            zoom
        );
    }

    fn move_marker(&mut self, position: LatLng) {
        log::debug!("Marker at {:.3}, {:.3}", position.lat, position.lng);
    }

    fn move_footprint(&mut self, _position: LatLng) {}

    fn set_footprint_radius(&mut self, radius: FootprintRadius) {
        log::debug!("Footprint radius {:.1} {}", radius.value, radius.unit);
    }

    fn set_tooltip(&mut self, content: &TooltipText) {
        if self.last_tooltip.as_deref() != Some(content.plain.as_str()) {
            log::info!("{}", content.plain);
            self.last_tooltip = Some(content.plain.clone());
        }
    }

    fn open_tooltip(&mut self) {}

    fn close_tooltip(&mut self) {}

    fn draw_path(&mut self, path: &[LatLng]) {
        log::debug!("Track has {} points", path.len());
    }

    fn redraw_terminator(&mut self, terminator: &Terminator) {
        log::debug!(
            "Subsolar point at {:.2}, {:.2}",
            terminator.subsolar.lat,
            terminator.subsolar.lng
        );
    }
}
