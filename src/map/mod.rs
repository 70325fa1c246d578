//! The map widget the refresh loop draws on.
//!
//! [`MapView`] is the seam to whatever actually renders the map. Every call
//! is fire-and-forget. [`SharedScene`] keeps the scene in memory for the web
//! dashboard; [`ConsoleView`] logs it.

mod console;
mod footprint;
mod scene;

pub use console::ConsoleView;
pub use footprint::{FootprintRadius, FootprintScale, RadiusUnit};
pub use scene::{FootprintState, MapScene, SharedScene, TooltipState, ViewState};

use crate::format::TooltipText;
use crate::terminator::Terminator;
use crate::track::LatLng;

pub trait MapView: Send {
    /// Recenter and zoom the viewport.
    fn set_view(&mut self, center: LatLng, zoom: u8);
    fn move_marker(&mut self, position: LatLng);
    fn move_footprint(&mut self, position: LatLng);
    fn set_footprint_radius(&mut self, radius: FootprintRadius);
    fn set_tooltip(&mut self, content: &TooltipText);
    fn open_tooltip(&mut self);
    fn close_tooltip(&mut self);
    /// Replace the trailing path with `path`, oldest point first.
    fn draw_path(&mut self, path: &[LatLng]);
    fn redraw_terminator(&mut self, terminator: &Terminator);
}
