mod refresh;
mod runner;
mod status;

pub use refresh::RefreshLoop;
pub use runner::{spawn, RunnerHandle, Timers};
pub use status::{CycleState, SessionStatus, StatusHandle};

use crate::format::TooltipFormat;
use crate::map::FootprintScale;

/// What differs between tracked objects: zoom, footprint rendering and
/// tooltip content. Fixed for the lifetime of a session.
#[derive(Debug, Clone)]
pub struct TrackerProfile {
    pub zoom: u8,
    pub footprint: FootprintScale,
    pub tooltip: TooltipFormat,
    pub terminator_resolution_deg: f64,
}
