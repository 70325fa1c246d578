use std::sync::Arc;

use crate::config::Config;
use crate::map::SharedScene;
use crate::session::StatusHandle;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub scene: SharedScene,
    pub status: StatusHandle,
}
