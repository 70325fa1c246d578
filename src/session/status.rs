use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::position::PositionSample;

/// Where the refresh loop is within the current tick.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CycleState {
    Idle,
    Fetching,
    Updating,
    Erroring,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct SessionStatus {
    pub session_id: Uuid,
    pub state: CycleState,
    pub started_at: DateTime<Utc>,
    pub first_fix_at: Option<DateTime<Utc>>,
    pub succeeded: u64,
    pub failed: u64,
    pub track_points: usize,
    pub last_sample: Option<PositionSample>,
}

/// Read side of a session's status, shared with the web server.
#[derive(Debug, Clone)]
pub struct StatusHandle {
    inner: Arc<Mutex<SessionStatus>>,
}

impl StatusHandle {
    pub(super) fn new(status: SessionStatus) -> Self {
        Self {
            inner: Arc::new(Mutex::new(status)),
        }
    }

    pub fn snapshot(&self) -> SessionStatus {
        self.lock().clone()
    }

    pub(super) fn publish(&self, status: &SessionStatus) {
        *self.lock() = status.clone();
    }

    fn lock(&self) -> MutexGuard<'_, SessionStatus> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
