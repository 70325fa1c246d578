use std::time::Duration;

use chrono::Utc;
use tokio::sync::oneshot;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{interval, interval_at, sleep, Instant, MissedTickBehavior};

use super::refresh::RefreshLoop;
use crate::map::MapView;
use crate::position::{FetchError, PositionClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timers {
    pub poll_interval: Duration,
    pub terminator_interval: Duration,
    pub tooltip_close_after: Duration,
}

impl Default for Timers {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            terminator_interval: Duration::from_secs(10),
            tooltip_close_after: Duration::from_secs(2),
        }
    }
}

#[derive(Debug)]
pub struct RunnerHandle {
    stop_tx: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

impl RunnerHandle {
    /// Stop the timers, abandoning any fetch still in flight.
    pub async fn stop(self) {
        let _ = self.stop_tx.send(());
        let _ = self.join.await;
    }
}

/// Drive `session` on its three timers until stopped.
pub fn spawn<C, V>(session: RefreshLoop<C, V>, timers: Timers) -> RunnerHandle
where
    C: PositionClient + 'static,
    V: MapView + 'static,
{
    let (stop_tx, stop_rx) = oneshot::channel();
    let join = tokio::spawn(run_refresh_loop(session, timers, stop_rx));
    RunnerHandle { stop_tx, join }
}

// The timer callbacks share this task and never interleave. Fetches run in
// their own task so a slow request does not hold up the other timers. The
// join set holds at most one fetch, and a new one is only issued once the
// previous result has been applied, so updates always land in request order.
async fn run_refresh_loop<C, V>(
    mut session: RefreshLoop<C, V>,
    timers: Timers,
    mut stop_rx: oneshot::Receiver<()>,
) where
    C: PositionClient + 'static,
    V: MapView,
{
    session.start();
    session.refresh_terminator(Utc::now());

    let mut poll = interval(timers.poll_interval);
    poll.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut terminator = interval_at(
        Instant::now() + timers.terminator_interval,
        timers.terminator_interval,
    );
    terminator.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let tooltip_close = sleep(timers.tooltip_close_after);
    tokio::pin!(tooltip_close);
    let mut tooltip_pending = true;

    let mut fetches = JoinSet::new();

    loop {
        tokio::select! {
            _ = &mut stop_rx => break,
            _ = poll.tick(), if fetches.is_empty() => {
                fetches.spawn(session.begin_cycle());
            }
            Some(joined) = fetches.join_next() => {
                let result = joined.unwrap_or_else(|e| {
                    log::error!("Position fetch task failed: {}", e);
                    Err(FetchError::new(format!("fetch task failed: {}", e)))
                });
                session.finish_cycle(result);
            }
            _ = terminator.tick() => session.refresh_terminator(Utc::now()),
            _ = &mut tooltip_close, if tooltip_pending => {
                tooltip_pending = false;
                session.close_startup_tooltip();
            }
        }
    }

    if !fetches.is_empty() {
        fetches.abort_all();
        session.reset_state();
    }

    log::info!(
        "Tracking session {} stopped after {} fixes",
        session.status().session_id,
        session.status().succeeded
    );
}
