//! Interval pollers owned by the mounted view.
//!
//! A poller sends [`TuiEvent::Poll`] tagged with its view and nothing else;
//! the loop decides what to fetch. Dropping the poller aborts its task, so
//! unmounting a view stops its timer.

use crate::events::TuiEvent;
use crate::nav::View;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

pub const JOBS_POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const JOB_DETAIL_POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const DASHBOARD_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Polling period for `view`, if it polls at all.
pub fn interval_for(view: View) -> Option<Duration> {
    match view {
        View::Jobs => Some(JOBS_POLL_INTERVAL),
        View::JobDetail => Some(JOB_DETAIL_POLL_INTERVAL),
        View::Dashboard => Some(DASHBOARD_POLL_INTERVAL),
        _ => None,
    }
}

#[derive(Debug)]
pub struct Poller {
    view: View,
    handle: JoinHandle<()>,
}

impl Poller {
    /// First tick fires one full `period` after the call.
    pub fn spawn(view: View, period: Duration, events: mpsc::Sender<TuiEvent>) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if events.send(TuiEvent::Poll(view)).await.is_err() {
                    break;
                }
            }
        });
        tracing::debug!(view = view.title(), period_secs = period.as_secs(), "poller started");
        Self { view, handle }
    }

    pub fn for_view(view: View, events: &mpsc::Sender<TuiEvent>) -> Option<Self> {
        interval_for(view).map(|period| Self::spawn(view, period, events.clone()))
    }

    pub fn view(&self) -> View {
        self.view
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.handle.abort();
        tracing::debug!(view = self.view.title(), "poller stopped");
    }
}
