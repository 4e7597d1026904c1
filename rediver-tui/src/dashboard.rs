//! Dashboard: platform stats plus the most recent agents and jobs.
//!
//! The three sources are fetched together. A failing source is logged and
//! shown as zero or empty; the dashboard itself never fails.

use crate::events::TuiEvent;
use crate::fetch::{FetchMode, FetchTicket, Generation};
use rediver_client::ApiClient;
use rediver_core::{Agent, Job, ListAgentsParams, ListJobsParams, PlatformStats};
use tokio::sync::mpsc;

pub const RECENT_LIMIT: u32 = 5;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSnapshot {
    pub stats: PlatformStats,
    pub recent_agents: Vec<Agent>,
    pub recent_jobs: Vec<Job>,
}

pub async fn load_snapshot(api: &ApiClient) -> DashboardSnapshot {
    let agents_params = ListAgentsParams {
        page: Some(1),
        per_page: Some(RECENT_LIMIT),
        ..ListAgentsParams::default()
    };
    let jobs_params = ListJobsParams {
        page: Some(1),
        per_page: Some(RECENT_LIMIT),
        ..ListJobsParams::default()
    };

    let (stats, agents, jobs) = tokio::join!(
        api.platform_stats(),
        api.list_agents(&agents_params),
        api.list_jobs(&jobs_params),
    );

    let recent_agents = agents
        .map(|page| page.data)
        .unwrap_or_else(|err| {
            tracing::warn!(error = %err, "recent agents unavailable");
            Vec::new()
        });
    let recent_jobs = jobs.map(|page| page.data).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "recent jobs unavailable");
        Vec::new()
    });

    DashboardSnapshot {
        stats,
        recent_agents,
        recent_jobs,
    }
}

#[derive(Debug, Default)]
pub struct DashboardState {
    pub snapshot: DashboardSnapshot,
    pub loading: bool,
    pub refreshing: bool,
    pub loaded: bool,
    generation: Generation,
}

impl DashboardState {
    pub fn fetch(
        &mut self,
        api: &ApiClient,
        events: &mpsc::Sender<TuiEvent>,
        mode: FetchMode,
    ) -> FetchTicket {
        match mode {
            FetchMode::Load => self.loading = true,
            FetchMode::Refresh => self.refreshing = true,
            FetchMode::Background => {}
        }
        let ticket = self.generation.issue(mode);
        let api = api.clone();
        let events = events.clone();
        tokio::spawn(async move {
            let snapshot = load_snapshot(&api).await;
            let _ = events
                .send(TuiEvent::Dashboard(ticket, Box::new(snapshot)))
                .await;
        });
        ticket
    }

    /// Returns false when the snapshot was stale and dropped.
    pub fn finish(&mut self, ticket: FetchTicket, snapshot: DashboardSnapshot) -> bool {
        if !self.generation.is_current(ticket) {
            tracing::debug!("discarding stale dashboard snapshot");
            return false;
        }
        self.snapshot = snapshot;
        self.loading = false;
        self.refreshing = false;
        self.loaded = true;
        true
    }

    pub fn cancel_pending(&mut self) {
        self.generation.invalidate();
        self.loading = false;
        self.refreshing = false;
    }
}
