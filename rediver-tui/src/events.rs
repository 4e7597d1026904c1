//! Event types for the console event loop.
//!
//! Input, timers and every spawned network task report back through one
//! channel of [`TuiEvent`]s; only the loop touches view state.

use crate::actions::MutationOutcome;
use crate::dashboard::DashboardSnapshot;
use crate::fetch::FetchTicket;
use crate::nav::View;
use crossterm::event::KeyEvent;
use rediver_client::{ApiClientError, GateVerdict, Principal, SessionError};
use rediver_core::{Admin, Agent, AuditLog, BootstrapToken, Job, Page, TargetAssetTypeMapping};

type Loaded<T> = Result<Page<T>, ApiClientError>;

/// A finished list fetch, tagged with the ticket it was issued under.
#[derive(Debug)]
pub enum PageLoad {
    Agents(FetchTicket, Loaded<Agent>),
    Jobs(FetchTicket, Loaded<Job>),
    Tokens(FetchTicket, Loaded<BootstrapToken>),
    Admins(FetchTicket, Loaded<Admin>),
    AuditLogs(FetchTicket, Loaded<AuditLog>),
    TargetMappings(FetchTicket, Loaded<TargetAssetTypeMapping>),
}

#[derive(Debug)]
pub enum TuiEvent {
    Input(KeyEvent),
    Tick,
    Resize { width: u16, height: u16 },
    /// A poller fired for the view it was started with.
    Poll(View),
    Gate(GateVerdict),
    Login(Result<Principal, SessionError>),
    Page(PageLoad),
    Dashboard(FetchTicket, Box<DashboardSnapshot>),
    AgentDetail(FetchTicket, Result<Agent, ApiClientError>),
    JobDetail(FetchTicket, Result<Job, ApiClientError>),
    Mutation(MutationOutcome),
}
