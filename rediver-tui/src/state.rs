//! Application state.
//!
//! `App` owns every piece of view state and is only touched by the event
//! loop. Network work is spawned and reports back as [`TuiEvent`]s, which
//! [`App::handle_event`] applies.

use crate::actions::{spawn_mutation, Mutation, SecretReveal};
use crate::config::TuiConfig;
use crate::dashboard::DashboardState;
use crate::detail::DetailState;
use crate::error::TuiError;
use crate::events::TuiEvent;
use crate::fetch::FetchMode;
use crate::forms::{Form, TextInput};
use crate::list::{ListControl, ListPage};
use crate::nav::View;
use crate::notifications::{Notification, NotificationLevel, Notifications};
use crate::poller::Poller;
use crate::resources::{Admins, Agents, AuditLogs, Jobs, TargetMappings, Tokens};
use crate::theme::ConsoleTheme;
use rediver_client::{AuthGate, GateState, Principal, SessionStore};
use rediver_core::{Agent, AuditLog, Job, MappingExport};
use std::path::PathBuf;
use tokio::sync::mpsc;

pub const EXPORT_FILE_NAME: &str = "target-mappings.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Auth gate pending; only a placeholder renders.
    Checking,
    Login,
    Console,
}

#[derive(Debug)]
pub enum Modal {
    Help,
    Confirm { prompt: String, mutation: Mutation },
    Form(Form),
    /// Holds a one-time secret until the modal closes.
    Secret(SecretReveal),
    AuditDetail(Box<AuditLog>),
    FilterInput { label: &'static str, input: TextInput },
}

#[derive(Debug, Default)]
pub struct LoginState {
    pub input: TextInput,
    pub submitting: bool,
    pub error: Option<String>,
}

pub struct App {
    pub config: TuiConfig,
    pub theme: ConsoleTheme,
    pub session: SessionStore,
    pub gate: AuthGate,
    pub screen: Screen,
    pub login: LoginState,
    pub view: View,

    pub agents: ListPage<Agents>,
    pub jobs: ListPage<Jobs>,
    pub tokens: ListPage<Tokens>,
    pub admins: ListPage<Admins>,
    pub audit_logs: ListPage<AuditLogs>,
    pub mappings: ListPage<TargetMappings>,
    pub dashboard: DashboardState,
    pub agent_detail: DetailState<Agent>,
    pub job_detail: DetailState<Job>,

    pub notifications: Notifications,
    pub modal: Option<Modal>,

    poller: Option<Poller>,
    pub(crate) events: mpsc::Sender<TuiEvent>,
}

impl App {
    pub fn new(config: TuiConfig, session: SessionStore, events: mpsc::Sender<TuiEvent>) -> Self {
        Self {
            config,
            theme: ConsoleTheme::console(),
            session,
            gate: AuthGate::new(),
            screen: Screen::Checking,
            login: LoginState {
                input: TextInput::masked(),
                ..LoginState::default()
            },
            view: View::Dashboard,
            agents: ListPage::new(Agents),
            jobs: ListPage::new(Jobs),
            tokens: ListPage::new(Tokens),
            admins: ListPage::new(Admins),
            audit_logs: ListPage::new(AuditLogs),
            mappings: ListPage::new(TargetMappings),
            dashboard: DashboardState::default(),
            agent_detail: DetailState::default(),
            job_detail: DetailState::default(),
            notifications: Notifications::default(),
            modal: None,
            poller: None,
            events,
        }
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(Notification::new(level, message));
    }

    pub fn principal(&self) -> Option<Principal> {
        match self.gate.state() {
            GateState::Authenticated(principal) => Some(principal.clone()),
            _ => None,
        }
    }

    pub fn is_super_admin(&self) -> bool {
        self.principal().is_some_and(|p| p.is_super_admin())
    }

    /// The view whose poller is running, if any.
    pub fn polling(&self) -> Option<View> {
        self.poller.as_ref().map(Poller::view)
    }

    // ========================================================================
    // AUTH
    // ========================================================================

    /// Mount the protected area behind a fresh auth gate.
    pub fn start(&mut self) {
        self.screen = Screen::Checking;
        self.gate = AuthGate::new();
        match self.gate.begin(&self.session) {
            Some(pending) => {
                let events = self.events.clone();
                tokio::spawn(async move {
                    let verdict = pending.run().await;
                    let _ = events.send(TuiEvent::Gate(verdict)).await;
                });
            }
            None => self.apply_gate(),
        }
    }

    pub(crate) fn apply_gate(&mut self) {
        match self.gate.state() {
            GateState::Checking => {}
            GateState::Authenticated(_) => {
                self.screen = Screen::Console;
                self.mount(View::Dashboard);
            }
            GateState::Redirecting => {
                self.screen = Screen::Login;
                self.login.error = self.session.state().error().map(str::to_string);
            }
        }
    }

    pub fn submit_login(&mut self) {
        if self.login.submitting {
            return;
        }
        if self.login.input.is_blank() {
            self.login.error = Some("API key is required".to_string());
            return;
        }
        let key = self.login.input.value().to_string();
        self.login.input.clear();
        self.login.submitting = true;
        self.login.error = None;

        let session = self.session.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = session.login(&key).await;
            let _ = events.send(TuiEvent::Login(result)).await;
        });
    }

    pub fn logout(&mut self) {
        self.unmount();
        self.session.logout();
        self.gate = AuthGate::new();
        self.modal = None;
        self.agents.reset();
        self.jobs.reset();
        self.tokens.reset();
        self.admins.reset();
        self.audit_logs.reset();
        self.mappings.reset();
        self.dashboard.cancel_pending();
        self.dashboard.snapshot = Default::default();
        self.dashboard.loaded = false;
        self.agent_detail.close();
        self.job_detail.close();
        self.notifications.clear();
        self.login = LoginState {
            input: TextInput::masked(),
            ..LoginState::default()
        };
        self.view = View::Dashboard;
        self.screen = Screen::Login;
    }

    // ========================================================================
    // MOUNTING
    // ========================================================================

    /// Show `view`: stop the previous view's poller and pending fetch, issue
    /// one fetch for the new view and start its poller.
    pub fn mount(&mut self, view: View) {
        self.unmount();
        self.view = view;
        let mode = match view {
            View::Dashboard if self.dashboard.loaded => FetchMode::Refresh,
            _ => FetchMode::Load,
        };
        self.fetch_view(view, mode);
        self.poller = Poller::for_view(view, &self.events);
        tracing::debug!(view = view.title(), "view mounted");
    }

    fn unmount(&mut self) {
        self.poller = None;
        match self.view {
            View::Dashboard => self.dashboard.cancel_pending(),
            View::AgentDetail => self.agent_detail.close(),
            View::JobDetail => self.job_detail.close(),
            view => {
                if let Some(page) = self.page_mut(view) {
                    page.cancel_pending();
                }
            }
        }
    }

    pub fn open_agent(&mut self, agent: &Agent) {
        self.agent_detail.open(agent.id);
        self.mount(View::AgentDetail);
    }

    pub fn open_job(&mut self, job: &Job) {
        self.job_detail.open(job.id);
        self.mount(View::JobDetail);
    }

    /// Issue one fetch for `view`.
    pub fn fetch_view(&mut self, view: View, mode: FetchMode) {
        let api = self.session.api().clone();
        let events = self.events.clone();
        match view {
            View::Dashboard => {
                self.dashboard.fetch(&api, &events, mode);
            }
            View::AgentDetail => {
                if let Some((id, ticket)) = self.agent_detail.begin_fetch(mode) {
                    tokio::spawn(async move {
                        let result = api.get_agent(id).await;
                        let _ = events.send(TuiEvent::AgentDetail(ticket, result)).await;
                    });
                }
            }
            View::JobDetail => {
                if let Some((id, ticket)) = self.job_detail.begin_fetch(mode) {
                    tokio::spawn(async move {
                        let result = api.get_job(id).await;
                        let _ = events.send(TuiEvent::JobDetail(ticket, result)).await;
                    });
                }
            }
            view => {
                if let Some(page) = self.page_mut(view) {
                    page.reload(&api, &events, mode);
                }
            }
        }
    }

    pub fn page_mut(&mut self, view: View) -> Option<&mut dyn ListControl> {
        match view {
            View::Agents => Some(&mut self.agents),
            View::Jobs => Some(&mut self.jobs),
            View::Tokens => Some(&mut self.tokens),
            View::Admins => Some(&mut self.admins),
            View::AuditLogs => Some(&mut self.audit_logs),
            View::TargetMappings => Some(&mut self.mappings),
            View::Dashboard | View::AgentDetail | View::JobDetail => None,
        }
    }

    // ========================================================================
    // SELECTION
    // ========================================================================

    /// The agent under the cursor, or the one the detail view shows.
    pub fn current_agent(&self) -> Option<&Agent> {
        match self.view {
            View::AgentDetail => self.agent_detail.item.as_ref(),
            View::Agents => self.agents.selected_item(),
            _ => None,
        }
    }

    pub fn current_job(&self) -> Option<&Job> {
        match self.view {
            View::JobDetail => self.job_detail.item.as_ref(),
            View::Jobs => self.jobs.selected_item(),
            _ => None,
        }
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    /// Ask for confirmation when the mutation needs it, otherwise issue it.
    pub fn request(&mut self, mutation: Mutation) {
        match mutation.confirmation() {
            Some(prompt) => self.modal = Some(Modal::Confirm { prompt, mutation }),
            None => self.issue(mutation),
        }
    }

    pub fn issue(&mut self, mutation: Mutation) {
        spawn_mutation(mutation, self.session.api(), &self.events);
    }

    /// Re-fetch what a successful mutation touched: the open detail when it
    /// belongs to the owning list, otherwise the owning list if it is mounted.
    pub(crate) fn refetch_after(&mut self, mutation: &Mutation) {
        let owner = mutation.owner();
        if self.view.is_detail() && self.view.parent() == owner {
            let open = match self.view {
                View::AgentDetail => self.agent_detail.id(),
                View::JobDetail => self.job_detail.id(),
                _ => None,
            };
            if open.is_some() && mutation.deletes() == open {
                self.mount(owner);
            } else {
                self.fetch_view(self.view, FetchMode::Refresh);
            }
        } else if self.view == owner {
            self.fetch_view(owner, FetchMode::Refresh);
        }
    }

    // ========================================================================
    // EXPORT
    // ========================================================================

    /// Write the mappings on the current page as pretty JSON.
    pub fn export_mappings(&self) -> Result<PathBuf, TuiError> {
        let rows: Vec<MappingExport> = self.mappings.items.iter().map(MappingExport::from).collect();
        let json = serde_json::to_string_pretty(&rows)?;
        std::fs::create_dir_all(&self.config.export_dir)?;
        let path = self.config.export_dir.join(EXPORT_FILE_NAME);
        std::fs::write(&path, json)?;
        tracing::info!(path = %path.display(), rows = rows.len(), "exported target mappings");
        Ok(path)
    }
}
