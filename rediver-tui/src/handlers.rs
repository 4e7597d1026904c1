//! Event and input handling for [`App`].

use crate::actions::{MutationEffect, MutationOutcome, Mutation};
use crate::events::{PageLoad, TuiEvent};
use crate::fetch::{FetchMode, FetchOutcome, FetchTicket};
use crate::forms::{Form, FormInput, TextInput};
use crate::keys::{map_key, Action};
use crate::list::{FilterKind, ListPage, ListResource};
use crate::nav::View;
use crate::notifications::{Notification, NotificationLevel, Notifications};
use crate::state::{App, Modal, Screen};
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rediver_client::{ApiClientError, SessionError};
use rediver_core::Page;

impl App {
    /// Apply one event. Returns true when the console should exit.
    pub fn handle_event(&mut self, event: TuiEvent) -> bool {
        match event {
            TuiEvent::Input(key) => return self.handle_key(key),
            TuiEvent::Tick => self.notifications.prune(Utc::now()),
            TuiEvent::Resize { .. } => {}
            TuiEvent::Poll(view) => self.on_poll(view),
            TuiEvent::Gate(verdict) => {
                if self.screen == Screen::Checking {
                    self.gate.resolve(verdict);
                    self.apply_gate();
                }
            }
            TuiEvent::Login(result) => self.on_login(result),
            TuiEvent::Page(load) => self.on_page(load),
            TuiEvent::Dashboard(ticket, snapshot) => {
                self.dashboard.finish(ticket, *snapshot);
            }
            TuiEvent::AgentDetail(ticket, result) => {
                let outcome = self.agent_detail.finish_fetch(ticket, result);
                if matches!(outcome, FetchOutcome::Failed(_)) && ticket.announces_failure() {
                    self.notify(NotificationLevel::Error, "Failed to fetch agent details");
                }
            }
            TuiEvent::JobDetail(ticket, result) => {
                let outcome = self.job_detail.finish_fetch(ticket, result);
                if matches!(outcome, FetchOutcome::Failed(_)) && ticket.announces_failure() {
                    self.notify(NotificationLevel::Error, "Failed to fetch job details");
                }
            }
            TuiEvent::Mutation(outcome) => self.on_mutation(outcome),
        }
        false
    }

    fn on_poll(&mut self, view: View) {
        if self.screen != Screen::Console || view != self.view {
            tracing::debug!(view = view.title(), "ignoring poll for unmounted view");
            return;
        }
        if view == View::JobDetail && !self.job_detail.item.as_ref().is_some_and(|job| job.is_live()) {
            return;
        }
        self.fetch_view(view, FetchMode::Background);
    }

    fn on_login(&mut self, result: Result<rediver_client::Principal, SessionError>) {
        self.login.submitting = false;
        match result {
            Ok(principal) => {
                tracing::info!(admin = %principal.email, "signed in");
                self.login.error = None;
                self.start();
            }
            Err(SessionError::Superseded) => {}
            Err(err) => {
                let message = self
                    .session
                    .state()
                    .error()
                    .map(str::to_string)
                    .unwrap_or_else(|| err.to_string());
                self.login.error = Some(message);
            }
        }
    }

    fn on_page(&mut self, load: PageLoad) {
        let (view, refetch) = match load {
            PageLoad::Agents(ticket, result) => (
                View::Agents,
                settle(&mut self.agents, ticket, result, &mut self.notifications),
            ),
            PageLoad::Jobs(ticket, result) => (
                View::Jobs,
                settle(&mut self.jobs, ticket, result, &mut self.notifications),
            ),
            PageLoad::Tokens(ticket, result) => (
                View::Tokens,
                settle(&mut self.tokens, ticket, result, &mut self.notifications),
            ),
            PageLoad::Admins(ticket, result) => (
                View::Admins,
                settle(&mut self.admins, ticket, result, &mut self.notifications),
            ),
            PageLoad::AuditLogs(ticket, result) => (
                View::AuditLogs,
                settle(&mut self.audit_logs, ticket, result, &mut self.notifications),
            ),
            PageLoad::TargetMappings(ticket, result) => (
                View::TargetMappings,
                settle(&mut self.mappings, ticket, result, &mut self.notifications),
            ),
        };
        if refetch {
            self.fetch_view(view, FetchMode::Load);
        }
    }

    fn on_mutation(&mut self, outcome: MutationOutcome) {
        let MutationOutcome { mutation, result } = outcome;
        match result {
            Ok(effect) => {
                self.notify(NotificationLevel::Success, mutation.success_message());
                if let MutationEffect::Reveal(reveal) = effect {
                    self.modal = Some(Modal::Secret(reveal));
                }
                if self.screen == Screen::Console {
                    self.refetch_after(&mutation);
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "mutation failed");
                self.notify(
                    NotificationLevel::Error,
                    format!("{}: {}", mutation.failure_message(), err.message()),
                );
            }
        }
    }

    // ========================================================================
    // INPUT
    // ========================================================================

    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl_c =
            key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c');
        match self.screen {
            Screen::Checking => ctrl_c || key.code == KeyCode::Char('q'),
            Screen::Login => self.handle_login_key(key, ctrl_c),
            Screen::Console => {
                if self.modal.is_some() {
                    self.handle_modal_key(key);
                    false
                } else {
                    map_key(key).is_some_and(|action| self.handle_action(action))
                }
            }
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent, ctrl_c: bool) -> bool {
        if ctrl_c || key.code == KeyCode::Esc {
            return true;
        }
        if self.login.submitting {
            return false;
        }
        match key.code {
            KeyCode::Enter => self.submit_login(),
            _ => {
                if self.login.input.handle_key(key) {
                    self.login.error = None;
                    self.session.clear_error();
                }
            }
        }
        false
    }

    fn handle_modal_key(&mut self, key: KeyEvent) {
        let Some(modal) = self.modal.take() else {
            return;
        };
        match modal {
            Modal::Help | Modal::AuditDetail(_) | Modal::Secret(_) => {
                if !matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?')) {
                    self.modal = Some(modal);
                }
            }
            Modal::Confirm { prompt, mutation } => match key.code {
                KeyCode::Enter | KeyCode::Char('y') => self.issue(mutation),
                KeyCode::Esc | KeyCode::Char('n') => {}
                _ => self.modal = Some(Modal::Confirm { prompt, mutation }),
            },
            Modal::Form(mut form) => match form.handle_key(key) {
                FormInput::Continue => self.modal = Some(Modal::Form(form)),
                FormInput::Cancel => {}
                FormInput::Submit => match form.submit() {
                    Ok(mutation) => self.issue(mutation),
                    Err(err) => {
                        tracing::debug!(field = err.field(), "form rejected");
                        self.notify(NotificationLevel::Warning, err.to_string());
                        self.modal = Some(Modal::Form(form));
                    }
                },
            },
            Modal::FilterInput { label, mut input } => match key.code {
                KeyCode::Esc => {}
                KeyCode::Enter => {
                    let value = Some(input.value().to_string());
                    let view = self.view;
                    let changed = self
                        .page_mut(view)
                        .is_some_and(|page| page.set_focused_text(value));
                    if changed {
                        self.fetch_view(view, FetchMode::Load);
                    }
                }
                _ => {
                    input.handle_key(key);
                    self.modal = Some(Modal::FilterInput { label, input });
                }
            },
        }
    }

    fn handle_action(&mut self, action: Action) -> bool {
        let view = self.view;
        match action {
            Action::Quit => return true,
            Action::NextView => self.mount(view.next()),
            Action::PrevView => self.mount(view.previous()),
            Action::SwitchView(index) => {
                if let Some(target) = View::from_index(index) {
                    self.mount(target);
                }
            }
            Action::MoveUp => {
                if let Some(page) = self.page_mut(view) {
                    page.select_previous();
                }
            }
            Action::MoveDown => {
                if let Some(page) = self.page_mut(view) {
                    page.select_next();
                }
            }
            Action::PrevPage => self.turn_page(|page| page.prev_page()),
            Action::NextPage => self.turn_page(|page| page.next_page()),
            Action::FirstPage => self.turn_page(|page| page.first_page()),
            Action::LastPage => self.turn_page(|page| page.last_page()),
            Action::Confirm => self.open_selected(),
            Action::Cancel => {
                if view.is_detail() {
                    self.mount(view.parent());
                }
            }
            Action::Refresh => self.fetch_view(view, FetchMode::Refresh),
            Action::NewItem => self.new_item(),
            Action::EditItem => {
                if view == View::TargetMappings {
                    if let Some(mapping) = self.mappings.selected_item() {
                        self.modal = Some(Modal::Form(Form::edit_mapping(mapping)));
                    }
                }
            }
            Action::DeleteItem => self.delete_selected(),
            Action::Drain => {
                if let Some(agent) = self.current_agent() {
                    if agent.can_drain() {
                        let mutation = Mutation::DrainAgent {
                            id: agent.id,
                            name: agent.name.clone(),
                        };
                        self.request(mutation);
                    }
                }
            }
            Action::Uncordon => {
                if let Some(agent) = self.current_agent() {
                    if agent.can_uncordon() {
                        let mutation = Mutation::UncordonAgent {
                            id: agent.id,
                            name: agent.name.clone(),
                        };
                        self.request(mutation);
                    }
                }
            }
            Action::CancelJob => {
                if let Some(job) = self.current_job().filter(|job| job.is_cancellable()) {
                    let mutation = Mutation::CancelJob { id: job.id };
                    self.request(mutation);
                }
            }
            Action::RetryJob => {
                if let Some(job) = self.current_job().filter(|job| job.is_retryable()) {
                    let mutation = Mutation::RetryJob { id: job.id };
                    self.request(mutation);
                }
            }
            Action::RotateKey => self.rotate_selected_key(),
            Action::ToggleActive => self.toggle_selected_admin(),
            Action::Export => {
                if view == View::TargetMappings {
                    match self.export_mappings() {
                        Ok(_) => self.notify(NotificationLevel::Success, "Exported mappings to JSON"),
                        Err(err) => {
                            tracing::warn!(error = %err, "mapping export failed");
                            self.notify(NotificationLevel::Error, "Failed to export mappings");
                        }
                    }
                }
            }
            Action::CycleFilter => self.cycle_filter(),
            Action::NextFilter => {
                if let Some(page) = self.page_mut(view) {
                    page.focus_next_filter();
                }
            }
            Action::ClearFilters => {
                if self.page_mut(view).is_some_and(|page| page.clear_filters()) {
                    self.fetch_view(view, FetchMode::Load);
                }
            }
            Action::Logout => self.logout(),
            Action::OpenHelp => self.modal = Some(Modal::Help),
        }
        false
    }

    fn turn_page(&mut self, turn: impl FnOnce(&mut dyn crate::list::ListControl) -> bool) {
        let view = self.view;
        if self.page_mut(view).is_some_and(turn) {
            self.fetch_view(view, FetchMode::Load);
        }
    }

    fn cycle_filter(&mut self) {
        let view = self.view;
        let Some(page) = self.page_mut(view) else {
            return;
        };
        let Some(field) = page.focused_filter() else {
            return;
        };
        match field.kind {
            FilterKind::Choice => {
                if page.cycle_focused_filter() {
                    self.fetch_view(view, FetchMode::Load);
                }
            }
            FilterKind::Text => {
                self.modal = Some(Modal::FilterInput {
                    label: field.label,
                    input: TextInput::with_value(field.value.unwrap_or_default()),
                });
            }
        }
    }

    fn open_selected(&mut self) {
        match self.view {
            View::Agents => {
                if let Some(agent) = self.agents.selected_item().cloned() {
                    self.open_agent(&agent);
                }
            }
            View::Jobs => {
                if let Some(job) = self.jobs.selected_item().cloned() {
                    self.open_job(&job);
                }
            }
            View::AuditLogs => {
                if let Some(log) = self.audit_logs.selected_item().cloned() {
                    self.modal = Some(Modal::AuditDetail(Box::new(log)));
                }
            }
            _ => {}
        }
    }

    fn new_item(&mut self) {
        let form = match self.view {
            View::Tokens => Form::create_token(),
            View::TargetMappings => Form::create_mapping(),
            View::Admins => {
                if !self.is_super_admin() {
                    self.notify(NotificationLevel::Warning, "Only super admins can create admins");
                    return;
                }
                Form::create_admin()
            }
            _ => return,
        };
        self.modal = Some(Modal::Form(form));
    }

    fn delete_selected(&mut self) {
        let mutation = match self.view {
            View::Agents | View::AgentDetail => self.current_agent().map(|agent| Mutation::DeleteAgent {
                id: agent.id,
                name: agent.name.clone(),
            }),
            View::Tokens => self
                .tokens
                .selected_item()
                .filter(|token| token.is_revocable())
                .map(|token| Mutation::RevokeToken {
                    id: token.id,
                    prefix: token.token_prefix.clone(),
                }),
            View::Admins => {
                let Some(admin) = self.admins.selected_item() else {
                    return;
                };
                let (id, name) = (admin.id, admin.name.clone());
                if !self.is_super_admin() {
                    self.notify(NotificationLevel::Warning, "Only super admins can delete admins");
                    return;
                }
                if self.is_self(id) {
                    self.notify(NotificationLevel::Warning, "You cannot delete your own account");
                    return;
                }
                Some(Mutation::DeleteAdmin { id, name })
            }
            View::TargetMappings => self.mappings.selected_item().map(|mapping| Mutation::DeleteMapping {
                id: mapping.id,
                label: format!("{} → {}", mapping.target_type, mapping.asset_type),
            }),
            _ => None,
        };
        if let Some(mutation) = mutation {
            self.request(mutation);
        }
    }

    fn rotate_selected_key(&mut self) {
        if self.view != View::Admins {
            return;
        }
        let Some(admin) = self.admins.selected_item() else {
            return;
        };
        let mutation = Mutation::RotateAdminKey {
            id: admin.id,
            name: admin.name.clone(),
        };
        if !self.is_super_admin() {
            self.notify(NotificationLevel::Warning, "Only super admins can rotate API keys");
            return;
        }
        self.request(mutation);
    }

    fn toggle_selected_admin(&mut self) {
        if self.view != View::Admins {
            return;
        }
        let Some(admin) = self.admins.selected_item() else {
            return;
        };
        let mutation = Mutation::SetAdminActive {
            id: admin.id,
            name: admin.name.clone(),
            active: !admin.is_active,
        };
        if admin.is_active && self.is_self(admin.id) {
            self.notify(NotificationLevel::Warning, "You cannot deactivate your own account");
            return;
        }
        self.request(mutation);
    }

    fn is_self(&self, id: rediver_core::AdminId) -> bool {
        self.principal().is_some_and(|p| p.id == id)
    }
}

/// Apply a finished list fetch. True when the page had to be pulled back
/// inside the new total and needs one more fetch.
fn settle<R: ListResource>(
    page: &mut ListPage<R>,
    ticket: FetchTicket,
    result: Result<Page<R::Item>, ApiClientError>,
    notifications: &mut Notifications,
) -> bool {
    match page.finish_fetch(ticket, result) {
        FetchOutcome::Applied => page.clamp_to_total(),
        FetchOutcome::Failed(_) if ticket.announces_failure() => {
            notifications.push(Notification::new(
                NotificationLevel::Error,
                format!("Failed to fetch {}", page.label()),
            ));
            false
        }
        FetchOutcome::Failed(_) | FetchOutcome::Stale => false,
    }
}
