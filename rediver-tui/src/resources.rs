//! The six listable resources and their filters.

use crate::events::{PageLoad, TuiEvent};
use crate::fetch::FetchTicket;
use crate::list::{FilterField, ListQuery, ListResource};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use rediver_client::{ApiClient, ApiClientError};
use rediver_core::{
    Admin, Agent, AgentHealth, AgentStatus, AuditAction, AuditActorType, AuditLog,
    BootstrapToken, Job, JobStatus, ListAdminsParams, ListAgentsParams, ListAuditLogsParams,
    ListJobsParams, ListMappingsParams, ListTokensParams, Page, TargetAssetTypeMapping,
    Timestamp, TokenStatus,
};

pub const AGENTS_PER_PAGE: u32 = 20;
pub const JOBS_PER_PAGE: u32 = 20;
pub const TOKENS_PER_PAGE: u32 = 20;
pub const ADMINS_PER_PAGE: u32 = 20;
pub const AUDIT_LOGS_PER_PAGE: u32 = 30;
pub const MAPPINGS_PER_PAGE: u32 = 30;

/// Resource types the audit log filter offers.
pub const AUDIT_RESOURCE_TYPES: [&str; 4] = ["agent", "job", "token", "admin"];

/// Step an optional filter through `all`, then back to "any".
fn cycle<T: Copy + PartialEq>(current: Option<T>, all: &[T]) -> Option<T> {
    match current {
        None => all.first().copied(),
        Some(value) => {
            let index = all.iter().position(|v| *v == value)?;
            all.get(index + 1).copied()
        }
    }
}

// ============================================================================
// AGENTS
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct Agents;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentFilter {
    pub status: Option<AgentStatus>,
    pub health: Option<AgentHealth>,
}

#[async_trait]
impl ListResource for Agents {
    type Item = Agent;
    type Filter = AgentFilter;

    fn label(&self) -> &'static str {
        "agents"
    }

    fn per_page(&self) -> u32 {
        AGENTS_PER_PAGE
    }

    async fn fetch(
        &self,
        api: &ApiClient,
        query: &ListQuery<AgentFilter>,
    ) -> Result<Page<Agent>, ApiClientError> {
        let params = ListAgentsParams {
            status: query.filter.status,
            health: query.filter.health,
            region: None,
            page: Some(query.page),
            per_page: Some(query.per_page),
        };
        api.list_agents(&params).await
    }

    fn loaded(&self, ticket: FetchTicket, result: Result<Page<Agent>, ApiClientError>) -> TuiEvent {
        TuiEvent::Page(PageLoad::Agents(ticket, result))
    }

    fn filter_fields(&self, filter: &AgentFilter) -> Vec<FilterField> {
        vec![
            FilterField::choice("Status", filter.status),
            FilterField::choice("Health", filter.health),
        ]
    }

    fn cycle_filter(&self, filter: &mut AgentFilter, index: usize) {
        match index {
            0 => filter.status = cycle(filter.status, &AgentStatus::ALL),
            1 => filter.health = cycle(filter.health, &AgentHealth::ALL),
            _ => {}
        }
    }
}

// ============================================================================
// JOBS
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct Jobs;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
}

#[async_trait]
impl ListResource for Jobs {
    type Item = Job;
    type Filter = JobFilter;

    fn label(&self) -> &'static str {
        "jobs"
    }

    fn per_page(&self) -> u32 {
        JOBS_PER_PAGE
    }

    async fn fetch(
        &self,
        api: &ApiClient,
        query: &ListQuery<JobFilter>,
    ) -> Result<Page<Job>, ApiClientError> {
        let params = ListJobsParams {
            status: query.filter.status,
            page: Some(query.page),
            per_page: Some(query.per_page),
            ..ListJobsParams::default()
        };
        api.list_jobs(&params).await
    }

    fn loaded(&self, ticket: FetchTicket, result: Result<Page<Job>, ApiClientError>) -> TuiEvent {
        TuiEvent::Page(PageLoad::Jobs(ticket, result))
    }

    fn filter_fields(&self, filter: &JobFilter) -> Vec<FilterField> {
        vec![FilterField::choice("Status", filter.status)]
    }

    fn cycle_filter(&self, filter: &mut JobFilter, index: usize) {
        if index == 0 {
            filter.status = cycle(filter.status, &JobStatus::ALL);
        }
    }
}

// ============================================================================
// BOOTSTRAP TOKENS
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct Tokens;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenFilter {
    pub status: Option<TokenStatus>,
}

#[async_trait]
impl ListResource for Tokens {
    type Item = BootstrapToken;
    type Filter = TokenFilter;

    fn label(&self) -> &'static str {
        "tokens"
    }

    fn per_page(&self) -> u32 {
        TOKENS_PER_PAGE
    }

    async fn fetch(
        &self,
        api: &ApiClient,
        query: &ListQuery<TokenFilter>,
    ) -> Result<Page<BootstrapToken>, ApiClientError> {
        let params = ListTokensParams {
            status: query.filter.status,
            search: None,
            page: Some(query.page),
            per_page: Some(query.per_page),
        };
        api.list_tokens(&params).await
    }

    fn loaded(
        &self,
        ticket: FetchTicket,
        result: Result<Page<BootstrapToken>, ApiClientError>,
    ) -> TuiEvent {
        TuiEvent::Page(PageLoad::Tokens(ticket, result))
    }

    fn filter_fields(&self, filter: &TokenFilter) -> Vec<FilterField> {
        vec![FilterField::choice("Status", filter.status)]
    }

    fn cycle_filter(&self, filter: &mut TokenFilter, index: usize) {
        if index == 0 {
            filter.status = cycle(filter.status, &TokenStatus::ALL);
        }
    }
}

// ============================================================================
// ADMINS
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct Admins;

#[async_trait]
impl ListResource for Admins {
    type Item = Admin;
    type Filter = ();

    fn label(&self) -> &'static str {
        "admins"
    }

    fn per_page(&self) -> u32 {
        ADMINS_PER_PAGE
    }

    async fn fetch(
        &self,
        api: &ApiClient,
        query: &ListQuery<()>,
    ) -> Result<Page<Admin>, ApiClientError> {
        let params = ListAdminsParams {
            page: Some(query.page),
            per_page: Some(query.per_page),
        };
        api.list_admins(&params).await
    }

    fn loaded(&self, ticket: FetchTicket, result: Result<Page<Admin>, ApiClientError>) -> TuiEvent {
        TuiEvent::Page(PageLoad::Admins(ticket, result))
    }
}

// ============================================================================
// AUDIT LOGS
// ============================================================================

/// Look-back window for the audit log. Never "unset": `All` means no bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateRange {
    Day,
    #[default]
    Week,
    Month,
    Quarter,
    All,
}

impl DateRange {
    pub const ALL: [DateRange; 5] = [
        DateRange::Day,
        DateRange::Week,
        DateRange::Month,
        DateRange::Quarter,
        DateRange::All,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DateRange::Day => "Last 24 hours",
            DateRange::Week => "Last 7 days",
            DateRange::Month => "Last 30 days",
            DateRange::Quarter => "Last 90 days",
            DateRange::All => "All time",
        }
    }

    pub fn days(&self) -> Option<i64> {
        match self {
            DateRange::Day => Some(1),
            DateRange::Week => Some(7),
            DateRange::Month => Some(30),
            DateRange::Quarter => Some(90),
            DateRange::All => None,
        }
    }

    /// Lower bound for a query issued at `now`.
    pub fn since(&self, now: Timestamp) -> Option<Timestamp> {
        self.days().map(|days| now - Duration::days(days))
    }

    pub fn next(&self) -> DateRange {
        let index = Self::ALL.iter().position(|r| r == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AuditLogs;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditFilter {
    pub action: Option<AuditAction>,
    pub actor_type: Option<AuditActorType>,
    pub resource_type: Option<&'static str>,
    pub range: DateRange,
}

#[async_trait]
impl ListResource for AuditLogs {
    type Item = AuditLog;
    type Filter = AuditFilter;

    fn label(&self) -> &'static str {
        "audit logs"
    }

    fn per_page(&self) -> u32 {
        AUDIT_LOGS_PER_PAGE
    }

    async fn fetch(
        &self,
        api: &ApiClient,
        query: &ListQuery<AuditFilter>,
    ) -> Result<Page<AuditLog>, ApiClientError> {
        let filter = &query.filter;
        let params = ListAuditLogsParams {
            action: filter.action,
            actor_type: filter.actor_type,
            resource_type: filter.resource_type.map(str::to_string),
            from: filter.range.since(Utc::now()),
            page: Some(query.page),
            per_page: Some(query.per_page),
            ..ListAuditLogsParams::default()
        };
        api.list_audit_logs(&params).await
    }

    fn loaded(&self, ticket: FetchTicket, result: Result<Page<AuditLog>, ApiClientError>) -> TuiEvent {
        TuiEvent::Page(PageLoad::AuditLogs(ticket, result))
    }

    fn filter_fields(&self, filter: &AuditFilter) -> Vec<FilterField> {
        vec![
            FilterField::choice("Action", filter.action),
            FilterField::choice("Actor", filter.actor_type),
            FilterField::choice("Resource", filter.resource_type),
            FilterField::choice("Range", Some(filter.range.label())),
        ]
    }

    fn cycle_filter(&self, filter: &mut AuditFilter, index: usize) {
        match index {
            0 => filter.action = cycle(filter.action, &AuditAction::ALL),
            1 => filter.actor_type = cycle(filter.actor_type, &AuditActorType::ALL),
            2 => filter.resource_type = cycle(filter.resource_type, &AUDIT_RESOURCE_TYPES),
            3 => filter.range = filter.range.next(),
            _ => {}
        }
    }
}

// ============================================================================
// TARGET MAPPINGS
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct TargetMappings;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingFilter {
    pub target_type: Option<String>,
    pub asset_type: Option<String>,
    pub active: Option<bool>,
}

#[async_trait]
impl ListResource for TargetMappings {
    type Item = TargetAssetTypeMapping;
    type Filter = MappingFilter;

    fn label(&self) -> &'static str {
        "target mappings"
    }

    fn per_page(&self) -> u32 {
        MAPPINGS_PER_PAGE
    }

    async fn fetch(
        &self,
        api: &ApiClient,
        query: &ListQuery<MappingFilter>,
    ) -> Result<Page<TargetAssetTypeMapping>, ApiClientError> {
        let params = ListMappingsParams {
            target_type: query.filter.target_type.clone(),
            asset_type: query.filter.asset_type.clone(),
            is_primary: None,
            is_active: query.filter.active,
            page: Some(query.page),
            per_page: Some(query.per_page),
        };
        api.list_target_mappings(&params).await
    }

    fn loaded(
        &self,
        ticket: FetchTicket,
        result: Result<Page<TargetAssetTypeMapping>, ApiClientError>,
    ) -> TuiEvent {
        TuiEvent::Page(PageLoad::TargetMappings(ticket, result))
    }

    fn filter_fields(&self, filter: &MappingFilter) -> Vec<FilterField> {
        let active = filter
            .active
            .map(|active| if active { "active" } else { "inactive" });
        vec![
            FilterField::text("Target", filter.target_type.as_deref()),
            FilterField::text("Asset", filter.asset_type.as_deref()),
            FilterField::choice("State", active),
        ]
    }

    fn cycle_filter(&self, filter: &mut MappingFilter, index: usize) {
        if index == 2 {
            filter.active = cycle(filter.active, &[true, false]);
        }
    }

    fn set_text_filter(&self, filter: &mut MappingFilter, index: usize, value: Option<String>) {
        match index {
            0 => filter.target_type = value,
            1 => filter.asset_type = value,
            _ => {}
        }
    }
}
