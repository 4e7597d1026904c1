//! Pass-through DTOs mirrored from the platform API.
//!
//! The console owns none of these lifecycles. The helper predicates only decide
//! which actions to offer; the backend decides whether they succeed.

use crate::enums::{
    AdminRole, AgentHealth, AgentStatus, AuditAction, AuditActorType, JobStatus, JobType, TokenStatus,
};
use crate::identity::{
    AdminId, AgentId, AuditLogId, EntityId, JobId, MappingId, TenantId, Timestamp, TokenId,
};
use crate::impl_entity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// AGENTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    #[serde(rename = "type", default)]
    pub agent_type: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: AgentStatus,
    #[serde(default)]
    pub health: AgentHealth,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub max_concurrent_jobs: u32,
    #[serde(default)]
    pub current_jobs: u32,
    #[serde(default)]
    pub cpu_percent: f64,
    #[serde(default)]
    pub memory_percent: f64,
    #[serde(default)]
    pub disk_read_mbps: f64,
    #[serde(default)]
    pub disk_write_mbps: f64,
    #[serde(default)]
    pub total_jobs_completed: u64,
    #[serde(default)]
    pub total_jobs_failed: u64,
    #[serde(default)]
    pub last_heartbeat_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Agent {
    pub fn can_drain(&self) -> bool {
        self.status == AgentStatus::Active
    }

    pub fn can_uncordon(&self) -> bool {
        self.status == AgentStatus::Disabled
    }

    /// Fraction of job slots in use, 0.0 when the agent advertises no slots.
    pub fn job_load(&self) -> f64 {
        if self.max_concurrent_jobs == 0 {
            return 0.0;
        }
        (self.current_jobs as f64 / self.max_concurrent_jobs as f64).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentStats {
    pub total: u64,
    pub online: u64,
    pub offline: u64,
    pub disabled: u64,
}

// ============================================================================
// JOBS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub tenant_id: TenantId,
    #[serde(default)]
    pub tenant_name: Option<String>,
    #[serde(default)]
    pub agent_id: Option<AgentId>,
    #[serde(default)]
    pub agent_name: Option<String>,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub status: JobStatus,
    #[serde(default)]
    pub scanner_name: String,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub queue_position: Option<u32>,
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub started_at: Option<Timestamp>,
    #[serde(default)]
    pub completed_at: Option<Timestamp>,
    #[serde(default)]
    pub timeout_seconds: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Job {
    pub fn is_live(&self) -> bool {
        self.status.is_live()
    }

    pub fn is_cancellable(&self) -> bool {
        self.status.is_cancellable()
    }

    pub fn is_retryable(&self) -> bool {
        self.status.is_retryable()
    }

    /// Wall-clock run time, when the job has started.
    pub fn elapsed(&self, now: Timestamp) -> Option<chrono::Duration> {
        let started = self.started_at?;
        let end = self.completed_at.unwrap_or(now);
        Some(end - started)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobStats {
    pub queued: u64,
    pub running: u64,
    pub completed: u64,
    pub failed: u64,
}

// ============================================================================
// BOOTSTRAP TOKENS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapToken {
    pub id: TokenId,
    pub token_prefix: String,
    #[serde(default)]
    pub description: String,
    pub max_uses: u32,
    #[serde(default)]
    pub current_uses: u32,
    pub expires_at: Timestamp,
    #[serde(default)]
    pub allowed_regions: Vec<String>,
    #[serde(default)]
    pub created_by_id: Option<AdminId>,
    #[serde(default)]
    pub created_by_name: Option<String>,
    pub created_at: Timestamp,
    #[serde(default)]
    pub is_expired: bool,
    #[serde(default)]
    pub is_exhausted: bool,
    #[serde(default)]
    pub is_revoked: bool,
}

impl BootstrapToken {
    pub fn is_revocable(&self) -> bool {
        !(self.is_expired || self.is_exhausted || self.is_revoked)
    }

    pub fn remaining_uses(&self) -> u32 {
        self.max_uses.saturating_sub(self.current_uses)
    }

    /// Display status. Revocation wins over exhaustion, exhaustion over expiry.
    pub fn status(&self) -> TokenStatus {
        if self.is_revoked {
            TokenStatus::Revoked
        } else if self.is_exhausted {
            TokenStatus::Exhausted
        } else if self.is_expired {
            TokenStatus::Expired
        } else {
            TokenStatus::Active
        }
    }
}

// ============================================================================
// ADMINS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Admin {
    pub id: AdminId,
    pub email: String,
    pub name: String,
    pub role: AdminRole,
    pub is_active: bool,
    #[serde(default)]
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Body of `GET /auth/validate`. The role arrives as a raw string so an
/// unrecognised role does not fail validation outright.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub id: AdminId,
    pub email: String,
    pub name: String,
    pub role: String,
}

// ============================================================================
// AUDIT LOGS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: AuditLogId,
    pub action: String,
    pub actor_type: AuditActorType,
    #[serde(default)]
    pub actor_id: Option<EntityId>,
    #[serde(default)]
    pub actor_name: Option<String>,
    #[serde(default)]
    pub resource_type: String,
    #[serde(default)]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub resource_name: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    pub created_at: Timestamp,
}

impl AuditLog {
    pub fn known_action(&self) -> Option<AuditAction> {
        self.action.parse().ok()
    }

    pub fn actor_label(&self) -> String {
        match (&self.actor_name, &self.actor_id) {
            (Some(name), _) => name.clone(),
            (None, Some(id)) => id.to_string(),
            (None, None) => self.actor_type.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditLogStats {
    pub total: u64,
    pub failed_24h: u64,
    pub recent_actions: Vec<AuditLog>,
}

// ============================================================================
// TARGET MAPPINGS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetAssetTypeMapping {
    pub id: MappingId,
    pub target_type: String,
    pub asset_type: String,
    #[serde(default)]
    pub priority: Option<i32>,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

fn default_true() -> bool {
    true
}

/// Portable form of a mapping used by the JSON export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingExport {
    pub target_type: String,
    pub asset_type: String,
    pub is_primary: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&TargetAssetTypeMapping> for MappingExport {
    fn from(mapping: &TargetAssetTypeMapping) -> Self {
        Self {
            target_type: mapping.target_type.clone(),
            asset_type: mapping.asset_type.clone(),
            is_primary: mapping.is_primary,
            description: mapping.description.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetMappingStats {
    pub total: u64,
    pub by_target_type: BTreeMap<String, u64>,
    pub by_asset_type: BTreeMap<String, u64>,
}

// ============================================================================
// DASHBOARD
// ============================================================================

/// Dashboard aggregate. Every section defaults to zero when its source fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformStats {
    pub agents: AgentStats,
    pub jobs: JobStats,
}

impl PlatformStats {
    pub fn from_parts(agents: Option<AgentStats>, jobs: Option<JobStats>) -> Self {
        Self {
            agents: agents.unwrap_or_default(),
            jobs: jobs.unwrap_or_default(),
        }
    }
}

impl_entity!(Agent, id);
impl_entity!(Job, id);
impl_entity!(BootstrapToken, id);
impl_entity!(Admin, id);
impl_entity!(AuditLog, id);
impl_entity!(TargetAssetTypeMapping, id);
