//! Status and role vocabularies shared with the platform API.
//!
//! Every enum serializes to the snake_case wire string used by the backend,
//! and round-trips through `as_str` / `FromStr` for query parameters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error when a wire string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {kind}: {value}")]
pub struct EnumParseError {
    pub kind: &'static str,
    pub value: String,
}

impl EnumParseError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase().replace('-', "_")
}

// ============================================================================
// AGENTS
// ============================================================================

/// Administrative state of a platform agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    /// Accepting jobs
    Active,
    /// Drained: finishes current work, receives nothing new
    Disabled,
    /// Permanently revoked
    Revoked,
}

impl AgentStatus {
    pub const ALL: [AgentStatus; 3] = [Self::Active, Self::Disabled, Self::Revoked];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStatus::Active => "active",
            AgentStatus::Disabled => "disabled",
            AgentStatus::Revoked => "revoked",
        }
    }

    pub fn from_wire(s: &str) -> Result<Self, EnumParseError> {
        match normalize(s).as_str() {
            "active" => Ok(AgentStatus::Active),
            "disabled" => Ok(AgentStatus::Disabled),
            "revoked" => Ok(AgentStatus::Revoked),
            _ => Err(EnumParseError::new("agent status", s)),
        }
    }
}

/// Liveness derived by the backend from heartbeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AgentHealth {
    Online,
    Offline,
    #[default]
    Unknown,
}

impl AgentHealth {
    pub const ALL: [AgentHealth; 3] = [Self::Online, Self::Offline, Self::Unknown];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentHealth::Online => "online",
            AgentHealth::Offline => "offline",
            AgentHealth::Unknown => "unknown",
        }
    }

    pub fn from_wire(s: &str) -> Result<Self, EnumParseError> {
        match normalize(s).as_str() {
            "online" => Ok(AgentHealth::Online),
            "offline" => Ok(AgentHealth::Offline),
            "unknown" => Ok(AgentHealth::Unknown),
            _ => Err(EnumParseError::new("agent health", s)),
        }
    }
}

// ============================================================================
// JOBS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    Scan,
    Collect,
    HealthCheck,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::Scan => "scan",
            JobType::Collect => "collect",
            JobType::HealthCheck => "health_check",
        }
    }

    pub fn from_wire(s: &str) -> Result<Self, EnumParseError> {
        match normalize(s).as_str() {
            "scan" => Ok(JobType::Scan),
            "collect" => Ok(JobType::Collect),
            "health_check" => Ok(JobType::HealthCheck),
            _ => Err(EnumParseError::new("job type", s)),
        }
    }
}

/// Server-enforced job progression:
/// pending → queued → assigned → running → {completed, failed, cancelled, timeout}.
///
/// The console never advances this itself; it only reflects it and asks the
/// backend for cancel/retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Queued,
    Assigned,
    Running,
    Completed,
    Failed,
    Cancelled,
    Timeout,
}

impl JobStatus {
    pub const ALL: [JobStatus; 8] = [
        Self::Pending,
        Self::Queued,
        Self::Assigned,
        Self::Running,
        Self::Completed,
        Self::Failed,
        Self::Cancelled,
        Self::Timeout,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Queued => "queued",
            JobStatus::Assigned => "assigned",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
            JobStatus::Timeout => "timeout",
        }
    }

    pub fn from_wire(s: &str) -> Result<Self, EnumParseError> {
        match normalize(s).as_str() {
            "pending" => Ok(JobStatus::Pending),
            "queued" => Ok(JobStatus::Queued),
            "assigned" => Ok(JobStatus::Assigned),
            "running" => Ok(JobStatus::Running),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            "cancelled" | "canceled" => Ok(JobStatus::Cancelled),
            "timeout" => Ok(JobStatus::Timeout),
            _ => Err(EnumParseError::new("job status", s)),
        }
    }

    /// Still moving on the backend; detail views keep polling these.
    pub fn is_live(&self) -> bool {
        matches!(self, JobStatus::Running | JobStatus::Queued)
    }

    pub fn is_cancellable(&self) -> bool {
        matches!(
            self,
            JobStatus::Pending | JobStatus::Queued | JobStatus::Running
        )
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, JobStatus::Failed | JobStatus::Timeout)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled | JobStatus::Timeout
        )
    }
}

// ============================================================================
// TOKENS
// ============================================================================

/// Bootstrap token list filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenStatus {
    Active,
    Expired,
    Exhausted,
    Revoked,
}

impl TokenStatus {
    pub const ALL: [TokenStatus; 4] = [
        Self::Active,
        Self::Expired,
        Self::Exhausted,
        Self::Revoked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenStatus::Active => "active",
            TokenStatus::Expired => "expired",
            TokenStatus::Exhausted => "exhausted",
            TokenStatus::Revoked => "revoked",
        }
    }

    pub fn from_wire(s: &str) -> Result<Self, EnumParseError> {
        match normalize(s).as_str() {
            "active" => Ok(TokenStatus::Active),
            "expired" => Ok(TokenStatus::Expired),
            "exhausted" => Ok(TokenStatus::Exhausted),
            "revoked" => Ok(TokenStatus::Revoked),
            _ => Err(EnumParseError::new("token status", s)),
        }
    }
}

// ============================================================================
// ADMINS
// ============================================================================

/// Console operator role. Gates UI affordances only; the backend authorizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    SuperAdmin,
    OpsAdmin,
    #[default]
    Viewer,
}

impl AdminRole {
    pub const ALL: [AdminRole; 3] = [Self::SuperAdmin, Self::OpsAdmin, Self::Viewer];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::SuperAdmin => "super_admin",
            AdminRole::OpsAdmin => "ops_admin",
            AdminRole::Viewer => "viewer",
        }
    }

    pub fn from_wire(s: &str) -> Result<Self, EnumParseError> {
        match normalize(s).as_str() {
            "super_admin" => Ok(AdminRole::SuperAdmin),
            "ops_admin" => Ok(AdminRole::OpsAdmin),
            "viewer" => Ok(AdminRole::Viewer),
            _ => Err(EnumParseError::new("admin role", s)),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AdminRole::SuperAdmin => "Super Admin",
            AdminRole::OpsAdmin => "Ops Admin",
            AdminRole::Viewer => "Viewer",
        }
    }

    pub fn is_super_admin(&self) -> bool {
        matches!(self, AdminRole::SuperAdmin)
    }
}

// ============================================================================
// AUDIT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditActorType {
    Admin,
    Agent,
    System,
}

impl AuditActorType {
    pub const ALL: [AuditActorType; 3] = [Self::Admin, Self::Agent, Self::System];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuditActorType::Admin => "admin",
            AuditActorType::Agent => "agent",
            AuditActorType::System => "system",
        }
    }

    pub fn from_wire(s: &str) -> Result<Self, EnumParseError> {
        match normalize(s).as_str() {
            "admin" => Ok(AuditActorType::Admin),
            "agent" => Ok(AuditActorType::Agent),
            "system" => Ok(AuditActorType::System),
            _ => Err(EnumParseError::new("audit actor type", s)),
        }
    }
}

/// Known audit actions. Log rows carry the raw string so that actions added
/// on the backend still render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditAction {
    #[serde(rename = "agent.register")]
    AgentRegister,
    #[serde(rename = "agent.heartbeat")]
    AgentHeartbeat,
    #[serde(rename = "agent.drain")]
    AgentDrain,
    #[serde(rename = "agent.uncordon")]
    AgentUncordon,
    #[serde(rename = "agent.delete")]
    AgentDelete,
    #[serde(rename = "job.create")]
    JobCreate,
    #[serde(rename = "job.assign")]
    JobAssign,
    #[serde(rename = "job.complete")]
    JobComplete,
    #[serde(rename = "job.fail")]
    JobFail,
    #[serde(rename = "job.cancel")]
    JobCancel,
    #[serde(rename = "job.timeout")]
    JobTimeout,
    #[serde(rename = "token.create")]
    TokenCreate,
    #[serde(rename = "token.use")]
    TokenUse,
    #[serde(rename = "token.revoke")]
    TokenRevoke,
    #[serde(rename = "admin.create")]
    AdminCreate,
    #[serde(rename = "admin.update")]
    AdminUpdate,
    #[serde(rename = "admin.delete")]
    AdminDelete,
    #[serde(rename = "admin.login")]
    AdminLogin,
    #[serde(rename = "admin.rotate_key")]
    AdminRotateKey,
}

impl AuditAction {
    pub const ALL: [AuditAction; 19] = [
        Self::AgentRegister,
        Self::AgentHeartbeat,
        Self::AgentDrain,
        Self::AgentUncordon,
        Self::AgentDelete,
        Self::JobCreate,
        Self::JobAssign,
        Self::JobComplete,
        Self::JobFail,
        Self::JobCancel,
        Self::JobTimeout,
        Self::TokenCreate,
        Self::TokenUse,
        Self::TokenRevoke,
        Self::AdminCreate,
        Self::AdminUpdate,
        Self::AdminDelete,
        Self::AdminLogin,
        Self::AdminRotateKey,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::AgentRegister => "agent.register",
            AuditAction::AgentHeartbeat => "agent.heartbeat",
            AuditAction::AgentDrain => "agent.drain",
            AuditAction::AgentUncordon => "agent.uncordon",
            AuditAction::AgentDelete => "agent.delete",
            AuditAction::JobCreate => "job.create",
            AuditAction::JobAssign => "job.assign",
            AuditAction::JobComplete => "job.complete",
            AuditAction::JobFail => "job.fail",
            AuditAction::JobCancel => "job.cancel",
            AuditAction::JobTimeout => "job.timeout",
            AuditAction::TokenCreate => "token.create",
            AuditAction::TokenUse => "token.use",
            AuditAction::TokenRevoke => "token.revoke",
            AuditAction::AdminCreate => "admin.create",
            AuditAction::AdminUpdate => "admin.update",
            AuditAction::AdminDelete => "admin.delete",
            AuditAction::AdminLogin => "admin.login",
            AuditAction::AdminRotateKey => "admin.rotate_key",
        }
    }

    pub fn from_wire(s: &str) -> Result<Self, EnumParseError> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|action| action.as_str() == wanted)
            .ok_or_else(|| EnumParseError::new("audit action", s))
    }

    /// Resource family prefix, e.g. `agent` for `agent.drain`.
    pub fn family(&self) -> &'static str {
        let s = self.as_str();
        match s.split_once('.') {
            Some((family, _)) => family,
            None => s,
        }
    }

    pub fn is_destructive(&self) -> bool {
        matches!(
            self,
            AuditAction::AgentDelete
                | AuditAction::AdminDelete
                | AuditAction::TokenRevoke
                | AuditAction::JobFail
                | AuditAction::JobTimeout
        )
    }
}

macro_rules! impl_wire_string {
    ($($type:ty),* $(,)?) => {
        $(
            impl fmt::Display for $type {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.as_str())
                }
            }

            impl FromStr for $type {
                type Err = EnumParseError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    Self::from_wire(s)
                }
            }
        )*
    };
}

impl_wire_string!(
    AgentStatus,
    AgentHealth,
    JobType,
    JobStatus,
    TokenStatus,
    AdminRole,
    AuditActorType,
    AuditAction,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_status_affordances() {
        assert!(JobStatus::Running.is_live());
        assert!(JobStatus::Queued.is_live());
        assert!(!JobStatus::Pending.is_live());

        assert!(JobStatus::Pending.is_cancellable());
        assert!(!JobStatus::Assigned.is_cancellable());
        assert!(!JobStatus::Completed.is_cancellable());

        assert!(JobStatus::Failed.is_retryable());
        assert!(JobStatus::Timeout.is_retryable());
        assert!(!JobStatus::Cancelled.is_retryable());
    }

    #[test]
    fn test_serde_matches_wire_strings() {
        let json = serde_json::to_string(&AdminRole::SuperAdmin).unwrap();
        assert_eq!(json, "\"super_admin\"");
        let json = serde_json::to_string(&JobType::HealthCheck).unwrap();
        assert_eq!(json, "\"health_check\"");
        let json = serde_json::to_string(&AuditAction::AdminRotateKey).unwrap();
        assert_eq!(json, "\"admin.rotate_key\"");
    }

    #[test]
    fn test_from_str_is_lenient_about_case_and_dashes() {
        assert_eq!("Super-Admin".parse::<AdminRole>(), Ok(AdminRole::SuperAdmin));
        assert_eq!(" RUNNING ".parse::<JobStatus>(), Ok(JobStatus::Running));
        assert_eq!("canceled".parse::<JobStatus>(), Ok(JobStatus::Cancelled));
        assert!("draining".parse::<AgentStatus>().is_err());
    }

    #[test]
    fn test_audit_action_family() {
        assert_eq!(AuditAction::TokenRevoke.family(), "token");
        assert_eq!(AuditAction::AdminRotateKey.family(), "admin");
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_job_status_round_trips(idx in 0usize..JobStatus::ALL.len()) {
            let status = JobStatus::ALL[idx];
            prop_assert_eq!(status.to_string().parse::<JobStatus>(), Ok(status));
            let json = serde_json::to_string(&status).unwrap();
            prop_assert_eq!(json, format!("\"{}\"", status.as_str()));
        }

        #[test]
        fn prop_audit_action_round_trips(idx in 0usize..AuditAction::ALL.len()) {
            let action = AuditAction::ALL[idx];
            prop_assert_eq!(action.as_str().parse::<AuditAction>(), Ok(action));
        }

        #[test]
        fn prop_terminal_jobs_are_never_live(idx in 0usize..JobStatus::ALL.len()) {
            let status = JobStatus::ALL[idx];
            if status.is_terminal() {
                prop_assert!(!status.is_live());
                prop_assert!(!status.is_cancellable());
            }
        }
    }
}
