//! Query parameters, request bodies and one-time reveal responses.
//!
//! Query structs serialize with `None` fields omitted, so only filters that
//! are actually set reach the wire.

use crate::entities::Admin;
use crate::enums::{AdminRole, AgentHealth, AgentStatus, AuditAction, AuditActorType, JobStatus, TokenStatus};
use crate::error::ValidationError;
use crate::identity::{AgentId, EntityId, TenantId, Timestamp, TokenId};
use crate::secret::RevealedSecret;
use serde::{Deserialize, Serialize};

// ============================================================================
// LIST PARAMETERS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListAgentsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AgentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<AgentHealth>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListJobsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<AgentId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<TenantId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListTokensParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TokenStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListAdminsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

/// Audit log query. The actor id is sent under both `actor_id` and
/// `admin_id`; older backends only read the latter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListAuditLogsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<AuditAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_type: Option<AuditActorType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<EntityId>,
    /// Mirror of `actor_id`; set both through [`ListAuditLogsParams::with_actor`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

impl ListAuditLogsParams {
    pub fn with_actor(mut self, actor_id: Option<EntityId>) -> Self {
        self.actor_id = actor_id;
        self.admin_id = actor_id;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListMappingsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_primary: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

// ============================================================================
// REQUEST BODIES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateBootstrapTokenRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub max_uses: u32,
    pub expires_in_hours: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_regions: Vec<String>,
}

impl CreateBootstrapTokenRequest {
    pub const DEFAULT_MAX_USES: u32 = 5;
    pub const DEFAULT_EXPIRES_IN_HOURS: u32 = 24;

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_uses == 0 {
            return Err(ValidationError::invalid("max_uses", "Max uses must be at least 1"));
        }
        if self.expires_in_hours == 0 {
            return Err(ValidationError::invalid(
                "expires_in_hours",
                "Expiry must be at least 1 hour",
            ));
        }
        Ok(())
    }
}

impl Default for CreateBootstrapTokenRequest {
    fn default() -> Self {
        Self {
            description: None,
            max_uses: Self::DEFAULT_MAX_USES,
            expires_in_hours: Self::DEFAULT_EXPIRES_IN_HOURS,
            allowed_regions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateAdminRequest {
    pub email: String,
    pub name: String,
    pub role: AdminRole,
}

impl CreateAdminRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.email.trim().is_empty() || self.name.trim().is_empty() {
            return Err(ValidationError::invalid("email", "Email and name are required"));
        }
        if !self.email.contains('@') {
            return Err(ValidationError::invalid("email", "Email address is not valid"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateAdminRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<AdminRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateTargetMappingRequest {
    pub target_type: String,
    pub asset_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_primary: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateTargetMappingRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_mapping_types(Some(&self.target_type), Some(&self.asset_type))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateTargetMappingRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_primary: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl UpdateTargetMappingRequest {
    /// Omitted types are left alone; a type that is sent must not be blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_mapping_types(self.target_type.as_deref(), self.asset_type.as_deref())
    }
}

fn require_mapping_types(
    target_type: Option<&str>,
    asset_type: Option<&str>,
) -> Result<(), ValidationError> {
    let blank = |value: Option<&str>| value.is_some_and(|v| v.trim().is_empty());
    let field = if blank(target_type) {
        "target_type"
    } else if blank(asset_type) {
        "asset_type"
    } else {
        return Ok(());
    };
    Err(ValidationError::invalid(
        field,
        "Target type and asset type are required",
    ))
}

// ============================================================================
// ONE-TIME REVEAL RESPONSES
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreatedBootstrapToken {
    pub token: RevealedSecret,
    pub token_id: TokenId,
}

#[derive(Debug, Deserialize)]
pub struct CreatedAdmin {
    pub admin: Admin,
    pub api_key: RevealedSecret,
}

#[derive(Debug, Deserialize)]
pub struct RotatedApiKey {
    pub api_key: RevealedSecret,
}
