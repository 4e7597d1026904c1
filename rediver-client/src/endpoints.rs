//! Admin API endpoints.

use crate::client::{ApiClient, RequestOptions};
use crate::error::ApiClientError;
use rediver_core::{
    Admin, AdminId, Agent, AgentId, AgentStats, AuditLog, AuditLogId, AuditLogStats,
    AuthResponse, BootstrapToken, CreateAdminRequest, CreateBootstrapTokenRequest,
    CreateTargetMappingRequest, CreatedAdmin, CreatedBootstrapToken, Job, JobId, JobStats,
    ListAdminsParams, ListAgentsParams, ListAuditLogsParams, ListJobsParams, ListMappingsParams,
    ListTokensParams, MappingId, Page, PlatformStats, RotatedApiKey, TargetAssetTypeMapping,
    TargetMappingStats, TokenId, UpdateAdminRequest, UpdateTargetMappingRequest,
};
use serde::de::IgnoredAny;

pub const ADMIN_API_PREFIX: &str = "/api/v1/admin";

fn admin_path(suffix: &str) -> String {
    format!("{ADMIN_API_PREFIX}{suffix}")
}

impl ApiClient {
    async fn get<T: serde::de::DeserializeOwned>(&self, suffix: &str) -> Result<T, ApiClientError> {
        self.request(&admin_path(suffix), RequestOptions::get()).await
    }

    async fn list<T, Q>(&self, suffix: &str, params: &Q) -> Result<Page<T>, ApiClientError>
    where
        T: serde::de::DeserializeOwned,
        Q: serde::Serialize,
    {
        self.request(&admin_path(suffix), RequestOptions::get().query(params)?)
            .await
    }

    async fn delete_resource(&self, suffix: &str) -> Result<(), ApiClientError> {
        self.request::<IgnoredAny>(&admin_path(suffix), RequestOptions::delete())
            .await
            .map(|_| ())
    }

    // ========================================================================
    // AUTH
    // ========================================================================

    pub async fn validate_api_key(&self) -> Result<AuthResponse, ApiClientError> {
        self.get("/auth/validate").await
    }

    // ========================================================================
    // DASHBOARD
    // ========================================================================

    /// Agent and job stats fetched together. Either side failing is logged
    /// and replaced by zeroes.
    pub async fn platform_stats(&self) -> PlatformStats {
        let (agents, jobs) = tokio::join!(self.get_agent_stats(), self.get_job_stats());
        let agents = agents
            .map_err(|err| tracing::warn!(error = %err, "agent stats unavailable"))
            .ok();
        let jobs = jobs
            .map_err(|err| tracing::warn!(error = %err, "job stats unavailable"))
            .ok();
        PlatformStats::from_parts(agents, jobs)
    }

    // ========================================================================
    // AGENTS
    // ========================================================================

    pub async fn list_agents(&self, params: &ListAgentsParams) -> Result<Page<Agent>, ApiClientError> {
        self.list("/agents", params).await
    }

    pub async fn get_agent(&self, id: AgentId) -> Result<Agent, ApiClientError> {
        self.get(&format!("/agents/{id}")).await
    }

    pub async fn get_agent_stats(&self) -> Result<AgentStats, ApiClientError> {
        self.get("/agents/stats").await
    }

    /// Stop scheduling new work onto the agent. The updated agent is returned
    /// when the backend sends one.
    pub async fn drain_agent(&self, id: AgentId) -> Result<Option<Agent>, ApiClientError> {
        self.request(&admin_path(&format!("/agents/{id}/drain")), RequestOptions::post())
            .await
    }

    pub async fn uncordon_agent(&self, id: AgentId) -> Result<Option<Agent>, ApiClientError> {
        self.request(&admin_path(&format!("/agents/{id}/uncordon")), RequestOptions::post())
            .await
    }

    pub async fn delete_agent(&self, id: AgentId) -> Result<(), ApiClientError> {
        self.delete_resource(&format!("/agents/{id}")).await
    }

    // ========================================================================
    // JOBS
    // ========================================================================

    pub async fn list_jobs(&self, params: &ListJobsParams) -> Result<Page<Job>, ApiClientError> {
        self.list("/jobs", params).await
    }

    pub async fn get_job(&self, id: JobId) -> Result<Job, ApiClientError> {
        self.get(&format!("/jobs/{id}")).await
    }

    pub async fn get_job_stats(&self) -> Result<JobStats, ApiClientError> {
        self.get("/jobs/stats").await
    }

    pub async fn cancel_job(&self, id: JobId) -> Result<Option<Job>, ApiClientError> {
        self.request(&admin_path(&format!("/jobs/{id}/cancel")), RequestOptions::post())
            .await
    }

    pub async fn retry_job(&self, id: JobId) -> Result<Option<Job>, ApiClientError> {
        self.request(&admin_path(&format!("/jobs/{id}/retry")), RequestOptions::post())
            .await
    }

    // ========================================================================
    // BOOTSTRAP TOKENS
    // ========================================================================

    pub async fn list_tokens(
        &self,
        params: &ListTokensParams,
    ) -> Result<Page<BootstrapToken>, ApiClientError> {
        self.list("/tokens", params).await
    }

    /// The returned token value is shown once and cannot be fetched again.
    pub async fn create_token(
        &self,
        body: &CreateBootstrapTokenRequest,
    ) -> Result<CreatedBootstrapToken, ApiClientError> {
        body.validate()
            .map_err(|err| ApiClientError::invalid_request(err.to_string()))?;
        self.request(&admin_path("/tokens"), RequestOptions::post().json(body)?)
            .await
    }

    pub async fn revoke_token(&self, id: TokenId) -> Result<(), ApiClientError> {
        self.delete_resource(&format!("/tokens/{id}")).await
    }

    // ========================================================================
    // ADMINS
    // ========================================================================

    pub async fn list_admins(&self, params: &ListAdminsParams) -> Result<Page<Admin>, ApiClientError> {
        self.list("/admins", params).await
    }

    pub async fn create_admin(&self, body: &CreateAdminRequest) -> Result<CreatedAdmin, ApiClientError> {
        body.validate()
            .map_err(|err| ApiClientError::invalid_request(err.to_string()))?;
        self.request(&admin_path("/admins"), RequestOptions::post().json(body)?)
            .await
    }

    pub async fn update_admin(
        &self,
        id: AdminId,
        body: &UpdateAdminRequest,
    ) -> Result<Admin, ApiClientError> {
        self.request(
            &admin_path(&format!("/admins/{id}")),
            RequestOptions::patch().json(body)?,
        )
        .await
    }

    pub async fn delete_admin(&self, id: AdminId) -> Result<(), ApiClientError> {
        self.delete_resource(&format!("/admins/{id}")).await
    }

    pub async fn rotate_admin_key(&self, id: AdminId) -> Result<RotatedApiKey, ApiClientError> {
        self.request(
            &admin_path(&format!("/admins/{id}/rotate-key")),
            RequestOptions::post(),
        )
        .await
    }

    // ========================================================================
    // AUDIT LOGS
    // ========================================================================

    pub async fn list_audit_logs(
        &self,
        params: &ListAuditLogsParams,
    ) -> Result<Page<AuditLog>, ApiClientError> {
        self.list("/audit-logs", params).await
    }

    pub async fn get_audit_log(&self, id: AuditLogId) -> Result<AuditLog, ApiClientError> {
        self.get(&format!("/audit-logs/{id}")).await
    }

    pub async fn get_audit_log_stats(&self) -> Result<AuditLogStats, ApiClientError> {
        self.get("/audit-logs/stats").await
    }

    // ========================================================================
    // TARGET MAPPINGS
    // ========================================================================

    pub async fn list_target_mappings(
        &self,
        params: &ListMappingsParams,
    ) -> Result<Page<TargetAssetTypeMapping>, ApiClientError> {
        self.list("/target-mappings", params).await
    }

    pub async fn get_target_mapping(
        &self,
        id: MappingId,
    ) -> Result<TargetAssetTypeMapping, ApiClientError> {
        self.get(&format!("/target-mappings/{id}")).await
    }

    pub async fn create_target_mapping(
        &self,
        body: &CreateTargetMappingRequest,
    ) -> Result<TargetAssetTypeMapping, ApiClientError> {
        body.validate()
            .map_err(|err| ApiClientError::invalid_request(err.to_string()))?;
        self.request(
            &admin_path("/target-mappings"),
            RequestOptions::post().json(body)?,
        )
        .await
    }

    pub async fn update_target_mapping(
        &self,
        id: MappingId,
        body: &UpdateTargetMappingRequest,
    ) -> Result<TargetAssetTypeMapping, ApiClientError> {
        body.validate()
            .map_err(|err| ApiClientError::invalid_request(err.to_string()))?;
        self.request(
            &admin_path(&format!("/target-mappings/{id}")),
            RequestOptions::patch().json(body)?,
        )
        .await
    }

    pub async fn delete_target_mapping(&self, id: MappingId) -> Result<(), ApiClientError> {
        self.delete_resource(&format!("/target-mappings/{id}")).await
    }

    pub async fn get_target_mapping_stats(&self) -> Result<TargetMappingStats, ApiClientError> {
        self.get("/target-mappings/stats").await
    }
}
