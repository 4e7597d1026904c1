//! Mutations issued from the console.
//!
//! Every mutation follows one pattern: issue the call, announce the result,
//! then re-fetch the view that owns the entity exactly once. A failure leaves
//! the view untouched. Calls that return a one-time secret hand it back as a
//! [`SecretReveal`] for the reveal modal and nowhere else.

use crate::events::TuiEvent;
use crate::nav::View;
use rediver_client::{ApiClient, ApiClientError};
use rediver_core::{
    AdminId, AgentId, CreateAdminRequest, CreateBootstrapTokenRequest,
    CreateTargetMappingRequest, JobId, MappingId, RevealedSecret, TokenId, UpdateAdminRequest,
    UpdateTargetMappingRequest,
};
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    DrainAgent { id: AgentId, name: String },
    UncordonAgent { id: AgentId, name: String },
    DeleteAgent { id: AgentId, name: String },
    CancelJob { id: JobId },
    RetryJob { id: JobId },
    CreateToken(CreateBootstrapTokenRequest),
    RevokeToken { id: TokenId, prefix: String },
    CreateAdmin(CreateAdminRequest),
    SetAdminActive { id: AdminId, name: String, active: bool },
    DeleteAdmin { id: AdminId, name: String },
    RotateAdminKey { id: AdminId, name: String },
    CreateMapping(CreateTargetMappingRequest),
    UpdateMapping { id: MappingId, body: UpdateTargetMappingRequest },
    DeleteMapping { id: MappingId, label: String },
}

/// A one-time secret on its way to the reveal modal.
#[derive(Debug)]
pub struct SecretReveal {
    pub title: String,
    pub secret: RevealedSecret,
}

#[derive(Debug)]
pub enum MutationEffect {
    Done,
    Reveal(SecretReveal),
}

#[derive(Debug)]
pub struct MutationOutcome {
    pub mutation: Mutation,
    pub result: Result<MutationEffect, ApiClientError>,
}

impl Mutation {
    /// The list view that owns the affected entity.
    pub fn owner(&self) -> View {
        match self {
            Mutation::DrainAgent { .. }
            | Mutation::UncordonAgent { .. }
            | Mutation::DeleteAgent { .. } => View::Agents,
            Mutation::CancelJob { .. } | Mutation::RetryJob { .. } => View::Jobs,
            Mutation::CreateToken(_) | Mutation::RevokeToken { .. } => View::Tokens,
            Mutation::CreateAdmin(_)
            | Mutation::SetAdminActive { .. }
            | Mutation::DeleteAdmin { .. }
            | Mutation::RotateAdminKey { .. } => View::Admins,
            Mutation::CreateMapping(_)
            | Mutation::UpdateMapping { .. }
            | Mutation::DeleteMapping { .. } => View::TargetMappings,
        }
    }

    /// The entity this mutation removes, if it removes one.
    pub fn deletes(&self) -> Option<rediver_core::EntityId> {
        match self {
            Mutation::DeleteAgent { id, .. }
            | Mutation::DeleteAdmin { id, .. }
            | Mutation::DeleteMapping { id, .. } => Some(*id),
            _ => None,
        }
    }

    /// Confirmation prompt for mutations that need one.
    pub fn confirmation(&self) -> Option<String> {
        match self {
            Mutation::DrainAgent { name, .. } => Some(format!(
                "Drain agent {name}? It will stop accepting new jobs."
            )),
            Mutation::DeleteAgent { name, .. } => {
                Some(format!("Delete agent {name}? This cannot be undone."))
            }
            Mutation::CancelJob { .. } => Some("Cancel this job?".to_string()),
            Mutation::RevokeToken { prefix, .. } => Some(format!(
                "Revoke token {prefix}…? Agents can no longer register with it."
            )),
            Mutation::DeleteAdmin { name, .. } => {
                Some(format!("Delete admin {name}? This cannot be undone."))
            }
            Mutation::RotateAdminKey { name, .. } => Some(format!(
                "Rotate the API key for {name}? The current key stops working immediately."
            )),
            Mutation::DeleteMapping { label, .. } => Some(format!("Delete mapping {label}?")),
            _ => None,
        }
    }

    pub fn success_message(&self) -> String {
        match self {
            Mutation::DrainAgent { name, .. } => format!("Agent {name} is now draining"),
            Mutation::UncordonAgent { name, .. } => format!("Agent {name} is now online"),
            Mutation::DeleteAgent { name, .. } => format!("Agent {name} deleted"),
            Mutation::CancelJob { .. } => "Job cancelled".to_string(),
            Mutation::RetryJob { .. } => "Job queued for retry".to_string(),
            Mutation::CreateToken(_) => "Bootstrap token created".to_string(),
            Mutation::RevokeToken { .. } => "Token revoked".to_string(),
            Mutation::CreateAdmin(_) => "Admin created".to_string(),
            Mutation::SetAdminActive { active, .. } => {
                if *active { "Admin activated" } else { "Admin deactivated" }.to_string()
            }
            Mutation::DeleteAdmin { .. } => "Admin deleted".to_string(),
            Mutation::RotateAdminKey { .. } => "API key rotated".to_string(),
            Mutation::CreateMapping(_) => "Target mapping created".to_string(),
            Mutation::UpdateMapping { .. } => "Target mapping updated".to_string(),
            Mutation::DeleteMapping { .. } => "Target mapping deleted".to_string(),
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            Mutation::DrainAgent { .. } => "Failed to drain agent",
            Mutation::UncordonAgent { .. } => "Failed to uncordon agent",
            Mutation::DeleteAgent { .. } => "Failed to delete agent",
            Mutation::CancelJob { .. } => "Failed to cancel job",
            Mutation::RetryJob { .. } => "Failed to retry job",
            Mutation::CreateToken(_) => "Failed to create token",
            Mutation::RevokeToken { .. } => "Failed to revoke token",
            Mutation::CreateAdmin(_) => "Failed to create admin",
            Mutation::SetAdminActive { .. } => "Failed to update admin",
            Mutation::DeleteAdmin { .. } => "Failed to delete admin",
            Mutation::RotateAdminKey { .. } => "Failed to rotate API key",
            Mutation::CreateMapping(_) => "Failed to create target mapping",
            Mutation::UpdateMapping { .. } => "Failed to update target mapping",
            Mutation::DeleteMapping { .. } => "Failed to delete target mapping",
        }
    }

    pub async fn execute(&self, api: &ApiClient) -> Result<MutationEffect, ApiClientError> {
        match self {
            Mutation::DrainAgent { id, .. } => api.drain_agent(*id).await.map(|_| MutationEffect::Done),
            Mutation::UncordonAgent { id, .. } => {
                api.uncordon_agent(*id).await.map(|_| MutationEffect::Done)
            }
            Mutation::DeleteAgent { id, .. } => api.delete_agent(*id).await.map(|_| MutationEffect::Done),
            Mutation::CancelJob { id } => api.cancel_job(*id).await.map(|_| MutationEffect::Done),
            Mutation::RetryJob { id } => api.retry_job(*id).await.map(|_| MutationEffect::Done),
            Mutation::CreateToken(body) => {
                let created = api.create_token(body).await?;
                Ok(MutationEffect::Reveal(SecretReveal {
                    title: "Bootstrap token".to_string(),
                    secret: created.token,
                }))
            }
            Mutation::RevokeToken { id, .. } => api.revoke_token(*id).await.map(|_| MutationEffect::Done),
            Mutation::CreateAdmin(body) => {
                let created = api.create_admin(body).await?;
                Ok(MutationEffect::Reveal(SecretReveal {
                    title: format!("API key for {}", created.admin.email),
                    secret: created.api_key,
                }))
            }
            Mutation::SetAdminActive { id, active, .. } => {
                let body = UpdateAdminRequest {
                    is_active: Some(*active),
                    ..UpdateAdminRequest::default()
                };
                api.update_admin(*id, &body).await.map(|_| MutationEffect::Done)
            }
            Mutation::DeleteAdmin { id, .. } => api.delete_admin(*id).await.map(|_| MutationEffect::Done),
            Mutation::RotateAdminKey { id, name } => {
                let rotated = api.rotate_admin_key(*id).await?;
                Ok(MutationEffect::Reveal(SecretReveal {
                    title: format!("New API key for {name}"),
                    secret: rotated.api_key,
                }))
            }
            Mutation::CreateMapping(body) => api
                .create_target_mapping(body)
                .await
                .map(|_| MutationEffect::Done),
            Mutation::UpdateMapping { id, body } => api
                .update_target_mapping(*id, body)
                .await
                .map(|_| MutationEffect::Done),
            Mutation::DeleteMapping { id, .. } => api
                .delete_target_mapping(*id)
                .await
                .map(|_| MutationEffect::Done),
        }
    }
}

/// Run `mutation` in the background and report through `events`.
pub fn spawn_mutation(mutation: Mutation, api: &ApiClient, events: &mpsc::Sender<TuiEvent>) {
    let api = api.clone();
    let events = events.clone();
    tracing::info!(owner = mutation.owner().title(), "issuing mutation");
    tokio::spawn(async move {
        let result = mutation.execute(&api).await;
        let _ = events
            .send(TuiEvent::Mutation(MutationOutcome { mutation, result }))
            .await;
    });
}
