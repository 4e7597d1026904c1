//! Rediver Test Utilities
//!
//! Shared test infrastructure for the workspace:
//! - A scripted HTTP transport that records every request
//! - JSON fixtures shaped like real admin API payloads
//! - Proptest generators for the status vocabularies

pub use rediver_client::http::{Method, StatusCode};
pub use rediver_client::{ApiClient, HttpRequest, HttpResponse, HttpTransport};
pub use rediver_core::{AdminRole, AgentHealth, AgentStatus, JobStatus, JobType};

use async_trait::async_trait;
use rediver_client::ApiClientError;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

// ============================================================================
// MOCK TRANSPORT
// ============================================================================

/// What the mock answers for a route.
#[derive(Debug, Clone)]
pub enum MockReply {
    Response(HttpResponse),
    /// No response at all, as when the server is unreachable.
    TransportError(String),
}

impl MockReply {
    pub fn json(status: StatusCode, body: serde_json::Value) -> Self {
        Self::Response(HttpResponse::new(status, body.to_string()))
    }

    pub fn ok(body: serde_json::Value) -> Self {
        Self::json(StatusCode::OK, body)
    }

    pub fn no_content() -> Self {
        Self::Response(HttpResponse::new(StatusCode::NO_CONTENT, Vec::new()))
    }

    pub fn raw(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self::Response(HttpResponse::new(status, body))
    }

    /// Structured `{code, message}` error body.
    pub fn api_error(status: StatusCode, code: &str, message: &str) -> Self {
        Self::json(
            status,
            serde_json::json!({ "code": code, "message": message }),
        )
    }

    pub fn unreachable() -> Self {
        Self::TransportError("connection refused".to_string())
    }
}

#[derive(Debug)]
struct Route {
    method: Method,
    path: String,
    queued: VecDeque<MockReply>,
    standing: Option<MockReply>,
}

/// Scripted [`HttpTransport`] keyed by method and path (query excluded).
///
/// One-shot replies are consumed in order before the standing reply. An
/// unscripted request gets a structured 404.
#[derive(Debug, Default)]
pub struct MockTransport {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answer every matching request with `reply`.
    pub fn on(&self, method: Method, path: &str, reply: MockReply) -> &Self {
        self.with_route(method, path, |route| route.standing = Some(reply));
        self
    }

    /// Answer the next matching request with `reply`.
    pub fn once(&self, method: Method, path: &str, reply: MockReply) -> &Self {
        self.with_route(method, path, |route| route.queued.push_back(reply));
        self
    }

    fn with_route(&self, method: Method, path: &str, apply: impl FnOnce(&mut Route)) {
        let mut routes = self.routes.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(route) = routes
            .iter_mut()
            .find(|r| r.method == method && r.path == path)
        {
            apply(route);
            return;
        }
        let mut route = Route {
            method,
            path: path.to_string(),
            queued: VecDeque::new(),
            standing: None,
        };
        apply(&mut route);
        routes.push(route);
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn calls(&self, method: Method, path: &str) -> usize {
        self.requests_to(method, path).len()
    }

    pub fn requests_to(&self, method: Method, path: &str) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests().pop()
    }

    pub fn reset_requests(&self) {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    fn reply_for(&self, request: &HttpRequest) -> MockReply {
        let mut routes = self.routes.lock().unwrap_or_else(|e| e.into_inner());
        let route = routes
            .iter_mut()
            .find(|r| r.method == request.method && r.path == request.path);
        match route {
            Some(route) => match route.queued.pop_front() {
                Some(reply) => reply,
                None => route.standing.clone().unwrap_or_else(|| not_scripted(request)),
            },
            None => not_scripted(request),
        }
    }
}

fn not_scripted(request: &HttpRequest) -> MockReply {
    MockReply::api_error(
        StatusCode::NOT_FOUND,
        "NOT_FOUND",
        &format!("no mock for {} {}", request.method, request.path),
    )
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiClientError> {
        let reply = self.reply_for(&request);
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);
        match reply {
            MockReply::Response(response) => Ok(response),
            MockReply::TransportError(message) => Err(ApiClientError::transport(message)),
        }
    }
}

/// An [`ApiClient`] wired to `transport`.
pub fn mock_client(transport: &Arc<MockTransport>) -> ApiClient {
    ApiClient::new(transport.clone())
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! JSON payloads shaped like the admin API's responses.

    use super::*;
    use serde_json::{json, Value};
    use uuid::Uuid;

    pub const VALID_KEY: &str = "rdv_admin_test_key_0001";
    pub const TIMESTAMP: &str = "2026-03-01T12:00:00Z";

    pub fn auth_response(role: AdminRole) -> Value {
        json!({
            "id": Uuid::new_v4(),
            "email": "ops@rediver.test",
            "name": "Ops Admin",
            "role": role.as_str(),
        })
    }

    pub fn agent(name: &str, status: AgentStatus, health: AgentHealth) -> Value {
        json!({
            "id": Uuid::new_v4(),
            "name": name,
            "type": "runner",
            "status": status.as_str(),
            "health": health.as_str(),
            "region": "eu-west-1",
            "capabilities": ["sast", "sca"],
            "tools": ["semgrep", "trivy"],
            "version": "1.4.2",
            "max_concurrent_jobs": 4,
            "current_jobs": 1,
            "cpu_percent": 37.5,
            "memory_percent": 61.0,
            "disk_read_mbps": 2.5,
            "disk_write_mbps": 1.0,
            "last_heartbeat_at": TIMESTAMP,
            "created_at": TIMESTAMP,
            "updated_at": TIMESTAMP,
        })
    }

    pub fn job(status: JobStatus) -> Value {
        json!({
            "id": Uuid::new_v4(),
            "tenant_id": Uuid::new_v4(),
            "tenant_name": "acme",
            "type": JobType::Scan.as_str(),
            "status": status.as_str(),
            "scanner_name": "semgrep",
            "target": "github.com/acme/api",
            "priority": 5,
            "progress": if status == JobStatus::Completed { 100 } else { 40 },
            "timeout_seconds": 3600,
            "created_at": TIMESTAMP,
            "updated_at": TIMESTAMP,
        })
    }

    pub fn token(prefix: &str, expired: bool, exhausted: bool) -> Value {
        json!({
            "id": Uuid::new_v4(),
            "token_prefix": prefix,
            "description": "staging runners",
            "max_uses": 5,
            "current_uses": if exhausted { 5 } else { 1 },
            "expires_at": "2026-03-02T12:00:00Z",
            "allowed_regions": [],
            "created_by_id": Uuid::new_v4(),
            "created_at": TIMESTAMP,
            "is_expired": expired,
            "is_exhausted": exhausted,
        })
    }

    pub fn admin(email: &str, role: AdminRole, active: bool) -> Value {
        json!({
            "id": Uuid::new_v4(),
            "email": email,
            "name": email.split('@').next().unwrap_or(email),
            "role": role.as_str(),
            "is_active": active,
            "created_at": TIMESTAMP,
            "updated_at": TIMESTAMP,
        })
    }

    pub fn audit_log(action: &str) -> Value {
        json!({
            "id": Uuid::new_v4(),
            "action": action,
            "actor_type": "admin",
            "actor_id": Uuid::new_v4(),
            "actor_name": "ops@rediver.test",
            "resource_type": "agent",
            "resource_id": Uuid::new_v4().to_string(),
            "details": {"reason": "maintenance"},
            "ip_address": "10.0.0.4",
            "created_at": TIMESTAMP,
        })
    }

    pub fn mapping(target_type: &str, asset_type: &str) -> Value {
        json!({
            "id": Uuid::new_v4(),
            "target_type": target_type,
            "asset_type": asset_type,
            "is_primary": true,
            "is_active": true,
            "description": null,
            "created_at": TIMESTAMP,
            "updated_at": TIMESTAMP,
        })
    }

    /// List envelope around `data`.
    pub fn page(data: Vec<Value>, total: u64, page: u32, per_page: u32) -> Value {
        let total_pages = rediver_core::total_pages(total, per_page);
        json!({
            "data": data,
            "total": total,
            "page": page,
            "per_page": per_page,
            "total_pages": total_pages,
        })
    }

    pub fn empty_page(per_page: u32) -> Value {
        page(Vec::new(), 0, 1, per_page)
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for admin API vocabularies.

    use super::*;
    use proptest::prelude::*;
    use uuid::Uuid;

    pub fn arb_uuid() -> impl Strategy<Value = Uuid> {
        any::<[u8; 16]>().prop_map(Uuid::from_bytes)
    }

    pub fn arb_agent_status() -> impl Strategy<Value = AgentStatus> {
        prop::sample::select(AgentStatus::ALL.to_vec())
    }

    pub fn arb_agent_health() -> impl Strategy<Value = AgentHealth> {
        prop::sample::select(AgentHealth::ALL.to_vec())
    }

    pub fn arb_job_status() -> impl Strategy<Value = JobStatus> {
        prop::sample::select(JobStatus::ALL.to_vec())
    }

    pub fn arb_admin_role() -> impl Strategy<Value = AdminRole> {
        prop::sample::select(AdminRole::ALL.to_vec())
    }

    /// Success statuses other than 204.
    pub fn arb_success_status() -> impl Strategy<Value = StatusCode> {
        (200u16..=299)
            .prop_filter("204 carries no body", |code| *code != 204)
            .prop_filter_map("valid status", |code| StatusCode::from_u16(code).ok())
    }

    /// Any status outside the 2xx range.
    pub fn arb_failure_status() -> impl Strategy<Value = StatusCode> {
        prop_oneof![100u16..=199, 300u16..=599]
            .prop_filter_map("valid status", |code| StatusCode::from_u16(code).ok())
    }

    /// API keys that survive header encoding.
    pub fn arb_api_key() -> impl Strategy<Value = String> {
        "rdv_[A-Za-z0-9_]{8,40}"
    }
}
