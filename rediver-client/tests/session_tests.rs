//! Session store lifecycle and the auth gate.

use async_trait::async_trait;
use rediver_client::http::{Method, StatusCode};
use rediver_client::{
    ApiClient, ApiClientError, AuthGate, CredentialStore, FileCredentialStore, GateState,
    HttpRequest, HttpResponse, HttpTransport, MemoryCredentialStore, SessionError, SessionState,
    SessionStore,
};
use rediver_core::{AdminRole, Credential};
use rediver_test_utils::{fixtures, mock_client, MockReply, MockTransport};
use std::sync::Arc;
use tokio::sync::Notify;

const VALIDATE: &str = "/api/v1/admin/auth/validate";

fn session_with(
    transport: &Arc<MockTransport>,
    storage: Arc<dyn CredentialStore>,
) -> (SessionStore, ApiClient) {
    let api = mock_client(transport);
    (SessionStore::new(api.clone(), storage), api)
}

#[tokio::test]
async fn test_login_success_authenticates_and_persists_key_only() {
    let transport = MockTransport::new();
    transport.on(Method::GET, VALIDATE, MockReply::ok(fixtures::auth_response(AdminRole::OpsAdmin)));
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("credentials.json");
    let storage = Arc::new(FileCredentialStore::new(&path));
    let (session, api) = session_with(&transport, storage.clone());

    let principal = session.login(fixtures::VALID_KEY).await.unwrap();
    assert_eq!(principal.email, "ops@rediver.test");
    assert_eq!(principal.name, "Ops Admin");
    assert_eq!(principal.role, AdminRole::OpsAdmin);

    assert_eq!(transport.calls(Method::GET, VALIDATE), 1);
    assert!(session.is_authenticated());
    assert_eq!(session.principal(), Some(principal));
    assert!(api.has_api_key());
    assert_eq!(
        transport.last_request().unwrap().header("x-admin-api-key"),
        Some(fixtures::VALID_KEY)
    );

    let persisted: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(persisted, serde_json::json!({"api_key": fixtures::VALID_KEY}));
    assert_eq!(
        storage.load().unwrap(),
        Some(Credential::new(fixtures::VALID_KEY).unwrap())
    );
}

#[tokio::test]
async fn test_login_failure_clears_everything_and_records_message() {
    let transport = MockTransport::new();
    transport.on(
        Method::GET,
        VALIDATE,
        MockReply::api_error(StatusCode::UNAUTHORIZED, "INVALID_API_KEY", "Invalid API key"),
    );
    let storage = Arc::new(MemoryCredentialStore::new());
    let (session, api) = session_with(&transport, storage.clone());

    let err = session.login("rdv_wrong").await.unwrap_err();
    assert!(matches!(err, SessionError::Rejected(ref e) if e.status() == Some(401)));

    assert!(!session.is_authenticated());
    assert!(!session.has_credential());
    assert!(!api.has_api_key());
    assert!(storage.stored().is_none());
    assert_eq!(session.state().error(), Some("Invalid API key"));

    session.clear_error();
    assert_eq!(session.state(), SessionState::Unauthenticated { error: None });
}

#[tokio::test]
async fn test_login_transport_failure_uses_generic_message() {
    let transport = MockTransport::new();
    transport.on(Method::GET, VALIDATE, MockReply::unreachable());
    let (session, _) = session_with(&transport, Arc::new(MemoryCredentialStore::new()));

    session.login("rdv_key").await.unwrap_err();
    assert_eq!(session.state().error(), Some("Failed to authenticate"));
}

#[tokio::test]
async fn test_blank_key_rejected_without_network() {
    let transport = MockTransport::new();
    let (session, api) = session_with(&transport, Arc::new(MemoryCredentialStore::new()));

    let err = session.login("   ").await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidKey(_)));
    assert_eq!(transport.call_count(), 0);
    assert!(!api.has_api_key());
    assert_eq!(session.state().error(), Some("API key is required"));
}

#[tokio::test]
async fn test_validate_without_key_makes_no_call() {
    let transport = MockTransport::new();
    let (session, _) = session_with(&transport, Arc::new(MemoryCredentialStore::new()));

    assert!(!session.restore());
    let err = session.validate_session().await.unwrap_err();
    assert!(matches!(err, SessionError::NoCredential));
    assert_eq!(transport.call_count(), 0);
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_restored_key_is_revalidated_not_trusted() {
    let transport = MockTransport::new();
    transport.on(Method::GET, VALIDATE, MockReply::ok(fixtures::auth_response(AdminRole::SuperAdmin)));
    let storage = Arc::new(MemoryCredentialStore::with_credential(
        Credential::new(fixtures::VALID_KEY).unwrap(),
    ));
    let (session, api) = session_with(&transport, storage);

    assert!(session.restore());
    assert_eq!(session.state(), SessionState::Restored);
    assert!(!session.is_authenticated());
    assert!(session.principal().is_none());
    assert!(!api.has_api_key());

    let principal = session.validate_session().await.unwrap();
    assert!(principal.is_super_admin());
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn test_failed_revalidation_clears_session() {
    let transport = MockTransport::new();
    transport.once(Method::GET, VALIDATE, MockReply::ok(fixtures::auth_response(AdminRole::Viewer)));
    transport.on(
        Method::GET,
        VALIDATE,
        MockReply::api_error(StatusCode::UNAUTHORIZED, "KEY_REVOKED", "Key revoked"),
    );
    let storage = Arc::new(MemoryCredentialStore::new());
    let (session, api) = session_with(&transport, storage.clone());

    session.login(fixtures::VALID_KEY).await.unwrap();
    assert!(storage.stored().is_some());

    session.validate_session().await.unwrap_err();
    assert!(!session.is_authenticated());
    assert!(!session.has_credential());
    assert!(!api.has_api_key());
    assert!(storage.stored().is_none());
    // Revalidation does not surface a login error.
    assert_eq!(session.state().error(), None);
}

#[tokio::test]
async fn test_logout_is_unconditional_and_offline() {
    let transport = MockTransport::new();
    transport.on(Method::GET, VALIDATE, MockReply::ok(fixtures::auth_response(AdminRole::Viewer)));
    let storage = Arc::new(MemoryCredentialStore::new());
    let (session, api) = session_with(&transport, storage.clone());
    session.login(fixtures::VALID_KEY).await.unwrap();
    let calls = transport.call_count();

    session.logout();
    assert_eq!(transport.call_count(), calls);
    assert!(!session.is_authenticated());
    assert!(!session.has_credential());
    assert!(!api.has_api_key());
    assert!(storage.stored().is_none());

    // Idempotent.
    session.logout();
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_unknown_role_degrades_to_viewer() {
    let transport = MockTransport::new();
    transport.on(
        Method::GET,
        VALIDATE,
        MockReply::ok(serde_json::json!({
            "id": uuid::Uuid::new_v4(),
            "email": "a@b.c",
            "name": "A",
            "role": "auditor"
        })),
    );
    let (session, _) = session_with(&transport, Arc::new(MemoryCredentialStore::new()));

    let principal = session.login("rdv_key").await.unwrap();
    assert_eq!(principal.role, AdminRole::Viewer);
}

#[tokio::test]
async fn test_subscribers_observe_transitions() {
    let transport = MockTransport::new();
    transport.on(Method::GET, VALIDATE, MockReply::ok(fixtures::auth_response(AdminRole::Viewer)));
    let (session, _) = session_with(&transport, Arc::new(MemoryCredentialStore::new()));
    let mut rx = session.subscribe();

    session.login(fixtures::VALID_KEY).await.unwrap();
    assert!(rx.has_changed().unwrap());
    assert!(rx.borrow_and_update().is_authenticated());

    session.logout();
    assert!(!rx.borrow_and_update().is_authenticated());
}

/// Holds every validate call until released.
struct GatedTransport {
    release: Notify,
    inner: Arc<MockTransport>,
}

#[async_trait]
impl HttpTransport for GatedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiClientError> {
        self.release.notified().await;
        self.inner.send(request).await
    }
}

#[tokio::test]
async fn test_logout_during_validation_wins() {
    let inner = MockTransport::new();
    inner.on(Method::GET, VALIDATE, MockReply::ok(fixtures::auth_response(AdminRole::Viewer)));
    let gated = Arc::new(GatedTransport {
        release: Notify::new(),
        inner,
    });
    let api = ApiClient::new(gated.clone());
    let storage = Arc::new(MemoryCredentialStore::new());
    let session = SessionStore::new(api.clone(), storage.clone());

    let pending = tokio::spawn({
        let session = session.clone();
        async move { session.login(fixtures::VALID_KEY).await }
    });
    tokio::task::yield_now().await;
    assert_eq!(session.state(), SessionState::Validating);

    session.logout();
    gated.release.notify_one();

    let outcome = pending.await.unwrap();
    assert!(matches!(outcome, Err(SessionError::Superseded)));
    assert!(!session.is_authenticated());
    assert!(!api.has_api_key());
    assert!(storage.stored().is_none());
}

#[tokio::test]
async fn test_gate_checks_once_per_mount() {
    let transport = MockTransport::new();
    transport.on(Method::GET, VALIDATE, MockReply::ok(fixtures::auth_response(AdminRole::Viewer)));
    let storage = Arc::new(MemoryCredentialStore::with_credential(
        Credential::new(fixtures::VALID_KEY).unwrap(),
    ));
    let (session, _) = session_with(&transport, storage);
    session.restore();

    let mut gate = AuthGate::new();
    assert!(gate.is_checking());
    let state = gate.check(&session).await.clone();
    assert!(matches!(state, GateState::Authenticated(_)));

    // Re-rendering the same mount does not validate again.
    gate.check(&session).await;
    assert!(gate.begin(&session).is_none());
    assert_eq!(transport.calls(Method::GET, VALIDATE), 1);
}

#[tokio::test]
async fn test_gate_opens_without_network_when_authenticated() {
    let transport = MockTransport::new();
    transport.on(Method::GET, VALIDATE, MockReply::ok(fixtures::auth_response(AdminRole::Viewer)));
    let (session, _) = session_with(&transport, Arc::new(MemoryCredentialStore::new()));
    session.login(fixtures::VALID_KEY).await.unwrap();
    transport.reset_requests();

    let mut gate = AuthGate::new();
    assert!(gate.begin(&session).is_none());
    assert!(matches!(gate.state(), GateState::Authenticated(_)));
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_gate_redirects_without_key() {
    let transport = MockTransport::new();
    let (session, _) = session_with(&transport, Arc::new(MemoryCredentialStore::new()));
    session.restore();

    let mut gate = AuthGate::new();
    let pending = gate.begin(&session).expect("first begin hands out a check");
    assert!(gate.is_checking());
    let verdict = pending.run().await;
    gate.resolve(verdict);

    assert_eq!(gate.state(), &GateState::Redirecting);
    assert_eq!(transport.call_count(), 0);
}
