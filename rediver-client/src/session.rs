//! Session store: credential plus validated principal.
//!
//! Lifecycle: `Uninitialized` → `Restored` (key only) → `Validating` →
//! `Authenticated` | `Unauthenticated`. The store is an explicit context
//! object; clones share state. Observers subscribe through a `watch` channel.
//!
//! Invariant: the state is `Authenticated` only while a credential is held
//! and its last validation succeeded. Every failure path clears the key from
//! the client, from memory and from durable storage under one lock.

use crate::client::ApiClient;
use crate::credential::CredentialStore;
use crate::error::{ApiClientError, ErrorKind};
use rediver_core::{AdminId, AdminRole, AuthResponse, Credential, CredentialError};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

/// The authenticated operator. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: AdminId,
    pub email: String,
    pub name: String,
    pub role: AdminRole,
}

impl Principal {
    pub fn is_super_admin(&self) -> bool {
        self.role.is_super_admin()
    }
}

impl From<AuthResponse> for Principal {
    fn from(auth: AuthResponse) -> Self {
        let role = auth.role.parse().unwrap_or_else(|_| {
            tracing::warn!(role = %auth.role, "unrecognised admin role, treating as viewer");
            AdminRole::Viewer
        });
        Self {
            id: auth.id,
            email: auth.email,
            name: auth.name,
            role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    /// A persisted key was loaded; nobody has validated it yet.
    Restored,
    Validating,
    Authenticated(Principal),
    Unauthenticated { error: Option<String> },
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub fn principal(&self) -> Option<&Principal> {
        match self {
            SessionState::Authenticated(principal) => Some(principal),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SessionState::Unauthenticated { error } => error.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SessionError {
    #[error("No stored API key")]
    NoCredential,
    #[error(transparent)]
    InvalidKey(#[from] CredentialError),
    #[error("{0}")]
    Rejected(ApiClientError),
    /// A later login or a logout happened while this validation was in flight.
    #[error("Session changed while validating")]
    Superseded,
}

const GENERIC_LOGIN_FAILURE: &str = "Failed to authenticate";

fn login_error_message(err: &ApiClientError) -> String {
    match err.kind() {
        ErrorKind::Api | ErrorKind::UnparseableBody => err.message().to_string(),
        _ => GENERIC_LOGIN_FAILURE.to_string(),
    }
}

struct Ledger {
    epoch: u64,
    credential: Option<Credential>,
}

struct SessionInner {
    api: ApiClient,
    storage: Arc<dyn CredentialStore>,
    ledger: Mutex<Ledger>,
    state: watch::Sender<SessionState>,
}

#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionInner>,
}

impl SessionStore {
    pub fn new(api: ApiClient, storage: Arc<dyn CredentialStore>) -> Self {
        let (state, _) = watch::channel(SessionState::Uninitialized);
        Self {
            inner: Arc::new(SessionInner {
                api,
                storage,
                ledger: Mutex::new(Ledger {
                    epoch: 0,
                    credential: None,
                }),
                state,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Ledger> {
        self.inner.ledger.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    pub fn principal(&self) -> Option<Principal> {
        self.inner.state.borrow().principal().cloned()
    }

    pub fn has_credential(&self) -> bool {
        self.lock().credential.is_some()
    }

    /// Load a persisted key. Returns true when one was found.
    ///
    /// The key is not placed on the client until it has been validated.
    pub fn restore(&self) -> bool {
        let loaded = match self.inner.storage.load() {
            Ok(credential) => credential,
            Err(err) => {
                tracing::warn!(error = %err, "discarding unreadable stored credential");
                if let Err(err) = self.inner.storage.clear() {
                    tracing::warn!(error = %err, "failed to clear stored credential");
                }
                None
            }
        };

        let mut ledger = self.lock();
        let restored = loaded.is_some();
        ledger.credential = loaded;
        let next = if restored {
            SessionState::Restored
        } else {
            SessionState::Unauthenticated { error: None }
        };
        self.inner.state.send_replace(next);
        restored
    }

    /// Validate `key` and, on success, keep it as the session credential.
    pub async fn login(&self, key: &str) -> Result<Principal, SessionError> {
        let credential = match Credential::new(key) {
            Ok(credential) => credential,
            Err(err) => {
                let mut ledger = self.lock();
                ledger.epoch += 1;
                self.clear_locked(&mut ledger, Some(err.to_string()));
                return Err(err.into());
            }
        };
        self.authenticate(credential, true).await
    }

    /// Revalidate the held key. Without one this fails immediately and makes
    /// no network call.
    pub async fn validate_session(&self) -> Result<Principal, SessionError> {
        let credential = self.lock().credential.clone();
        let Some(credential) = credential else {
            if !self.inner.state.borrow().is_authenticated() {
                self.inner
                    .state
                    .send_replace(SessionState::Unauthenticated { error: None });
            }
            return Err(SessionError::NoCredential);
        };
        self.authenticate(credential, false).await
    }

    /// Drop the session unconditionally. No network call.
    pub fn logout(&self) {
        let mut ledger = self.lock();
        ledger.epoch += 1;
        self.clear_locked(&mut ledger, None);
        tracing::info!("session closed");
    }

    /// Forget the last login error without touching the session.
    pub fn clear_error(&self) {
        self.inner.state.send_if_modified(|state| match state {
            SessionState::Unauthenticated { error } if error.is_some() => {
                *error = None;
                true
            }
            _ => false,
        });
    }

    async fn authenticate(
        &self,
        credential: Credential,
        record_error: bool,
    ) -> Result<Principal, SessionError> {
        let epoch = {
            let mut ledger = self.lock();
            ledger.epoch += 1;
            self.inner.api.set_api_key(Some(credential.clone()));
            self.inner.state.send_replace(SessionState::Validating);
            ledger.epoch
        };

        let outcome = self.inner.api.validate_api_key().await;

        let mut ledger = self.lock();
        if ledger.epoch != epoch {
            tracing::debug!("discarding superseded session validation");
            return Err(SessionError::Superseded);
        }

        match outcome {
            Ok(auth) => {
                let principal = Principal::from(auth);
                if let Err(err) = self.inner.storage.save(&credential) {
                    tracing::warn!(error = %err, "failed to persist API key");
                }
                ledger.credential = Some(credential);
                self.inner
                    .state
                    .send_replace(SessionState::Authenticated(principal.clone()));
                tracing::info!(admin = %principal.email, role = %principal.role, "session authenticated");
                Ok(principal)
            }
            Err(err) => {
                tracing::warn!(error = %err, "session validation failed");
                let message = record_error.then(|| login_error_message(&err));
                self.clear_locked(&mut ledger, message);
                Err(SessionError::Rejected(err))
            }
        }
    }

    fn clear_locked(&self, ledger: &mut Ledger, error: Option<String>) {
        ledger.credential = None;
        self.inner.api.set_api_key(None);
        if let Err(err) = self.inner.storage.clear() {
            tracing::warn!(error = %err, "failed to clear stored credential");
        }
        self.inner
            .state
            .send_replace(SessionState::Unauthenticated { error });
    }
}
