//! Auth gate: `Checking` → `Authenticated` | `Redirecting`.
//!
//! One gate per mount of the protected area. `begin` does its work at most
//! once per gate, so re-rendering never triggers a second validation.

use crate::session::{Principal, SessionStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    /// Render a placeholder only.
    Checking,
    Authenticated(Principal),
    /// Send the operator to the login screen.
    Redirecting,
}

/// Result of a deferred check, applied with [`AuthGate::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateVerdict {
    Authenticated(Principal),
    Redirect,
}

/// Validation work handed out by [`AuthGate::begin`]; run it anywhere.
pub struct PendingCheck {
    session: SessionStore,
}

impl PendingCheck {
    pub async fn run(self) -> GateVerdict {
        match self.session.validate_session().await {
            Ok(principal) => GateVerdict::Authenticated(principal),
            Err(err) => {
                tracing::info!(error = %err, "auth gate redirecting to login");
                GateVerdict::Redirect
            }
        }
    }
}

#[derive(Debug)]
pub struct AuthGate {
    state: GateState,
    started: bool,
}

impl AuthGate {
    pub fn new() -> Self {
        Self {
            state: GateState::Checking,
            started: false,
        }
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub fn is_checking(&self) -> bool {
        self.state == GateState::Checking
    }

    /// Start the check. Returns `None` when there is nothing to run: either
    /// the check already started, or the session is authenticated and the
    /// gate opened immediately.
    pub fn begin(&mut self, session: &SessionStore) -> Option<PendingCheck> {
        if self.started {
            return None;
        }
        self.started = true;

        if let Some(principal) = session.principal() {
            self.state = GateState::Authenticated(principal);
            return None;
        }
        Some(PendingCheck {
            session: session.clone(),
        })
    }

    pub fn resolve(&mut self, verdict: GateVerdict) {
        self.state = match verdict {
            GateVerdict::Authenticated(principal) => GateState::Authenticated(principal),
            GateVerdict::Redirect => GateState::Redirecting,
        };
    }

    /// `begin`, run and `resolve` in one step.
    pub async fn check(&mut self, session: &SessionStore) -> &GateState {
        if let Some(pending) = self.begin(session) {
            let verdict = pending.run().await;
            self.resolve(verdict);
        }
        &self.state
    }
}

impl Default for AuthGate {
    fn default() -> Self {
        Self::new()
    }
}
