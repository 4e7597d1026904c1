//! Console harness shared by the integration tests.
#![allow(dead_code)]

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rediver_client::http::Method;
use rediver_client::{MemoryCredentialStore, SessionStore};
use rediver_core::{AdminRole, AgentHealth, AgentStatus, JobStatus};
use rediver_test_utils::{fixtures, mock_client, MockReply, MockTransport};
use rediver_tui::config::TuiConfig;
use rediver_tui::events::TuiEvent;
use rediver_tui::notifications::NotificationLevel;
use rediver_tui::state::{App, Screen};
use std::sync::Arc;
use tokio::sync::mpsc;

pub const PREFIX: &str = "/api/v1/admin";

pub fn path(suffix: &str) -> String {
    format!("{PREFIX}{suffix}")
}

pub struct Console {
    pub app: App,
    pub rx: mpsc::Receiver<TuiEvent>,
    pub transport: Arc<MockTransport>,
}

impl Console {
    pub fn new(transport: Arc<MockTransport>) -> Self {
        let session = SessionStore::new(
            mock_client(&transport),
            Arc::new(MemoryCredentialStore::new()),
        );
        let (tx, rx) = mpsc::channel(256);
        let app = App::new(TuiConfig::default(), session, tx);
        Self { app, rx, transport }
    }

    /// Let spawned tasks run and apply whatever they report.
    pub async fn pump(&mut self) {
        for _ in 0..50 {
            tokio::task::yield_now().await;
            while let Ok(event) = self.rx.try_recv() {
                self.app.handle_event(event);
            }
        }
    }

    pub fn press(&mut self, code: KeyCode) -> bool {
        self.app
            .handle_event(TuiEvent::Input(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.press(KeyCode::Char(c));
        }
    }

    /// Start, land on the login screen and sign in with the fixture key.
    pub async fn sign_in(&mut self) {
        self.app.start();
        self.pump().await;
        assert_eq!(self.app.screen, Screen::Login);

        self.type_text(fixtures::VALID_KEY);
        self.press(KeyCode::Enter);
        self.pump().await;
    }

    /// Full-page list calls to `suffix`; the dashboard's recent rows use a
    /// smaller page and are left out.
    pub fn list_calls(&self, suffix: &str) -> Vec<u32> {
        self.transport
            .requests_to(Method::GET, &path(suffix))
            .iter()
            .filter(|r| r.query_value("per_page") == Some("20"))
            .filter_map(|r| r.query_value("page").and_then(|p| p.parse().ok()))
            .collect()
    }

    pub fn latest_message(&self) -> Option<(NotificationLevel, String)> {
        self.app
            .notifications
            .latest()
            .map(|n| (n.level, n.message.clone()))
    }
}

pub fn scripted_api(role: AdminRole) -> Arc<MockTransport> {
    let transport = MockTransport::new();
    transport
        .on(
            Method::GET,
            &path("/auth/validate"),
            MockReply::ok(fixtures::auth_response(role)),
        )
        .on(
            Method::GET,
            &path("/agents/stats"),
            MockReply::ok(serde_json::json!({"total": 3, "online": 2, "offline": 1, "disabled": 0})),
        )
        .on(
            Method::GET,
            &path("/jobs/stats"),
            MockReply::ok(serde_json::json!({"queued": 2, "running": 1, "completed": 4, "failed": 1})),
        )
        .on(
            Method::GET,
            &path("/agents"),
            MockReply::ok(fixtures::page(
                vec![
                    fixtures::agent("runner-1", AgentStatus::Active, AgentHealth::Online),
                    fixtures::agent("runner-2", AgentStatus::Active, AgentHealth::Offline),
                ],
                2,
                1,
                20,
            )),
        )
        .on(
            Method::GET,
            &path("/jobs"),
            MockReply::ok(fixtures::page(
                vec![fixtures::job(JobStatus::Running)],
                1,
                1,
                20,
            )),
        );
    transport
}
