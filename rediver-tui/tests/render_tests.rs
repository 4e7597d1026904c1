//! Every screen renders into a fixed-size buffer without panicking and shows
//! the text it is responsible for.

mod common;

use common::{path, scripted_api, Console};
use crossterm::event::KeyCode;
use ratatui::{backend::TestBackend, Terminal};
use rediver_client::http::Method;
use rediver_core::{AdminRole, AgentHealth, AgentStatus, JobStatus};
use rediver_test_utils::{fixtures, MockReply, MockTransport};
use rediver_tui::nav::View;
use rediver_tui::views::render_view;
use std::sync::Arc;

fn draw(console: &Console, width: u16, height: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|f| render_view(f, &console.app)).unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

/// Every list and detail route answers with one row.
fn full_api() -> Arc<MockTransport> {
    let transport = scripted_api(AdminRole::SuperAdmin);

    let agent = fixtures::agent("runner-7", AgentStatus::Disabled, AgentHealth::Online);
    let job = fixtures::job(JobStatus::Running);
    let agent_path = path(&format!("/agents/{}", agent["id"].as_str().unwrap()));
    let job_path = path(&format!("/jobs/{}", job["id"].as_str().unwrap()));

    transport
        .on(Method::GET, &path("/agents"), MockReply::ok(fixtures::page(vec![agent.clone()], 1, 1, 20)))
        .on(Method::GET, &agent_path, MockReply::ok(agent))
        .on(Method::GET, &path("/jobs"), MockReply::ok(fixtures::page(vec![job.clone()], 1, 1, 20)))
        .on(Method::GET, &job_path, MockReply::ok(job))
        .on(
            Method::GET,
            &path("/tokens"),
            MockReply::ok(fixtures::page(vec![fixtures::token("rdv_bt_ab", false, true)], 1, 1, 20)),
        )
        .on(
            Method::GET,
            &path("/admins"),
            MockReply::ok(fixtures::page(
                vec![fixtures::admin("root@rediver.test", AdminRole::SuperAdmin, true)],
                1,
                1,
                20,
            )),
        )
        .on(
            Method::GET,
            &path("/audit-logs"),
            MockReply::ok(fixtures::page(vec![fixtures::audit_log("agent.drained")], 1, 1, 20)),
        )
        .on(
            Method::GET,
            &path("/target-mappings"),
            MockReply::ok(fixtures::page(vec![fixtures::mapping("repository", "code_repo")], 1, 1, 20)),
        );
    transport
}

#[tokio::test]
async fn test_login_screens_render() {
    let mut console = Console::new(full_api());
    let checking = draw(&console, 100, 30);
    assert!(checking.contains("Checking session"));

    console.app.start();
    console.pump().await;
    console.type_text("secret");
    let login = draw(&console, 100, 30);
    assert!(login.contains("API key"));
    assert!(login.contains("••••••"));
    assert!(!login.contains("secret"));
}

#[tokio::test]
async fn test_every_console_view_renders() {
    let mut console = Console::new(full_api());
    console.sign_in().await;

    let dashboard = draw(&console, 140, 40);
    assert!(dashboard.contains("REDIVER ADMIN | Ops Admin (Super Admin)"));
    assert!(dashboard.contains("Recent agents"));

    let expected = [
        ('2', View::Agents, "runner-7"),
        ('3', View::Jobs, "github.com/acme/api"),
        ('4', View::Tokens, "rdv_bt_ab"),
        ('5', View::Admins, "root@rediver.test"),
        ('6', View::AuditLogs, "agent.drained"),
        ('7', View::TargetMappings, "code_repo"),
    ];
    for (key, view, text) in expected {
        console.press(KeyCode::Char(key));
        console.pump().await;
        assert_eq!(console.app.view, view);
        let screen = draw(&console, 140, 40);
        assert!(screen.contains(text), "{view:?} should show {text}");
    }
}

#[tokio::test]
async fn test_detail_views_render() {
    let mut console = Console::new(full_api());
    console.sign_in().await;

    console.press(KeyCode::Char('2'));
    console.pump().await;
    console.press(KeyCode::Enter);
    console.pump().await;
    assert_eq!(console.app.view, View::AgentDetail);
    assert!(console.app.agent_detail.item.is_some());
    assert!(draw(&console, 140, 40).contains("runner-7"));

    console.press(KeyCode::Char('3'));
    console.pump().await;
    console.press(KeyCode::Enter);
    console.pump().await;
    assert_eq!(console.app.view, View::JobDetail);
    assert!(draw(&console, 140, 40).contains("github.com/acme/api"));
}

#[tokio::test]
async fn test_modals_render_on_small_terminals() {
    let mut console = Console::new(full_api());
    console.sign_in().await;

    console.press(KeyCode::Char('?'));
    assert!(draw(&console, 100, 30).contains("Keybindings"));
    // Tiny frames must clip rather than panic.
    draw(&console, 20, 5);
    console.press(KeyCode::Esc);

    console.press(KeyCode::Char('4'));
    console.pump().await;
    console.press(KeyCode::Char('n'));
    let form = draw(&console, 100, 30);
    assert!(form.contains("Description"));
    draw(&console, 30, 4);
}
