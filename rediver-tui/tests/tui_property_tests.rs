use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use proptest::prelude::*;
use rediver_core::{AgentStatus, JobStatus};
use rediver_test_utils::generators::{arb_agent_status, arb_job_status};
use rediver_tui::config::{ThemeConfig, TuiConfig};
use rediver_tui::forms::TextInput;
use rediver_tui::keys::{map_key, Action};
use rediver_tui::nav::View;
use rediver_tui::theme::{agent_status_color, job_status_color, utilization_color, ConsoleTheme};

fn base_config() -> TuiConfig {
    TuiConfig {
        api_base_url: "http://localhost:8080".to_string(),
        credential_path: "tmp/credentials.json".into(),
        log_path: "tmp/rediver-admin.log".into(),
        export_dir: "tmp/exports".into(),
        theme: ThemeConfig {
            name: "console".to_string(),
        },
    }
}

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

#[test]
fn config_requires_base_url() {
    let mut config = base_config();
    config.api_base_url = "   ".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn config_requires_theme_name() {
    let mut config = base_config();
    config.theme = ThemeConfig {
        name: "unknown".to_string(),
    };
    assert!(config.validate().is_err());
}

#[test]
fn config_requires_export_dir() {
    let mut config = base_config();
    config.export_dir = "".into();
    assert!(config.validate().is_err());
}

proptest! {
    #[test]
    fn keybinding_digit_switches_view(digit in 0u8..=9u8) {
        let ch = char::from(b'0' + digit);
        let action = map_key(press(KeyCode::Char(ch)));
        if ch == '0' {
            prop_assert!(action.is_none());
        } else {
            let index = usize::from(digit - 1);
            prop_assert!(matches!(action, Some(Action::SwitchView(i)) if i == index));
        }
    }

    #[test]
    fn http_base_urls_accepted(
        scheme in prop::sample::select(vec!["http", "https"]),
        host in "[a-z][a-z0-9-]{0,20}(\\.[a-z]{2,6}){0,2}",
        port in prop::option::of(1u16..=65535),
    ) {
        let mut config = base_config();
        config.api_base_url = match port {
            Some(port) => format!("{scheme}://{host}:{port}"),
            None => format!("{scheme}://{host}"),
        };
        prop_assert!(config.validate().is_ok());
    }

    #[test]
    fn other_schemes_rejected(scheme in "(ftp|ws|wss|file|grpc)", host in "[a-z]{1,12}") {
        let mut config = base_config();
        config.api_base_url = format!("{scheme}://{host}");
        prop_assert!(config.validate().is_err());
    }

    #[test]
    fn navigation_keys_consistent(use_vim in prop::bool::ANY) {
        let down = if use_vim { KeyCode::Char('j') } else { KeyCode::Down };
        let up = if use_vim { KeyCode::Char('k') } else { KeyCode::Up };
        prop_assert!(matches!(map_key(press(down)), Some(Action::MoveDown)));
        prop_assert!(matches!(map_key(press(up)), Some(Action::MoveUp)));
    }

    #[test]
    fn page_keys_consistent(use_vim in prop::bool::ANY) {
        let next = if use_vim { KeyCode::Char('l') } else { KeyCode::PageDown };
        let prev = if use_vim { KeyCode::Char('h') } else { KeyCode::PageUp };
        prop_assert!(matches!(map_key(press(next)), Some(Action::NextPage)));
        prop_assert!(matches!(map_key(press(prev)), Some(Action::PrevPage)));
    }

    #[test]
    fn action_keys_mapped(key_char in "[qnedrfFCxaKDuRL?gG]") {
        let ch = key_char.chars().next().unwrap();
        prop_assert!(map_key(press(KeyCode::Char(ch))).is_some(), "key '{}' should map", ch);
    }

    #[test]
    fn tab_cycle_round_trips(index in 0usize..View::all().len()) {
        let view = View::from_index(index).unwrap();
        prop_assert_eq!(view.next().previous(), view);
        prop_assert_eq!(view.index(), index);
    }

    #[test]
    fn full_tab_cycle_returns_home(start in 0usize..View::all().len()) {
        let origin = View::from_index(start).unwrap();
        let mut view = origin;
        for _ in 0..View::all().len() {
            view = view.next();
        }
        prop_assert_eq!(view, origin);
    }

    #[test]
    fn masked_input_hides_every_char(key in "[ -~]{0,64}") {
        let mut input = TextInput::masked();
        for c in key.chars() {
            input.push(c);
        }
        let shown = input.display();
        prop_assert_eq!(shown.chars().count(), key.chars().count());
        prop_assert!(shown.chars().all(|c| c == '•'));
        prop_assert_eq!(input.value(), key.as_str());
    }

    #[test]
    fn utilization_color_thresholds(percent in 0.0f32..150.0f32) {
        let theme = ConsoleTheme::console();
        let color = utilization_color(percent, &theme);
        if percent < 70.0 {
            prop_assert_eq!(color, theme.success);
        } else if percent < 90.0 {
            prop_assert_eq!(color, theme.warning);
        } else {
            prop_assert_eq!(color, theme.error);
        }
    }

    #[test]
    fn agent_status_colors(status in arb_agent_status()) {
        let theme = ConsoleTheme::console();
        let expected = match status {
            AgentStatus::Active => theme.success,
            AgentStatus::Disabled => theme.warning,
            AgentStatus::Revoked => theme.error,
        };
        prop_assert_eq!(agent_status_color(status, &theme), expected);
    }

    #[test]
    fn failed_jobs_render_as_errors(status in arb_job_status()) {
        let theme = ConsoleTheme::console();
        let color = job_status_color(status, &theme);
        if matches!(status, JobStatus::Failed | JobStatus::Timeout) {
            prop_assert_eq!(color, theme.error);
        } else {
            prop_assert_ne!(color, theme.error);
        }
    }
}

#[test]
fn utilization_boundary_values() {
    let theme = ConsoleTheme::console();
    assert_eq!(utilization_color(69.9, &theme), theme.success);
    assert_eq!(utilization_color(70.0, &theme), theme.warning);
    assert_eq!(utilization_color(89.9, &theme), theme.warning);
    assert_eq!(utilization_color(90.0, &theme), theme.error);
}
