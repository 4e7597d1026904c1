//! Keybinding definitions for the console.
//!
//! Text entry (login, forms, filter prompts) reads raw key events instead.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextView,
    PrevView,
    SwitchView(usize),
    MoveUp,
    MoveDown,
    PrevPage,
    NextPage,
    FirstPage,
    LastPage,
    Confirm,
    Cancel,
    Refresh,
    NewItem,
    EditItem,
    DeleteItem,
    Drain,
    Uncordon,
    CancelJob,
    RetryJob,
    RotateKey,
    ToggleActive,
    Export,
    CycleFilter,
    NextFilter,
    ClearFilters,
    Logout,
    OpenHelp,
}

pub fn map_key(event: KeyEvent) -> Option<Action> {
    let KeyEvent { code, modifiers, .. } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(Action::Cancel),
            KeyCode::Char('r') => Some(Action::Refresh),
            _ => None,
        };
    }

    match code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('?') => Some(Action::OpenHelp),
        KeyCode::Char('r') => Some(Action::Refresh),
        KeyCode::Char('n') => Some(Action::NewItem),
        KeyCode::Char('e') => Some(Action::EditItem),
        KeyCode::Char('d') => Some(Action::DeleteItem),
        KeyCode::Char('D') => Some(Action::Drain),
        KeyCode::Char('u') => Some(Action::Uncordon),
        KeyCode::Char('c') => Some(Action::CancelJob),
        KeyCode::Char('R') => Some(Action::RetryJob),
        KeyCode::Char('K') => Some(Action::RotateKey),
        KeyCode::Char('a') => Some(Action::ToggleActive),
        KeyCode::Char('x') => Some(Action::Export),
        KeyCode::Char('f') => Some(Action::CycleFilter),
        KeyCode::Char('F') => Some(Action::NextFilter),
        KeyCode::Char('C') => Some(Action::ClearFilters),
        KeyCode::Char('L') => Some(Action::Logout),
        KeyCode::Char('g') | KeyCode::Home => Some(Action::FirstPage),
        KeyCode::Char('G') | KeyCode::End => Some(Action::LastPage),
        KeyCode::Enter => Some(Action::Confirm),
        KeyCode::Esc => Some(Action::Cancel),
        KeyCode::Tab => Some(Action::NextView),
        KeyCode::BackTab => Some(Action::PrevView),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::PageUp => Some(Action::PrevPage),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::PageDown => Some(Action::NextPage),
        KeyCode::Char(c @ '1'..='9') => Some(Action::SwitchView(c as usize - '1' as usize)),
        _ => None,
    }
}

/// Help text shown by `?`.
pub const HELP_LINES: &[(&str, &str)] = &[
    ("Tab / 1-7", "switch view"),
    ("j / k", "move selection"),
    ("h / l", "previous / next page"),
    ("g / G", "first / last page"),
    ("Enter", "open detail"),
    ("Esc", "back / close"),
    ("r", "refresh"),
    ("f / F / C", "change filter / next filter / clear filters"),
    ("n / e / d", "new / edit / delete"),
    ("D / u", "drain / uncordon agent"),
    ("c / R", "cancel / retry job"),
    ("K", "rotate admin API key"),
    ("a", "toggle active"),
    ("x", "export mappings"),
    ("L", "log out"),
    ("q", "quit"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::empty(),
        }
    }

    #[test]
    fn test_ctrl_bindings() {
        assert_eq!(
            map_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Cancel)
        );
        assert_eq!(
            map_key(key(KeyCode::Char('r'), KeyModifiers::CONTROL)),
            Some(Action::Refresh)
        );
        assert_eq!(map_key(key(KeyCode::Char('q'), KeyModifiers::CONTROL)), None);
    }

    #[test]
    fn test_shifted_letters_are_distinct() {
        assert_eq!(
            map_key(key(KeyCode::Char('D'), KeyModifiers::SHIFT)),
            Some(Action::Drain)
        );
        assert_eq!(
            map_key(key(KeyCode::Char('d'), KeyModifiers::NONE)),
            Some(Action::DeleteItem)
        );
        assert_eq!(
            map_key(key(KeyCode::Char('R'), KeyModifiers::SHIFT)),
            Some(Action::RetryJob)
        );
    }

    #[test]
    fn test_zero_is_unbound() {
        assert_eq!(map_key(key(KeyCode::Char('0'), KeyModifiers::NONE)), None);
    }
}
