use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Mode};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ScrollDown,
    ScrollUp,
    ScrollPageDown,
    ScrollPageUp,
    Refresh,
    /// 'g': grab the list with the keyboard
    Grab,
    /// Grab mode: move the grabbed content one row down
    PullDown,
    /// Grab mode: move the grabbed content one row up
    PullUp,
    /// Grab mode: let go
    Release,
    /// 'v': keep the indicator above the list while loading
    TogglePinIndicator,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App) -> Action {
    if app.mode == Mode::Grab {
        return handle_grab_mode(key);
    }

    // Normal mode keybindings
    match (key.code, key.modifiers) {
        // Quit
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        // Scrolling
        (KeyCode::Char('j'), KeyModifiers::NONE) => Action::ScrollDown,
        (KeyCode::Char('k'), KeyModifiers::NONE) => Action::ScrollUp,
        (KeyCode::Down, KeyModifiers::NONE) => Action::ScrollDown,
        (KeyCode::Up, KeyModifiers::NONE) => Action::ScrollUp,
        (KeyCode::Char('f'), KeyModifiers::CONTROL) => Action::ScrollPageDown,
        (KeyCode::Char('b'), KeyModifiers::CONTROL) => Action::ScrollPageUp,

        (KeyCode::Char('r'), KeyModifiers::NONE) => Action::Refresh,
        (KeyCode::Char('g'), KeyModifiers::NONE) => Action::Grab,
        (KeyCode::Char('v'), KeyModifiers::NONE) => Action::TogglePinIndicator,

        _ => Action::None,
    }
}

fn handle_grab_mode(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => Action::PullDown,
        KeyCode::Char('k') | KeyCode::Up => Action::PullUp,
        KeyCode::Char('g') | KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => {
            Action::Release
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        _ => Action::None,
    }
}
