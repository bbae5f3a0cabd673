use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Mode};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextCard,
    PrevCard,
    FirstCard,
    LastCard,
    SnapNearest,
    Stop,
    ToggleHelp,
    ExitMode,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App) -> Action {
    if app.mode == Mode::Help {
        // Any key exits help
        return Action::ExitMode;
    }

    match (key.code, key.modifiers) {
        // Quit
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        // Card navigation
        (KeyCode::Right, _) | (KeyCode::Char('l'), KeyModifiers::NONE) => Action::NextCard,
        (KeyCode::Left, _) | (KeyCode::Char('h'), KeyModifiers::NONE) => Action::PrevCard,
        (KeyCode::Home, _) | (KeyCode::Char('g'), KeyModifiers::NONE) => Action::FirstCard,
        (KeyCode::End, _) | (KeyCode::Char('G'), KeyModifiers::SHIFT) => Action::LastCard,
        (KeyCode::Char('s'), KeyModifiers::NONE) => Action::SnapNearest,

        // Halt any motion
        (KeyCode::Esc, _) | (KeyCode::Char(' '), KeyModifiers::NONE) => Action::Stop,

        (KeyCode::Char('?'), _) => Action::ToggleHelp,

        _ => Action::None,
    }
}
