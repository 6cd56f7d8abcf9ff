use crate::tui::state::{Action, Mode};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub struct KeyHandler;

impl KeyHandler {
    pub fn handle_input_key(key_event: KeyEvent) -> Command {
        match key_event.code {
            KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                Command::Quit
            }
            KeyCode::Enter => Command::Dispatch(Action::Submit),
            KeyCode::Tab | KeyCode::Esc | KeyCode::Down => Command::FocusList,
            KeyCode::Backspace => Command::Dispatch(Action::Backspace),
            KeyCode::Delete => Command::Dispatch(Action::Delete),
            KeyCode::Left => Command::Dispatch(Action::MoveCursorLeft),
            KeyCode::Right => Command::Dispatch(Action::MoveCursorRight),
            KeyCode::Home => Command::Dispatch(Action::MoveCursorHome),
            KeyCode::End => Command::Dispatch(Action::MoveCursorEnd),
            KeyCode::Char(c) if !key_event.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                Command::Dispatch(Action::InsertChar(c))
            }
            _ => Command::None,
        }
    }

    pub fn handle_list_key(key_event: KeyEvent, mode: Mode) -> Command {
        match key_event.code {
            KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
                Command::Quit
            }
            KeyCode::Char('q') => Command::Quit,
            KeyCode::Up | KeyCode::Char('k') => Command::CursorUp,
            KeyCode::Down | KeyCode::Char('j') => Command::CursorDown,
            KeyCode::Char(' ') | KeyCode::Enter => Command::ToggleAtCursor,
            KeyCode::Char('a') | KeyCode::Char('i') | KeyCode::Tab => Command::FocusInput,
            KeyCode::Char('?') => Command::Dispatch(Action::ShowUpdates),
            _ => match mode {
                Mode::Normal => Self::handle_normal_list_key(key_event),
                Mode::DeleteSelecting => Self::handle_delete_list_key(key_event),
            },
        }
    }

    fn handle_normal_list_key(key_event: KeyEvent) -> Command {
        match key_event.code {
            KeyCode::Char('d') => Command::Dispatch(Action::EnterDeleteMode),
            KeyCode::Char('D') => Command::Dispatch(Action::RequestDeleteAll),
            _ => Command::None,
        }
    }

    fn handle_delete_list_key(key_event: KeyEvent) -> Command {
        match key_event.code {
            KeyCode::Char('x') => Command::Dispatch(Action::DeleteSelected),
            KeyCode::Esc => Command::Dispatch(Action::CancelDelete),
            _ => Command::None,
        }
    }

    pub fn handle_confirm_key(key_event: KeyEvent) -> Command {
        match key_event.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                Command::Dispatch(Action::ConfirmDeleteAll)
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                Command::Dispatch(Action::DeclineDeleteAll)
            }
            _ => Command::None,
        }
    }

    pub fn handle_updates_key(key_event: KeyEvent) -> Command {
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Esc | KeyCode::Enter => {
                Command::Dispatch(Action::HideUpdates)
            }
            KeyCode::Up | KeyCode::Char('k') => Command::Dispatch(Action::ScrollUpdatesUp),
            KeyCode::Down | KeyCode::Char('j') => Command::Dispatch(Action::ScrollUpdatesDown),
            _ => Command::None,
        }
    }
}

/// What a key press asks the application shell to do.
#[derive(Debug, PartialEq)]
pub enum Command {
    None,
    Quit,
    FocusInput,
    FocusList,
    CursorUp,
    CursorDown,
    ToggleAtCursor, // Resolved against the list cursor by the app
    Dispatch(Action),
}
