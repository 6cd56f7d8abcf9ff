use crate::checklist::models::Checklist;
use crate::checklist::storage::{self, Storage};
use crate::tui::handlers::{Command, KeyHandler};
use crate::tui::state::{self, Action, AppState, Clock, Overlay, SystemClock};
use crossterm::event::KeyEvent;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    List,
}

pub struct App<S: Storage> {
    pub state: AppState,
    pub storage: S,
    pub focus: Focus,
    pub cursor: usize,
    pub should_quit: bool,
    clock: Box<dyn Clock>,
}

impl<S: Storage> App<S> {
    pub fn new(storage: S) -> Self {
        Self::with_clock(storage, Box::new(SystemClock))
    }

    pub fn with_clock(storage: S, clock: Box<dyn Clock>) -> Self {
        let checklist = Checklist::from_items(storage::load_items(&storage));
        info!(items = checklist.total_items(), "loaded checklist");
        let state = AppState::new(checklist, clock.as_ref());

        Self {
            state,
            storage,
            focus: Focus::Input,
            cursor: 0,
            should_quit: false,
            clock,
        }
    }

    pub fn handle_key_event(&mut self, key_event: KeyEvent) {
        let command = match self.state.overlay {
            Some(Overlay::ConfirmDeleteAll) => KeyHandler::handle_confirm_key(key_event),
            Some(Overlay::Updates) => KeyHandler::handle_updates_key(key_event),
            None => match self.focus {
                Focus::Input => KeyHandler::handle_input_key(key_event),
                Focus::List => KeyHandler::handle_list_key(key_event, self.state.mode),
            },
        };
        self.execute(command);
    }

    /// Called when no input arrived within one tick.
    pub fn tick(&mut self) {
        self.dispatch(Action::Tick);
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::None => {}
            Command::Quit => self.should_quit = true,
            Command::FocusInput => self.focus = Focus::Input,
            Command::FocusList => self.focus = Focus::List,
            Command::CursorUp => self.cursor = self.cursor.saturating_sub(1),
            Command::CursorDown => {
                if self.cursor + 1 < self.state.checklist.total_items() {
                    self.cursor += 1;
                }
            }
            Command::ToggleAtCursor => self.dispatch(Action::Toggle(self.cursor)),
            Command::Dispatch(action) => self.dispatch(action),
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        let effect = state::reduce(&mut self.state, action, self.clock.as_ref());
        // The in-memory list stays authoritative if the write fails.
        if let Err(e) = effect.apply(&self.state.checklist.items, &mut self.storage) {
            error!(error = %e, ?action, "failed to write checklist");
        }
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        let len = self.state.checklist.total_items();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
    }

    pub fn total_items(&self) -> usize {
        self.state.checklist.total_items()
    }

    pub fn checked_items(&self) -> usize {
        self.state.checklist.checked_items()
    }
}
