use crate::checklist::models::{Checklist, Item};
use crate::checklist::storage::{self, Storage, StorageError};
use crate::tui::changelog::RELEASES;
use crate::tui::edit::InputBuffer;
use chrono::{DateTime, Local, NaiveDate};
use std::collections::HashSet;
use tracing::{debug, info};

pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// How a toggle on an item is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    DeleteSelecting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Updates,
    ConfirmDeleteAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    InsertChar(char),
    Backspace,
    Delete,
    MoveCursorLeft,
    MoveCursorRight,
    MoveCursorHome,
    MoveCursorEnd,
    Submit,
    Toggle(usize),
    EnterDeleteMode,
    CancelDelete,
    DeleteSelected,
    RequestDeleteAll,
    ConfirmDeleteAll,
    DeclineDeleteAll,
    ShowUpdates,
    HideUpdates,
    ScrollUpdatesUp,
    ScrollUpdatesDown,
    Tick,
}

/// Storage work the caller must carry out after a reducer step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Effect {
    None,
    Persist,
    Remove,
}

impl Effect {
    pub fn apply<S: Storage + ?Sized>(self, items: &[Item], storage: &mut S) -> Result<(), StorageError> {
        match self {
            Effect::None => Ok(()),
            Effect::Persist => storage::save_items(storage, items),
            Effect::Remove => storage::clear_items(storage),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppState {
    pub checklist: Checklist,
    pub input: InputBuffer,
    pub mode: Mode,
    pub selected_items: HashSet<usize>,
    pub last_updated: NaiveDate,
    /// Id of the item added since the last render tick.
    pub newly_added: Option<i64>,
    pub overlay: Option<Overlay>,
    /// First release row shown in the update history.
    pub updates_offset: usize,
}

impl AppState {
    pub fn new(checklist: Checklist, clock: &dyn Clock) -> Self {
        Self {
            checklist,
            input: InputBuffer::new(),
            mode: Mode::Normal,
            selected_items: HashSet::new(),
            last_updated: clock.now().date_naive(),
            newly_added: None,
            overlay: None,
            updates_offset: 0,
        }
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.mode == Mode::DeleteSelecting && self.selected_items.contains(&index)
    }

    fn exit_delete_mode(&mut self) {
        self.selected_items.clear();
        self.mode = Mode::Normal;
    }
}

pub fn reduce(state: &mut AppState, action: Action, clock: &dyn Clock) -> Effect {
    match action {
        Action::InsertChar(c) => state.input.insert_char(c),
        Action::Backspace => state.input.backspace(),
        Action::Delete => state.input.delete(),
        Action::MoveCursorLeft => state.input.move_cursor_left(),
        Action::MoveCursorRight => state.input.move_cursor_right(),
        Action::MoveCursorHome => state.input.move_cursor_home(),
        Action::MoveCursorEnd => state.input.move_cursor_end(),
        Action::Submit => {
            let text = state.input.text().to_string();
            let effect = add_item(state, &text, clock);
            if effect == Effect::Persist {
                state.input.clear();
            }
            return effect;
        }
        Action::Toggle(index) => return toggle(state, index),
        Action::EnterDeleteMode => {
            if !state.checklist.is_empty() {
                state.mode = Mode::DeleteSelecting;
            }
        }
        Action::CancelDelete => state.exit_delete_mode(),
        Action::DeleteSelected => return delete_selected(state),
        Action::RequestDeleteAll => {
            if !state.checklist.is_empty() {
                state.overlay = Some(Overlay::ConfirmDeleteAll);
            }
        }
        Action::ConfirmDeleteAll => {
            if state.overlay == Some(Overlay::ConfirmDeleteAll) {
                state.overlay = None;
                return delete_all(state);
            }
        }
        Action::DeclineDeleteAll => {
            if state.overlay == Some(Overlay::ConfirmDeleteAll) {
                state.overlay = None;
            }
        }
        Action::ShowUpdates => {
            state.overlay = Some(Overlay::Updates);
            state.updates_offset = 0;
        }
        Action::HideUpdates => {
            if state.overlay == Some(Overlay::Updates) {
                state.overlay = None;
            }
        }
        Action::ScrollUpdatesUp => state.updates_offset = state.updates_offset.saturating_sub(1),
        Action::ScrollUpdatesDown => {
            if state.updates_offset + 1 < RELEASES.len() {
                state.updates_offset += 1;
            }
        }
        Action::Tick => state.newly_added = None,
    }
    Effect::None
}

/// Appends `text` as a new unchecked item. Blank text is ignored.
pub fn add_item(state: &mut AppState, text: &str, clock: &dyn Clock) -> Effect {
    let name = text.trim();
    if name.is_empty() {
        return Effect::None;
    }

    let now = clock.now();
    let id = state.checklist.push(name.to_string(), now.timestamp_millis());
    state.newly_added = Some(id);
    state.last_updated = now.date_naive();
    info!(id, "added item");
    Effect::Persist
}

fn toggle(state: &mut AppState, index: usize) -> Effect {
    match state.mode {
        Mode::Normal => {
            if state.checklist.toggle(index) {
                Effect::Persist
            } else {
                Effect::None
            }
        }
        Mode::DeleteSelecting => {
            if index < state.checklist.total_items() && !state.selected_items.remove(&index) {
                state.selected_items.insert(index);
            }
            Effect::None
        }
    }
}

fn delete_selected(state: &mut AppState) -> Effect {
    if state.mode != Mode::DeleteSelecting {
        return Effect::None;
    }

    let removed = state.checklist.remove_indices(&state.selected_items);
    state.exit_delete_mode();
    debug!(removed, "deleted selected items");
    if removed > 0 { Effect::Persist } else { Effect::None }
}

/// Empties the list. Callers are responsible for having obtained confirmation.
pub fn delete_all(state: &mut AppState) -> Effect {
    state.checklist.clear();
    state.exit_delete_mode();
    info!("deleted all items");
    Effect::Remove
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Clock;
    use chrono::{DateTime, Local, TimeZone};
    use std::cell::Cell;

    /// Clock that advances by one second on every read.
    pub struct StepClock {
        next: Cell<i64>,
    }

    impl StepClock {
        pub fn starting_at(year: i32, month: u32, day: u32) -> Self {
            let start = Local
                .with_ymd_and_hms(year, month, day, 9, 0, 0)
                .single()
                .unwrap()
                .timestamp();
            Self {
                next: Cell::new(start),
            }
        }
    }

    impl Clock for StepClock {
        fn now(&self) -> DateTime<Local> {
            let secs = self.next.get();
            self.next.set(secs + 1);
            Local.timestamp_opt(secs, 0).single().unwrap()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::StepClock;
    use super::*;
    use crate::checklist::storage::{ITEMS_KEY, MemoryStorage, load_items};

    fn state_with(names: &[&str]) -> (AppState, StepClock) {
        let clock = StepClock::starting_at(2024, 5, 1);
        let mut state = AppState::new(Checklist::default(), &clock);
        for name in names {
            let _ = add_item(&mut state, name, &clock);
        }
        (state, clock)
    }

    fn names(state: &AppState) -> Vec<&str> {
        state.checklist.items.iter().map(|i| i.name.as_str()).collect()
    }

    fn type_text(state: &mut AppState, clock: &StepClock, text: &str) {
        for c in text.chars() {
            let _ = reduce(state, Action::InsertChar(c), clock);
        }
    }

    #[test]
    fn test_whitespace_add_is_noop() {
        let (mut state, clock) = state_with(&["Passport"]);
        let before = state.checklist.clone();

        type_text(&mut state, &clock, "   \t ");
        let effect = reduce(&mut state, Action::Submit, &clock);

        assert_eq!(effect, Effect::None);
        assert_eq!(state.checklist, before);
        // The input is only cleared on a successful add.
        assert_eq!(state.input.text(), "   \t ");
    }

    #[test]
    fn test_submit_appends_trimmed_item_and_persists() {
        let (mut state, clock) = state_with(&["Passport"]);
        let mut storage = MemoryStorage::default();

        type_text(&mut state, &clock, "  X  ");
        let effect = reduce(&mut state, Action::Submit, &clock);
        assert_eq!(effect, Effect::Persist);
        effect.apply(&state.checklist.items, &mut storage).unwrap();

        let stored = load_items(&storage);
        let last = stored.last().unwrap();
        assert_eq!(last.name, "X");
        assert!(!last.checked);
        assert!(state.input.is_empty());
        assert_eq!(state.newly_added, Some(last.id));
    }

    #[test]
    fn test_add_updates_last_updated_date() {
        let clock = StepClock::starting_at(2024, 5, 1);
        let mut state = AppState::new(Checklist::default(), &clock);
        state.last_updated = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();

        let _ = add_item(&mut state, "Hat", &clock);

        assert_eq!(state.last_updated, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    }

    #[test]
    fn test_ids_are_unique() {
        let (state, _) = state_with(&["A", "B", "C"]);
        let ids: HashSet<i64> = state.checklist.items.iter().map(|i| i.id).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_toggle_twice_in_normal_mode() {
        let (mut state, clock) = state_with(&["A", "B"]);

        assert_eq!(reduce(&mut state, Action::Toggle(1), &clock), Effect::Persist);
        assert!(state.checklist.items[1].checked);
        assert_eq!(reduce(&mut state, Action::Toggle(1), &clock), Effect::Persist);
        assert!(!state.checklist.items[1].checked);
    }

    #[test]
    fn test_toggle_in_delete_mode_changes_selection_only() {
        let (mut state, clock) = state_with(&["A", "B"]);
        let _ = reduce(&mut state, Action::EnterDeleteMode, &clock);

        assert_eq!(reduce(&mut state, Action::Toggle(0), &clock), Effect::None);
        assert!(state.is_selected(0));
        assert!(!state.checklist.items[0].checked);

        let _ = reduce(&mut state, Action::Toggle(0), &clock);
        assert!(!state.is_selected(0));

        let _ = reduce(&mut state, Action::Toggle(7), &clock);
        assert!(state.selected_items.is_empty());
    }

    #[test]
    fn test_delete_selected_removes_exact_items() {
        let (mut state, clock) = state_with(&["A", "B", "C", "D"]);
        let mut storage = MemoryStorage::default();

        let _ = reduce(&mut state, Action::EnterDeleteMode, &clock);
        let _ = reduce(&mut state, Action::Toggle(0), &clock);
        let _ = reduce(&mut state, Action::Toggle(2), &clock);
        let effect = reduce(&mut state, Action::DeleteSelected, &clock);
        effect.apply(&state.checklist.items, &mut storage).unwrap();

        assert_eq!(effect, Effect::Persist);
        assert_eq!(names(&state), vec!["B", "D"]);
        assert_eq!(state.mode, Mode::Normal);
        assert!(state.selected_items.is_empty());
        assert_eq!(load_items(&storage), state.checklist.items);
    }

    #[test]
    fn test_delete_selected_with_empty_selection_exits_mode() {
        let (mut state, clock) = state_with(&["A"]);
        let _ = reduce(&mut state, Action::EnterDeleteMode, &clock);

        assert_eq!(reduce(&mut state, Action::DeleteSelected, &clock), Effect::None);
        assert_eq!(state.mode, Mode::Normal);
        assert_eq!(names(&state), vec!["A"]);
    }

    #[test]
    fn test_cancel_discards_selection() {
        let (mut state, clock) = state_with(&["A", "B"]);
        let _ = reduce(&mut state, Action::EnterDeleteMode, &clock);
        let _ = reduce(&mut state, Action::Toggle(1), &clock);
        let _ = reduce(&mut state, Action::CancelDelete, &clock);

        assert_eq!(state.mode, Mode::Normal);
        assert!(state.selected_items.is_empty());
        assert_eq!(names(&state), vec!["A", "B"]);
    }

    #[test]
    fn test_delete_mode_requires_items() {
        let (mut state, clock) = state_with(&[]);
        let _ = reduce(&mut state, Action::EnterDeleteMode, &clock);
        assert_eq!(state.mode, Mode::Normal);
    }

    #[test]
    fn test_delete_all_declined_keeps_items() {
        let (mut state, clock) = state_with(&["A", "B"]);

        let _ = reduce(&mut state, Action::RequestDeleteAll, &clock);
        assert_eq!(state.overlay, Some(Overlay::ConfirmDeleteAll));
        assert_eq!(reduce(&mut state, Action::DeclineDeleteAll, &clock), Effect::None);

        assert_eq!(state.overlay, None);
        assert_eq!(names(&state), vec!["A", "B"]);
    }

    #[test]
    fn test_delete_all_confirmed_removes_key() {
        let (mut state, clock) = state_with(&["A", "B"]);
        let mut storage = MemoryStorage::default();
        storage::save_items(&mut storage, &state.checklist.items).unwrap();

        let _ = reduce(&mut state, Action::EnterDeleteMode, &clock);
        let _ = reduce(&mut state, Action::Toggle(0), &clock);
        let _ = reduce(&mut state, Action::RequestDeleteAll, &clock);
        let effect = reduce(&mut state, Action::ConfirmDeleteAll, &clock);
        effect.apply(&state.checklist.items, &mut storage).unwrap();

        assert_eq!(effect, Effect::Remove);
        assert!(state.checklist.is_empty());
        assert_eq!(state.mode, Mode::Normal);
        assert!(state.selected_items.is_empty());
        assert_eq!(storage.get_item(ITEMS_KEY).unwrap(), None);
    }

    #[test]
    fn test_confirm_without_request_does_nothing() {
        let (mut state, clock) = state_with(&["A"]);

        assert_eq!(reduce(&mut state, Action::ConfirmDeleteAll, &clock), Effect::None);
        assert_eq!(names(&state), vec!["A"]);
    }

    #[test]
    fn test_tick_clears_newly_added() {
        let (mut state, clock) = state_with(&["A"]);
        assert!(state.newly_added.is_some());

        let _ = reduce(&mut state, Action::Tick, &clock);
        assert_eq!(state.newly_added, None);
    }

    #[test]
    fn test_updates_overlay() {
        let (mut state, clock) = state_with(&[]);

        let _ = reduce(&mut state, Action::ShowUpdates, &clock);
        assert_eq!(state.overlay, Some(Overlay::Updates));
        let _ = reduce(&mut state, Action::DeclineDeleteAll, &clock);
        assert_eq!(state.overlay, Some(Overlay::Updates));
        let _ = reduce(&mut state, Action::HideUpdates, &clock);
        assert_eq!(state.overlay, None);
    }

    #[test]
    fn test_updates_scroll_is_clamped_and_reset() {
        let (mut state, clock) = state_with(&[]);
        let _ = reduce(&mut state, Action::ShowUpdates, &clock);

        let _ = reduce(&mut state, Action::ScrollUpdatesUp, &clock);
        assert_eq!(state.updates_offset, 0);

        for _ in 0..RELEASES.len() + 3 {
            let _ = reduce(&mut state, Action::ScrollUpdatesDown, &clock);
        }
        assert_eq!(state.updates_offset, RELEASES.len() - 1);

        let _ = reduce(&mut state, Action::HideUpdates, &clock);
        let _ = reduce(&mut state, Action::ShowUpdates, &clock);
        assert_eq!(state.updates_offset, 0);
    }

    #[test]
    fn test_reload_round_trip() {
        let (mut state, clock) = state_with(&["A", "B", "C"]);
        let _ = reduce(&mut state, Action::Toggle(1), &clock);
        let mut storage = MemoryStorage::default();
        storage::save_items(&mut storage, &state.checklist.items).unwrap();

        let reloaded = AppState::new(Checklist::from_items(load_items(&storage)), &clock);
        assert_eq!(reloaded.checklist, state.checklist);
    }
}
