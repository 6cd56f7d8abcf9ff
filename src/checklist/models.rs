use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single checklist entry. Field order matches the stored JSON layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    #[serde(default)]
    pub checked: bool,
    pub id: i64,
}

impl Item {
    pub fn new(name: String, id: i64) -> Self {
        Self {
            name,
            checked: false,
            id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Checklist {
    pub items: Vec<Item>,
}

impl Checklist {
    pub fn from_items(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Id for an item created at `now_ms`, kept strictly above every existing id.
    /// Once an id has reached `i64::MAX` the result is only unique, not increasing.
    pub fn next_id(&self, now_ms: i64) -> i64 {
        match self.items.iter().map(|item| item.id).max() {
            Some(max) if max >= now_ms => max
                .checked_add(1)
                .unwrap_or_else(|| self.first_unused_id(now_ms)),
            _ => now_ms,
        }
    }

    fn first_unused_id(&self, from: i64) -> i64 {
        let used: HashSet<i64> = self.items.iter().map(|item| item.id).collect();
        (from..=i64::MAX)
            .chain((i64::MIN..from).rev())
            .find(|id| !used.contains(id))
            .unwrap_or(from)
    }

    pub fn push(&mut self, name: String, now_ms: i64) -> i64 {
        let id = self.next_id(now_ms);
        self.items.push(Item::new(name, id));
        id
    }

    pub fn toggle(&mut self, index: usize) -> bool {
        match self.items.get_mut(index) {
            Some(item) => {
                item.checked = !item.checked;
                true
            }
            None => false,
        }
    }

    /// Removes every item whose position is in `indices`, keeping the rest in order.
    pub fn remove_indices(&mut self, indices: &HashSet<usize>) -> usize {
        let before = self.items.len();
        let mut position = 0;
        self.items.retain(|_| {
            let keep = !indices.contains(&position);
            position += 1;
            keep
        });
        before - self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn total_items(&self) -> usize {
        self.items.len()
    }

    pub fn checked_items(&self) -> usize {
        self.items.iter().filter(|item| item.checked).count()
    }
}
