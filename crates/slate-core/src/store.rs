use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use crate::item::{Category, IdIssuer, Item};

#[derive(Debug, Default)]
struct Pools {
    active: Vec<Item>,
    completed: Vec<Item>,
    deleted: Vec<Item>,
    edit_target: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added(u64),
    Renamed(u64),
    Ignored,
}

#[derive(Debug, Default)]
pub struct ItemStore {
    tasks: Pools,
    notes: Pools,
    ids: IdIssuer,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn pools(&self, category: Category) -> &Pools {
        match category {
            Category::Task => &self.tasks,
            Category::Note => &self.notes,
        }
    }

    fn pools_mut(&mut self, category: Category) -> &mut Pools {
        match category {
            Category::Task => &mut self.tasks,
            Category::Note => &mut self.notes,
        }
    }

    pub fn active(&self, category: Category) -> &[Item] {
        &self.pools(category).active
    }

    pub fn completed(&self, category: Category) -> &[Item] {
        &self.pools(category).completed
    }

    pub fn deleted(&self, category: Category) -> &[Item] {
        &self.pools(category).deleted
    }

    pub fn edit_target(&self, category: Category) -> Option<u64> {
        self.pools(category).edit_target
    }

    #[instrument(skip(self, text, now))]
    pub fn add_or_save_edit(
        &mut self,
        category: Category,
        text: &str,
        now: DateTime<Utc>,
    ) -> AddOutcome {
        let name = text.trim();
        if name.is_empty() {
            debug!("blank input ignored");
            return AddOutcome::Ignored;
        }

        // A pending edit consumes the save even when its target has already
        // left the active pool; the typed text is discarded in that case.
        if let Some(target) = self.pools(category).edit_target {
            let pools = self.pools_mut(category);
            pools.edit_target = None;
            let outcome = match pools.active.iter_mut().find(|item| item.id == target) {
                Some(item) => {
                    item.name = name.to_string();
                    AddOutcome::Renamed(target)
                }
                None => {
                    debug!(target, "edit target gone, save dropped");
                    AddOutcome::Ignored
                }
            };
            return outcome;
        }

        let id = self.ids.next(now);
        self.pools_mut(category)
            .active
            .push(Item::new(id, name.to_string(), now));
        self.debug_assert_disjoint(category);

        debug!(id, "item created");
        AddOutcome::Added(id)
    }

    #[instrument(skip(self))]
    pub fn start_edit(&mut self, category: Category, id: u64) -> Option<&str> {
        let pools = self.pools_mut(category);
        let pos = pools.active.iter().position(|item| item.id == id)?;
        pools.edit_target = Some(id);
        debug!(id, "edit started");
        Some(pools.active[pos].name.as_str())
    }

    #[instrument(skip(self))]
    pub fn complete(&mut self, category: Category, id: u64) -> bool {
        let pools = self.pools_mut(category);
        let Some(pos) = pools.active.iter().position(|item| item.id == id) else {
            return false;
        };

        let item = pools.active.remove(pos);
        pools.completed.push(item);
        self.debug_assert_disjoint(category);

        debug!(id, "item completed");
        true
    }

    #[instrument(skip(self))]
    pub fn soft_delete(&mut self, category: Category, id: u64) -> bool {
        let pools = self.pools_mut(category);
        let Some(pos) = pools.active.iter().position(|item| item.id == id) else {
            return false;
        };

        let item = pools.active.remove(pos);
        pools.deleted.push(item);
        self.debug_assert_disjoint(category);

        debug!(id, "item soft-deleted");
        true
    }

    #[instrument(skip(self))]
    pub fn hard_delete(&mut self, category: Category, id: u64) -> bool {
        let pools = self.pools_mut(category);
        let Some(pos) = pools.completed.iter().position(|item| item.id == id) else {
            return false;
        };

        pools.completed.remove(pos);
        debug!(id, "item destroyed");
        true
    }

    // Global across both categories, not scoped to the one being viewed.
    #[instrument(skip(self))]
    pub fn clear_deleted_history(&mut self) -> usize {
        let count = self.tasks.deleted.len() + self.notes.deleted.len();
        self.tasks.deleted.clear();
        self.notes.deleted.clear();

        debug!(count, "deleted history cleared");
        count
    }

    #[instrument(skip(self, selected))]
    pub fn remove_selected(&mut self, category: Category, selected: &BTreeSet<u64>) -> usize {
        let pools = self.pools_mut(category);
        let before = pools.completed.len();
        pools.completed.retain(|item| !selected.contains(&item.id));
        let removed = before - pools.completed.len();

        debug!(removed, "selected items destroyed");
        removed
    }

    fn debug_assert_disjoint(&self, category: Category) {
        if cfg!(debug_assertions) {
            let pools = self.pools(category);
            let mut seen = BTreeSet::new();
            for item in pools
                .active
                .iter()
                .chain(&pools.completed)
                .chain(&pools.deleted)
            {
                debug_assert!(seen.insert(item.id), "id {} appears in two pools", item.id);
            }
        }
    }
}
