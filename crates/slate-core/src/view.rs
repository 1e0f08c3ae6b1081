use std::collections::BTreeSet;

use tracing::trace;

use crate::item::{Category, Item};
use crate::store::ItemStore;

#[derive(Debug, Clone)]
pub struct ViewState {
    pub category: Category,
    pub search: String,
    pub view_completed: bool,
    pub view_deleted: bool,
    pub selected: BTreeSet<u64>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(Category::Task)
    }
}

impl ViewState {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            search: String::new(),
            view_completed: false,
            view_deleted: false,
            selected: BTreeSet::new(),
        }
    }

    // Search, selection, and both view flags must not leak across categories.
    // Re-selecting the current category runs the same reset.
    pub fn set_category(&mut self, category: Category) {
        self.category = category;
        self.search.clear();
        self.selected.clear();
        self.view_completed = false;
        self.view_deleted = false;
    }

    pub fn set_search(&mut self, query: &str) {
        self.search = query.to_string();
    }

    pub fn set_view_completed(&mut self, on: bool) {
        self.view_completed = on;
    }

    pub fn set_view_deleted(&mut self, on: bool) {
        self.view_deleted = on;
    }

    pub fn toggle_view_completed(&mut self) {
        self.set_view_completed(!self.view_completed);
    }

    pub fn toggle_view_deleted(&mut self) {
        self.set_view_deleted(!self.view_deleted);
    }

    pub fn toggle_select(&mut self, id: u64) -> bool {
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    pub fn mode(&self) -> ViewMode {
        if self.view_deleted {
            ViewMode::Deleted
        } else if self.view_completed {
            ViewMode::Completed
        } else {
            ViewMode::Active
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Active,
    Completed,
    Deleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Edit,
    SoftDelete,
    Complete,
    HardDelete,
}

impl ViewMode {
    pub fn actions(self) -> &'static [Action] {
        match self {
            ViewMode::Active => &[Action::Edit, Action::SoftDelete, Action::Complete],
            ViewMode::Completed => &[Action::HardDelete],
            // Items here only leave through the bulk clear.
            ViewMode::Deleted => &[],
        }
    }

    pub fn selection_enabled(self) -> bool {
        matches!(self, ViewMode::Completed)
    }
}

#[derive(Debug)]
pub struct Row<'a> {
    pub item: &'a Item,
    pub selected: bool,
}

#[derive(Debug)]
pub struct Projection<'a> {
    pub mode: ViewMode,
    pub rows: Vec<Row<'a>>,
}

pub fn project<'a>(store: &'a ItemStore, view: &ViewState) -> Projection<'a> {
    let mode = view.mode();

    let rows: Vec<Row<'a>> = match mode {
        ViewMode::Deleted => store
            .deleted(view.category)
            .iter()
            .map(|item| Row {
                item,
                selected: false,
            })
            .collect(),
        ViewMode::Completed => store
            .completed(view.category)
            .iter()
            .map(|item| Row {
                item,
                selected: view.selected.contains(&item.id),
            })
            .collect(),
        ViewMode::Active => {
            let needle = view.search.to_lowercase();
            store
                .active(view.category)
                .iter()
                .filter(|item| item.name.to_lowercase().contains(&needle))
                .map(|item| Row {
                    item,
                    selected: false,
                })
                .collect()
        }
    };

    trace!(?mode, rows = rows.len(), "projected view");
    Projection { mode, rows }
}
