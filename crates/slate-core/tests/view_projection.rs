use chrono::Utc;
use slate_core::item::Category;
use slate_core::store::{AddOutcome, ItemStore};
use slate_core::view::{self, Action, ViewMode, ViewState};

fn add(store: &mut ItemStore, category: Category, name: &str) -> u64 {
    match store.add_or_save_edit(category, name, Utc::now()) {
        AddOutcome::Added(id) => id,
        other => panic!("expected a fresh item, got {other:?}"),
    }
}

#[test]
fn search_filters_active_items_case_insensitively() {
    let mut store = ItemStore::new();
    add(&mut store, Category::Task, "Buy milk");
    let call_mom = add(&mut store, Category::Task, "Call mom");

    let mut view = ViewState::default();
    view.set_search("mom");

    let projection = view::project(&store, &view);
    assert_eq!(projection.mode, ViewMode::Active);
    assert_eq!(projection.rows.len(), 1);
    assert_eq!(projection.rows[0].item.id, call_mom);
    assert_eq!(projection.rows[0].item.name, "Call mom");

    view.set_search("MOM");
    assert_eq!(view::project(&store, &view).rows.len(), 1);

    view.set_search("zzz");
    assert!(view::project(&store, &view).rows.is_empty());
}

#[test]
fn empty_search_shows_the_whole_active_pool_in_order() {
    let mut store = ItemStore::new();
    let first = add(&mut store, Category::Task, "Buy milk");
    let second = add(&mut store, Category::Task, "Call mom");

    let view = ViewState::default();
    let projection = view::project(&store, &view);
    assert_eq!(projection.rows.len(), 2);
    assert_eq!(projection.rows[0].item.id, first);
    assert_eq!(projection.rows[1].item.id, second);
}

#[test]
fn deleted_view_wins_precedence_and_ignores_search() {
    let mut store = ItemStore::new();
    let active = add(&mut store, Category::Task, "Buy milk");
    let deleted = add(&mut store, Category::Task, "Call mom");
    let completed = add(&mut store, Category::Task, "Pay rent");
    store.soft_delete(Category::Task, deleted);
    store.complete(Category::Task, completed);

    let mut view = ViewState::default();
    view.set_search("no such thing");
    view.toggle_view_completed();
    view.toggle_view_deleted();

    let projection = view::project(&store, &view);
    assert_eq!(projection.mode, ViewMode::Deleted);
    assert_eq!(projection.rows.len(), 1);
    assert_eq!(projection.rows[0].item.id, deleted);
    assert!(!projection.rows[0].selected);

    view.toggle_view_deleted();
    let projection = view::project(&store, &view);
    assert_eq!(projection.mode, ViewMode::Completed);
    assert_eq!(projection.rows[0].item.id, completed);

    view.toggle_view_completed();
    let projection = view::project(&store, &view);
    assert_eq!(projection.mode, ViewMode::Active);
    assert!(projection.rows.is_empty());

    view.set_search("");
    assert_eq!(view::project(&store, &view).rows[0].item.id, active);
}

#[test]
fn selection_flags_only_show_in_the_completed_view() {
    let mut store = ItemStore::new();
    let picked = add(&mut store, Category::Task, "Buy milk");
    let other = add(&mut store, Category::Task, "Call mom");
    store.complete(Category::Task, picked);
    store.complete(Category::Task, other);

    let mut view = ViewState::default();
    view.toggle_select(picked);

    let projection = view::project(&store, &view);
    assert_eq!(projection.mode, ViewMode::Active);
    assert!(projection.rows.iter().all(|row| !row.selected));

    view.toggle_view_completed();
    let projection = view::project(&store, &view);
    assert_eq!(projection.mode, ViewMode::Completed);
    let flags: Vec<(u64, bool)> = projection
        .rows
        .iter()
        .map(|row| (row.item.id, row.selected))
        .collect();
    assert_eq!(flags, vec![(picked, true), (other, false)]);
}

#[test]
fn double_toggle_restores_the_selection() {
    let mut view = ViewState::default();

    assert!(view.toggle_select(7));
    assert!(view.selected.contains(&7));
    assert!(!view.toggle_select(7));
    assert!(view.selected.is_empty());
}

#[test]
fn category_switch_resets_view_state_but_not_edit_markers() {
    let mut store = ItemStore::new();
    let task = add(&mut store, Category::Task, "Buy milk");
    assert!(store.start_edit(Category::Task, task).is_some());

    let mut view = ViewState::default();
    view.set_search("milk");
    view.toggle_select(task);
    view.toggle_view_completed();
    view.toggle_view_deleted();

    view.set_category(Category::Note);
    assert_eq!(view.category, Category::Note);
    assert!(view.search.is_empty());
    assert!(view.selected.is_empty());
    assert!(!view.view_completed);
    assert!(!view.view_deleted);
    assert_eq!(store.edit_target(Category::Task), Some(task));

    // Re-selecting the current category resets just the same.
    view.set_search("plants");
    view.set_category(Category::Note);
    assert!(view.search.is_empty());
}

#[test]
fn per_mode_actions_match_the_lifecycle() {
    assert_eq!(
        ViewMode::Active.actions(),
        &[Action::Edit, Action::SoftDelete, Action::Complete]
    );
    assert_eq!(ViewMode::Completed.actions(), &[Action::HardDelete]);
    assert!(ViewMode::Deleted.actions().is_empty());

    assert!(ViewMode::Completed.selection_enabled());
    assert!(!ViewMode::Active.selection_enabled());
    assert!(!ViewMode::Deleted.selection_enabled());
}
