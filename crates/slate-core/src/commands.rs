use std::mem;

use anyhow::{Context, anyhow};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::cli::Invocation;
use crate::config::Config;
use crate::item::{Category, Item};
use crate::render::Renderer;
use crate::store::{AddOutcome, ItemStore};
use crate::view::{self, ViewMode, ViewState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn known_command_names() -> Vec<&'static str> {
    vec![
        "add",
        "edit",
        "delete",
        "done",
        "select",
        "purge",
        "clear",
        "search",
        "tasks",
        "notes",
        "completed",
        "deleted",
        "list",
        "export",
        "_commands",
        "_show",
        "help",
        "version",
        "quit",
        "exit",
    ]
}

pub fn expand_command_abbrev<'a>(token: &'a str, known: &[&'a str]) -> Option<&'a str> {
    if known.contains(&token) {
        return Some(token);
    }

    let mut matches = known.iter().copied().filter(|name| name.starts_with(token));
    let first = matches.next()?;
    if matches.next().is_some() {
        None
    } else {
        Some(first)
    }
}

#[instrument(skip(store, view, cfg, renderer, inv))]
pub fn dispatch(
    store: &mut ItemStore,
    view: &mut ViewState,
    cfg: &Config,
    renderer: &mut Renderer,
    inv: Invocation,
) -> anyhow::Result<Flow> {
    let now = Utc::now();
    let command = inv.command.as_str();

    debug!(command, args = ?inv.args, "dispatching command");

    match command {
        "add" => cmd_add(store, view, &inv.args, now)?,
        "edit" => cmd_edit(store, view, &inv.args)?,
        "delete" => cmd_delete(store, view, &inv.args)?,
        "done" => cmd_done(store, view, &inv.args)?,
        "select" => cmd_select(view, &inv.args)?,
        "purge" => cmd_purge(store, view)?,
        "clear" => cmd_clear(store)?,
        "search" => cmd_search(view, &inv.args)?,
        "tasks" => cmd_switch(view, Category::Task)?,
        "notes" => cmd_switch(view, Category::Note)?,
        "completed" => cmd_view_completed(view)?,
        "deleted" => cmd_view_deleted(view)?,
        "list" => cmd_list(store, view, renderer, now)?,
        "export" => cmd_export(store)?,
        "_commands" => cmd_commands()?,
        "_show" => cmd_show(cfg)?,
        "help" => cmd_help()?,
        "version" => println!("{}", env!("CARGO_PKG_VERSION")),
        "quit" | "exit" => return Ok(Flow::Quit),
        other => return Err(anyhow!("unknown command: {other}")),
    }

    Ok(Flow::Continue)
}

#[instrument(skip(store, view, args, now))]
fn cmd_add(
    store: &mut ItemStore,
    view: &ViewState,
    args: &[String],
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    info!("command add");

    let text = args.join(" ");
    match store.add_or_save_edit(view.category, &text, now) {
        AddOutcome::Added(id) => println!("Created {} {id}.", view.category.label()),
        AddOutcome::Renamed(id) => println!("Updated {} {id}.", view.category.label()),
        // Blank input and saves whose target is gone are refused silently.
        AddOutcome::Ignored => debug!("add ignored"),
    }
    Ok(())
}

#[instrument(skip(store, view, args))]
fn cmd_edit(store: &mut ItemStore, view: &ViewState, args: &[String]) -> anyhow::Result<()> {
    info!("command edit");

    let id = parse_id(args)?;
    match store.start_edit(view.category, id) {
        Some(name) => {
            println!("Editing {} {id}: {name}", view.category.label());
            println!("(the next 'add' replaces its text)");
        }
        None => println!("No active {} {id}.", view.category.label()),
    }
    Ok(())
}

// Mirrors the per-row delete action: permanent in the completed view, a move
// to the deleted pool in the active view, refused in the deleted view.
#[instrument(skip(store, view, args))]
fn cmd_delete(store: &mut ItemStore, view: &ViewState, args: &[String]) -> anyhow::Result<()> {
    info!("command delete");

    let id = parse_id(args)?;
    match view.mode() {
        ViewMode::Deleted => {
            return Err(anyhow!("deleted items can only be removed with 'clear'"));
        }
        ViewMode::Completed => {
            let removed = store.hard_delete(view.category, id) as usize;
            println!("Removed {removed} completed {}(s).", view.category.label());
        }
        ViewMode::Active => {
            let moved = store.soft_delete(view.category, id) as usize;
            println!("Deleted {moved} {}(s).", view.category.label());
        }
    }
    Ok(())
}

#[instrument(skip(store, view, args))]
fn cmd_done(store: &mut ItemStore, view: &ViewState, args: &[String]) -> anyhow::Result<()> {
    info!("command done");

    let id = parse_id(args)?;
    let moved = store.complete(view.category, id) as usize;
    println!("Completed {moved} {}(s).", view.category.label());
    Ok(())
}

#[instrument(skip(view, args))]
fn cmd_select(view: &mut ViewState, args: &[String]) -> anyhow::Result<()> {
    info!("command select");

    let id = parse_id(args)?;
    if view.toggle_select(id) {
        println!("Selected {id}.");
    } else {
        println!("Unselected {id}.");
    }
    Ok(())
}

#[instrument(skip(store, view))]
fn cmd_purge(store: &mut ItemStore, view: &mut ViewState) -> anyhow::Result<()> {
    info!("command purge");

    // Taking the set keeps the selection empty afterwards whether or not
    // anything matched.
    let picked = mem::take(&mut view.selected);
    let removed = store.remove_selected(view.category, &picked);
    println!("Purged {removed} item(s).");
    Ok(())
}

#[instrument(skip(store))]
fn cmd_clear(store: &mut ItemStore) -> anyhow::Result<()> {
    info!("command clear");

    let cleared = store.clear_deleted_history();
    println!("Cleared {cleared} deleted item(s).");
    Ok(())
}

#[instrument(skip(view, args))]
fn cmd_search(view: &mut ViewState, args: &[String]) -> anyhow::Result<()> {
    info!("command search");

    let query = args.join(" ");
    view.set_search(&query);
    if query.is_empty() {
        println!("Search cleared.");
    } else {
        println!("Searching for \"{query}\".");
    }
    Ok(())
}

#[instrument(skip(view))]
fn cmd_switch(view: &mut ViewState, category: Category) -> anyhow::Result<()> {
    info!("command switch");

    view.set_category(category);
    println!("Switched to {}.", category.title());
    Ok(())
}

#[instrument(skip(view))]
fn cmd_view_completed(view: &mut ViewState) -> anyhow::Result<()> {
    info!("command completed");

    view.toggle_view_completed();
    if view.view_completed {
        println!("Viewing completed {}.", view.category.title().to_lowercase());
    } else {
        println!("Back to active view.");
    }
    Ok(())
}

#[instrument(skip(view))]
fn cmd_view_deleted(view: &mut ViewState) -> anyhow::Result<()> {
    info!("command deleted");

    view.toggle_view_deleted();
    if view.view_deleted {
        println!("Viewing deleted {}.", view.category.title().to_lowercase());
    } else {
        println!("Back to active view.");
    }
    Ok(())
}

#[instrument(skip(store, view, renderer, now))]
fn cmd_list(
    store: &ItemStore,
    view: &ViewState,
    renderer: &mut Renderer,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    info!("command list");

    let projection = view::project(store, view);
    renderer.print_projection(&projection, view, now)?;
    Ok(())
}

#[derive(Serialize)]
struct ExportPools<'a> {
    active: &'a [Item],
    completed: &'a [Item],
    deleted: &'a [Item],
}

#[derive(Serialize)]
struct ExportDump<'a> {
    tasks: ExportPools<'a>,
    notes: ExportPools<'a>,
}

#[instrument(skip(store))]
fn cmd_export(store: &ItemStore) -> anyhow::Result<()> {
    info!("command export");

    let dump = ExportDump {
        tasks: ExportPools {
            active: store.active(Category::Task),
            completed: store.completed(Category::Task),
            deleted: store.deleted(Category::Task),
        },
        notes: ExportPools {
            active: store.active(Category::Note),
            completed: store.completed(Category::Note),
            deleted: store.deleted(Category::Note),
        },
    };

    let out = serde_json::to_string(&dump)?;
    println!("{out}");
    Ok(())
}

fn cmd_commands() -> anyhow::Result<()> {
    for command in known_command_names() {
        println!("{command}");
    }
    Ok(())
}

fn cmd_show(cfg: &Config) -> anyhow::Result<()> {
    for (k, v) in cfg.iter() {
        println!("{k}={v}");
    }
    Ok(())
}

fn cmd_help() -> anyhow::Result<()> {
    println!("Commands: add <text>, edit <id>, delete <id>, done <id>, select <id>, purge, clear, search [text], tasks, notes, completed, deleted, list, export, help, version, quit");
    println!("'edit <id>' marks an item; the next 'add <text>' replaces its name.");
    println!("'delete' follows the current view: active items move to the deleted pool, completed items are removed for good.");
    Ok(())
}

fn parse_id(args: &[String]) -> anyhow::Result<u64> {
    let raw = args.first().ok_or_else(|| anyhow!("expected an item id"))?;
    raw.parse::<u64>()
        .with_context(|| format!("invalid item id: {raw}"))
}
