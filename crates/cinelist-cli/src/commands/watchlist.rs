use crate::commands::AppContext;
use crate::output::Output;
use chrono::{DateTime, Utc};
use cinelist_models::{TitleKind, WatchlistEntry};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use owo_colors::OwoColorize;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub fn run_watchlist(cmd: crate::WatchlistCommands, ctx: &AppContext, output: &Output) -> Result<()> {
    match cmd {
        crate::WatchlistCommands::List => list(ctx, output),
        crate::WatchlistCommands::Remove { id, kind } => remove(id, kind, ctx, output),
        crate::WatchlistCommands::Contains { id, kind } => contains(id, kind, ctx, output),
        crate::WatchlistCommands::Clear { yes } => clear(yes, ctx, output),
    }
}

fn list(ctx: &AppContext, output: &Output) -> Result<()> {
    let entries = ctx.watchlist.snapshot();

    if !output.is_human() {
        let data = serde_json::to_value(&entries)?;
        output.json(&json!({ "count": entries.len(), "entries": data }));
        return Ok(());
    }

    if output.is_quiet() {
        return Ok(());
    }

    if entries.is_empty() {
        output.info("Your watchlist is empty. Add titles with 'cinelist add <id>'.");
        return Ok(());
    }

    println!("{}", entries_table(&entries));
    println!(
        "{} {}",
        format!("{} titles", entries.len()).bold(),
        format!("(stored in {})", ctx.paths.data_dir().display()).dimmed()
    );
    Ok(())
}

fn entries_table(entries: &[WatchlistEntry]) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(vec![
        Cell::new("ID").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Title").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Type").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Rating").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Added").add_attribute(comfy_table::Attribute::Bold),
    ]);

    for entry in entries {
        table.add_row(vec![
            Cell::new(entry.id),
            Cell::new(&entry.title),
            Cell::new(entry.kind.label()),
            Cell::new(format!("{:.1}", entry.vote_average)),
            Cell::new(format_added(entry.added_at)),
        ]);
    }
    table
}

fn format_added(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Counts watchlist updates published while the returned subscription is alive
fn track_size(ctx: &AppContext) -> (cinelist_store::Subscription, Arc<AtomicUsize>) {
    let size = Arc::new(AtomicUsize::new(0));
    let seen = size.clone();
    let subscription = ctx.watchlist.subscribe(move |entries| {
        seen.store(entries.len(), Ordering::SeqCst);
    });
    (subscription, size)
}

fn remove(id: u64, kind: TitleKind, ctx: &AppContext, output: &Output) -> Result<()> {
    let (_subscription, size) = track_size(ctx);

    let removed = ctx
        .watchlist
        .remove(id, kind)
        .map_err(|e| eyre!("Failed to update watchlist: {}", e))?;

    if removed {
        output.success(format!(
            "Removed {} {} ({} titles left)",
            kind,
            id,
            size.load(Ordering::SeqCst)
        ));
    } else {
        output.info(format!("{} {} is not in your watchlist", kind.label(), id));
    }
    Ok(())
}

fn contains(id: u64, kind: TitleKind, ctx: &AppContext, output: &Output) -> Result<()> {
    let member = ctx.watchlist.is_member(id, kind);

    if !output.is_human() {
        output.json(&json!({ "id": id, "type": kind.as_str(), "in_watchlist": member }));
        return Ok(());
    }

    if member {
        output.success(format!("{} {} is in your watchlist", kind.label(), id));
    } else {
        output.info(format!("{} {} is not in your watchlist", kind.label(), id));
    }
    Ok(())
}

fn clear(yes: bool, ctx: &AppContext, output: &Output) -> Result<()> {
    if !yes {
        output.warn(format!(
            "This removes all {} titles from your watchlist. Re-run with --yes to confirm.",
            ctx.watchlist.len()
        ));
        return Ok(());
    }

    ctx.watchlist
        .clear()
        .map_err(|e| eyre!("Failed to clear watchlist: {}", e))?;
    output.success("Watchlist cleared");
    Ok(())
}
