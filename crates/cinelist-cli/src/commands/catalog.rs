use crate::commands::AppContext;
use crate::output::Output;
use chrono::Utc;
use cinelist_catalog::{load_home_feed, CatalogSource, TmdbClient};
use cinelist_models::{Category, Feed, Title, TitleDetails, TitleKind};
use cinelist_store::WatchlistStore;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Color, Table};
use owo_colors::OwoColorize;
use serde_json::json;
use tracing::info;

fn client(ctx: &AppContext) -> Result<TmdbClient> {
    ctx.catalog().map_err(|e| eyre!("{}. Run 'cinelist config init --api-key <KEY>'.", e))
}

async fn fetch_details(id: u64, kind: TitleKind, ctx: &AppContext) -> Result<TitleDetails> {
    client(ctx)?
        .get_details(id, kind)
        .await
        .map_err(|e| eyre!("Failed to load {} {}: {}", kind, id, e))
}

pub async fn run_add(id: u64, kind: TitleKind, ctx: &AppContext, output: &Output) -> Result<()> {
    let details = fetch_details(id, kind, ctx).await?;
    let name = details.summary.display_name().to_string();

    let added = ctx
        .watchlist
        .add(&details.summary, kind)
        .map_err(|e| eyre!("Failed to update watchlist: {}", e))?;

    if added {
        info!("Added {} {} to watchlist", kind, id);
        output.success(format!("Added '{}' to your watchlist", name));
    } else {
        output.info(format!("'{}' is already in your watchlist", name));
    }
    Ok(())
}

pub async fn run_toggle(id: u64, kind: TitleKind, ctx: &AppContext, output: &Output) -> Result<()> {
    // Removing needs no catalog lookup
    let title = if ctx.watchlist.is_member(id, kind) {
        Title { id, ..Default::default() }
    } else {
        fetch_details(id, kind, ctx).await?.summary
    };

    let now_member = ctx
        .watchlist
        .toggle(&title, kind)
        .map_err(|e| eyre!("Failed to update watchlist: {}", e))?;

    if now_member {
        output.success(format!("Added '{}' to your watchlist", title.display_name()));
    } else {
        output.success(format!("Removed {} {} from your watchlist", kind, id));
    }
    Ok(())
}

pub async fn run_browse(feed: Feed, kind: TitleKind, ctx: &AppContext, output: &Output) -> Result<()> {
    let category = Category::new(feed, kind);
    let titles = client(ctx)?
        .list_by_category(category)
        .await
        .map_err(|e| eyre!("Failed to load {}: {}", category, e))?;

    if !output.is_human() {
        output.json(&json!({
            "category": category.to_string(),
            "results": titles_json(&titles, kind, &ctx.watchlist),
        }));
        return Ok(());
    }
    if output.is_quiet() {
        return Ok(());
    }

    println!("\n{} {}", feed_heading(feed).bright_cyan().bold(), kind.label().dimmed());
    println!("{}", titles_table(&titles, kind, &ctx.watchlist));
    Ok(())
}

pub async fn run_home(kind: TitleKind, seed: Option<u64>, ctx: &AppContext, output: &Output) -> Result<()> {
    let catalog = client(ctx)?;
    let feed = load_home_feed(&catalog, kind)
        .await
        .map_err(|e| eyre!("Failed to load home feed: {}", e))?;

    let seed = seed.unwrap_or_else(|| Utc::now().timestamp_subsec_nanos() as u64);
    let highlight = feed.highlight(seed);

    if !output.is_human() {
        let mut sections = serde_json::Map::new();
        for (section, titles) in feed.sections() {
            sections.insert(section.to_string(), titles_json(titles, kind, &ctx.watchlist));
        }
        output.json(&json!({
            "type": kind.as_str(),
            "highlight": highlight.map(|t| t.id),
            "sections": sections,
        }));
        return Ok(());
    }
    if output.is_quiet() {
        return Ok(());
    }

    if let Some(title) = highlight {
        println!("\n{} {}", "★".yellow(), title.display_name().bold());
        if let Some(overview) = title.overview.as_deref().filter(|o| !o.is_empty()) {
            println!("{}", overview);
        }
        if let Some(poster) = &title.poster_path {
            println!("{}", ctx.image_url("w500", poster).dimmed());
        }
    }

    for (section, titles) in feed.sections() {
        println!("\n{}", feed_heading(section).bright_cyan().bold());
        println!("{}", titles_table(titles, kind, &ctx.watchlist));
    }
    Ok(())
}

pub async fn run_details(id: u64, kind: TitleKind, ctx: &AppContext, output: &Output) -> Result<()> {
    let details = fetch_details(id, kind, ctx).await?;
    let member = ctx.watchlist.is_member(id, kind);

    if !output.is_human() {
        let mut data = serde_json::to_value(&details)?;
        if let Some(obj) = data.as_object_mut() {
            obj.insert("in_watchlist".to_string(), json!(member));
        }
        output.json(&data);
        return Ok(());
    }
    if output.is_quiet() {
        return Ok(());
    }

    let summary = &details.summary;
    let heading = match summary.year() {
        Some(year) => format!("{} ({})", summary.display_name(), year),
        None => summary.display_name().to_string(),
    };
    println!("\n{}", heading.bright_white().bold());
    if let Some(tagline) = details.tagline.as_deref().filter(|t| !t.is_empty()) {
        println!("{}", tagline.italic());
    }

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.add_row(vec![Cell::new("Type"), Cell::new(kind.label())]);
    table.add_row(vec![Cell::new("Rating"), Cell::new(format!("{:.1}", summary.vote_average))]);
    if let Some(genres) = details.genre_names() {
        table.add_row(vec![Cell::new("Genres"), Cell::new(genres)]);
    }
    if details.has_cast() {
        let cast: Vec<&str> = details.main_cast(3).iter().map(|c| c.name.as_str()).collect();
        table.add_row(vec![Cell::new("Cast"), Cell::new(cast.join(", "))]);
    }
    if let Some(director) = details.director() {
        table.add_row(vec![Cell::new("Director"), Cell::new(&director.name)]);
    }
    if let Some(seasons) = details.number_of_seasons {
        table.add_row(vec![Cell::new("Seasons"), Cell::new(seasons)]);
    }
    table.add_row(vec![
        Cell::new("Watchlist"),
        if member {
            Cell::new("✓ saved").fg(Color::Green)
        } else {
            Cell::new("-")
        },
    ]);
    if let Some(backdrop) = &summary.backdrop_path {
        table.add_row(vec![Cell::new("Backdrop"), Cell::new(ctx.image_url("original", backdrop))]);
    }
    println!("{}", table);

    if let Some(overview) = summary.overview.as_deref().filter(|o| !o.is_empty()) {
        println!("\n{}", overview);
    }
    Ok(())
}

pub async fn run_search(query: &str, ctx: &AppContext, output: &Output) -> Result<()> {
    let query = query.trim();
    if query.is_empty() {
        return Err(eyre!("Search query cannot be empty"));
    }

    let results = client(ctx)?
        .search(query)
        .await
        .map_err(|e| eyre!("Search failed: {}", e))?;

    if !output.is_human() {
        let results: Vec<serde_json::Value> = results
            .iter()
            .filter_map(|t| t.kind().map(|kind| title_json(t, kind, &ctx.watchlist)))
            .collect();
        output.json(&json!({ "query": query, "results": results }));
        return Ok(());
    }

    if results.is_empty() {
        output.info(format!("No results for '{}'", query));
        return Ok(());
    }
    if output.is_quiet() {
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(vec!["ID", "Title", "Type", "Year", "Rating", ""]);
    for title in &results {
        let Some(kind) = title.kind() else { continue };
        table.add_row(title_row(title, kind, &ctx.watchlist));
    }
    println!("{}", table);
    Ok(())
}

fn feed_heading(feed: Feed) -> &'static str {
    match feed {
        Feed::NowPlaying => "Now Playing",
        Feed::Trending => "Trending",
        Feed::Popular => "Popular",
        Feed::TopRated => "Top Rated",
    }
}

fn titles_table(titles: &[Title], kind: TitleKind, watchlist: &WatchlistStore) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(vec!["ID", "Title", "Type", "Year", "Rating", ""]);
    for title in titles {
        table.add_row(title_row(title, kind, watchlist));
    }
    table
}

fn title_row(title: &Title, kind: TitleKind, watchlist: &WatchlistStore) -> Vec<Cell> {
    let saved = if watchlist.is_member(title.id, kind) {
        Cell::new("★").fg(Color::Yellow)
    } else {
        Cell::new("")
    };
    vec![
        Cell::new(title.id),
        Cell::new(title.display_name()),
        Cell::new(kind.label()),
        Cell::new(title.year().map(|y| y.to_string()).unwrap_or_default()),
        Cell::new(format!("{:.1}", title.vote_average)),
        saved,
    ]
}

fn title_json(title: &Title, kind: TitleKind, watchlist: &WatchlistStore) -> serde_json::Value {
    json!({
        "id": title.id,
        "title": title.display_name(),
        "type": kind.as_str(),
        "year": title.year(),
        "vote_average": title.vote_average,
        "poster_path": title.poster_path,
        "in_watchlist": watchlist.is_member(title.id, kind),
    })
}

fn titles_json(titles: &[Title], kind: TitleKind, watchlist: &WatchlistStore) -> serde_json::Value {
    serde_json::Value::Array(titles.iter().map(|t| title_json(t, kind, watchlist)).collect())
}
