use crate::output::Output;
use cinelist_config::{Config, PathManager};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use owo_colors::OwoColorize;
use serde_json::json;

pub fn run_config(cmd: crate::ConfigCommands, paths: &PathManager, output: &Output) -> Result<()> {
    match cmd {
        crate::ConfigCommands::Show { full } => show_config(full, paths, output),
        crate::ConfigCommands::Init { api_key, force } => init_config(api_key, force, paths, output),
    }
}

fn show_config(full: bool, paths: &PathManager, output: &Output) -> Result<()> {
    let config_file = paths.config_file();
    let exists = config_file.exists();

    let config = Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

    let api_key = if full {
        config.tmdb.api_key.clone()
    } else {
        mask_string(&config.tmdb.api_key)
    };

    if !output.is_human() {
        output.json(&json!({
            "config_file": config_file.display().to_string(),
            "exists": exists,
            "tmdb": {
                "api_key": api_key,
                "base_url": config.tmdb.base_url,
                "image_base_url": config.tmdb.image_base_url,
                "language": config.tmdb.language,
                "timeout_seconds": config.tmdb.timeout_seconds,
            },
            "storage": {
                "watchlist_key": config.storage.watchlist_key,
                "data_dir": paths.data_dir().display().to_string(),
            },
            "log_dir": paths.log_dir().display().to_string(),
        }));
        return Ok(());
    }

    if !exists {
        output.warn(format!("Configuration file not found at: {}", config_file.display()));
        output.info("Showing defaults. Run 'cinelist config init' to create it.");
    }
    if output.is_quiet() {
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(vec![
        Cell::new("Setting").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Value").add_attribute(comfy_table::Attribute::Bold),
    ]);
    table.add_row(vec![Cell::new("Config File"), Cell::new(config_file.display())]);
    table.add_row(vec![Cell::new("TMDB API Key"), Cell::new(api_key)]);
    table.add_row(vec![Cell::new("TMDB Base URL"), Cell::new(&config.tmdb.base_url)]);
    table.add_row(vec![Cell::new("Image Base URL"), Cell::new(&config.tmdb.image_base_url)]);
    table.add_row(vec![Cell::new("Language"), Cell::new(&config.tmdb.language)]);
    table.add_row(vec![Cell::new("Timeout"), Cell::new(format!("{}s", config.tmdb.timeout_seconds))]);
    table.add_row(vec![Cell::new("Watchlist Key"), Cell::new(&config.storage.watchlist_key)]);
    table.add_row(vec![Cell::new("Data Directory"), Cell::new(paths.data_dir().display())]);
    table.add_row(vec![Cell::new("Log Directory"), Cell::new(paths.log_dir().display())]);

    println!("\n{}", "Configuration".bright_cyan().bold());
    println!("{}", table);

    if !config.is_tmdb_configured() {
        output.warn("No TMDB API key set. Catalog commands will not work until one is configured.");
    }
    Ok(())
}

fn init_config(api_key: Option<String>, force: bool, paths: &PathManager, output: &Output) -> Result<()> {
    let config_file = paths.config_file();

    let mut config = if config_file.exists() {
        if !force && api_key.is_none() {
            output.warn(format!("Configuration already exists at: {}", config_file.display()));
            output.info("Use --force to reset it to defaults, or --api-key to update the key.");
            return Ok(());
        }
        if force {
            Config::default()
        } else {
            Config::load_from_file(&config_file)
                .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?
        }
    } else {
        Config::default()
    };

    if let Some(key) = api_key {
        let key = key.trim();
        if key.is_empty() {
            return Err(eyre!("API key cannot be empty"));
        }
        config.tmdb.api_key = key.to_string();
    }

    config.validate().map_err(|e| eyre!("Invalid configuration: {}", e))?;
    cinelist_store::validate_key(&config.storage.watchlist_key)
        .map_err(|e| eyre!("Invalid configuration: {}", e))?;
    paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create directories: {}", e))?;
    config
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to save config: {}", e))?;

    output.success(format!("Configuration saved to {}", config_file.display()));
    Ok(())
}

fn mask_string(s: &str) -> String {
    if s.is_empty() || s == "YOUR_API_KEY" {
        return "<not set>".to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}
