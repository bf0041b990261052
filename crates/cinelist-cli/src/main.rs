use clap::{ArgAction, Parser, Subcommand};
use cinelist_config::PathManager;
use cinelist_models::{Feed, Rgb, TitleKind};
use color_eyre::eyre::eyre;
use commands::{catalog, config, theme, watchlist, AppContext};

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "cinelist")]
#[command(about = "cinelist - Browse movies and series and keep a personal watchlist")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Write logs to the rolling log file instead of stderr
    #[arg(long, action = ArgAction::SetTrue, global = true)]
    log_to_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or edit the watchlist
    Watchlist {
        #[command(subcommand)]
        cmd: Option<WatchlistCommands>,
    },
    /// Add a title to the watchlist (fetches its details first)
    Add {
        /// TMDB id of the title
        id: u64,

        /// movie or tv
        #[arg(long, default_value = "movie")]
        kind: TitleKind,
    },
    /// Add a title if it is not in the watchlist, remove it otherwise
    Toggle {
        /// TMDB id of the title
        id: u64,

        /// movie or tv
        #[arg(long, default_value = "movie")]
        kind: TitleKind,
    },
    /// List one catalog category
    #[command(long_about = "List titles from one catalog category: now_playing, trending, popular or top_rated. Titles already in the watchlist are marked.")]
    Browse {
        feed: Feed,

        /// movie or tv
        #[arg(long, default_value = "movie")]
        kind: TitleKind,
    },
    /// Show the home feed (all four categories, loaded together)
    Home {
        /// movie or tv
        #[arg(long, default_value = "movie")]
        kind: TitleKind,

        /// Seed used to pick the highlighted title (random if omitted)
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Show details, cast and director for a title
    Details {
        id: u64,

        /// movie or tv
        #[arg(long, default_value = "movie")]
        kind: TitleKind,
    },
    /// Search movies and series
    Search {
        query: String,
    },
    /// Compute the themed background for a highlighted poster
    #[command(long_about = "Compute the background color shown behind the highlighted title. The background starts at the poster's dominant color and fades to black over 300 units of scrolling once half the poster height has been scrolled past.")]
    Theme {
        /// Dominant poster color as r,g,b
        #[arg(long)]
        color: Rgb,

        /// Rendered poster height
        #[arg(long)]
        poster_height: f64,

        /// Scroll positions to evaluate
        #[arg(long = "scroll", num_args = 1.., required = true, allow_negative_numbers = true)]
        scroll: Vec<f64>,
    },
    /// Show or create the configuration file
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum WatchlistCommands {
    /// List watchlist entries in the order they were added
    List,
    /// Remove a title from the watchlist
    Remove {
        id: u64,

        /// movie or tv
        #[arg(long, default_value = "movie")]
        kind: TitleKind,
    },
    /// Check whether a title is in the watchlist
    Contains {
        id: u64,

        /// movie or tv
        #[arg(long, default_value = "movie")]
        kind: TitleKind,
    },
    /// Remove every title from the watchlist
    Clear {
        /// Confirm clearing the whole list
        #[arg(long, action = ArgAction::SetTrue)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Write a configuration file with defaults
    Init {
        /// TMDB API key to store
        #[arg(long)]
        api_key: Option<String>,

        /// Overwrite an existing configuration file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let paths = PathManager::default();

    let log_file = cli.log_to_file.then(|| paths.log_file());
    logging::init_logging(cli.verbose, cli.quiet, log_file).map_err(|e| eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        // Neither needs the watchlist or a valid config
        Commands::Config { cmd } => {
            config::run_config(cmd.unwrap_or(ConfigCommands::Show { full: false }), &paths, &output)
        }
        Commands::Theme { color, poster_height, scroll } => {
            theme::run_theme(color, poster_height, &scroll, &output)
        }
        command => {
            let ctx = AppContext::load(paths).map_err(|e| eyre!("Failed to initialize: {}", e))?;
            run_with_context(command, &ctx, &output).await
        }
    }
}

async fn run_with_context(command: Commands, ctx: &AppContext, output: &output::Output) -> color_eyre::Result<()> {
    match command {
        Commands::Watchlist { cmd } => {
            watchlist::run_watchlist(cmd.unwrap_or(WatchlistCommands::List), ctx, output)
        }
        Commands::Add { id, kind } => catalog::run_add(id, kind, ctx, output).await,
        Commands::Toggle { id, kind } => catalog::run_toggle(id, kind, ctx, output).await,
        Commands::Browse { feed, kind } => catalog::run_browse(feed, kind, ctx, output).await,
        Commands::Home { kind, seed } => catalog::run_home(kind, seed, ctx, output).await,
        Commands::Details { id, kind } => catalog::run_details(id, kind, ctx, output).await,
        Commands::Search { query } => catalog::run_search(&query, ctx, output).await,
        // Handled in main before the context is loaded
        Commands::Config { .. } | Commands::Theme { .. } => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_accepts_negative_scroll() {
        let cli = Cli::try_parse_from([
            "cinelist", "theme", "--color", "120,60,30", "--poster-height", "400", "--scroll", "-50", "0", "350",
        ])
        .unwrap();

        match cli.command {
            Commands::Theme { scroll, poster_height, .. } => {
                assert_eq!(scroll, vec![-50.0, 0.0, 350.0]);
                assert_eq!(poster_height, 400.0);
            }
            _ => panic!("expected theme command"),
        }
    }
}
