//! Portfolio CLI
//!
//! Loads a GitHub account's repositories and prints them as filtered
//! portfolio projects.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use portfolio::{
    error::{AppError, Result},
    models::Config,
    pipeline::{self, FilterKey},
    render::{HtmlCardPresenter, JsonPresenter, TextPresenter},
    services::{RateWindowInspector, RequestExecutor},
    session::{Action, AppState, LoadState},
};

/// Portfolio - GitHub project harvester
#[derive(Parser, Debug)]
#[command(
    name = "portfolio",
    version,
    about = "Harvest GitHub repositories into portfolio projects"
)]
struct Cli {
    /// Path to the TOML configuration file [default: portfolio.toml if present]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Account to harvest (overrides github.username)
    #[arg(short, long)]
    user: Option<String>,

    /// API token (overrides github.token)
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load, filter and print projects
    Projects {
        /// Tag to filter by, or "all"
        #[arg(short, long, default_value = "all")]
        filter: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Show the current rate-limit window
    Status,

    /// Validate configuration
    Validate,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
    Html,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Render the session through the presenter chosen by `format`.
fn render(state: &AppState, format: Format) -> Result<String> {
    match format {
        Format::Text => {
            let mut presenter = TextPresenter::default();
            state.render(&mut presenter)?;
            Ok(presenter.into_output())
        }
        Format::Json => {
            let mut presenter = JsonPresenter::new();
            state.render(&mut presenter)?;
            Ok(presenter.into_output())
        }
        Format::Html => {
            let mut presenter = HtmlCardPresenter::new();
            state.render(&mut presenter)?;
            Ok(presenter.into_output())
        }
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = Config::resolve(cli.config.as_deref());
    let level = match &loaded {
        Ok(config) => config.logging.level.as_str(),
        Err(_) => "info",
    };
    init_logging(cli.verbose, level);

    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            log::error!("Config load failed: {}", e);
            return Err(e);
        }
    };

    if let Some(user) = cli.user {
        config.github.username = user;
    }
    if cli.token.is_some() {
        config.github.token = cli.token;
    }

    match cli.command {
        Command::Projects { filter, format } => {
            config.validate()?;
            let executor = RequestExecutor::from_config(&config)?;

            let state = pipeline::load_session(AppState::new(), &config, &executor)
                .await
                .apply(Action::SetFilter(FilterKey::parse(&filter)));

            println!("{}", render(&state, format)?);

            if let LoadState::Failed { message, .. } = &state.projects {
                return Err(AppError::validation(format!(
                    "project load failed: {message}"
                )));
            }
        }

        Command::Status => {
            let executor = RequestExecutor::from_config(&config)?;
            let inspector = RateWindowInspector::new(executor, config.github.api_url()?);

            match inspector.check_status().await {
                Some(status) => {
                    println!("limit:     {}", status.limit);
                    println!("remaining: {}", status.remaining);
                    println!("resets at: {}", status.reset_at.to_rfc3339());
                }
                None => println!("Rate limit status unavailable"),
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!(
                "✓ Config OK (user {}, {} token)",
                config.github.username,
                if config.github.credential().is_some() {
                    "with"
                } else {
                    "without"
                }
            );
        }
    }

    Ok(())
}
