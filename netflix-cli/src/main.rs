// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! netflix2 CLI - profiles, ratings, and viewing history from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Log in once; the session cookie is saved for later runs
//! NETFLIX_EMAIL=me@example.com NETFLIX_PASSWORD=secret netflix login
//!
//! # List profiles
//! netflix profiles
//!
//! # Act as another profile
//! netflix switch-profile ABCDEF123
//!
//! # Full rating history as JSON
//! netflix ratings --format json --pretty
//!
//! # Thumbs up a title
//! netflix rate 80057281 2
//!
//! # Hide a whole series from the viewing history
//! netflix hide 80057281 --series
//! ```

mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use netflix_store::{Config, LogLevel};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{avatar, browse, config, history, login, profiles, ratings};

// ============================================================================
// CLI Definition
// ============================================================================

/// netflix2 CLI - drive a Netflix account from the terminal.
#[derive(Parser)]
#[command(name = "netflix")]
#[command(about = "Netflix account client: profiles, ratings, viewing history")]
#[command(long_about = r#"
netflix2 logs in to the Netflix web site, discovers the session coordinates
embedded in the account pages, and calls the JSON API with them.

Credentials are taken from, in order:
  1. --cookie / NETFLIX_COOKIE
  2. --email and --password / NETFLIX_EMAIL and NETFLIX_PASSWORD
  3. the session saved by a previous `netflix login`

Examples:
  netflix login                  # Log in and save the session
  netflix profiles               # List profiles
  netflix history --format json  # Viewing history as JSON
  netflix avatar-url icon26      # Avatar image URL
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Path of the configuration file.
    #[arg(long, global = true, env = "NETFLIX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Account email.
    #[arg(long, global = true, env = "NETFLIX_EMAIL")]
    pub email: Option<String>,

    /// Account password.
    #[arg(long, global = true, env = "NETFLIX_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Session cookie header from an existing browser session.
    #[arg(long, global = true, env = "NETFLIX_COOKIE", hide_env_values = true)]
    pub cookie: Option<String>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

impl Cli {
    /// Configuration file in effect.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Log in and save the session cookie.
    Login,

    /// Delete the saved session.
    Logout,

    /// List the account's profiles.
    #[command(visible_alias = "p")]
    Profiles,

    /// Act as another profile.
    SwitchProfile(profiles::SwitchArgs),

    /// Show the full rating history.
    Ratings,

    /// Show the full viewing history of the active profile.
    #[command(visible_alias = "h")]
    History,

    /// Rate a title.
    Rate(ratings::RateArgs),

    /// Hide one title from the viewing history.
    Hide(history::HideArgs),

    /// Hide the entire viewing history of the active profile.
    HideAll,

    /// Print an avatar image URL.
    AvatarUrl(avatar::AvatarUrlArgs),

    /// Change the active profile's avatar.
    SetAvatar(avatar::SetAvatarArgs),

    /// Fetch one page of a genre as raw JSON.
    Browse(browse::BrowseArgs),

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// The service needs the user to act (credentials, membership, login).
    UserAction = 2,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool, level: LogLevel) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("netflix=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // An unreadable config still gets reported, through the command below.
    let level = Config::load_from(&cli.config_path())
        .await
        .map(|c| c.log_level)
        .unwrap_or_default();
    setup_logging(cli.verbose, cli.quiet, level);

    let result = match &cli.command {
        Commands::Login => login::run(&cli).await,
        Commands::Logout => login::logout(&cli).await,
        Commands::Profiles => profiles::run(&cli).await,
        Commands::SwitchProfile(args) => profiles::switch(args, &cli).await,
        Commands::Ratings => ratings::run(&cli).await,
        Commands::History => history::run(&cli).await,
        Commands::Rate(args) => ratings::rate(args, &cli).await,
        Commands::Hide(args) => history::hide(args, &cli).await,
        Commands::HideAll => history::hide_all(&cli).await,
        Commands::AvatarUrl(args) => avatar::url(args, &cli).await,
        Commands::SetAvatar(args) => avatar::set(args, &cli).await,
        Commands::Browse(args) => browse::run(args, &cli).await,
        Commands::Config(args) => config::run(args, &cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(exit_code(&e) as i32);
    }

    Ok(())
}

fn exit_code(error: &anyhow::Error) -> ExitCode {
    match error.downcast_ref::<netflix_session::NetflixError>() {
        Some(e) if e.needs_user_action() => ExitCode::UserAction,
        _ => ExitCode::Error,
    }
}
