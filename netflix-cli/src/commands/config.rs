//! Config command - manage configuration.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use netflix_store::{default_config_dir, Config};
use tracing::info;

use super::session::load_config;
use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Write a configuration file with the defaults.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli).await,
        ConfigAction::Path => show_paths(cli).await,
        ConfigAction::Init { force } => init_config(*force, cli).await,
    }
}

async fn show_config(cli: &Cli) -> Result<()> {
    let config = load_config(cli).await?;

    match cli.format {
        OutputFormat::Text => {
            let service = &config.service;
            println!("netflix2 Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!("Base URL:        {}", service.base_url);
            println!("API prefix:      {}", service.api_prefix());
            println!("Login page:      {}", service.login_url());
            println!("Account page:    {}", service.account_path);
            println!("Profiles page:   {}", service.profiles_path);
            println!("Avatar template: {}", service.avatar_url_template);
            println!("Timeout:         {}s", service.timeout_secs);
            println!("User agent:      {}", service.user_agent);
            println!();
            println!("Log level:       {}", config.log_level);
            println!("Session file:    {}", config.session_path().display());
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&config)?);
        }
    }

    Ok(())
}

async fn show_paths(cli: &Cli) -> Result<()> {
    let config_dir = default_config_dir();
    let config_path = cli.config_path();
    // Fall back to defaults so paths print even when the file is broken.
    let session_path = load_config(cli).await.unwrap_or_default().session_path();

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:   {}", config_dir.display());
            println!("Config file:  {}", config_path.display());
            println!("Session file: {}", session_path.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": config_dir.display().to_string(),
                "config_file": config_path.display().to_string(),
                "session_file": session_path.display().to_string(),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

async fn init_config(force: bool, cli: &Cli) -> Result<()> {
    let path = cli.config_path();

    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    Config::default().save_to(&path).await?;
    info!(path = %path.display(), "Configuration initialized");
    if !cli.quiet {
        println!("Wrote {}", path.display());
    }

    Ok(())
}
