//! Login and logout commands.

use anyhow::{Context, Result};
use netflix_store::SessionStore;

use super::session::{connect, load_config};
use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Logs in and saves the session cookie.
pub async fn run(cli: &Cli) -> Result<()> {
    let (client, store) = connect(cli).await?;
    let guid = client.active_profile_guid().await;

    match cli.format {
        OutputFormat::Text => {
            if !cli.quiet {
                println!("Logged in. Session saved to {}", store.path().display());
            }
        }
        OutputFormat::Json => {
            let out = serde_json::json!({
                "authenticated": client.is_authenticated().await,
                "sessionFile": store.path().display().to_string(),
                "activeProfile": guid,
            });
            println!("{}", JsonFormatter::new(cli.pretty).format(&out)?);
        }
    }

    Ok(())
}

/// Deletes the saved session.
pub async fn logout(cli: &Cli) -> Result<()> {
    let config = load_config(cli).await?;
    let store = SessionStore::new(config.session_path());
    store
        .clear()
        .await
        .with_context(|| format!("failed to remove {}", store.path().display()))?;

    if !cli.quiet {
        println!("Session removed");
    }
    Ok(())
}
