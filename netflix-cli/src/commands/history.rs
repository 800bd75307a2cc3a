//! Viewing history commands.

use anyhow::Result;
use clap::Args;

use super::session::connect;
use crate::output::{print_list, HistoryOutput, TextFormatter};
use crate::Cli;

/// Arguments for the hide command.
#[derive(Args)]
pub struct HideArgs {
    /// Title id of the entry to hide.
    pub movie_id: u64,

    /// Hide every episode of the series the title belongs to.
    #[arg(long)]
    pub series: bool,
}

/// Prints the full viewing history of the active profile.
pub async fn run(cli: &Cli) -> Result<()> {
    let (client, _) = connect(cli).await?;
    let items = client.get_viewing_history().await?;
    print_list(cli, &items, |h| HistoryOutput::from(h), TextFormatter::format_history)
}

/// Hides one entry.
pub async fn hide(args: &HideArgs, cli: &Cli) -> Result<()> {
    let (client, _) = connect(cli).await?;
    client
        .hide_viewing_history_item(args.movie_id, args.series)
        .await?;

    if !cli.quiet {
        println!("Hidden {}", args.movie_id);
    }
    Ok(())
}

/// Hides the whole viewing history.
pub async fn hide_all(cli: &Cli) -> Result<()> {
    let (client, _) = connect(cli).await?;
    client.hide_all_viewing_history().await?;

    if !cli.quiet {
        println!("Viewing history hidden");
    }
    Ok(())
}
