//! Browse command.

use anyhow::Result;
use clap::Args;

use super::session::connect;
use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the browse command.
#[derive(Args)]
pub struct BrowseArgs {
    /// Genre id (34399 lists all films).
    pub genre_id: u64,

    /// Zero-based page.
    #[arg(long, default_value_t = 0)]
    pub page: u32,

    /// Titles per page.
    #[arg(long, default_value_t = 40)]
    pub per_page: u32,
}

/// Prints the raw JSON graph for one page of a genre.
pub async fn run(args: &BrowseArgs, cli: &Cli) -> Result<()> {
    let (client, _) = connect(cli).await?;
    let graph = client.browse(args.genre_id, args.page, args.per_page).await?;

    // The graph has no text rendering; text mode pretty-prints it.
    let pretty = cli.pretty || cli.format == OutputFormat::Text;
    println!("{}", JsonFormatter::new(pretty).format(&graph)?);
    Ok(())
}
