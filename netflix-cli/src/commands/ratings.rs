//! Rating commands.

use anyhow::Result;
use clap::{Args, ValueEnum};

use super::session::connect;
use crate::output::{print_list, RatingOutput, TextFormatter};
use crate::Cli;

/// Rating scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Scale {
    /// Thumbs: 0 clears, 1 down, 2 up.
    #[default]
    Thumb,
    /// Legacy stars: 1 to 5.
    Star,
}

/// Arguments for the rate command.
#[derive(Args)]
pub struct RateArgs {
    /// Title id.
    pub title_id: u64,

    /// Rating value on the chosen scale.
    pub rating: i64,

    /// Rating scale.
    #[arg(long, short, default_value = "thumb")]
    pub scale: Scale,
}

/// Prints the full rating history.
pub async fn run(cli: &Cli) -> Result<()> {
    let (client, _) = connect(cli).await?;
    let ratings = client.get_rating_history().await?;
    print_list(cli, &ratings, |r| RatingOutput::from(r), TextFormatter::format_ratings)
}

/// Rates one title.
pub async fn rate(args: &RateArgs, cli: &Cli) -> Result<()> {
    let (client, _) = connect(cli).await?;
    match args.scale {
        Scale::Thumb => client.set_thumb_rating(args.title_id, args.rating).await?,
        Scale::Star => client.set_star_rating(args.title_id, args.rating).await?,
    }

    if !cli.quiet {
        println!("Rated {} with {}", args.title_id, args.rating);
    }
    Ok(())
}
