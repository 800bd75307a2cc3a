//! Profile commands.

use anyhow::Result;
use clap::Args;

use super::session::{connect, save_cookies};
use crate::output::{print_list, ProfileOutput, TextFormatter};
use crate::Cli;

/// Arguments for the switch-profile command.
#[derive(Args)]
pub struct SwitchArgs {
    /// Profile guid (see `netflix profiles`).
    pub guid: String,
}

/// Lists the account's profiles.
pub async fn run(cli: &Cli) -> Result<()> {
    let (client, _) = connect(cli).await?;
    let profiles = client.get_profiles().await?;
    print_list(cli, &profiles, |p| ProfileOutput::from(p), TextFormatter::format_profiles)
}

/// Switches the active profile and saves the refreshed session.
pub async fn switch(args: &SwitchArgs, cli: &Cli) -> Result<()> {
    let (client, store) = connect(cli).await?;
    client.switch_profile(&args.guid).await?;
    save_cookies(&client, &store, cli.email.clone()).await?;

    if !cli.quiet {
        println!("Switched to profile {}", args.guid);
    }
    Ok(())
}
