//! Avatar commands.

use anyhow::{bail, Result};
use clap::Args;
use netflix_session::{avatar_url, DEFAULT_AVATAR_SIZE};

use super::session::{connect, load_config};
use crate::Cli;

/// Arguments for the avatar-url command.
#[derive(Args)]
pub struct AvatarUrlArgs {
    /// Avatar key, e.g. `icon26`. Omit to use the active profile's avatar.
    pub name: Option<String>,

    /// Edge length in pixels.
    #[arg(long, short, default_value_t = DEFAULT_AVATAR_SIZE)]
    pub size: u32,
}

/// Arguments for the set-avatar command.
#[derive(Args)]
pub struct SetAvatarArgs {
    /// Avatar key, e.g. `icon26`.
    pub name: String,
}

/// Prints an avatar URL. With a name this needs no login.
pub async fn url(args: &AvatarUrlArgs, cli: &Cli) -> Result<()> {
    let url = if let Some(name) = &args.name {
        let config = load_config(cli).await?;
        avatar_url(&config.service.avatar_url_template, name, args.size)
    } else {
        let (client, _) = connect(cli).await?;
        match client.get_avatar_url(Some(args.size)).await? {
            Some(url) => url,
            None => bail!("the active profile has no avatar"),
        }
    };

    println!("{url}");
    Ok(())
}

/// Changes the active profile's avatar.
pub async fn set(args: &SetAvatarArgs, cli: &Cli) -> Result<()> {
    let (client, _) = connect(cli).await?;
    client.set_avatar(&args.name).await?;

    if !cli.quiet {
        println!("Avatar set to {}", args.name);
    }
    Ok(())
}
