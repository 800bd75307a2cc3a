//! Shared session setup: configuration, credentials, and cookie reuse.

use anyhow::{bail, Context, Result};
use netflix_core::Credentials;
use netflix_session::NetflixClient;
use netflix_store::{Config, SessionStore, StoredSession};
use tracing::{debug, info};

use crate::Cli;

/// Loads the configuration named on the command line (or the default one).
pub async fn load_config(cli: &Cli) -> Result<Config> {
    let path = cli.config_path();
    Config::load_from(&path)
        .await
        .with_context(|| format!("failed to load {}", path.display()))
}

/// Where credentials for this run come from.
#[derive(Debug)]
pub enum CredentialSource {
    /// `--cookie` or `NETFLIX_COOKIE`.
    Cookie(Credentials),
    /// `--email` and `--password`.
    Password(Credentials),
    /// The session file of a previous login.
    Saved(Credentials),
}

impl CredentialSource {
    fn credentials(&self) -> &Credentials {
        match self {
            Self::Cookie(c) | Self::Password(c) | Self::Saved(c) => c,
        }
    }
}

/// Picks credentials: explicit cookie, then email/password, then the saved session.
pub async fn pick_credentials(cli: &Cli, store: &SessionStore) -> Result<CredentialSource> {
    if let Some(cookie) = cli.cookie.as_deref().filter(|c| !c.trim().is_empty()) {
        return Ok(CredentialSource::Cookie(Credentials::session_cookie(cookie)));
    }

    match (&cli.email, &cli.password) {
        (Some(email), Some(password)) => {
            return Ok(CredentialSource::Password(Credentials::password(
                email.as_str(),
                password.as_str(),
            )));
        }
        (Some(_), None) => bail!("--email given without --password"),
        (None, Some(_)) => bail!("--password given without --email"),
        (None, None) => {}
    }

    match store.load().await {
        Some(saved) => {
            debug!(saved_at = %saved.saved_at, "Using saved session");
            Ok(CredentialSource::Saved(Credentials::session_cookie(saved.cookies)))
        }
        None => bail!(
            "no credentials: pass --email and --password (or --cookie), or run `netflix login`"
        ),
    }
}

/// Builds a client and logs it in.
///
/// Returns the client together with the session store so commands that
/// change server-side state can save refreshed cookies afterwards.
pub async fn connect(cli: &Cli) -> Result<(NetflixClient, SessionStore)> {
    let config = load_config(cli).await?;
    let store = SessionStore::new(config.session_path());
    let source = pick_credentials(cli, &store).await?;
    source.credentials().validate()?;

    let client = NetflixClient::new(config.service).context("failed to build HTTP client")?;
    client.login(source.credentials()).await?;
    info!("Session established");

    save_cookies(&client, &store, cli.email.clone()).await?;
    Ok((client, store))
}

/// Saves the client's current cookies, if it has any.
pub async fn save_cookies(
    client: &NetflixClient,
    store: &SessionStore,
    email: Option<String>,
) -> Result<()> {
    if let Some(cookies) = client.export_cookies() {
        store
            .save(&StoredSession::new(cookies, email))
            .await
            .with_context(|| format!("failed to save session to {}", store.path().display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use tempfile::TempDir;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["netflix"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[tokio::test]
    async fn test_cookie_wins_over_password() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let cli = parse(&[
            "--cookie", "NetflixId=abc", "--email", "a@b.c", "--password", "pw", "profiles",
        ]);

        let source = pick_credentials(&cli, &store).await.unwrap();
        assert!(matches!(source, CredentialSource::Cookie(_)));
    }

    #[tokio::test]
    async fn test_password_pair() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let cli = parse(&["--email", "a@b.c", "--password", "pw", "profiles"]);

        let source = pick_credentials(&cli, &store).await.unwrap();
        assert_eq!(
            source.credentials(),
            &Credentials::password("a@b.c", "pw")
        );
    }

    #[tokio::test]
    async fn test_email_without_password_is_rejected() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let cli = parse(&["--email", "a@b.c", "profiles"]);

        let err = pick_credentials(&cli, &store).await.unwrap_err();
        assert!(err.to_string().contains("--password"));
    }

    #[tokio::test]
    async fn test_falls_back_to_saved_session() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        store
            .save(&StoredSession::new("NetflixId=saved", None))
            .await
            .unwrap();
        let cli = parse(&["profiles"]);

        let source = pick_credentials(&cli, &store).await.unwrap();
        assert!(matches!(source, CredentialSource::Saved(_)));
        assert_eq!(
            source.credentials(),
            &Credentials::session_cookie("NetflixId=saved")
        );
    }

    #[tokio::test]
    async fn test_no_credentials() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let cli = parse(&["profiles"]);

        let err = pick_credentials(&cli, &store).await.unwrap_err();
        assert!(err.to_string().contains("netflix login"));
    }
}
