//! File persistence helpers.
//!
//! Config and session files may hold secrets, so everything is written
//! atomically with owner-only permissions.

use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::StoreError;

// ============================================================================
// Default Paths
// ============================================================================

/// Returns the default configuration directory.
///
/// - macOS: `~/Library/Application Support/netflix2`
/// - Linux: `~/.config/netflix2`
/// - Windows: `%APPDATA%\netflix2`
pub fn default_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        dirs::home_dir()
            .map(|h| h.join("Library").join("Application Support").join("netflix2"))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    #[cfg(not(target_os = "macos"))]
    {
        dirs::config_dir()
            .map(|c| c.join("netflix2"))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Returns the default config file path.
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.json")
}

/// Returns the default session file path.
pub fn default_session_path() -> PathBuf {
    default_config_dir().join("session.json")
}

// ============================================================================
// Security: File Permissions
// ============================================================================

/// Sets restrictive directory permissions (0o700) on Unix systems.
///
/// This ensures config directories are only accessible by the owner.
#[cfg(unix)]
async fn set_restrictive_dir_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = tokio::fs::metadata(path).await?;
    let mut perms = metadata.permissions();
    perms.set_mode(0o700);
    tokio::fs::set_permissions(path, perms).await?;

    debug!(path = %path.display(), mode = "0700", "Set restrictive directory permissions");
    Ok(())
}

/// No-op for non-Unix systems.
#[cfg(not(unix))]
async fn set_restrictive_dir_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

// ============================================================================
// File Operations
// ============================================================================

/// Writes `contents` to a fresh file that is owner-only (0o600 on Unix)
/// from the moment it is created.
async fn write_private(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    use tokio::io::AsyncWriteExt;

    // A leftover file would keep its old mode.
    remove_file(path).await?;

    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    file.write_all(contents).await?;
    file.sync_all().await?;
    Ok(())
}

/// Creates parent directories with restrictive permissions.
///
/// On Unix systems, directories are created with 0o700 permissions
/// to ensure only the owner can access config files.
async fn create_secure_parent_dirs(path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            debug!(path = %parent.display(), "Creating secure directory");
            tokio::fs::create_dir_all(parent).await?;

            let mut current = parent.to_path_buf();
            while current.starts_with(default_config_dir()) {
                if current.exists() {
                    set_restrictive_dir_permissions(&current).await?;
                }
                if !current.pop() {
                    break;
                }
            }
        }
    }
    Ok(())
}

/// Saves data to a JSON file with secure permissions.
///
/// Creates parent directories if they don't exist and writes atomically
/// via an owner-only temp file and a rename.
pub async fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<(), StoreError> {
    debug!(path = %path.display(), "Saving JSON file");

    // Create parent directories with secure permissions
    create_secure_parent_dirs(path).await?;

    // Serialize to pretty JSON
    let json = serde_json::to_string_pretty(data)?;

    // Write atomically (owner-only temp file, then rename)
    let temp_path = path.with_extension("json.tmp");
    write_private(&temp_path, json.as_bytes()).await?;
    tokio::fs::rename(&temp_path, path).await?;

    debug!(path = %path.display(), "JSON file saved securely");
    Ok(())
}

/// Loads data from a JSON file.
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    debug!(path = %path.display(), "Loading JSON file");

    let content = tokio::fs::read_to_string(path).await?;
    let data = serde_json::from_str(&content)?;

    debug!(path = %path.display(), "JSON file loaded");
    Ok(data)
}

/// Loads data from a JSON file, returning default if not found.
pub async fn load_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    match load_json(path).await {
        Ok(data) => data,
        Err(e) => {
            if !e.is_not_found() {
                warn!(path = %path.display(), error = %e, "Failed to load, using defaults");
            }
            T::default()
        }
    }
}

/// Removes a file. A missing file is not an error.
pub async fn remove_file(path: &Path) -> Result<(), StoreError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            debug!(path = %path.display(), "File removed");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_dir() {
        let path = default_config_dir();
        assert!(!path.as_os_str().is_empty());
    }

    #[test]
    fn test_default_paths() {
        assert!(default_config_path().ends_with("config.json"));
        assert!(default_session_path().ends_with("session.json"));
        assert_eq!(default_config_path().parent(), Some(default_config_dir().as_path()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_save_json_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("secret.json");

        save_json(&path, &serde_json::json!({"cookie": "NetflixId=x"})).await.unwrap();

        let mode = tokio::fs::metadata(&path).await.unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_temp_file_is_owner_only_before_rename() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::tempdir().unwrap();
        let temp_path = temp_dir.path().join("session.json.tmp");
        tokio::fs::write(&temp_path, "stale").await.unwrap();
        tokio::fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(0o644))
            .await
            .unwrap();

        write_private(&temp_path, b"{}").await.unwrap();

        let mode = tokio::fs::metadata(&temp_path).await.unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
        assert_eq!(tokio::fs::read_to_string(&temp_path).await.unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_remove_missing_file_is_ok() {
        let temp_dir = tempfile::tempdir().unwrap();
        remove_file(&temp_dir.path().join("absent.json")).await.unwrap();
    }

    #[tokio::test]
    async fn test_load_or_default_on_garbage() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("bad.json");
        tokio::fs::write(&path, "not json").await.unwrap();

        let value: Vec<u32> = load_json_or_default(&path).await;
        assert!(value.is_empty());
    }
}
