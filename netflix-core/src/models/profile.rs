//! Account profiles.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A profile of the signed-in account.
///
/// Read-only projection of the upstream `profiles` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Stable profile identifier.
    pub guid: String,
    /// Name shown in the profile picker.
    #[serde(default, alias = "firstName", alias = "profileName")]
    pub display_name: String,
    /// Avatar key, e.g. `icon26`.
    #[serde(default)]
    pub avatar_name: Option<String>,
    /// Whether this is the profile the session currently acts as.
    #[serde(default)]
    pub is_active: bool,
    /// Whether the account may edit this profile.
    #[serde(default)]
    pub can_edit: bool,
    /// Kids profile flag.
    #[serde(default)]
    pub is_kids: bool,
    /// Account owner flag.
    #[serde(default)]
    pub is_account_owner: bool,
    /// Every field not modeled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Profile {
    /// Returns the numeric part of the avatar key (`icon26` -> `26`).
    ///
    /// Names without the `icon` marker are returned unchanged.
    pub fn avatar_id(&self) -> Option<&str> {
        self.avatar_name.as_deref().map(avatar_id_from_name)
    }
}

/// Extracts the avatar identifier that follows the `icon` marker.
pub fn avatar_id_from_name(name: &str) -> &str {
    name.split_once("icon").map_or(name, |(_, id)| id)
}

/// Payload of the `profiles` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfilesResponse {
    /// All profiles of the account.
    #[serde(default)]
    pub profiles: Vec<Profile>,
    /// The profile the session currently acts as.
    #[serde(default)]
    pub active: Option<Profile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avatar_id() {
        assert_eq!(avatar_id_from_name("icon26"), "26");
        assert_eq!(avatar_id_from_name("PICON_icon112"), "112");
        assert_eq!(avatar_id_from_name("custom"), "custom");
    }
}
