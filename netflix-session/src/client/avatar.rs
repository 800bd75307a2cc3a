//! Profile avatars.

use netflix_core::avatar_id_from_name;
use netflix_fetch::{ApiError, Endpoint, RequestOptions};
use serde_json::json;
use tracing::{info, instrument};

use super::NetflixClient;
use crate::error::{NetflixError, Operation};

/// Avatar edge length used when none is given.
pub const DEFAULT_AVATAR_SIZE: u32 = 320;

/// Index of the avatar name in the profile edit call parameters.
const AVATAR_PARAM_INDEX: usize = 3;

/// Builds an avatar image URL from a template with `{size}` and `{id}`
/// placeholders. The id is the part of `avatar_name` after `icon`.
pub fn avatar_url(template: &str, avatar_name: &str, size: u32) -> String {
    template
        .replace("{size}", &size.to_string())
        .replace("{id}", avatar_id_from_name(avatar_name))
}

impl NetflixClient {
    /// Avatar image URL for `avatar_name` at `size` (default 320).
    pub fn avatar_url(&self, avatar_name: &str, size: Option<u32>) -> String {
        avatar_url(
            &self.config().avatar_url_template,
            avatar_name,
            size.unwrap_or(DEFAULT_AVATAR_SIZE),
        )
    }

    /// Avatar image URL of the active profile, if it has an avatar.
    #[instrument(skip(self))]
    pub async fn get_avatar_url(&self, size: Option<u32>) -> Result<Option<String>, NetflixError> {
        let active = self
            .active_profile()
            .await
            .map_err(|e| self.fail(Operation::GetAvatarUrl, e))?;
        Ok(active
            .and_then(|profile| profile.avatar_name)
            .map(|name| self.avatar_url(&name, size)))
    }

    /// Changes the active profile's avatar.
    #[instrument(skip(self))]
    pub async fn set_avatar(&self, avatar_name: &str) -> Result<(), NetflixError> {
        let result = async {
            let mut state = self.state.write().await;
            let guid = self.active_guid(&mut state).await?;
            let mut params = vec![serde_json::Value::Null; AVATAR_PARAM_INDEX + 2];
            params[AVATAR_PARAM_INDEX] = json!(avatar_name);
            let body = json!({
                "callPath": ["profiles", guid, "edit"],
                "params": params,
            });

            self.gateway
                .call(&state.context, Endpoint::AvatarEdit, RequestOptions::new().body(body))
                .await?;
            info!(avatar_name, "Avatar changed");
            Ok::<_, ApiError>(())
        }
        .await;
        result.map_err(|e| self.fail(Operation::SetAvatar, e))
    }
}

#[cfg(test)]
mod tests {
    use netflix_fetch::RequestBody;
    use serde_json::json;

    use super::super::tests::logged_in;
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_avatar_url() {
        let template = netflix_fetch::settings::DEFAULT_AVATAR_URL_TEMPLATE;
        assert_eq!(
            avatar_url(template, "icon26", 320),
            "https://secure.netflix.com/ffe/profiles/avatars_v2/320x320/PICON_26.png"
        );
        assert_eq!(
            avatar_url(template, "custom", 64),
            "https://secure.netflix.com/ffe/profiles/avatars_v2/64x64/PICON_custom.png"
        );
    }

    #[tokio::test]
    async fn test_get_avatar_url() {
        let (mock, client) = logged_in().await;
        mock.push_json(&json!({"profiles": [], "active": fixtures::profile("P1", "A", "icon112", true)}));

        let url = client.get_avatar_url(Some(64)).await.unwrap();
        assert_eq!(
            url.as_deref(),
            Some("https://secure.netflix.com/ffe/profiles/avatars_v2/64x64/PICON_112.png")
        );
    }

    #[tokio::test]
    async fn test_set_avatar_after_switch() {
        let (mock, client) = logged_in().await;
        mock.push_json(&json!({"status": "success"}));
        fixtures::queue_bootstrap(&mock);
        client.switch_profile("P2").await.unwrap();

        mock.push_json(&json!({"jsonGraph": {}}));
        client.set_avatar("icon42").await.unwrap();

        let request = mock.requests().pop().unwrap();
        assert_eq!(request.url, format!("{}/pathEvaluator", fixtures::API_ROOT));
        assert_eq!(request.query_value("method"), Some("call"));
        assert_eq!(
            request.body,
            RequestBody::Json(json!({
                "callPath": ["profiles", "P2", "edit"],
                "params": [null, null, null, "icon42", null],
                "authURL": fixtures::PROFILE_TOKEN
            }))
        );
        assert_eq!(mock.request_count(), 6);
    }
}
