//! Profile listing and switching.

use netflix_core::{Profile, ProfilesResponse};
use netflix_fetch::{ApiError, Endpoint, RequestOptions, SessionContext};
use serde_json::Value;
use tracing::{info, instrument};

use super::{NetflixClient, SessionState};
use crate::error::{NetflixError, Operation};

/// Status the switch endpoint reports on success.
const SWITCH_SUCCESS: &str = "success";

impl NetflixClient {
    /// Lists the account's profiles.
    #[instrument(skip(self))]
    pub async fn get_profiles(&self) -> Result<Vec<Profile>, NetflixError> {
        let state = self.state.read().await;
        self.fetch_profiles(&state.context)
            .await
            .map(|response| response.profiles)
            .map_err(|e| self.fail(Operation::GetProfiles, e))
    }

    /// Returns the active profile, if the account has one selected.
    #[instrument(skip(self))]
    pub async fn get_active_profile(&self) -> Result<Option<Profile>, NetflixError> {
        self.active_profile()
            .await
            .map_err(|e| self.fail(Operation::GetActiveProfile, e))
    }

    /// Makes `guid` the active profile and re-bootstraps, since auth tokens
    /// are scoped to the profile.
    #[instrument(skip(self))]
    pub async fn switch_profile(&self, guid: &str) -> Result<(), NetflixError> {
        let mut state = self.state.write().await;
        let result = self.switch_profile_locked(&mut state, guid).await;
        result.map_err(|e| self.fail(Operation::SwitchProfile, e))
    }

    async fn switch_profile_locked(&self, state: &mut SessionState, guid: &str) -> Result<(), ApiError> {
        let response = self
            .gateway
            .call(
                &state.context,
                Endpoint::SwitchProfile,
                RequestOptions::new().query("switchProfileGuid", guid),
            )
            .await?;

        let status = response.get("status").and_then(Value::as_str);
        if status != Some(SWITCH_SUCCESS) {
            return Err(ApiError::consistency(SWITCH_SUCCESS, status.unwrap_or("<missing>")));
        }

        state.active_profile = Some(guid.to_string());
        self.rebootstrap(state).await?;
        info!(guid, "Switched profile");
        Ok(())
    }

    pub(super) async fn fetch_profiles(&self, context: &SessionContext) -> Result<ProfilesResponse, ApiError> {
        self.gateway
            .call_as(context, Endpoint::Profiles, RequestOptions::new())
            .await
    }

    /// Fetches the active profile and remembers its guid.
    pub(super) async fn active_profile(&self) -> Result<Option<Profile>, ApiError> {
        let mut state = self.state.write().await;
        self.active_profile_locked(&mut state).await
    }

    async fn active_profile_locked(&self, state: &mut SessionState) -> Result<Option<Profile>, ApiError> {
        let active = self.fetch_profiles(&state.context).await?.active;
        if let Some(profile) = &active {
            state.active_profile = Some(profile.guid.clone());
        }
        Ok(active)
    }

    /// Guid of the active profile, fetched if not yet known.
    ///
    /// Takes the locked state so the guid and the call that uses it see the
    /// same session.
    pub(super) async fn active_guid(&self, state: &mut SessionState) -> Result<String, ApiError> {
        if let Some(guid) = &state.active_profile {
            return Ok(guid.clone());
        }
        self.active_profile_locked(state)
            .await?
            .map(|profile| profile.guid)
            .ok_or(ApiError::MissingProfile)
    }
}

#[cfg(test)]
mod tests {
    use netflix_fetch::ErrorKind;
    use serde_json::json;

    use super::super::tests::logged_in;
    use crate::fixtures;

    #[tokio::test]
    async fn test_get_profiles_and_active() {
        let (mock, client) = logged_in().await;
        let payload = json!({
            "profiles": [
                fixtures::profile("P1", "Alice", "icon26", true),
                fixtures::profile("P2", "Kids", "icon112", false)
            ],
            "active": fixtures::profile("P1", "Alice", "icon26", true)
        });
        mock.push_json(&payload).push_json(&payload);

        let profiles = client.get_profiles().await.unwrap();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[1].display_name, "Kids");
        assert_eq!(profiles[0].extra["experience"], json!("standard"));

        let active = client.get_active_profile().await.unwrap().unwrap();
        assert_eq!(active.guid, "P1");
        assert_eq!(client.active_profile_guid().await.as_deref(), Some("P1"));

        let last = mock.requests().pop().unwrap();
        assert_eq!(last.url, format!("{}/profiles", fixtures::API_ROOT));
    }

    #[tokio::test]
    async fn test_switch_profile_rebootstraps() {
        let (mock, client) = logged_in().await;
        mock.push_json(&json!({"status": "success"}));
        fixtures::queue_bootstrap(&mock);

        client.switch_profile("P2").await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 5);
        assert_eq!(requests[2].query_value("switchProfileGuid"), Some("P2"));
        assert_eq!(requests[3].url, "https://www.netflix.com/YourAccount");
        assert_eq!(requests[4].url, "https://www.netflix.com/profiles/manage");
        assert_eq!(client.active_profile_guid().await.as_deref(), Some("P2"));
    }

    #[tokio::test]
    async fn test_switch_profile_rejected() {
        let (mock, client) = logged_in().await;
        mock.push_json(&json!({"status": "failure"}));

        let err = client.switch_profile("P9").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Consistency);
        assert_eq!(mock.request_count(), 3);
        assert_eq!(client.active_profile_guid().await, None);
    }
}
