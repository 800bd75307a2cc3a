//! Viewing activity.

use netflix_core::{ViewingHistoryItem, ViewingHistoryPage};
use netflix_fetch::{ApiError, Endpoint, RequestOptions, SessionContext};
use serde_json::{json, Value};
use tracing::{info, instrument};

use super::NetflixClient;
use crate::error::{NetflixError, Operation};

impl NetflixClient {
    /// Collects the active profile's full viewing history, page by page.
    #[instrument(skip(self))]
    pub async fn get_viewing_history(&self) -> Result<Vec<ViewingHistoryItem>, NetflixError> {
        let state = self.state.read().await;
        self.gateway
            .collect_paginated::<ViewingHistoryPage>(&state.context, Endpoint::ViewingHistory, RequestOptions::new())
            .await
            .map_err(|e| self.fail(Operation::GetViewingHistory, e))
    }

    /// Hides one title from the viewing history. With `whole_series` every
    /// episode of the title's series is hidden.
    #[instrument(skip(self))]
    pub async fn hide_viewing_history_item(&self, movie_id: u64, whole_series: bool) -> Result<(), NetflixError> {
        let result = async {
            let mut state = self.state.write().await;
            let guid = self.active_guid(&mut state).await?;
            let body = json!({
                "movieID": movie_id,
                "seriesAll": whole_series,
                "guid": guid,
            });
            self.hide(&state.context, body).await
        }
        .await;
        result.map_err(|e| self.fail(Operation::HideViewingHistory, e))
    }

    /// Hides the entire viewing history of the active profile.
    #[instrument(skip(self))]
    pub async fn hide_all_viewing_history(&self) -> Result<(), NetflixError> {
        let state = self.state.read().await;
        self.hide(&state.context, json!({"hideAll": true}))
            .await
            .map_err(|e| self.fail(Operation::HideViewingHistory, e))
    }

    async fn hide(&self, context: &SessionContext, body: Value) -> Result<(), ApiError> {
        self.gateway
            .call(context, Endpoint::HideViewingHistory, RequestOptions::new().body(body))
            .await?;
        info!("Viewing history updated");
        Ok(())
    }
}
