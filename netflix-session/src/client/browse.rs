//! Catalog browsing.

use netflix_fetch::{Endpoint, RequestOptions};
use serde_json::{json, Value};
use tracing::instrument;

use super::NetflixClient;
use crate::error::{NetflixError, Operation};

/// Falcor query for one window of a genre: titles and box art.
fn browse_paths(genre_id: u64, page: u32, per_page: u32) -> Value {
    let from = u64::from(page) * u64::from(per_page);
    let range = json!({"from": from, "to": from + u64::from(per_page)});
    json!({
        "paths": [
            ["genres", genre_id, "su", range, "title", "genres"],
            ["genres", genre_id, "su", range, "boxarts", "_342x192", "jpg"]
        ]
    })
}

impl NetflixClient {
    /// Fetches one page of a genre (e.g. 34399 for all films) as raw JSON graph.
    #[instrument(skip(self))]
    pub async fn browse(&self, genre_id: u64, page: u32, per_page: u32) -> Result<Value, NetflixError> {
        let state = self.state.read().await;
        self.gateway
            .call(
                &state.context,
                Endpoint::Browse,
                RequestOptions::new().body(browse_paths(genre_id, page, per_page)),
            )
            .await
            .map_err(|e| self.fail(Operation::Browse, e))
    }
}
