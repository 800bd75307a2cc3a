//! Title ratings.

use netflix_core::{RatingHistoryPage, RatingKind, RatingRecord};
use netflix_fetch::{ApiError, Endpoint, RequestOptions, SessionContext};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::NetflixClient;
use crate::error::{NetflixError, Operation};

impl NetflixClient {
    /// Rates a title on the five-star scale.
    #[instrument(skip(self))]
    pub async fn set_star_rating(&self, title_id: u64, rating: i64) -> Result<(), NetflixError> {
        self.rate(RatingKind::Star, title_id, rating).await
    }

    /// Rates a title with a thumb (0 clears, 1 down, 2 up).
    #[instrument(skip(self))]
    pub async fn set_thumb_rating(&self, title_id: u64, rating: i64) -> Result<(), NetflixError> {
        self.rate(RatingKind::Thumb, title_id, rating).await
    }

    /// Rates a title on the five-star scale.
    #[deprecated(note = "use `set_star_rating` or `set_thumb_rating`")]
    pub async fn set_video_rating(&self, title_id: u64, rating: i64) -> Result<(), NetflixError> {
        warn!("set_video_rating is deprecated, use set_star_rating or set_thumb_rating");
        self.rate(RatingKind::Star, title_id, rating).await
    }

    /// Collects the full rating history, page by page.
    #[instrument(skip(self))]
    pub async fn get_rating_history(&self) -> Result<Vec<RatingRecord>, NetflixError> {
        let state = self.state.read().await;
        self.gateway
            .collect_paginated::<RatingHistoryPage>(&state.context, Endpoint::RatingHistory, RequestOptions::new())
            .await
            .map_err(|e| self.fail(Operation::GetRatingHistory, e))
    }

    async fn rate(&self, kind: RatingKind, title_id: u64, rating: i64) -> Result<(), NetflixError> {
        let state = self.state.read().await;
        set_rating(self, &state.context, kind, title_id, rating)
            .await
            .map_err(|e| self.fail(Operation::SetRating, e))
    }
}

/// Sends one rating and checks the echoed value.
///
/// The thumb endpoint takes `titleId`, the star endpoint `titleid`.
async fn set_rating(
    client: &NetflixClient,
    context: &SessionContext,
    kind: RatingKind,
    title_id: u64,
    rating: i64,
) -> Result<(), ApiError> {
    let (endpoint, title_key) = match kind {
        RatingKind::Thumb => (Endpoint::SetThumbRating, "titleId"),
        RatingKind::Star | RatingKind::Unknown => (Endpoint::SetVideoRating, "titleid"),
    };
    let options = RequestOptions::new()
        .query("rating", rating)
        .query(title_key, title_id);

    let response = client.gateway.call(context, endpoint, options).await?;
    let echoed = response.get("newRating").and_then(Value::as_i64);
    if echoed != Some(rating) {
        let actual = echoed.map_or_else(|| "<missing>".to_string(), |r| r.to_string());
        return Err(ApiError::consistency(rating, actual));
    }
    debug!(title_id, rating, "Rating applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use netflix_fetch::ErrorKind;
    use serde_json::json;

    use super::super::tests::logged_in;
    use crate::fixtures;

    #[tokio::test]
    async fn test_star_rating_echo_mismatch() {
        let (mock, client) = logged_in().await;
        mock.push_json(&json!({"newRating": 4}));

        let err = client.set_star_rating(80_018_499, 5).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Consistency);
        assert_eq!(mock.request_count(), 3);

        let request = mock.requests().pop().unwrap();
        assert_eq!(request.url, format!("{}/setVideoRating", fixtures::API_ROOT));
        assert_eq!(request.query_value("titleid"), Some("80018499"));
        assert_eq!(request.query_value("rating"), Some("5"));
        assert_eq!(request.query_value("authURL"), Some(fixtures::ACCOUNT_TOKEN));
    }

    #[tokio::test]
    async fn test_thumb_rating() {
        let (mock, client) = logged_in().await;
        mock.push_json(&json!({"newRating": 2, "titleId": 1}));

        client.set_thumb_rating(1, 2).await.unwrap();

        let request = mock.requests().pop().unwrap();
        assert_eq!(request.url, format!("{}/setThumbRating", fixtures::API_ROOT));
        assert_eq!(request.query_value("titleId"), Some("1"));
        assert_eq!(request.query_value("titleid"), None);
    }

    #[tokio::test]
    #[allow(deprecated)]
    async fn test_video_rating_alias() {
        let (mock, client) = logged_in().await;
        mock.push_json(&json!({"newRating": 3}));
        client.set_video_rating(7, 3).await.unwrap();
        assert!(mock.requests().pop().unwrap().url.ends_with("/setVideoRating"));
    }

    #[tokio::test]
    async fn test_rating_history_collects_pages() {
        let (mock, client) = logged_in().await;
        let item = |id: u64| json!({"ratingType": "star", "title": "T", "movieID": id, "yourRating": 4});
        mock.push_json(&json!({"ratingItems": [item(1), item(2)], "totalRatings": 4, "size": 2, "page": 0}))
            .push_json(&json!({"ratingItems": [item(3), item(4)], "totalRatings": 4, "size": 2, "page": 1}))
            .push_json(&json!({"ratingItems": [], "totalRatings": 4, "size": 2, "page": 2}));

        let history = client.get_rating_history().await.unwrap();
        assert_eq!(history.len(), 4);
        assert_eq!(history[3].movie_id, 4);
        assert_eq!(mock.request_count(), 5);
        assert_eq!(mock.remaining(), 0);
    }

    #[tokio::test]
    async fn test_rating_history_error_aborts() {
        let (mock, client) = logged_in().await;
        mock.push_json(&json!({"ratingItems": [], "totalRatings": 40, "size": 10, "page": 0}))
            .push_response(500, r#"{"errorCode":"RATE_LIMIT"}"#);

        let err = client.get_rating_history().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Application);
        assert_eq!(mock.request_count(), 4);
    }
}
