//! Integration tests for core model types.

use netflix_core::{Credentials, PageResponse, Profile, RatingHistoryPage, avatar_id_from_name};

#[test]
fn test_profile_serialization_keeps_extra_fields() {
    let json = r#"{"guid":"G1","firstName":"Sam","isDefault":true}"#;
    let profile: Profile = serde_json::from_str(json).unwrap();
    let back = serde_json::to_value(&profile).unwrap();
    assert_eq!(back["isDefault"], serde_json::json!(true));
    assert_eq!(back["displayName"], serde_json::json!("Sam"));
}

#[test]
fn test_rating_page_from_str() {
    let json = r#"{"ratingItems":[],"totalRatings":0,"size":100,"page":0}"#;
    let page: RatingHistoryPage = serde_json::from_str(json).unwrap();
    let paged = page.into_paged();
    assert!(paged.items.is_empty());
    assert_eq!(paged.page_count(), Some(1));
}

#[test]
fn test_credentials_constructors() {
    assert_eq!(
        Credentials::password("a@b.c", "pw"),
        Credentials::Password {
            email: "a@b.c".to_string(),
            password: "pw".to_string()
        }
    );
    assert_eq!(avatar_id_from_name("icon1"), "1");
}
