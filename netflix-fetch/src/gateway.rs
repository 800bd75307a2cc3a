//! Authenticated JSON calls against the discovered API root.
//!
//! [`ApiGateway::build_request`] turns a logical [`Endpoint`] into a concrete
//! request (identifier suffix, default query, auth token) and
//! [`ApiGateway::execute`] sends it and classifies the outcome. Nothing here
//! retries.

use std::sync::Arc;

use netflix_core::PageResponse;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use crate::context::SessionContext;
use crate::error::ApiError;
use crate::extract::is_truthy;
use crate::host::http::{HttpRequest, HttpResponse, Method, Transport};
use crate::pagination::collect_pages;
use crate::settings::{BootstrapPage, ServiceConfig};

/// Query/body field carrying the auth token.
pub const AUTH_TOKEN_FIELD: &str = "authURL";

/// Query parameter selecting a page of a paginated endpoint.
pub const PAGE_PARAM: &str = "pg";

// ============================================================================
// Endpoint
// ============================================================================

/// Logical endpoints of the JSON API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Falcor path evaluator used for catalog browsing.
    Browse,
    /// Profile list.
    Profiles,
    /// Active profile switch.
    SwitchProfile,
    /// Paged rating history.
    RatingHistory,
    /// Paged viewing activity.
    ViewingHistory,
    /// Thumb rating mutation.
    SetThumbRating,
    /// Star rating mutation.
    SetVideoRating,
    /// Viewing activity hiding.
    HideViewingHistory,
    /// Falcor call editing a profile.
    AvatarEdit,
}

impl Endpoint {
    /// Every endpoint.
    pub const ALL: [Endpoint; 9] = [
        Self::Browse,
        Self::Profiles,
        Self::SwitchProfile,
        Self::RatingHistory,
        Self::ViewingHistory,
        Self::SetThumbRating,
        Self::SetVideoRating,
        Self::HideViewingHistory,
        Self::AvatarEdit,
    ];

    /// Stable key for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Browse => "browse",
            Self::Profiles => "profiles",
            Self::SwitchProfile => "switch-profile",
            Self::RatingHistory => "rating-history",
            Self::ViewingHistory => "viewing-history",
            Self::SetThumbRating => "set-thumb-rating",
            Self::SetVideoRating => "set-video-rating",
            Self::HideViewingHistory => "hide-viewing-history",
            Self::AvatarEdit => "avatar-edit",
        }
    }

    /// Path under the API root. Also the key of its endpoint identifier.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Browse | Self::AvatarEdit => "pathEvaluator",
            Self::Profiles => "profiles",
            Self::SwitchProfile => "profiles/switch",
            Self::RatingHistory => "ratinghistory",
            Self::ViewingHistory => "viewingactivity",
            Self::SetThumbRating => "setThumbRating",
            Self::SetVideoRating => "setVideoRating",
            Self::HideViewingHistory => "viewingactivitycontrol",
        }
    }

    /// HTTP method.
    pub fn method(&self) -> Method {
        match self {
            Self::Browse | Self::HideViewingHistory | Self::AvatarEdit => Method::Post,
            _ => Method::Get,
        }
    }

    /// Bootstrap page whose auth token this endpoint requires, if any.
    pub fn auth_scope(&self) -> Option<BootstrapPage> {
        match self {
            Self::SetThumbRating | Self::SetVideoRating | Self::HideViewingHistory => {
                Some(BootstrapPage::Account)
            }
            Self::AvatarEdit => Some(BootstrapPage::ProfileManagement),
            _ => None,
        }
    }

    /// Query parameters always sent to this endpoint.
    pub fn default_query(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::AvatarEdit => &[("method", "call")],
            _ => &[],
        }
    }
}

// ============================================================================
// Requests
// ============================================================================

/// Caller-supplied parts of a request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// Overrides the endpoint's method.
    pub method: Option<Method>,
    /// Extra query parameters, appended after the defaults.
    pub query: Vec<(String, String)>,
    /// JSON body.
    pub body: Option<Value>,
}

impl RequestOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Sets the JSON body.
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Overrides the method.
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }
}

/// A fully built request, relative to the API root.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// Logical endpoint.
    pub endpoint: Endpoint,
    /// Method.
    pub method: Method,
    /// Path below the API root, including any identifier suffix.
    pub path: String,
    /// Query parameters.
    pub query: Vec<(String, String)>,
    /// JSON body.
    pub body: Option<Value>,
}

// ============================================================================
// Gateway
// ============================================================================

/// Executes authenticated JSON requests and classifies failures.
#[derive(Clone)]
pub struct ApiGateway {
    transport: Arc<dyn Transport>,
    config: ServiceConfig,
}

impl std::fmt::Debug for ApiGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiGateway")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiGateway {
    /// Creates a gateway.
    pub fn new(transport: Arc<dyn Transport>, config: ServiceConfig) -> Self {
        Self { transport, config }
    }

    /// Service config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Builds a request for `endpoint`.
    ///
    /// A missing endpoint identifier or auth token is not an error here; the
    /// server decides whether the request is acceptable.
    pub fn build_request(
        &self,
        context: &SessionContext,
        endpoint: Endpoint,
        options: RequestOptions,
    ) -> ApiRequest {
        let mut path = endpoint.path().to_string();
        if let Some(identifier) = context.endpoint_identifier(endpoint.path()) {
            path.push('/');
            path.push_str(identifier);
        }

        let method = options.method.unwrap_or_else(|| endpoint.method());
        let mut query: Vec<(String, String)> = endpoint
            .default_query()
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        query.extend(options.query);
        let mut body = options.body;

        if let Some(scope) = endpoint.auth_scope() {
            let bootstrap_url = self.config.bootstrap_url(scope);
            match context.auth_token(&bootstrap_url) {
                Some(token) => match method {
                    Method::Get => query.push((AUTH_TOKEN_FIELD.to_string(), token.to_string())),
                    Method::Post => {
                        let object = body.get_or_insert_with(|| Value::Object(Map::new()));
                        if let Value::Object(map) = object {
                            map.insert(AUTH_TOKEN_FIELD.to_string(), Value::String(token.to_string()));
                        } else {
                            warn!(endpoint = endpoint.name(), "Body is not an object, auth token not attached");
                        }
                    }
                },
                None => warn!(
                    endpoint = endpoint.name(),
                    bootstrap_url = %bootstrap_url,
                    "No auth token for endpoint scope"
                ),
            }
        }

        ApiRequest {
            endpoint,
            method,
            path,
            query,
            body,
        }
    }

    /// Sends a built request and returns the parsed JSON body.
    #[instrument(skip(self, context, request), fields(endpoint = request.endpoint.name()))]
    pub async fn execute(&self, context: &SessionContext, request: ApiRequest) -> Result<Value, ApiError> {
        let Some(root) = context.api_root() else {
            return Err(ApiError::NotBootstrapped);
        };

        let url = format!("{}/{}", root.trim_end_matches('/'), request.path);
        let mut http = match request.method {
            Method::Get => HttpRequest::get(url),
            Method::Post => HttpRequest::post(url),
        }
        .accept_json();
        for (key, value) in request.query {
            http = http.query(key, value);
        }
        if let Some(body) = request.body {
            http = http.json(body);
        }

        let response = self.transport.send(http).await?;
        debug!(status = response.status, "API response");
        classify_response(&response)
    }

    /// Builds and executes a request.
    pub async fn call(
        &self,
        context: &SessionContext,
        endpoint: Endpoint,
        options: RequestOptions,
    ) -> Result<Value, ApiError> {
        let request = self.build_request(context, endpoint, options);
        self.execute(context, request).await
    }

    /// Builds and executes a request, deserializing the body into `T`.
    pub async fn call_as<T: DeserializeOwned>(
        &self,
        context: &SessionContext,
        endpoint: Endpoint,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let value = self.call(context, endpoint, options).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Collects every page of a paginated endpoint, selecting pages with `pg`.
    pub async fn collect_paginated<P>(
        &self,
        context: &SessionContext,
        endpoint: Endpoint,
        options: RequestOptions,
    ) -> Result<Vec<P::Item>, ApiError>
    where
        P: PageResponse + DeserializeOwned,
    {
        collect_pages(|page| {
            let options = options.clone().query(PAGE_PARAM, page);
            async move {
                let raw: P = self.call_as(context, endpoint, options).await?;
                Ok(raw.into_paged())
            }
        })
        .await
    }
}

/// Maps a response to exactly one outcome.
///
/// 500 with a non-empty `errorCode` is an application error; any other non-200 is an
/// HTTP error; a 200 must carry JSON.
pub fn classify_response(response: &HttpResponse) -> Result<Value, ApiError> {
    if response.status == 500 {
        let code = serde_json::from_str::<Value>(&response.body)
            .ok()
            .and_then(|body| body.get("errorCode").cloned())
            .filter(is_truthy)
            .and_then(|code| match code {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            });
        if let Some(code) = code {
            return Err(ApiError::Application(code));
        }
    }

    if !response.is_ok() {
        return Err(ApiError::http(response.status, &response.status_text));
    }

    serde_json::from_str(&response.body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use netflix_core::RatingHistoryPage;
    use serde_json::json;

    use super::*;
    use crate::context::ResolvedContext;
    use crate::host::http::RequestBody;
    use crate::host::mock::MockTransport;

    fn config() -> ServiceConfig {
        ServiceConfig::default()
    }

    fn bootstrapped(identifiers: &[(&str, &str)]) -> SessionContext {
        let config = config();
        let mut context = SessionContext::new();
        context.apply(ResolvedContext {
            bootstrap_url: config.bootstrap_url(BootstrapPage::Account),
            api_root: format!("{}v1", config.api_prefix()),
            build_id: "v1".to_string(),
            endpoint_identifiers: identifiers
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            auth_token: Some("acct-token".to_string()),
        });
        context
    }

    fn gateway() -> (Arc<MockTransport>, ApiGateway) {
        let mock = Arc::new(MockTransport::new());
        let gateway = ApiGateway::new(mock.clone(), config());
        (mock, gateway)
    }

    #[test]
    fn test_identifier_suffix_and_get_token() {
        let (_, gateway) = gateway();
        let context = bootstrapped(&[("setThumbRating", "abc")]);
        let request = gateway.build_request(
            &context,
            Endpoint::SetThumbRating,
            RequestOptions::new().query("rating", 2),
        );

        assert_eq!(request.path, "setThumbRating/abc");
        assert_eq!(request.method, Method::Get);
        assert_eq!(
            request.query,
            vec![
                ("rating".to_string(), "2".to_string()),
                ("authURL".to_string(), "acct-token".to_string()),
            ]
        );
    }

    #[test]
    fn test_post_token_goes_in_body() {
        let (_, gateway) = gateway();
        let context = bootstrapped(&[]);
        let request = gateway.build_request(
            &context,
            Endpoint::HideViewingHistory,
            RequestOptions::new().body(json!({"movieID": 1})),
        );
        assert_eq!(request.path, "viewingactivitycontrol");
        assert_eq!(request.body, Some(json!({"movieID": 1, "authURL": "acct-token"})));
    }

    #[test]
    fn test_missing_token_still_builds() {
        let (_, gateway) = gateway();
        let request = gateway.build_request(&bootstrapped(&[]), Endpoint::AvatarEdit, RequestOptions::new());
        assert_eq!(request.query, vec![("method".to_string(), "call".to_string())]);
        assert_eq!(request.body, None);
    }

    #[tokio::test]
    async fn test_not_bootstrapped_makes_no_call() {
        let (mock, gateway) = gateway();
        let err = gateway
            .call(&SessionContext::new(), Endpoint::Profiles, RequestOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotBootstrapped));
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_execute_sends_json_request() {
        let (mock, gateway) = gateway();
        mock.push_json(&json!({"ok": true}));
        let context = bootstrapped(&[]);

        let value = gateway
            .call(&context, Endpoint::Browse, RequestOptions::new().body(json!({"paths": []})))
            .await
            .unwrap();
        assert_eq!(value, json!({"ok": true}));

        let sent = &mock.requests()[0];
        assert_eq!(sent.url, "https://www.netflix.com/api/shakti/v1/pathEvaluator");
        assert_eq!(sent.method, Method::Post);
        assert!(sent.accept_json);
        assert_eq!(sent.body, RequestBody::Json(json!({"paths": []})));
    }

    #[tokio::test]
    async fn test_application_error_code() {
        let (mock, gateway) = gateway();
        mock.push_response(500, r#"{"errorCode":"X"}"#);
        let err = gateway
            .call(&bootstrapped(&[]), Endpoint::Profiles, RequestOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Application(ref code) if code == "X"));
    }

    #[test]
    fn test_empty_error_code_is_http_error() {
        for body in [r#"{"errorCode":""}"#, r#"{"errorCode":0}"#, r#"{"errorCode":null}"#] {
            assert!(matches!(
                classify_response(&HttpResponse::new(500, body)),
                Err(ApiError::Http { status: 500, .. })
            ));
        }
    }

    #[test]
    fn test_classify_response() {
        assert!(matches!(
            classify_response(&HttpResponse::new(500, "oops")),
            Err(ApiError::Http { status: 500, .. })
        ));
        assert!(matches!(
            classify_response(&HttpResponse::new(404, "{}")),
            Err(ApiError::Http { status: 404, ref status_text }) if status_text == "Not Found"
        ));
        assert!(matches!(
            classify_response(&HttpResponse::new(200, "<html>")),
            Err(ApiError::InvalidResponse(_))
        ));
        assert_eq!(classify_response(&HttpResponse::new(200, "[1]")).unwrap(), json!([1]));
    }

    #[tokio::test]
    async fn test_transport_failure_not_retried() {
        let (mock, gateway) = gateway();
        mock.push_failure("connection reset");
        let err = gateway
            .call(&bootstrapped(&[]), Endpoint::Profiles, RequestOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn test_collect_paginated_rating_history() {
        let (mock, gateway) = gateway();
        let item = |id: u64| json!({"movieID": id, "title": format!("T{id}"), "ratingType": "thumb"});
        mock.push_json(&json!({"ratingItems": [item(1), item(2)], "totalRatings": 3, "size": 2, "page": 0}));
        mock.push_json(&json!({"ratingItems": [item(3)], "totalRatings": 3, "size": 2, "page": 1}));

        let items = gateway
            .collect_paginated::<RatingHistoryPage>(&bootstrapped(&[]), Endpoint::RatingHistory, RequestOptions::new())
            .await
            .unwrap();

        assert_eq!(items.iter().map(|r| r.movie_id).collect::<Vec<_>>(), vec![1, 2, 3]);
        let pages: Vec<_> = mock
            .requests()
            .iter()
            .map(|r| r.query_value("pg").map(str::to_string))
            .collect();
        assert_eq!(pages, vec![Some("0".to_string()), Some("1".to_string())]);
    }
}
