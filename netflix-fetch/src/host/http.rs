//! HTTP transport with tracing, a shared cookie jar, and a domain allowlist.
//!
//! The core never talks to `reqwest` directly. Everything goes through the
//! [`Transport`] trait so flows can be driven by a scripted transport in
//! tests. [`HttpClient`] is the production implementation:
//! - one cookie jar shared by a redirect-following and a non-following client
//! - request/response tracing
//! - domain allowlist (only the configured site host and its subdomains)

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{header, redirect, Client, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::error::TransportError;
use crate::settings::ServiceConfig;

// ============================================================================
// Request / Response
// ============================================================================

/// HTTP method subset used by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET.
    Get,
    /// POST.
    Post,
}

/// Request body.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// `application/x-www-form-urlencoded` pairs, in order.
    Form(Vec<(String, String)>),
    /// JSON document.
    Json(Value),
}

/// A transport-level request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// Method.
    pub method: Method,
    /// Absolute URL without query string.
    pub url: String,
    /// Query parameters, in order.
    pub query: Vec<(String, String)>,
    /// Body.
    pub body: RequestBody,
    /// Whether to send `Accept: application/json`.
    pub accept_json: bool,
    /// Whether redirects are followed.
    pub follow_redirects: bool,
}

impl HttpRequest {
    fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            accept_json: false,
            follow_redirects: true,
        }
    }

    /// Creates a GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    /// Creates a POST request.
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    /// Appends a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Sets a form body.
    pub fn form(mut self, pairs: Vec<(String, String)>) -> Self {
        self.body = RequestBody::Form(pairs);
        self
    }

    /// Sets a JSON body.
    pub fn json(mut self, value: Value) -> Self {
        self.body = RequestBody::Json(value);
        self
    }

    /// Requests a JSON response.
    pub fn accept_json(mut self) -> Self {
        self.accept_json = true;
        self
    }

    /// Disables redirect following, so a 3xx is returned as-is.
    pub fn without_redirects(mut self) -> Self {
        self.follow_redirects = false;
        self
    }

    /// Returns the value of a query parameter.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A fully read response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Canonical reason phrase for the status.
    pub status_text: String,
    /// Body as text.
    pub body: String,
}

impl HttpResponse {
    /// Creates a response, deriving the reason phrase from the status code.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        let status_text = StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or_default()
            .to_string();
        Self {
            status,
            status_text,
            body: body.into(),
        }
    }

    /// Returns true for HTTP 200.
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK.as_u16()
    }
}

// ============================================================================
// Transport Trait
// ============================================================================

/// The HTTP collaborator the session core is written against.
///
/// Connection pooling, redirects, cookies, and timeouts are the
/// transport's business. Implementations must not retry.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request and reads the full response.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;

    /// Seeds the cookie jar from a `Cookie` header string (`a=1; b=2`).
    fn import_cookies(&self, cookies: &str) -> Result<(), TransportError>;

    /// Exports the cookies for the site as a `Cookie` header string.
    fn export_cookies(&self) -> Option<String>;
}

// ============================================================================
// HTTP Client
// ============================================================================

/// Production transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpClient {
    following: Client,
    manual: Client,
    jar: Arc<Jar>,
    site: Url,
    allowed_domains: Vec<String>,
}

impl HttpClient {
    /// Creates a client for the configured site.
    pub fn new(config: &ServiceConfig) -> Result<Self, TransportError> {
        let site = Url::parse(&config.base_url).map_err(|e| TransportError::InvalidUrl(e.to_string()))?;
        let host = site
            .host_str()
            .ok_or_else(|| TransportError::InvalidUrl("No host in URL".to_string()))?;
        let allowed_domains = vec![registrable_domain(host)];

        let jar = Arc::new(Jar::default());
        let build = |policy: redirect::Policy| {
            Client::builder()
                .timeout(config.timeout())
                .user_agent(config.user_agent.as_str())
                .cookie_provider(Arc::clone(&jar))
                .redirect(policy)
                .build()
        };

        Ok(Self {
            following: build(redirect::Policy::limited(10))?,
            manual: build(redirect::Policy::none())?,
            jar,
            site,
            allowed_domains,
        })
    }

    /// Checks if a URL's domain is allowed.
    fn is_domain_allowed(&self, url: &str) -> Result<(), TransportError> {
        let parsed = Url::parse(url).map_err(|e| TransportError::InvalidUrl(e.to_string()))?;

        let host = parsed
            .host_str()
            .ok_or_else(|| TransportError::InvalidUrl("No host in URL".to_string()))?;

        let allowed = self
            .allowed_domains
            .iter()
            .any(|domain| host == domain || host.ends_with(&format!(".{domain}")));

        if allowed {
            Ok(())
        } else {
            Err(TransportError::DomainNotAllowed(host.to_string()))
        }
    }
}

/// Reduces a host to its last two labels (`www.netflix.com` -> `netflix.com`).
///
/// IP addresses and single-label hosts are returned unchanged.
fn registrable_domain(host: &str) -> String {
    if host.parse::<std::net::IpAddr>().is_ok() {
        return host.to_string();
    }
    let labels: Vec<&str> = host.split('.').collect();
    match labels.as_slice() {
        [.., second, top] => format!("{second}.{top}"),
        _ => host.to_string(),
    }
}

#[async_trait]
impl Transport for HttpClient {
    #[instrument(skip(self, request), fields(method = ?request.method, url = %request.url))]
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.is_domain_allowed(&request.url)?;
        debug!(redirects = request.follow_redirects, "Sending request");

        let client = if request.follow_redirects {
            &self.following
        } else {
            &self.manual
        };
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };

        let mut builder = client.request(method, &request.url).query(&request.query);
        if request.accept_json {
            builder = builder.header(header::ACCEPT, "application/json");
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Form(ref pairs) => builder.form(pairs),
            RequestBody::Json(ref value) => builder.json(value),
        };

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(status = %status, len = body.len(), "Response received");

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }

    fn import_cookies(&self, cookies: &str) -> Result<(), TransportError> {
        let mut imported = 0_usize;
        for pair in cookies.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            if !pair.contains('=') {
                return Err(TransportError::InvalidCookie(pair.to_string()));
            }
            self.jar.add_cookie_str(&format!("{pair}; Path=/"), &self.site);
            imported += 1;
        }
        debug!(count = imported, "Imported session cookies");
        Ok(())
    }

    fn export_cookies(&self) -> Option<String> {
        self.jar
            .cookies(&self.site)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> HttpClient {
        HttpClient::new(&ServiceConfig::default()).unwrap()
    }

    #[test]
    fn test_domain_allowlist() {
        let client = client();

        assert!(client.is_domain_allowed("https://www.netflix.com/login").is_ok());
        assert!(client.is_domain_allowed("https://netflix.com/YourAccount").is_ok());
        assert!(client.is_domain_allowed("https://evil.com/steal").is_err());
        assert!(client.is_domain_allowed("https://notnetflix.com/").is_err());
    }

    #[test]
    fn test_invalid_url() {
        assert!(client().is_domain_allowed("not-a-valid-url").is_err());
    }

    #[test]
    fn test_registrable_domain() {
        assert_eq!(registrable_domain("www.netflix.com"), "netflix.com");
        assert_eq!(registrable_domain("localhost"), "localhost");
        assert_eq!(registrable_domain("127.0.0.1"), "127.0.0.1");
    }

    #[test]
    fn test_cookie_import_export() {
        let client = client();
        client.import_cookies("NetflixId=abc; SecureNetflixId=def").unwrap();

        let exported = client.export_cookies().unwrap();
        assert!(exported.contains("NetflixId=abc"));
        assert!(exported.contains("SecureNetflixId=def"));
    }

    #[test]
    fn test_cookie_import_rejects_garbage() {
        assert!(client().import_cookies("not a cookie").is_err());
    }

    #[test]
    fn test_request_builder() {
        let request = HttpRequest::get("https://www.netflix.com/x")
            .query("pg", "2")
            .accept_json()
            .without_redirects();

        assert_eq!(request.query_value("pg"), Some("2"));
        assert!(request.accept_json);
        assert!(!request.follow_redirects);
    }

    #[test]
    fn test_response_reason_phrase() {
        let response = HttpResponse::new(302, "");
        assert_eq!(response.status_text, "Found");
        assert!(!response.is_ok());
        assert!(HttpResponse::new(200, "{}").is_ok());
    }
}
