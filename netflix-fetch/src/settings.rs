//! Service coordinates and client settings.
//!
//! Everything here is static configuration. The transient coordinates (API
//! root, endpoint identifiers, auth tokens) are discovered at bootstrap and
//! live in [`SessionContext`](crate::context::SessionContext) instead.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ============================================================================
// Defaults
// ============================================================================

/// Production site root.
pub const DEFAULT_BASE_URL: &str = "https://www.netflix.com";

/// Path under the site root where the JSON API lives, followed by the build id.
pub const DEFAULT_API_PATH: &str = "/api/shakti/";

/// Login page path.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Account overview bootstrap page.
pub const DEFAULT_ACCOUNT_PATH: &str = "/YourAccount";

/// Profile management bootstrap page.
pub const DEFAULT_PROFILES_PATH: &str = "/profiles/manage";

/// Avatar image URL with `{size}` and `{id}` placeholders.
pub const DEFAULT_AVATAR_URL_TEMPLATE: &str =
    "https://secure.netflix.com/ffe/profiles/avatars_v2/{size}x{size}/PICON_{id}.png";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent string.
const USER_AGENT: &str = concat!("netflix2/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Bootstrap Page
// ============================================================================

/// The two bootstrap pages, in the order they must be visited.
///
/// Auth tokens are scoped to the page that produced them: the account page
/// grants account-level operations (ratings, viewing activity), the profile
/// management page grants profile edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BootstrapPage {
    /// Account overview.
    Account,
    /// Profile management.
    ProfileManagement,
}

impl BootstrapPage {
    /// Bootstrap order. The second page relies on cookies set by the first.
    pub const ORDER: [BootstrapPage; 2] = [Self::Account, Self::ProfileManagement];
}

// ============================================================================
// Service Config
// ============================================================================

/// Static coordinates and transport settings for one service instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ServiceConfig {
    /// Site root, without trailing slash.
    pub base_url: String,
    /// API path prefix (build id is appended).
    pub api_path: String,
    /// Login page path.
    pub login_path: String,
    /// Account overview bootstrap path.
    pub account_path: String,
    /// Profile management bootstrap path.
    pub profiles_path: String,
    /// Avatar URL template.
    pub avatar_url_template: String,
    /// Request timeout in seconds, enforced by the transport.
    pub timeout_secs: u64,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_path: DEFAULT_API_PATH.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            account_path: DEFAULT_ACCOUNT_PATH.to_string(),
            profiles_path: DEFAULT_PROFILES_PATH.to_string(),
            avatar_url_template: DEFAULT_AVATAR_URL_TEMPLATE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Creates a builder starting from the production defaults.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::new()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Full login page URL.
    pub fn login_url(&self) -> String {
        self.url(&self.login_path)
    }

    /// Full URL of a bootstrap page. Auth tokens are keyed by this value.
    pub fn bootstrap_url(&self, page: BootstrapPage) -> String {
        match page {
            BootstrapPage::Account => self.url(&self.account_path),
            BootstrapPage::ProfileManagement => self.url(&self.profiles_path),
        }
    }

    /// Prefix the build identifier is appended to.
    pub fn api_prefix(&self) -> String {
        self.url(&self.api_path)
    }

    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`ServiceConfig`].
#[derive(Debug, Clone, Default)]
pub struct ServiceConfigBuilder {
    config: ServiceConfig,
}

impl ServiceConfigBuilder {
    /// Creates a builder with production defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the site root.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Sets the API path prefix.
    pub fn api_path(mut self, api_path: impl Into<String>) -> Self {
        self.config.api_path = api_path.into();
        self
    }

    /// Sets the bootstrap page paths.
    pub fn bootstrap_paths(
        mut self,
        account_path: impl Into<String>,
        profiles_path: impl Into<String>,
    ) -> Self {
        self.config.account_path = account_path.into();
        self.config.profiles_path = profiles_path.into();
        self
    }

    /// Sets the avatar URL template.
    pub fn avatar_url_template(mut self, template: impl Into<String>) -> Self {
        self.config.avatar_url_template = template.into();
        self
    }

    /// Sets the timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_secs = timeout.as_secs();
        self
    }

    /// Sets the user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Builds the config.
    pub fn build(self) -> ServiceConfig {
        self.config
    }
}

// ============================================================================
// Tests
// ============================================================================
