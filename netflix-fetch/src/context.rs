//! Session coordinates discovered at bootstrap.

use std::collections::HashMap;

/// Transient API coordinates of one authenticated session.
///
/// Only the resolver writes to this, and only with a fully resolved
/// [`ResolvedContext`]. Nothing here is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    api_root: Option<String>,
    build_id: Option<String>,
    endpoint_identifiers: HashMap<String, String>,
    auth_tokens: HashMap<String, String>,
}

impl SessionContext {
    /// Creates an empty, not yet bootstrapped context.
    pub fn new() -> Self {
        Self::default()
    }

    /// JSON API root (`apiPrefix + buildId`), once known.
    pub fn api_root(&self) -> Option<&str> {
        self.api_root.as_deref()
    }

    /// Build identifier, once known.
    pub fn build_id(&self) -> Option<&str> {
        self.build_id.as_deref()
    }

    /// Identifier appended to an endpoint path, if the server published one.
    pub fn endpoint_identifier(&self, key: &str) -> Option<&str> {
        self.endpoint_identifiers.get(key).map(String::as_str)
    }

    /// All published endpoint identifiers.
    pub fn endpoint_identifiers(&self) -> &HashMap<String, String> {
        &self.endpoint_identifiers
    }

    /// Auth token produced by the given bootstrap URL.
    pub fn auth_token(&self, bootstrap_url: &str) -> Option<&str> {
        self.auth_tokens.get(bootstrap_url).map(String::as_str)
    }

    /// Returns true once an API root is known.
    pub fn is_bootstrapped(&self) -> bool {
        self.api_root.is_some()
    }

    /// Merges a resolved bootstrap result.
    ///
    /// Coordinates are replaced wholesale. Tokens from other bootstrap pages
    /// are kept.
    pub(crate) fn apply(&mut self, resolved: ResolvedContext) {
        self.api_root = Some(resolved.api_root);
        self.build_id = Some(resolved.build_id);
        self.endpoint_identifiers = resolved.endpoint_identifiers;
        match resolved.auth_token {
            Some(token) => {
                self.auth_tokens.insert(resolved.bootstrap_url, token);
            }
            None => {
                self.auth_tokens.remove(&resolved.bootstrap_url);
            }
        }
    }
}

/// Output of one successful resolution, not yet merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContext {
    /// Bootstrap URL the state was read from.
    pub bootstrap_url: String,
    /// JSON API root.
    pub api_root: String,
    /// Build identifier.
    pub build_id: String,
    /// Endpoint identifiers; empty for variants that publish none.
    pub endpoint_identifiers: HashMap<String, String>,
    /// Auth token, if the page carried one.
    pub auth_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(url: &str, build: &str, token: Option<&str>) -> ResolvedContext {
        ResolvedContext {
            bootstrap_url: url.to_string(),
            api_root: format!("https://x.test/api/shakti/{build}"),
            build_id: build.to_string(),
            endpoint_identifiers: HashMap::new(),
            auth_token: token.map(str::to_string),
        }
    }

    #[test]
    fn test_empty_context_is_not_bootstrapped() {
        let context = SessionContext::new();
        assert!(!context.is_bootstrapped());
        assert_eq!(context.api_root(), None);
    }

    #[test]
    fn test_apply_keeps_tokens_per_page() {
        let mut context = SessionContext::new();
        context.apply(resolved("https://x.test/YourAccount", "v1", Some("acct")));
        context.apply(resolved("https://x.test/profiles/manage", "v2", Some("prof")));

        assert_eq!(context.build_id(), Some("v2"));
        assert_eq!(context.api_root(), Some("https://x.test/api/shakti/v2"));
        assert_eq!(context.auth_token("https://x.test/YourAccount"), Some("acct"));
        assert_eq!(context.auth_token("https://x.test/profiles/manage"), Some("prof"));
    }
}
