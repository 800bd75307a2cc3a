//! Schema normalization of extracted bootstrap state.
//!
//! The service has shipped (at least) two shapes of embedded state. Both are
//! recognized here and folded into one [`ResolvedContext`]; anything else is
//! a hard [`ApiError::StructuralMismatch`].

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::context::{ResolvedContext, SessionContext};
use crate::error::ApiError;
use crate::extract::{is_truthy, NamespaceTree};
use crate::settings::ServiceConfig;

// ============================================================================
// Schema Variant
// ============================================================================

/// The closed set of recognized state shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchemaVariant<'a> {
    /// `netflix.reactContext.models`.
    ReactContext {
        /// The `models` object.
        models: &'a Value,
    },
    /// `netflix.contextData`.
    ContextData {
        /// The `contextData` object.
        data: &'a Value,
    },
    /// Neither shape is present.
    Unrecognized,
}

impl<'a> SchemaVariant<'a> {
    /// Classifies a tree. The `netflix` namespace is consulted before
    /// `window.netflix`; within one namespace `reactContext` wins.
    pub fn classify(tree: &'a NamespaceTree) -> Self {
        let candidates = [tree.pointer("/netflix"), tree.pointer("/window/netflix")];
        for namespace in candidates.into_iter().flatten() {
            if let Some(models) = namespace.pointer("/reactContext/models").filter(|v| v.is_object()) {
                return Self::ReactContext { models };
            }
            if let Some(data) = namespace.get("contextData").filter(|v| v.is_object()) {
                return Self::ContextData { data };
            }
        }
        Self::Unrecognized
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ReactContext { .. } => "reactContext",
            Self::ContextData { .. } => "contextData",
            Self::Unrecognized => "unrecognized",
        }
    }
}

// ============================================================================
// Resolver
// ============================================================================

/// Normalizes extracted state into session coordinates.
#[derive(Debug, Clone)]
pub struct SessionContextResolver {
    api_prefix: String,
}

impl SessionContextResolver {
    /// Creates a resolver appending build identifiers to `api_prefix`.
    pub fn new(api_prefix: impl Into<String>) -> Self {
        Self {
            api_prefix: api_prefix.into(),
        }
    }

    /// Creates a resolver for a service config.
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(config.api_prefix())
    }

    /// Resolves a tree without touching any session state.
    #[instrument(skip(self, tree))]
    pub fn resolve(&self, tree: &NamespaceTree, bootstrap_url: &str) -> Result<ResolvedContext, ApiError> {
        let variant = SchemaVariant::classify(tree);
        debug!(variant = variant.name(), "Classified bootstrap state");

        let (build_id, endpoint_identifiers, auth_token) = match variant {
            SchemaVariant::ReactContext { models } => {
                let current_member = models.pointer("/truths/data/CURRENT_MEMBER");
                if !current_member.is_some_and(is_truthy) {
                    return Err(ApiError::InactiveAccount);
                }
                let member_context = models
                    .get("memberContext")
                    .filter(|v| !v.is_null())
                    .ok_or(ApiError::MissingProfile)?;
                let build_id = models
                    .pointer("/serverDefs/data/BUILD_IDENTIFIER")
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        ApiError::mismatch(bootstrap_url, "reactContext has no BUILD_IDENTIFIER")
                    })?;
                let identifiers = models
                    .pointer("/serverDefs/data/endpointIdentifiers")
                    .map(string_map)
                    .unwrap_or_default();
                let token = member_context
                    .pointer("/data/userInfo/authURL")
                    .and_then(Value::as_str);
                (build_id, identifiers, token)
            }
            SchemaVariant::ContextData { data } => {
                let build_id = data
                    .pointer("/serverDefs/BUILD_IDENTIFIER")
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        ApiError::mismatch(bootstrap_url, "contextData has no BUILD_IDENTIFIER")
                    })?;
                let token = data.get("authURL").and_then(Value::as_str);
                (build_id, HashMap::new(), token)
            }
            SchemaVariant::Unrecognized => {
                return Err(ApiError::mismatch(
                    bootstrap_url,
                    "neither reactContext nor contextData present",
                ));
            }
        };

        if auth_token.is_none() {
            warn!("Bootstrap page carried no auth token");
        }

        Ok(ResolvedContext {
            bootstrap_url: bootstrap_url.to_string(),
            api_root: format!("{}{}", self.api_prefix, build_id),
            build_id: build_id.to_string(),
            endpoint_identifiers,
            auth_token: auth_token.map(str::to_string),
        })
    }

    /// Resolves a tree and merges the result. On error `context` is untouched.
    pub fn resolve_into(
        &self,
        context: &mut SessionContext,
        tree: &NamespaceTree,
        bootstrap_url: &str,
    ) -> Result<(), ApiError> {
        let resolved = self.resolve(tree, bootstrap_url)?;
        context.apply(resolved);
        Ok(())
    }
}

/// Flattens an identifier object to strings. Non-scalar entries are skipped.
fn string_map(value: &Value) -> HashMap<String, String> {
    value
        .as_object()
        .map(|map| {
            map.iter()
                .filter_map(|(key, value)| match value {
                    Value::String(s) => Some((key.clone(), s.clone())),
                    Value::Number(n) => Some((key.clone(), n.to_string())),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

// ============================================================================
// Tests
// ============================================================================
