//! Embedded client state extraction.
//!
//! Bootstrap pages carry their API coordinates in inline scripts of the form
//! `netflix.reactContext = {...};`. [`HtmlContextExtractor`] collects those
//! scripts and feeds them through a restricted literal interpreter
//! ([`literal`]) that populates two namespaces, `window` and `netflix`.

pub mod literal;

use scraper::{Html, Selector};
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

pub use literal::LiteralError;

/// Scripts whose trimmed text starts with this are state scripts.
pub const STATE_SCRIPT_PREFIX: &str = "window.netflix";

// ============================================================================
// Namespace Tree
// ============================================================================

/// The composed `{"window": {...}, "netflix": {...}}` state of one page.
#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceTree {
    roots: Map<String, Value>,
}

impl Default for NamespaceTree {
    fn default() -> Self {
        Self::from_roots(json!({}), json!({}))
    }
}

impl NamespaceTree {
    /// Creates a tree with both namespaces empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tree from explicit namespace values.
    pub fn from_roots(window: Value, netflix: Value) -> Self {
        let mut roots = Map::new();
        roots.insert("window".to_string(), window);
        roots.insert("netflix".to_string(), netflix);
        Self { roots }
    }

    /// Returns a namespace root.
    pub fn namespace(&self, name: &str) -> Option<&Value> {
        self.roots.get(name)
    }

    /// Looks up a value by JSON pointer, e.g. `/window/netflix/contextData`.
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        let path = pointer.strip_prefix('/')?;
        match path.split_once('/') {
            Some((root, rest)) => self.roots.get(root)?.pointer(&format!("/{rest}")),
            None => self.roots.get(path),
        }
    }

    /// Returns true if no script assigned anything.
    pub fn is_empty(&self) -> bool {
        self.roots
            .values()
            .all(|v| v.as_object().is_some_and(Map::is_empty))
    }

    /// Consumes the tree into a single JSON object.
    pub fn into_value(self) -> Value {
        Value::Object(self.roots)
    }
}

/// JavaScript truthiness of a JSON value.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ============================================================================
// Extractor
// ============================================================================

/// Pulls embedded client state out of an HTML document.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlContextExtractor;

impl HtmlContextExtractor {
    /// Creates an extractor.
    pub fn new() -> Self {
        Self
    }

    /// Interprets every inline state script in document order.
    ///
    /// A page without state scripts yields an empty tree. A script the
    /// interpreter cannot fully understand contributes the assignments made
    /// before the unsupported statement.
    pub fn extract(&self, html: &str) -> NamespaceTree {
        let mut tree = NamespaceTree::new();
        let document = Html::parse_document(html);
        let selector = match Selector::parse("script") {
            Ok(selector) => selector,
            Err(e) => {
                warn!(error = %e, "Invalid script selector");
                return tree;
            }
        };

        let scripts = document
            .select(&selector)
            .filter(|element| element.value().attr("src").is_none())
            .map(|element| element.text().collect::<String>())
            .filter(|text| text.trim_start().starts_with(STATE_SCRIPT_PREFIX));

        for (index, script) in scripts.enumerate() {
            match literal::interpret(&script, &mut tree.roots) {
                Ok(applied) => debug!(index, applied, "Interpreted state script"),
                Err(e) => warn!(index, error = %e, "State script only partially interpreted"),
            }
        }
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_only_state_scripts() {
        let html = r#"<html><head>
            <script src="/app.js">window.netflix.ignored = 1;</script>
            <script>var analytics = {};</script>
            <script>
              window.netflix = window.netflix || {};
              netflix.contextData = {authURL: "tok", serverDefs: {BUILD_IDENTIFIER: "v1"}};
            </script>
            </head><body></body></html>"#;

        let tree = HtmlContextExtractor::new().extract(html);
        assert_eq!(tree.pointer("/netflix/contextData/authURL"), Some(&json!("tok")));
        assert_eq!(tree.pointer("/window/netflix"), Some(&json!({})));
        assert_eq!(tree.pointer("/window/netflix/ignored"), None);
    }

    #[test]
    fn test_no_scripts_is_empty_tree() {
        let tree = HtmlContextExtractor::new().extract("<html><body>hi</body></html>");
        assert!(tree.is_empty());
        assert_eq!(tree, NamespaceTree::new());
    }

    #[test]
    fn test_later_scripts_survive_a_bad_one() {
        let html = r"<script>window.netflix = {}; window.netflix.a = 1; window.netflix.b = eval('x');</script>
                     <script>window.netflix.c = 3;</script>";
        let tree = HtmlContextExtractor::new().extract(html);
        assert_eq!(tree.pointer("/window/netflix"), Some(&json!({"a": 1, "c": 3})));
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&Value::Null));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!({})));
    }
}
