//! Login page form handling.
//!
//! The login form is serialized the way a browser would submit it, then
//! the credentials are written over the `userLoginId` and `password` fields.

use std::fmt;

use scraper::{ElementRef, Html, Selector};

// ============================================================================
// Constants
// ============================================================================

/// Element marking the email field of the login form.
pub const EMAIL_FIELD_SELECTOR: &str = ".login-input-email";

/// Element carrying the server's rejection message.
pub const REJECTION_SELECTOR: &str = ".ui-message-contents";

/// Message used when a rejected login carries none.
pub const DEFAULT_REJECTION: &str = "Login failed";

/// Form field receiving the email.
pub const LOGIN_ID_FIELD: &str = "userLoginId";

/// Form field receiving the password.
pub const PASSWORD_FIELD: &str = "password";

/// Input types a browser never submits as form data.
const UNSUBMITTED_INPUT_TYPES: &[&str] = &["submit", "button", "image", "file", "reset"];

// ============================================================================
// Login Form
// ============================================================================

/// Serialized fields of the login form, in document order.
///
/// A name appearing twice keeps its first position and its last value.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    fields: Vec<(String, String)>,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, value) in &self.fields {
            if name == PASSWORD_FIELD {
                map.entry(name, &"<redacted>");
            } else {
                map.entry(name, value);
            }
        }
        map.finish()
    }
}

impl LoginForm {
    /// Serializes the form enclosing the email field.
    ///
    /// Returns `None` if the page has no email field or it is not inside a form.
    pub fn parse(html: &str) -> Option<Self> {
        let document = Html::parse_document(html);
        let email_selector = Selector::parse(EMAIL_FIELD_SELECTOR).ok()?;
        let field_selector = Selector::parse("input, select, textarea").ok()?;
        let option_selector = Selector::parse("option").ok()?;

        let email = document.select(&email_selector).next()?;
        let form = email
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|element| element.value().name() == "form")?;

        let mut parsed = Self::default();
        for field in form.select(&field_selector) {
            let element = field.value();
            let Some(name) = element.attr("name").filter(|n| !n.is_empty()) else {
                continue;
            };
            if element.attr("disabled").is_some() {
                continue;
            }

            let value = match element.name() {
                "input" => {
                    let kind = element.attr("type").unwrap_or("text").to_ascii_lowercase();
                    if UNSUBMITTED_INPUT_TYPES.contains(&kind.as_str()) {
                        continue;
                    }
                    if matches!(kind.as_str(), "checkbox" | "radio") {
                        if element.attr("checked").is_none() {
                            continue;
                        }
                        element.attr("value").unwrap_or("on").to_string()
                    } else {
                        element.attr("value").unwrap_or_default().to_string()
                    }
                }
                "select" => {
                    let options: Vec<ElementRef> = field.select(&option_selector).collect();
                    let selected = options
                        .iter()
                        .find(|o| o.value().attr("selected").is_some())
                        .or_else(|| options.first());
                    let Some(option) = selected else {
                        continue;
                    };
                    option
                        .value()
                        .attr("value")
                        .map_or_else(|| option.text().collect::<String>().trim().to_string(), str::to_string)
                }
                _ => field.text().collect(),
            };
            parsed.set(name, value);
        }
        Some(parsed)
    }

    /// Sets a field, replacing any earlier value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Returns a field value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Writes the credentials into the form.
    pub fn with_credentials(mut self, email: &str, password: &str) -> Self {
        self.set(LOGIN_ID_FIELD, email);
        self.set(PASSWORD_FIELD, password);
        self
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no field was serialized.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Consumes the form into URL-encodable pairs.
    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.fields
    }
}

/// Extracts the rejection message from a failed login response.
pub fn rejection_message(html: &str) -> String {
    let document = Html::parse_document(html);
    let message = Selector::parse(REJECTION_SELECTOR)
        .map(|selector| {
            document
                .select(&selector)
                .flat_map(|element| element.text())
                .collect::<String>()
        })
        .unwrap_or_default();

    let message = message.split_whitespace().collect::<Vec<_>>().join(" ");
    if message.is_empty() {
        DEFAULT_REJECTION.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOGIN_PAGE: &str = r#"
        <html><body>
          <form method="post" class="login-form" action="/login">
            <div class="login-input login-input-email">
              <input name="userLoginId" type="email" value="">
            </div>
            <input name="password" type="password">
            <input name="rememberMe" type="checkbox" value="true" checked>
            <input name="optIn" type="checkbox" value="yes">
            <input name="flow" type="hidden" value="websiteSignUp">
            <input name="authURL" type="hidden" value="1234.abcd">
            <input name="locked" type="hidden" value="x" disabled>
            <select name="countryCode"><option value="+1">US</option><option value="+44" selected>UK</option></select>
            <button name="action" type="submit" value="loginAction">Sign In</button>
            <input type="submit" name="go" value="Go">
          </form>
          <form><input name="search" value="q"></form>
        </body></html>"#;

    #[test]
    fn test_parse_serializes_like_a_browser() {
        let form = LoginForm::parse(LOGIN_PAGE).unwrap();

        assert_eq!(form.get("flow"), Some("websiteSignUp"));
        assert_eq!(form.get("authURL"), Some("1234.abcd"));
        assert_eq!(form.get("rememberMe"), Some("true"));
        assert_eq!(form.get("countryCode"), Some("+44"));
        assert_eq!(form.get("optIn"), None);
        assert_eq!(form.get("locked"), None);
        assert_eq!(form.get("go"), None);
        assert_eq!(form.get("search"), None);
    }

    #[test]
    fn test_credentials_override_fields() {
        let form = LoginForm::parse(LOGIN_PAGE)
            .unwrap()
            .with_credentials("user@example.com", "hunter2");

        assert_eq!(form.get(LOGIN_ID_FIELD), Some("user@example.com"));
        assert_eq!(form.get(PASSWORD_FIELD), Some("hunter2"));
        assert!(!format!("{form:?}").contains("hunter2"));

        let pairs = form.into_pairs();
        assert_eq!(pairs[0].0, "userLoginId");
        assert_eq!(pairs.iter().filter(|(n, _)| n == "password").count(), 1);
    }

    #[test]
    fn test_parse_without_email_field() {
        assert!(LoginForm::parse("<form><input name='x'></form>").is_none());
    }

    #[test]
    fn test_rejection_message() {
        let html = r#"<div class="ui-message-contents">
            Incorrect password. <a href="/reset">Reset</a>
        </div>"#;
        assert_eq!(rejection_message(html), "Incorrect password. Reset");
        assert_eq!(rejection_message("<p>nothing</p>"), DEFAULT_REJECTION);
    }
}
