//! Login and bootstrap state machine.
//!
//! ```text
//! Unauthenticated -> FetchingLoginForm -> SubmittingLoginForm -> BootstrappingContext -> Authenticated
//! Unauthenticated --(session cookie)------------------------> BootstrappingContext
//! ```
//!
//! Any failure returns the flow to `Unauthenticated`.

use netflix_core::Credentials;
use netflix_fetch::{
    ApiError, BootstrapPage, HtmlContextExtractor, HttpRequest, ServiceConfig, SessionContext,
    SessionContextResolver, Transport,
};
use tracing::{debug, info, instrument};

use crate::form::{rejection_message, LoginForm};

/// Status the login POST answers with on success.
const LOGIN_SUCCESS_STATUS: u16 = 302;

/// Status the login page answers with when the client is throttled.
const LOGIN_REFUSED_STATUS: u16 = 403;

// ============================================================================
// State
// ============================================================================

/// Authentication state of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthState {
    /// No session.
    #[default]
    Unauthenticated,
    /// Loading the login page.
    FetchingLoginForm,
    /// Posting credentials.
    SubmittingLoginForm,
    /// Resolving coordinates from the bootstrap pages.
    BootstrappingContext,
    /// Session usable.
    Authenticated,
}

impl AuthState {
    /// Returns true if `next` is a legal successor.
    pub fn can_advance_to(self, next: AuthState) -> bool {
        use AuthState::{
            Authenticated, BootstrappingContext, FetchingLoginForm, SubmittingLoginForm,
            Unauthenticated,
        };
        matches!(
            (self, next),
            (Unauthenticated | Authenticated, FetchingLoginForm | BootstrappingContext)
                | (FetchingLoginForm, SubmittingLoginForm)
                | (SubmittingLoginForm, BootstrappingContext)
                | (BootstrappingContext, Authenticated)
                | (_, Unauthenticated)
        )
    }
}

// ============================================================================
// Flow
// ============================================================================

/// Drives login and bootstrap against a transport.
pub struct AuthFlow<'a> {
    transport: &'a dyn Transport,
    config: &'a ServiceConfig,
    extractor: HtmlContextExtractor,
    resolver: SessionContextResolver,
    state: AuthState,
}

impl<'a> AuthFlow<'a> {
    /// Creates a flow starting in `state`.
    pub fn new(transport: &'a dyn Transport, config: &'a ServiceConfig, state: AuthState) -> Self {
        Self {
            transport,
            config,
            extractor: HtmlContextExtractor::new(),
            resolver: SessionContextResolver::from_config(config),
            state,
        }
    }

    /// Current state.
    pub fn state(&self) -> AuthState {
        self.state
    }

    fn advance(&mut self, next: AuthState) {
        debug_assert!(self.state.can_advance_to(next), "{:?} -> {next:?}", self.state);
        debug!(from = ?self.state, to = ?next, "Auth state");
        self.state = next;
    }

    /// Establishes a session and resolves its coordinates into `context`.
    ///
    /// With a session cookie the login form is skipped. On failure the
    /// flow is `Unauthenticated` and `context` is untouched.
    #[instrument(skip_all, fields(cookie = credentials.is_session_cookie()))]
    pub async fn login(
        &mut self,
        credentials: &Credentials,
        context: &mut SessionContext,
    ) -> Result<(), ApiError> {
        let result = self.run(credentials, context).await;
        if result.is_err() {
            self.advance(AuthState::Unauthenticated);
        }
        result
    }

    async fn run(&mut self, credentials: &Credentials, context: &mut SessionContext) -> Result<(), ApiError> {
        match credentials {
            Credentials::Password { email, password } => {
                self.advance(AuthState::FetchingLoginForm);
                let form = self.fetch_login_form().await?;
                self.advance(AuthState::SubmittingLoginForm);
                self.submit_login_form(form.with_credentials(email, password)).await?;
            }
            Credentials::SessionCookie(cookie) => {
                self.transport.import_cookies(cookie)?;
            }
        }

        self.advance(AuthState::BootstrappingContext);
        self.bootstrap(context).await?;
        self.advance(AuthState::Authenticated);
        info!(build_id = context.build_id().unwrap_or_default(), "Session authenticated");
        Ok(())
    }

    /// Re-resolves both bootstrap pages, in order, into `context`.
    ///
    /// Both pages are resolved into a staged copy that replaces `context`
    /// only when every page succeeded.
    pub async fn bootstrap(&self, context: &mut SessionContext) -> Result<(), ApiError> {
        let mut staged = context.clone();
        for page in BootstrapPage::ORDER {
            let url = self.config.bootstrap_url(page);
            self.resolve_page(&mut staged, &url).await?;
        }
        *context = staged;
        Ok(())
    }

    async fn resolve_page(&self, context: &mut SessionContext, url: &str) -> Result<(), ApiError> {
        debug!(url, "Resolving bootstrap page");
        let response = self.transport.send(HttpRequest::get(url)).await?;
        if !response.is_ok() {
            return Err(ApiError::http(response.status, response.status_text));
        }
        let tree = self.extractor.extract(&response.body);
        self.resolver.resolve_into(context, &tree, url)
    }

    async fn fetch_login_form(&self) -> Result<LoginForm, ApiError> {
        let url = self.config.login_url();
        let response = self.transport.send(HttpRequest::get(&url)).await?;
        match response.status {
            LOGIN_REFUSED_STATUS => return Err(ApiError::TooManyAttemptsOrBadCredentials),
            _ if !response.is_ok() => {
                return Err(ApiError::http(response.status, response.status_text));
            }
            _ => {}
        }

        let form = LoginForm::parse(&response.body)
            .ok_or_else(|| ApiError::mismatch(&url, "login page has no email form"))?;
        debug!(fields = form.len(), "Parsed login form");
        Ok(form)
    }

    async fn submit_login_form(&self, form: LoginForm) -> Result<(), ApiError> {
        let request = HttpRequest::post(self.config.login_url())
            .form(form.into_pairs())
            .without_redirects();
        let response = self.transport.send(request).await?;
        if response.status == LOGIN_SUCCESS_STATUS {
            Ok(())
        } else {
            Err(ApiError::LoginRejected(rejection_message(&response.body)))
        }
    }
}

#[cfg(test)]
mod tests {
    use netflix_fetch::{ErrorKind, Method, MockTransport, RequestBody};

    use super::*;
    use crate::fixtures;

    async fn run_login(
        mock: &MockTransport,
        credentials: &Credentials,
    ) -> (AuthState, SessionContext, Result<(), ApiError>) {
        let config = ServiceConfig::default();
        let mut context = SessionContext::new();
        let mut flow = AuthFlow::new(mock, &config, AuthState::Unauthenticated);
        let result = flow.login(credentials, &mut context).await;
        (flow.state(), context, result)
    }

    #[test]
    fn test_transitions() {
        assert!(AuthState::Unauthenticated.can_advance_to(AuthState::FetchingLoginForm));
        assert!(AuthState::Unauthenticated.can_advance_to(AuthState::BootstrappingContext));
        assert!(AuthState::Authenticated.can_advance_to(AuthState::BootstrappingContext));
        assert!(!AuthState::Unauthenticated.can_advance_to(AuthState::Authenticated));
        assert!(!AuthState::FetchingLoginForm.can_advance_to(AuthState::BootstrappingContext));
    }

    #[tokio::test]
    async fn test_password_login() {
        let mock = MockTransport::new();
        fixtures::queue_password_login(&mock);

        let (state, context, result) =
            run_login(&mock, &Credentials::password("user@example.com", "hunter2")).await;
        result.unwrap();
        assert_eq!(state, AuthState::Authenticated);
        assert_eq!(context.api_root(), Some(fixtures::API_ROOT));

        let requests = mock.requests();
        assert_eq!(requests.len(), 4);
        let post = &requests[1];
        assert_eq!(post.method, Method::Post);
        assert!(!post.follow_redirects);
        let RequestBody::Form(pairs) = &post.body else {
            panic!("expected form body");
        };
        assert!(pairs.contains(&("userLoginId".to_string(), "user@example.com".to_string())));
        assert!(pairs.contains(&("password".to_string(), "hunter2".to_string())));
        assert!(pairs.contains(&("flow".to_string(), "websiteSignUp".to_string())));
        assert_eq!(requests[2].url, "https://www.netflix.com/YourAccount");
        assert_eq!(requests[3].url, "https://www.netflix.com/profiles/manage");
    }

    #[tokio::test]
    async fn test_login_page_403_stops_before_post() {
        let mock = MockTransport::new();
        mock.push_response(403, "Forbidden");

        let (state, context, result) = run_login(&mock, &Credentials::password("a", "b")).await;
        assert_eq!(result.unwrap_err().kind(), ErrorKind::TooManyAttemptsOrBadCredentials);
        assert_eq!(state, AuthState::Unauthenticated);
        assert!(!context.is_bootstrapped());
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn test_login_page_other_status() {
        let mock = MockTransport::new();
        mock.push_response(503, "");

        let (_, _, result) = run_login(&mock, &Credentials::password("a", "b")).await;
        assert!(matches!(result, Err(ApiError::Http { status: 503, .. })));
    }

    #[tokio::test]
    async fn test_rejected_login_message() {
        let mock = MockTransport::new();
        mock.push_response(200, fixtures::LOGIN_PAGE);
        mock.push_response(200, r#"<div class="ui-message-contents">Incorrect password.</div>"#);

        let (_, _, result) = run_login(&mock, &Credentials::password("a", "b")).await;
        assert!(matches!(result, Err(ApiError::LoginRejected(ref m)) if m == "Incorrect password."));
        assert_eq!(mock.request_count(), 2);
    }

    #[tokio::test]
    async fn test_cookie_login_skips_form() {
        let mock = MockTransport::new();
        mock.push_response(200, fixtures::context_data_page("acct"));
        mock.push_response(200, fixtures::context_data_page("prof"));

        let (state, context, result) = run_login(&mock, &Credentials::session_cookie("NetflixId=x")).await;
        result.unwrap();
        assert_eq!(state, AuthState::Authenticated);
        assert!(context.endpoint_identifiers().is_empty());
        assert_eq!(context.auth_token("https://www.netflix.com/profiles/manage"), Some("prof"));
        assert_eq!(mock.export_cookies().as_deref(), Some("NetflixId=x"));
        assert_eq!(mock.request_count(), 2);
    }

    #[tokio::test]
    async fn test_second_page_failure_leaves_context_untouched() {
        let mock = MockTransport::new();
        mock.push_response(200, fixtures::react_page("acct", true));
        mock.push_response(200, "<html>maintenance</html>");

        let (state, context, result) = run_login(&mock, &Credentials::session_cookie("a=b")).await;
        assert_eq!(result.unwrap_err().kind(), ErrorKind::StructuralMismatch);
        assert_eq!(state, AuthState::Unauthenticated);
        assert_eq!(context, SessionContext::new());
    }
}
