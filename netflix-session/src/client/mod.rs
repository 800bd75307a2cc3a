//! The high-level session client.
//!
//! [`NetflixClient`] owns one logical session: a transport with its cookie
//! jar, the discovered [`SessionContext`], and the active profile. Login,
//! profile switches, and the operations that resolve the active profile's
//! guid take the session write lock for their full duration; every other
//! operation shares a read lock.
//!
//! Each public operation is an orchestration boundary. The full
//! [`ApiError`] goes to the [`DiagnosticSink`] and the caller gets a coarse
//! [`NetflixError`].

mod avatar;
mod browse;
mod history;
mod profiles;
mod ratings;

use std::sync::Arc;

use netflix_core::Credentials;
use netflix_fetch::{
    ApiError, ApiGateway, HttpClient, ServiceConfig, SessionContext, Transport, TransportError,
};
use tokio::sync::RwLock;
use tracing::{info, instrument};

pub use avatar::{avatar_url, DEFAULT_AVATAR_SIZE};

use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::error::{NetflixError, Operation};
use crate::flow::{AuthFlow, AuthState};

// ============================================================================
// Session State
// ============================================================================

/// Everything that changes over the life of a session.
#[derive(Debug, Clone, Default)]
struct SessionState {
    context: SessionContext,
    active_profile: Option<String>,
    auth: AuthState,
}

// ============================================================================
// Client
// ============================================================================

/// Authenticated client for the Netflix web API.
pub struct NetflixClient {
    transport: Arc<dyn Transport>,
    gateway: ApiGateway,
    state: RwLock<SessionState>,
    sink: Arc<dyn DiagnosticSink>,
}

impl std::fmt::Debug for NetflixClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetflixClient")
            .field("gateway", &self.gateway)
            .finish_non_exhaustive()
    }
}

impl NetflixClient {
    /// Creates a client with the production HTTP transport.
    pub fn new(config: ServiceConfig) -> Result<Self, TransportError> {
        let transport = Arc::new(HttpClient::new(&config)?);
        Ok(Self::with_transport(transport, config))
    }

    /// Creates a client over any transport.
    pub fn with_transport(transport: Arc<dyn Transport>, config: ServiceConfig) -> Self {
        Self {
            gateway: ApiGateway::new(Arc::clone(&transport), config),
            transport,
            state: RwLock::new(SessionState::default()),
            sink: Arc::new(TracingSink),
        }
    }

    /// Replaces the diagnostic sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Service config.
    pub fn config(&self) -> &ServiceConfig {
        self.gateway.config()
    }

    /// Current authentication state.
    pub async fn auth_state(&self) -> AuthState {
        self.state.read().await.auth
    }

    /// Returns true once login succeeded.
    pub async fn is_authenticated(&self) -> bool {
        self.auth_state().await == AuthState::Authenticated
    }

    /// Snapshot of the discovered session coordinates.
    pub async fn session_context(&self) -> SessionContext {
        self.state.read().await.context.clone()
    }

    /// Guid of the active profile, if known.
    pub async fn active_profile_guid(&self) -> Option<String> {
        self.state.read().await.active_profile.clone()
    }

    /// Exports the session cookies so a later run can log in without a password.
    pub fn export_cookies(&self) -> Option<String> {
        self.transport.export_cookies()
    }

    /// Logs in with a password or a stored session cookie.
    ///
    /// A failed login clears any previous session.
    #[instrument(skip_all, fields(cookie = credentials.is_session_cookie()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<(), NetflixError> {
        let mut state = self.state.write().await;
        let mut flow = AuthFlow::new(self.transport.as_ref(), self.config(), state.auth);
        let result = flow.login(credentials, &mut state.context).await;
        state.auth = flow.state();

        if let Err(e) = result {
            *state = SessionState::default();
            return Err(self.fail(Operation::Login, e));
        }
        info!("Logged in");
        Ok(())
    }

    /// Re-resolves the session coordinates from the bootstrap pages.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<(), NetflixError> {
        let mut state = self.state.write().await;
        let result = self.rebootstrap(&mut state).await;
        result.map_err(|e| self.fail(Operation::Bootstrap, e))
    }

    async fn rebootstrap(&self, state: &mut SessionState) -> Result<(), ApiError> {
        if !state.context.is_bootstrapped() {
            return Err(ApiError::NotBootstrapped);
        }
        let flow = AuthFlow::new(self.transport.as_ref(), self.config(), state.auth);
        flow.bootstrap(&mut state.context).await
    }

    /// Reports `error` to the sink and collapses it.
    fn fail(&self, operation: Operation, error: ApiError) -> NetflixError {
        self.sink.report(operation, &error);
        NetflixError::from_api(operation, &error)
    }
}

// ============================================================================
// Tests
// ============================================================================
