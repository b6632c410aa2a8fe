//! Session state derived from the API's session-introspection endpoint.
//!
//! The state starts as `Loading` and moves once to either `Authenticated` or
//! `Unauthenticated`. Any failed check resolves to `Unauthenticated`.

use models::User;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};

use super::api_client::{ApiClient, RequestError};

pub const SESSION_PATH: &str = "/api/auth/user";

#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Loading,
    Authenticated(User),
    Unauthenticated,
}

impl AuthState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Authenticated(_) => "authenticated",
            Self::Unauthenticated => "unauthenticated",
        }
    }
}

/// Why a session check ended unauthenticated. Logged, never returned.
#[derive(Debug, Error)]
enum AuthCheckFailure {
    #[error("no active session")]
    NoSession,
    #[error("session check failed: {0}")]
    Request(RequestError),
}

impl From<RequestError> for AuthCheckFailure {
    fn from(e: RequestError) -> Self {
        if e.is_unauthorized() {
            Self::NoSession
        } else {
            Self::Request(e)
        }
    }
}

#[derive(Debug)]
pub struct AuthProvider {
    client: ApiClient,
    state: watch::Sender<AuthState>,
}

impl AuthProvider {
    pub fn new(client: ApiClient) -> Self {
        let (state, _) = watch::channel(AuthState::Loading);
        Self { client, state }
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Resolves a `Loading` state with one request to [`SESSION_PATH`].
    /// Once resolved, returns the current state without a request; use
    /// [`recheck`](Self::recheck) to ask the server again.
    pub async fn check_session(&self) -> AuthState {
        let current = self.state();
        if !current.is_loading() {
            return current;
        }

        let next = match self.client.get::<User>(SESSION_PATH).await {
            Ok(user) => {
                info!(user_id = %user.id, "session authenticated");
                AuthState::Authenticated(user)
            }
            Err(e) => {
                match AuthCheckFailure::from(e) {
                    AuthCheckFailure::NoSession => info!("no active session"),
                    failure => warn!(error = %failure, "treating session as unauthenticated"),
                }
                AuthState::Unauthenticated
            }
        };

        self.state.send_replace(next.clone());
        next
    }

    /// Returns to `Loading` and runs a fresh session check.
    pub async fn recheck(&self) -> AuthState {
        self.state.send_replace(AuthState::Loading);
        self.check_session().await
    }
}
