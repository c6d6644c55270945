//! Auth session controller
//!
//! Owns the current-user state machine:
//!
//! ```text
//! Unknown --initialize--> Authenticated | Unauthenticated
//! Unauthenticated --login--> Authenticating --> Authenticated | Unauthenticated
//! Authenticated --login retry--> Authenticated (new user or prior user kept)
//! Authenticated --logout / 401 teardown--> Unauthenticated
//! ```
//!
//! Locks are never held across an `.await`.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tokio::sync::broadcast;

use crate::api::ApiClient;
use crate::authz::{self, Role};
use crate::errors::{ClientError, ClientResult};
use crate::events::{self, SessionEvent};
use crate::models::user::{
    ChangePasswordRequest, CurrentUser, LoginRequest, RegisterRequest, RegisterResponse, UpdateProfileRequest,
};
use crate::session::SessionStore;
use crate::token;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Startup, before the initial profile check resolves.
    Unknown,
    Authenticating,
    Authenticated(CurrentUser),
    Unauthenticated,
}

impl AuthState {
    pub fn user(&self) -> Option<&CurrentUser> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }
}

/// What a successful login tells the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub user: CurrentUser,
    /// The server wants the user to change username/password before anything else.
    pub must_change_credentials: bool,
}

pub struct AuthController {
    api: ApiClient,
    session: Arc<SessionStore>,
    state: RwLock<AuthState>,
    last_error: RwLock<Option<String>>,
}

impl AuthController {
    pub fn new(api: ApiClient) -> Self {
        let session = api.session().clone();
        Self {
            api,
            session,
            state: RwLock::new(AuthState::Unknown),
            last_error: RwLock::new(None),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Current state. A session torn down by the pipeline since the last read
    /// shows up here as `Unauthenticated`.
    pub fn state(&self) -> AuthState {
        self.reconcile();
        self.state.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    pub fn current_user(&self) -> Option<CurrentUser> {
        self.state().user().cloned()
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }

    pub fn clear_error(&self) {
        *self.last_error.write() = None;
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.session.subscribe()
    }

    pub fn has_role(&self, roles: &[Role]) -> bool {
        authz::has_role(self.current_user().as_ref(), roles)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        authz::has_permission(self.current_user().as_ref(), permission)
    }

    /// Resolves the startup `Unknown` state from the durable access token.
    pub async fn initialize(&self) -> AuthState {
        let Some(token) = self.session.current_access_token() else {
            tracing::info!("no stored session");
            return self.finish_hydration(AuthState::Unauthenticated);
        };

        if token::is_expired(&token, Utc::now()) {
            tracing::info!("stored access token has expired");
            self.session.clear_access_token();
            return self.finish_hydration(AuthState::Unauthenticated);
        }

        match self.api.profile().await {
            Ok(user) => {
                tracing::info!(username = %user.username, role = %user.role, "restored session");
                self.finish_hydration(AuthState::Authenticated(user))
            }
            Err(err) => {
                tracing::info!(error = %err.message(), "stored session is not usable");
                self.session.clear_access_token();
                self.finish_hydration(AuthState::Unauthenticated)
            }
        }
    }

    fn finish_hydration(&self, next: AuthState) -> AuthState {
        let authenticated = next.is_authenticated();
        *self.state.write() = next.clone();
        events::publish(self.session.events(), SessionEvent::Hydrated { authenticated });
        next
    }

    /// Logs in, fetches a CSRF token (failure tolerated), then loads the profile.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<LoginOutcome> {
        self.clear_error();
        // A signed-in user retrying stays visibly Authenticated until the
        // new credentials are accepted.
        let previous = {
            let mut state = self.state.write();
            let previous = state.clone();
            if !previous.is_authenticated() {
                *state = AuthState::Authenticating;
            }
            previous
        };

        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let response = match self.api.login(&request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::info!(username = %username, error = %err.message(), "login rejected");
                let restored = match previous {
                    AuthState::Authenticated(user) if self.session.has_access_token() => AuthState::Authenticated(user),
                    _ => AuthState::Unauthenticated,
                };
                *self.state.write() = restored;
                return Err(self.fail(err));
            }
        };

        *self.state.write() = AuthState::Authenticating;
        // Any csrf token held so far belongs to an earlier session.
        self.session.clear_csrf_token();
        match self.api.fetch_csrf_token().await {
            Ok(csrf) => self.session.set_csrf_token(csrf),
            Err(err) => tracing::warn!(error = %err.message(), "could not fetch csrf token, continuing without it"),
        }

        let user = match self.api.profile().await {
            Ok(user) => user,
            Err(err) => {
                tracing::warn!(error = %err.message(), "profile fetch after login failed");
                self.session.clear();
                *self.state.write() = AuthState::Unauthenticated;
                return Err(self.fail(err));
            }
        };

        *self.state.write() = AuthState::Authenticated(user.clone());
        events::publish(
            self.session.events(),
            SessionEvent::LoggedIn {
                username: user.username.clone(),
            },
        );

        Ok(LoginOutcome {
            user,
            must_change_credentials: response.must_change_credentials,
        })
    }

    /// Creates an account. Authentication state is left alone; the caller
    /// sends the user to the login page afterwards.
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<RegisterResponse> {
        self.clear_error();
        self.api.register(request).await.map_err(|err| self.fail(err))
    }

    /// Always succeeds from the caller's point of view.
    pub async fn logout(&self) {
        self.api.logout().await;
        *self.state.write() = AuthState::Unauthenticated;
        self.clear_error();
        events::publish(self.session.events(), SessionEvent::LoggedOut);
        tracing::info!("logged out");
    }

    /// Re-reads the profile so a server-side role change takes effect.
    pub async fn refresh_profile(&self) -> ClientResult<CurrentUser> {
        self.clear_error();
        match self.api.profile().await {
            Ok(user) => {
                let mut state = self.state.write();
                if state.is_authenticated() && self.session.has_access_token() {
                    *state = AuthState::Authenticated(user.clone());
                }
                Ok(user)
            }
            Err(err) => {
                self.reconcile();
                Err(self.fail(err))
            }
        }
    }

    pub async fn update_profile(&self, request: &UpdateProfileRequest) -> ClientResult<CurrentUser> {
        self.clear_error();
        if let Err(err) = self.api.update_profile(request).await {
            self.reconcile();
            return Err(self.fail(err));
        }
        self.refresh_profile().await
    }

    pub async fn change_password(&self, old_password: &str, new_password: &str) -> ClientResult<()> {
        self.clear_error();
        let request = ChangePasswordRequest {
            old_password: old_password.to_string(),
            new_password: new_password.to_string(),
        };
        match self.api.change_password(&request).await {
            Ok(_) => Ok(()),
            Err(err) => {
                self.reconcile();
                Err(self.fail(err))
            }
        }
    }

    fn fail(&self, err: ClientError) -> ClientError {
        *self.last_error.write() = Some(err.message().to_string());
        err
    }

    /// Drops the user if the access token disappeared underneath us.
    fn reconcile(&self) {
        if self.session.has_access_token() {
            return;
        }
        let mut state = self.state.write();
        if state.is_authenticated() {
            tracing::debug!("access token gone, dropping current user");
            *state = AuthState::Unauthenticated;
        }
    }
}

impl std::fmt::Debug for AuthController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthController")
            .field("state", &*self.state.read())
            .field("last_error", &*self.last_error.read())
            .finish()
    }
}
