use crate::authz::{self, Role};
use crate::config::ClientConfig;
use crate::controller::{AuthController, AuthState};

/// What the UI should do with a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Auth state not resolved yet; show a neutral placeholder.
    Loading,
    Redirect(String),
    Render,
}

/// Navigation gate over the controller's auth state.
///
/// An authenticated user lacking the role goes to the landing page, never to
/// login: that is an authorization failure, not an authentication one.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    login_route: String,
    landing_route: String,
}

impl RouteGuard {
    pub fn new(login_route: impl Into<String>, landing_route: impl Into<String>) -> Self {
        Self {
            login_route: login_route.into(),
            landing_route: landing_route.into(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.login_route.clone(), config.landing_route.clone())
    }

    /// `required_roles` empty means any authenticated user may enter.
    pub fn evaluate(&self, state: &AuthState, required_roles: &[Role]) -> GuardDecision {
        match state {
            AuthState::Unknown => GuardDecision::Loading,
            AuthState::Authenticating | AuthState::Unauthenticated => GuardDecision::Redirect(self.login_route.clone()),
            AuthState::Authenticated(user) => {
                if required_roles.is_empty() || authz::has_role(Some(user), required_roles) {
                    GuardDecision::Render
                } else {
                    tracing::debug!(
                        role = %user.role,
                        required = ?required_roles,
                        "role not allowed, sending to landing page"
                    );
                    GuardDecision::Redirect(self.landing_route.clone())
                }
            }
        }
    }

    pub fn check(&self, controller: &AuthController, required_roles: &[Role]) -> GuardDecision {
        self.evaluate(&controller.state(), required_roles)
    }
}
