use std::sync::Arc;

use reqwest::StatusCode;

use super::{Navigator, ResponseContext, ResponseMiddleware};
use crate::api::endpoints;
use crate::events::{self, SessionEvent};
use crate::session::SessionStore;

/// Tears the session down when a non-login request comes back 401.
///
/// A 401 from the login endpoint is just bad credentials and passes through
/// untouched. The teardown is idempotent, so several concurrent 401s each
/// clearing and redirecting is harmless.
#[derive(Clone)]
pub struct SessionInvalidationGuard {
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    login_route: String,
    exempt: Vec<String>,
}

impl SessionInvalidationGuard {
    pub fn new(session: Arc<SessionStore>, navigator: Arc<dyn Navigator>, login_route: impl Into<String>) -> Self {
        Self {
            session,
            navigator,
            login_route: login_route.into(),
            exempt: vec![endpoints::LOGIN.to_string()],
        }
    }

    fn is_exempt(&self, endpoint: &str) -> bool {
        self.exempt.iter().any(|e| e == endpoint)
    }
}

impl ResponseMiddleware for SessionInvalidationGuard {
    fn on_response(&self, ctx: ResponseContext) -> ResponseContext {
        if ctx.status() != Some(StatusCode::UNAUTHORIZED) || self.is_exempt(&ctx.endpoint) {
            return ctx;
        }

        tracing::warn!(
            endpoint = %ctx.endpoint,
            method = %ctx.method,
            request_id = ctx.request_id.as_deref().unwrap_or("-"),
            "session rejected by server, signing out"
        );

        self.session.clear();
        events::publish(
            self.session.events(),
            SessionEvent::Invalidated {
                endpoint: ctx.endpoint.clone(),
            },
        );
        self.navigator.redirect(&self.login_route);

        ctx
    }
}
