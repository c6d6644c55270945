use std::sync::Arc;

use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION};
use uuid::Uuid;

use super::{RequestContext, RequestMiddleware};
use crate::session::SessionStore;

pub const CSRF_HEADER: &str = "x-csrf-token";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Attaches the bearer token and, on state-changing methods, the CSRF token.
///
/// Tokens are read at send time, so a rotation between two sends is seen by
/// both. A missing token never fails the request; the server decides.
#[derive(Debug, Clone)]
pub struct CredentialInjector {
    session: Arc<SessionStore>,
}

impl CredentialInjector {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session }
    }
}

impl RequestMiddleware for CredentialInjector {
    fn on_request(&self, mut ctx: RequestContext) -> RequestContext {
        if let Some(token) = self.session.current_access_token() {
            match HeaderValue::from_str(&format!("Bearer {token}")) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    ctx.headers.insert(AUTHORIZATION, value);
                }
                Err(_) => tracing::warn!(endpoint = %ctx.endpoint, "access token is not a valid header value, sending without it"),
            }
        }

        if ctx.is_state_changing() {
            if let Some(csrf) = self.session.current_csrf_token() {
                match HeaderValue::from_str(&csrf) {
                    Ok(mut value) => {
                        value.set_sensitive(true);
                        ctx.headers.insert(HeaderName::from_static(CSRF_HEADER), value);
                    }
                    Err(_) => tracing::warn!(endpoint = %ctx.endpoint, "csrf token is not a valid header value, sending without it"),
                }
            }
        }

        ctx
    }
}

/// Stamps each request with a fresh `X-Request-Id` for log correlation.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdStamp;

impl RequestMiddleware for RequestIdStamp {
    fn on_request(&self, mut ctx: RequestContext) -> RequestContext {
        let id = Uuid::new_v4().to_string();
        if let Ok(value) = HeaderValue::from_str(&id) {
            ctx.headers.insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
            ctx.request_id = Some(id);
        }
        ctx
    }
}
