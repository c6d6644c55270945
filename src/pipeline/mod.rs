//! Request pipeline
//!
//! Every API call is wrapped by two ordered middleware chains that run
//! synchronously around the network exchange:
//! - outbound: request-id stamp, then credential injection
//! - inbound: session invalidation on 401
//!
//! Each middleware takes the context by value and hands it back, so the chain
//! is a plain fold.

mod credentials;
mod invalidation;
mod navigator;

pub use credentials::{CredentialInjector, RequestIdStamp, CSRF_HEADER, REQUEST_ID_HEADER};
pub use invalidation::SessionInvalidationGuard;
pub use navigator::{Navigator, TracingNavigator};

use std::sync::Arc;

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};

use crate::session::SessionStore;

/// An outgoing call as seen by outbound middleware.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    /// Endpoint path relative to the API base, e.g. `/auth/login`.
    pub endpoint: String,
    pub headers: HeaderMap,
    pub request_id: Option<String>,
}

impl RequestContext {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            headers: HeaderMap::new(),
            request_id: None,
        }
    }

    /// POST, PUT, PATCH and DELETE.
    pub fn is_state_changing(&self) -> bool {
        matches!(self.method, Method::POST | Method::PUT | Method::PATCH | Method::DELETE)
    }
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Response { status: StatusCode, body: Vec<u8> },
    /// Nothing came back: connection refused, timeout, DNS.
    TransportFailure(String),
}

/// A finished call as seen by inbound middleware.
#[derive(Debug, Clone)]
pub struct ResponseContext {
    pub method: Method,
    pub endpoint: String,
    pub request_id: Option<String>,
    pub outcome: Outcome,
}

impl ResponseContext {
    pub fn for_request(request: &RequestContext, outcome: Outcome) -> Self {
        Self {
            method: request.method.clone(),
            endpoint: request.endpoint.clone(),
            request_id: request.request_id.clone(),
            outcome,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match &self.outcome {
            Outcome::Response { status, .. } => Some(*status),
            Outcome::TransportFailure(_) => None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status().map(|s| s.is_success()).unwrap_or(false)
    }
}

pub trait RequestMiddleware: Send + Sync {
    fn on_request(&self, ctx: RequestContext) -> RequestContext;
}

pub trait ResponseMiddleware: Send + Sync {
    fn on_response(&self, ctx: ResponseContext) -> ResponseContext;
}

#[derive(Clone, Default)]
pub struct Pipeline {
    outbound: Vec<Arc<dyn RequestMiddleware>>,
    inbound: Vec<Arc<dyn ResponseMiddleware>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// `[RequestIdStamp, CredentialInjector]` outbound, `[SessionInvalidationGuard]` inbound.
    pub fn standard(session: Arc<SessionStore>, navigator: Arc<dyn Navigator>, login_route: impl Into<String>) -> Self {
        Self::new()
            .with_outbound(RequestIdStamp)
            .with_outbound(CredentialInjector::new(session.clone()))
            .with_inbound(SessionInvalidationGuard::new(session, navigator, login_route))
    }

    pub fn with_outbound(mut self, middleware: impl RequestMiddleware + 'static) -> Self {
        self.outbound.push(Arc::new(middleware));
        self
    }

    pub fn with_inbound(mut self, middleware: impl ResponseMiddleware + 'static) -> Self {
        self.inbound.push(Arc::new(middleware));
        self
    }

    pub fn outbound(&self, ctx: RequestContext) -> RequestContext {
        self.outbound.iter().fold(ctx, |ctx, m| m.on_request(ctx))
    }

    pub fn inbound(&self, ctx: ResponseContext) -> ResponseContext {
        self.inbound.iter().fold(ctx, |ctx, m| m.on_response(ctx))
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("outbound", &self.outbound.len())
            .field("inbound", &self.inbound.len())
            .finish()
    }
}
