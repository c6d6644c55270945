use std::sync::Arc;

use parking_lot::RwLock;

use super::storage::TokenStorage;
use crate::events::{self, EventBus, SessionEvent};

/// Fixed durable-storage key of the access token. Nothing else is persisted.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

#[derive(Debug, Default)]
struct Tokens {
    access: Option<String>,
    csrf: Option<String>,
}

/// In-memory owner of the access and CSRF tokens.
///
/// Every write is a plain overwrite, so concurrent writers end in a
/// last-set-wins state. The access token is mirrored to durable storage under
/// the same write lock, so memory and storage always agree; the CSRF token
/// lives only in memory.
pub struct SessionStore {
    tokens: RwLock<Tokens>,
    storage: Arc<dyn TokenStorage>,
    events: EventBus,
}

impl SessionStore {
    /// Builds the store and hydrates the access token from durable storage.
    /// A missing or unreadable slot just means starting unauthenticated.
    pub fn new(storage: Arc<dyn TokenStorage>) -> Self {
        let access = match storage.load(ACCESS_TOKEN_KEY) {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(error = %err, "could not read stored access token");
                None
            }
        };

        if access.is_some() {
            tracing::debug!("restored access token from durable storage");
        }

        Self {
            tokens: RwLock::new(Tokens { access, csrf: None }),
            storage,
            events: events::init_event_bus(),
        }
    }

    pub fn set_access_token(&self, token: impl Into<String>) {
        let token = token.into();
        let mut tokens = self.tokens.write();
        if let Err(err) = self.storage.save(ACCESS_TOKEN_KEY, &token) {
            tracing::warn!(error = %err, "could not persist access token");
        }
        tokens.access = Some(token);
    }

    pub fn clear_access_token(&self) {
        let mut tokens = self.tokens.write();
        if let Err(err) = self.storage.remove(ACCESS_TOKEN_KEY) {
            tracing::warn!(error = %err, "could not remove stored access token");
        }
        tokens.access = None;
    }

    pub fn set_csrf_token(&self, token: impl Into<String>) {
        self.tokens.write().csrf = Some(token.into());
    }

    pub fn clear_csrf_token(&self) {
        self.tokens.write().csrf = None;
    }

    /// Forgets both tokens.
    pub fn clear(&self) {
        self.clear_csrf_token();
        self.clear_access_token();
    }

    pub fn current_access_token(&self) -> Option<String> {
        self.tokens.read().access.clone()
    }

    pub fn current_csrf_token(&self) -> Option<String> {
        self.tokens.read().csrf.clone()
    }

    pub fn has_access_token(&self) -> bool {
        self.tokens.read().access.is_some()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tokens = self.tokens.read();
        f.debug_struct("SessionStore")
            .field("access_token", &tokens.access.as_ref().map(|_| "<redacted>"))
            .field("csrf_token", &tokens.csrf.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
