pub mod api;
pub mod authz;
pub mod config;
pub mod controller;
pub mod errors;
pub mod events;
pub mod guard;
pub mod models;
pub mod pipeline;
pub mod session;
pub mod token;

use std::sync::Arc;

// Re-export commonly used items for tests
pub use api::ApiClient;
pub use config::ClientConfig;
pub use controller::{AuthController, AuthState, LoginOutcome};
pub use errors::{ClientError, ClientResult};
pub use guard::{GuardDecision, RouteGuard};
pub use session::SessionStore;

use pipeline::{Navigator, Pipeline};
use session::TokenStorage;

/// Wires one session store, the standard pipeline and a controller together.
pub fn build_client(
    config: &ClientConfig,
    storage: Arc<dyn TokenStorage>,
    navigator: Arc<dyn Navigator>,
) -> ClientResult<AuthController> {
    let session = Arc::new(SessionStore::new(storage));
    let pipeline = Pipeline::standard(session.clone(), navigator, config.login_route.clone());
    let api = ApiClient::new(config, session, pipeline)?;
    Ok(AuthController::new(api))
}
