//! API contract client: one typed method per backend endpoint.
//!
//! Only `login` (stores the access token) and `logout` (forgets both tokens)
//! touch the session; everything else is side-effect free.

mod auth;
mod banking;
mod client;
pub mod endpoints;

pub use client::ApiClient;
