//! Session Store and its durable backing slot.

mod storage;
mod store;

pub use storage::{FileTokenStorage, MemoryTokenStorage, TokenStorage};
pub use store::{SessionStore, ACCESS_TOKEN_KEY};
