pub mod banking;
pub mod user;
