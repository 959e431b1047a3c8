//! Session storage module.

pub mod store;

pub use store::{SessionEntry, SessionId, SessionStore};
