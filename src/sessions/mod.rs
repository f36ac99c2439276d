//! Sessions Module
//!
//! Session handles and the registry that stores them in the cache.

mod registry;
mod session;

pub use registry::{SessionRegistry, MAX_SESSION_ID_LENGTH};
pub use session::Session;
