//! Auth-domain primitives: CSRF state tokens, ordered scope lists, and redacted secrets.

pub mod scope;
pub mod secret;
pub mod state;

pub use scope::*;
pub use secret::*;
pub use state::*;
