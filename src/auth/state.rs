//! CSRF state tokens.

// crates.io
use rand::{Rng, distr::Alphanumeric};

/// Length of generated state tokens; 32 alphanumeric characters carry roughly 190 bits.
pub const STATE_LEN: usize = 32;

/// Generates an unguessable, URL- and cookie-safe CSRF state token.
///
/// Tokens are drawn from the thread-local CSPRNG and only contain `[A-Za-z0-9]`, so they embed
/// in query strings and cookie values without escaping.
pub fn create_state() -> String {
	rand::rng().sample_iter(Alphanumeric).take(STATE_LEN).map(char::from).collect()
}
