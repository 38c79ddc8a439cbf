// Security module
// Session-scoped login against the account directory.

pub mod auth;

pub use auth::{AuthError, AuthState, Authenticator, DEFAULT_MAX_ATTEMPTS};
