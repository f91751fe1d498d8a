//! Authentication module
//!
//! Supports: Bearer, API Key, Basic, OAuth2 client credentials, Custom Headers
//!
//! The `Authenticator` resolves credentials once into an `AuthContext`.
//! The context is an explicit value handed to the HTTP client or to raw
//! dispatch; there is no ambient "current session".

mod authenticator;
mod context;
mod types;

pub use authenticator::Authenticator;
pub use context::AuthContext;
pub use types::{AccessToken, AuthConfig};
