//! Session management module.
//!
//! Holds the single authenticated identity of a client, the opaque token
//! minted for it, and the course a visitor tried to join before logging in.

mod identity;
mod store;
mod token;

pub use identity::{Identity, IdentityPolicy, Role, DEMO_EMAIL};
pub use store::{PersistedSession, SessionStore};
pub use token::generate_token;
