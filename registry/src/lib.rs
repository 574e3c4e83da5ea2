//! Session, auth and REST plumbing for the student registry front-ends.
//!
//! This crate owns everything the browser client and the CLI share: the
//! credential store seam, claim decoding, the normalized API client, the auth
//! state machine, route guarding and the typed backend endpoints. It performs
//! no I/O itself; callers plug in a [`http::Transport`], a
//! [`token_store::TokenStore`], an [`api::Navigator`] and a [`clock::Clock`].
//!
//! TRUST MODEL
//! ===========
//! Claims decoded here are never verified. They drive display and routing
//! only; the backend re-validates the bearer credential on every request.

pub mod api;
pub mod auth;
pub mod claims;
pub mod clock;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod guard;
pub mod http;
pub mod lookup;
pub mod token_store;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use api::{ApiClient, Navigator, RequestOptions};
pub use auth::{AuthContext, AuthState, Session, SubscriptionId};
pub use claims::Claims;
pub use config::RegistryConfig;
pub use error::{ApiError, DecodeError, LoginError, TransportError};
pub use guard::{Access, GuardDecision};
pub use http::{HttpRequest, HttpResponse, Method, Transport};
pub use token_store::{MemoryTokenStore, TokenStore};
