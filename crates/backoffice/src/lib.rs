//! Vivaha Backoffice - client library for the bureau API.
//!
//! Everything the operator-facing front ends need to drive the customer
//! lifecycle workflow:
//!
//! - [`config`] - Environment-driven configuration
//! - [`error`] - The API error taxonomy and structured error payloads
//! - [`api`] - The HTTP client (JSON and multipart partial updates)
//! - [`lookups`] - Session-lifetime lookup cache with total label
//!   resolution
//! - [`session`] - Per-track edit sessions and the diff-and-persist
//!   protocol
//! - [`roster`] - The customer list, role-scoped views, and the
//!   assignment sub-flow
//! - [`filters`] - File-backed persistence for roster filter state
//!
//! Transport-level auth is a thin concern here: the client injects a
//! configured token and treats a 401 as a session-termination signal for
//! the embedding application. Login itself lives elsewhere.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod filters;
pub mod lookups;
pub mod roster;
pub mod session;

pub use api::ApiClient;
pub use config::{BackofficeConfig, ConfigError};
pub use error::ApiError;
pub use lookups::LookupCache;
pub use roster::Roster;
pub use session::EditSession;
