//! Core state for the playkit SDK.
//!
//! Holds app settings, access/authentication tokens, the current gaming
//! context and the key-value store they are persisted to. Everything is
//! owned by an explicit [`Session`] instead of process-wide globals.

pub mod context;
pub mod session;
pub mod settings;
pub mod store;
pub mod token;
pub mod validate;

pub use context::GamingContext;
pub use session::Session;
pub use settings::{ConfigError, Settings};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, StoreError};
pub use token::{AccessToken, AuthenticationToken, GAMING_GRAPH_DOMAIN};
pub use validate::{Validate, ValidationError};

/// Version reported to the server in SDK parameters.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");
