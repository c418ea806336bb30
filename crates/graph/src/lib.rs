//! Graph API request layer.
//!
//! Builds requests, sends them through a [`GraphConnection`] (the reqwest
//! backed [`HttpGraphClient`] in production) and decodes the loosely typed
//! JSON responses.

pub mod client;
pub mod connection;
pub mod decode;
pub mod error;
pub mod gatekeeper;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod request;
pub mod token_refresh;

pub use client::HttpGraphClient;
pub use connection::{GraphConnection, GraphFuture};
pub use error::GraphError;
pub use gatekeeper::GateKeeperManager;
pub use request::{GraphRequest, HttpMethod, ParamValue, RequestFlags};
pub use token_refresh::refresh_access_token;
