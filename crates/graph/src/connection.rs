//! Transport seam for graph requests.
//!
//! `GraphConnection` is implemented by [`HttpGraphClient`](crate::HttpGraphClient)
//! and by test mocks, keeping feature logic independent of the HTTP stack.

use std::future::Future;
use std::pin::Pin;

use crate::error::GraphError;
use crate::request::GraphRequest;

/// Boxed future returned by [`GraphConnection::start`].
pub type GraphFuture<'a> =
    Pin<Box<dyn Future<Output = Result<serde_json::Value, GraphError>> + Send + 'a>>;

/// Issues graph requests and returns the decoded JSON body.
pub trait GraphConnection: Send + Sync {
    fn start(&self, request: GraphRequest) -> GraphFuture<'_>;
}
