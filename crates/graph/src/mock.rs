//! In-process [`GraphConnection`] for tests.
//!
//! Responses are queued up front and handed out in order; every request
//! is recorded for later assertions.

use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::Value;

use crate::connection::{GraphConnection, GraphFuture};
use crate::error::GraphError;
use crate::request::GraphRequest;

/// Mock graph connection with a response queue.
#[derive(Default)]
pub struct MockConnection {
    responses: Mutex<VecDeque<Result<Value, GraphError>>>,
    requests: Mutex<Vec<GraphRequest>>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, value: Value) {
        self.responses.lock().unwrap().push_back(Ok(value));
    }

    pub fn push_err(&self, err: GraphError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    /// All requests started so far, in order.
    pub fn requests(&self) -> Vec<GraphRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl GraphConnection for MockConnection {
    fn start(&self, request: GraphRequest) -> GraphFuture<'_> {
        self.requests.lock().unwrap().push(request);
        let next = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GraphError::Other("no mock response available".into())));
        Box::pin(async move { next })
    }
}
