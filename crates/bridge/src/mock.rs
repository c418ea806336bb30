//! Recording bridge implementations for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use url::Url;

use crate::error::BridgeError;
use crate::opener::{BridgeFuture, UrlOpener};
use crate::web_dialog::{WebDialogOutcome, WebDialogPresenter, WebDialogRequest};

/// How a [`MockOpener`] answers `open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenBehavior {
    Opened,
    Declined,
    Fails,
}

/// URL opener that records every URL.
pub struct MockOpener {
    behavior: OpenBehavior,
    app_installed: bool,
    opened: Mutex<Vec<Url>>,
}

impl MockOpener {
    pub fn new(behavior: OpenBehavior) -> Self {
        Self {
            behavior,
            app_installed: false,
            opened: Mutex::new(Vec::new()),
        }
    }

    pub fn with_app_installed(mut self, installed: bool) -> Self {
        self.app_installed = installed;
        self
    }

    pub fn opened(&self) -> Vec<Url> {
        self.opened.lock().unwrap().clone()
    }

    pub fn last_opened(&self) -> Option<Url> {
        self.opened.lock().unwrap().last().cloned()
    }
}

impl UrlOpener for MockOpener {
    fn open(&self, url: &Url) -> BridgeFuture<'_, bool> {
        self.opened.lock().unwrap().push(url.clone());
        let result = match self.behavior {
            OpenBehavior::Opened => Ok(true),
            OpenBehavior::Declined => Ok(false),
            OpenBehavior::Fails => Err(BridgeError::OpenFailed("mock failure".into())),
        };
        Box::pin(async move { result })
    }

    fn is_facebook_app_installed(&self) -> bool {
        self.app_installed
    }
}

/// Web dialog presenter answering from a queue.
#[derive(Default)]
pub struct MockWebDialogPresenter {
    outcomes: Mutex<VecDeque<Result<WebDialogOutcome, BridgeError>>>,
    requests: Mutex<Vec<WebDialogRequest>>,
}

impl MockWebDialogPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_outcome(&self, outcome: WebDialogOutcome) {
        self.outcomes.lock().unwrap().push_back(Ok(outcome));
    }

    pub fn push_error(&self, err: BridgeError) {
        self.outcomes.lock().unwrap().push_back(Err(err));
    }

    pub fn requests(&self) -> Vec<WebDialogRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl WebDialogPresenter for MockWebDialogPresenter {
    fn present(&self, request: WebDialogRequest) -> BridgeFuture<'_, WebDialogOutcome> {
        self.requests.lock().unwrap().push(request);
        let next = self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(WebDialogOutcome::Cancelled));
        Box::pin(async move { next })
    }
}
