//! Per-request context
//!
//! A [`RequestScope`] pairs one raw request with the resolver and caches
//! the first successful interpretation, so every component handling the
//! request sees the same [`RequestIntent`]. Each request gets its own
//! scope; nothing is shared through global state.

use crate::errors::RequestResult;
use crate::intent::RequestIntent;
use crate::resolver::RequestResolver;
use crate::source::RawRequest;
use once_cell::sync::OnceCell;
use std::sync::Arc;

pub struct RequestScope<R: RawRequest> {
    resolver: Arc<RequestResolver>,
    request: R,
    intent: OnceCell<RequestIntent>,
}

impl<R: RawRequest> RequestScope<R> {
    pub fn new(resolver: Arc<RequestResolver>, request: R) -> Self {
        Self {
            resolver,
            request,
            intent: OnceCell::new(),
        }
    }

    pub fn request(&self) -> &R {
        &self.request
    }

    /// The interpreted request, resolved on first access.
    ///
    /// A failed resolution is not cached; the next call tries again.
    pub fn intent(&self) -> RequestResult<&RequestIntent> {
        self.intent
            .get_or_try_init(|| self.resolver.resolve(&self.request))
    }

    /// Resolve afresh, replacing any cached intent
    pub fn reanalyze(&mut self) -> RequestResult<&RequestIntent> {
        self.intent = OnceCell::new();
        self.intent()
    }

    /// Whether an intent has been cached
    pub fn is_resolved(&self) -> bool {
        self.intent.get().is_some()
    }
}

impl<R: RawRequest + std::fmt::Debug> std::fmt::Debug for RequestScope<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestScope")
            .field("request", &self.request)
            .field("intent", &self.intent.get())
            .finish()
    }
}
