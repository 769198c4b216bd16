//! Registration surface over the route trie.
//!
//! # Responsibilities
//! - Accept route registrations at startup
//! - Hold the configured not-found fallback chain
//! - Resolve (path, method) pairs for the gateway
//!
//! # Design Decisions
//! - The router moves into the `Gateway` and is immutable from then on;
//!   registration and serving never interleave
//! - Resolution falls back to the not-found chain; an unset fallback
//!   leaves the request unroutable rather than inventing a default

use std::sync::Arc;

use crate::dispatch::chain::HandlerChain;
use crate::dispatch::Route;
use crate::http::method::{Method, MethodSet};
use crate::routing::trie::{RegisterError, RouteTrie};

/// Route table populated at startup and served read-only afterwards.
///
/// ```
/// use fastcgi_gateway::dispatch::{Handling, Route};
/// use fastcgi_gateway::http::method::Method;
/// use fastcgi_gateway::routing::Router;
///
/// let mut router = Router::new();
/// router
///     .register(Method::Get | Method::Head, "/books/:id", Route::new(
///         |req: &mut fastcgi_gateway::RequestContext| {
///             req.response_mut().write_str("ok");
///             Handling::RespondAccept
///         },
///     ))
///     .unwrap();
/// ```
pub struct Router {
    trie: RouteTrie,
    not_found: Option<Arc<HandlerChain>>,
}

impl Router {
    pub fn new() -> Router {
        Router {
            trie: RouteTrie::new(),
            not_found: None,
        }
    }

    /// Registers `route` at `path` for every method in `methods`.
    ///
    /// All requested method slots are claimed atomically; on error nothing
    /// is mutated. Slots can never be replaced once claimed.
    pub fn register(
        &mut self,
        methods: impl Into<MethodSet>,
        path: &str,
        route: Route,
    ) -> Result<(), RegisterError> {
        let methods = methods.into();
        let result = self.trie.register(methods, path, route.into_chain());
        match &result {
            Ok(()) => tracing::debug!(path, "route registered"),
            Err(err) => tracing::warn!(path, error = %err, "route registration rejected"),
        }
        result
    }

    /// Sets the chain dispatched when no route matches. Replaces any
    /// previously configured fallback.
    pub fn set_not_found(&mut self, route: Route) {
        self.not_found = Some(route.into_chain());
    }

    /// Resolves a registered chain, without the not-found fallback.
    pub fn resolve(&self, path: &str, method: Method) -> Option<Arc<HandlerChain>> {
        self.trie.resolve(path, method)
    }

    /// Resolves a chain, falling back to the not-found chain when the trie
    /// has no match for (path, method).
    pub(crate) fn resolve_or_fallback(
        &self,
        path: &str,
        method: Method,
    ) -> Option<Arc<HandlerChain>> {
        self.trie
            .resolve(path, method)
            .or_else(|| self.not_found.clone())
    }
}

impl Default for Router {
    fn default() -> Self {
        Router::new()
    }
}
