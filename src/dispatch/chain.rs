//! Handler trait and the route builder that freezes handler chains.

use std::sync::Arc;

use crate::dispatch::Handling;
use crate::http::request::RequestContext;

/// A middleware or terminal handler.
///
/// Implemented for free by any `Fn(&mut RequestContext) -> Handling`
/// closure; per-route state lives in the closure's captures.
pub trait Handler: Send + Sync {
    fn handle(&self, req: &mut RequestContext) -> Handling;
}

impl<F> Handler for F
where
    F: Fn(&mut RequestContext) -> Handling + Send + Sync,
{
    fn handle(&self, req: &mut RequestContext) -> Handling {
        self(req)
    }
}

/// An immutable, ordered middleware list plus exactly one terminal handler.
///
/// Built by [`Route`], stored in the route trie, shared across the method
/// slots of a single registration via `Arc`.
pub struct HandlerChain {
    middleware: Vec<Arc<dyn Handler>>,
    terminal: Arc<dyn Handler>,
}

impl HandlerChain {
    /// Number of middleware entries ahead of the terminal handler.
    pub fn middleware_len(&self) -> usize {
        self.middleware.len()
    }

    pub(crate) fn middleware(&self, index: usize) -> &Arc<dyn Handler> {
        &self.middleware[index]
    }

    pub(crate) fn terminal(&self) -> &Arc<dyn Handler> {
        &self.terminal
    }
}

impl std::fmt::Debug for HandlerChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerChain")
            .field("middleware_len", &self.middleware.len())
            .finish()
    }
}

/// Builder for a route's handler chain.
///
/// Middleware are appended in execution order before the route is
/// registered:
///
/// ```
/// use fastcgi_gateway::dispatch::{Handling, Route};
///
/// let route = Route::new(|req: &mut fastcgi_gateway::RequestContext| {
///     req.response_mut().write_str("ok");
///     Handling::RespondAccept
/// })
/// .middleware(|req: &mut fastcgi_gateway::RequestContext| {
///     req.next().unwrap_or(Handling::IgnoreTerm)
/// });
/// # let _ = route;
/// ```
pub struct Route {
    middleware: Vec<Arc<dyn Handler>>,
    terminal: Arc<dyn Handler>,
}

impl Route {
    /// Starts a route with its terminal handler.
    pub fn new<H>(handler: H) -> Route
    where
        H: Handler + 'static,
    {
        Route {
            middleware: Vec::new(),
            terminal: Arc::new(handler),
        }
    }

    /// Appends a middleware; middleware run in the order they were added.
    pub fn middleware<M>(mut self, middleware: M) -> Route
    where
        M: Handler + 'static,
    {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Freezes the builder into a shareable chain.
    pub fn into_chain(self) -> Arc<HandlerChain> {
        Arc::new(HandlerChain {
            middleware: self.middleware,
            terminal: self.terminal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_preserves_middleware_order() {
        let route = Route::new(|_: &mut RequestContext| Handling::RespondAccept)
            .middleware(|_: &mut RequestContext| Handling::IgnoreTerm)
            .middleware(|_: &mut RequestContext| Handling::IgnoreAccept);
        let chain = route.into_chain();
        assert_eq!(chain.middleware_len(), 2);
    }

    #[test]
    fn test_chain_without_middleware() {
        let chain = Route::new(|_: &mut RequestContext| Handling::RespondTerm).into_chain();
        assert_eq!(chain.middleware_len(), 0);
    }
}
