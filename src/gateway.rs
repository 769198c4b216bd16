//! Per-request orchestration: populate, resolve, dispatch, hand back.
//!
//! # Responsibilities
//! - Own the frozen route table and the gateway configuration
//! - Turn one raw request (environment + body stream) into a dispatched
//!   handler chain run
//! - Return the buffered response, or an explicit no-op outcome, to the
//!   transport collaborator
//!
//! # Design Decisions
//! - The accept loop, CGI variable transport, and socket writes live in
//!   the caller; `handle` is the complete per-request seam
//! - An unroutable request (no match, no not-found chain) is a distinct
//!   outcome, not an error and not a crash
//! - Every request runs inside a tracing span carrying its id, method,
//!   and path

use std::io::{Read, Write};

use crate::config::GatewayConfig;
use crate::dispatch::{DispatchError, Handling};
use crate::http::request::RequestContext;
use crate::http::response::ResponseBuffer;
use crate::routing::Router;

/// What became of one incoming request.
#[derive(Debug)]
pub enum RequestOutcome {
    /// A handler chain ran to its short-circuit or terminal return.
    Completed {
        /// The buffered response, present iff the chain's final handling
        /// code carried the respond flag.
        response: Option<ResponseBuffer>,
        /// Whether the transport should keep accepting new requests.
        keep_accepting: bool,
    },
    /// No route matched and no not-found chain is configured; nothing was
    /// dispatched.
    Unroutable,
}

/// The assembled gateway: a frozen [`Router`] plus configuration.
///
/// Construction consumes the router, which is read-only from then on and
/// safe to serve from concurrently.
pub struct Gateway {
    router: Router,
    config: GatewayConfig,
}

impl Gateway {
    pub fn new(router: Router) -> Gateway {
        Gateway {
            router,
            config: GatewayConfig::default(),
        }
    }

    pub fn with_config(router: Router, config: GatewayConfig) -> Gateway {
        Gateway { router, config }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Runs one request through population, resolution, and dispatch.
    ///
    /// `env` is the ordered `KEY=VALUE` request environment, `body` the
    /// readable request body stream, and `diag` the transport's
    /// diagnostic sink.
    pub fn handle(
        &self,
        env: Vec<String>,
        body: impl Read + 'static,
        diag: impl Write + 'static,
    ) -> RequestOutcome {
        let mut req = RequestContext::populate(
            env,
            Box::new(body),
            Box::new(diag),
            self.config.limits.max_body_bytes,
        );

        let span = tracing::debug_span!(
            "request",
            id = %req.request_id(),
            method = %req.method(),
            path = %req.routing_path(),
        );
        let _guard = span.enter();

        let chain = match self
            .router
            .resolve_or_fallback(req.routing_path(), req.method())
        {
            Some(chain) => chain,
            None => {
                tracing::warn!("no route matched and no not-found chain configured");
                return RequestOutcome::Unroutable;
            }
        };
        req.attach_chain(chain);

        let handling = match req.next() {
            Ok(handling) => handling,
            Err(err) => {
                // Unreachable from position 0 of a well-formed chain; kept
                // as a reported error rather than a panic.
                tracing::error!(error = %err, "dispatch failed to start");
                return RequestOutcome::Completed {
                    response: None,
                    keep_accepting: matches!(err, DispatchError::NoRoute),
                };
            }
        };

        tracing::debug!(
            status = req.response().status(),
            respond = handling.should_respond(),
            keep_accepting = handling.keep_accepting(),
            "dispatch complete"
        );

        let keep_accepting = handling.keep_accepting();
        let response = if handling.should_respond() {
            Some(req.into_response())
        } else {
            None
        };
        RequestOutcome::Completed {
            response,
            keep_accepting,
        }
    }
}

impl From<Router> for Gateway {
    fn from(router: Router) -> Self {
        Gateway::new(router)
    }
}
