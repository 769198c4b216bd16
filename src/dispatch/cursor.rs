//! Per-request cursor over a resolved handler chain.

use std::sync::Arc;

use thiserror::Error;

use crate::dispatch::chain::HandlerChain;

/// Errors from advancing the dispatch cursor.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// No handler chain was resolved for this request.
    #[error("no route resolved for this request")]
    NoRoute,

    /// The chain was advanced past its terminal handler. This is a bug in
    /// handler or middleware code.
    #[error("handler chain advanced past its terminal handler")]
    ChainExhausted,
}

/// One advance step: which chain member to invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Middleware(usize),
    Terminal,
}

/// Monotonic position into a resolved handler chain.
///
/// Positions `0..N` are the middleware entries; position `N` is the
/// terminal handler. The position only ever moves forward and is never
/// reset for the life of the request.
#[derive(Debug)]
pub struct DispatchCursor {
    chain: Option<Arc<HandlerChain>>,
    position: usize,
}

impl DispatchCursor {
    /// Cursor for a request that resolved no chain.
    pub(crate) fn unrouted() -> DispatchCursor {
        DispatchCursor {
            chain: None,
            position: 0,
        }
    }

    pub(crate) fn routed(chain: Arc<HandlerChain>) -> DispatchCursor {
        DispatchCursor {
            chain: Some(chain),
            position: 0,
        }
    }

    pub(crate) fn chain(&self) -> Option<&Arc<HandlerChain>> {
        self.chain.as_ref()
    }

    /// Current position; equals the number of advances performed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Claims the next chain member, incrementing the position.
    pub(crate) fn step(&mut self) -> Result<Step, DispatchError> {
        let chain = self.chain.as_ref().ok_or(DispatchError::NoRoute)?;
        let mw_len = chain.middleware_len();
        let position = self.position;
        if position > mw_len {
            return Err(DispatchError::ChainExhausted);
        }
        self.position += 1;
        if position < mw_len {
            Ok(Step::Middleware(position))
        } else {
            Ok(Step::Terminal)
        }
    }
}
