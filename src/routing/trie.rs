//! Byte-level route trie with per-method handler chain slots.
//!
//! # Design Decisions
//! - Node kind (literal / capture / wildcard) is decided by lookahead when
//!   the node is created and is fixed forever; every route crossing that
//!   position must agree or registration fails with an overlap
//! - Captures are structural: the `:name` text is not stored, a capture
//!   consumes exactly one path segment (which may be empty)
//! - A wildcard node has no children; it matches the remainder of any path
//! - Registration is all-or-nothing per method set and append-only

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::dispatch::chain::HandlerChain;
use crate::http::method::{Method, MethodSet, METHOD_COUNT};

/// Errors reported synchronously by route registration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegisterError {
    /// Routes must begin with `/`.
    #[error("route {route:?} must begin with '/'")]
    Malformed { route: String },

    /// The route collides with an existing registration, either on a
    /// (node, method) slot or on a node-kind requirement.
    #[error("route {route:?} overlaps a previously registered route")]
    Overlap { route: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    /// Only exact bytes match here.
    Literal,
    /// Consumes one full path segment, up to the next `/` or the end.
    Capture,
    /// Consumes the remainder of the path; terminal by construction.
    Wildcard,
}

struct Node {
    kind: NodeKind,
    children: HashMap<u8, Node>,
    chains: [Option<Arc<HandlerChain>>; METHOD_COUNT],
}

impl Node {
    fn new(kind: NodeKind) -> Node {
        Node {
            kind,
            children: HashMap::new(),
            chains: std::array::from_fn(|_| None),
        }
    }
}

/// Maps decoded URI paths to per-method handler chains.
///
/// Read-only after startup registration; safe to share across requests.
pub struct RouteTrie {
    root: Node,
}

impl RouteTrie {
    pub fn new() -> RouteTrie {
        RouteTrie {
            root: Node::new(NodeKind::Literal),
        }
    }

    /// Registers `chain` for every method in `methods` at `path`.
    ///
    /// Fails without mutating any slot if the path is malformed, implies a
    /// node-kind conflict, or any requested method slot is occupied.
    pub fn register(
        &mut self,
        methods: MethodSet,
        path: &str,
        chain: Arc<HandlerChain>,
    ) -> Result<(), RegisterError> {
        if !path.starts_with('/') {
            return Err(RegisterError::Malformed {
                route: path.to_string(),
            });
        }

        let node = match Self::create_path(&mut self.root, path.as_bytes()) {
            Some(node) => node,
            None => {
                return Err(RegisterError::Overlap {
                    route: path.to_string(),
                })
            }
        };

        // All requested slots must be free before any is written.
        for method in methods.iter() {
            let Some(slot) = method.slot() else { continue };
            if node.chains[slot].is_some() {
                return Err(RegisterError::Overlap {
                    route: path.to_string(),
                });
            }
        }
        for method in methods.iter() {
            let Some(slot) = method.slot() else { continue };
            node.chains[slot] = Some(Arc::clone(&chain));
        }
        Ok(())
    }

    /// Resolves `path` to the chain registered for `method`, if any.
    ///
    /// `Method::Unknown` never resolves.
    pub fn resolve(&self, path: &str, method: Method) -> Option<Arc<HandlerChain>> {
        let slot = method.slot()?;
        let node = Self::walk(&self.root, path.as_bytes())?;
        node.chains[slot].clone()
    }

    /// Descends from `root`, creating nodes as needed, and returns the
    /// terminal node for `path`. `None` signals a kind conflict.
    fn create_path<'a>(root: &'a mut Node, path: &[u8]) -> Option<&'a mut Node> {
        let mut current = root;
        let mut i = 0;
        while i < path.len() {
            let byte = path[i];
            let lookahead = path.get(i + 1).copied();
            let kind = match lookahead {
                Some(b':') => NodeKind::Capture,
                Some(b'*') => NodeKind::Wildcard,
                _ => NodeKind::Literal,
            };
            current = current
                .children
                .entry(byte)
                .or_insert_with(|| Node::new(kind));

            match current.kind {
                NodeKind::Literal => {
                    if matches!(lookahead, Some(b':') | Some(b'*')) {
                        return None;
                    }
                    i += 1;
                }
                NodeKind::Capture => {
                    if lookahead != Some(b':') {
                        return None;
                    }
                    // Skip the capture text; resume at the segment's `/`.
                    match path[i + 1..].iter().position(|&b| b == b'/') {
                        None => return Some(current),
                        Some(offset) => i += 1 + offset,
                    }
                }
                NodeKind::Wildcard => {
                    if lookahead != Some(b'*') {
                        return None;
                    }
                    return Some(current);
                }
            }
        }
        Some(current)
    }

    /// Read-only descent; `None` when the path leaves the trie.
    fn walk<'a>(root: &'a Node, path: &[u8]) -> Option<&'a Node> {
        let mut current = root;
        let mut i = 0;
        while i < path.len() {
            current = current.children.get(&path[i])?;
            match current.kind {
                NodeKind::Literal => i += 1,
                NodeKind::Capture => match path[i + 1..].iter().position(|&b| b == b'/') {
                    None => return Some(current),
                    Some(offset) => i += 1 + offset,
                },
                NodeKind::Wildcard => return Some(current),
            }
        }
        Some(current)
    }
}

impl Default for RouteTrie {
    fn default() -> Self {
        RouteTrie::new()
    }
}
