//! Error types raised by the core.
//!
//! Ported in spirit from the `gram-codec::parser::error` convention: one
//! `thiserror`-derived enum, every variant carrying the offending record
//! instead of a bare string, so callers can match on structure rather than
//! parse messages.

use crate::ids::{GraphId, QueryId};

/// Errors the core can raise.
///
/// Validation errors (`BadNode`, `BadEdge`, `BadMatch`) are always raised
/// before any persistence side effect. `UnknownGraph`/`UnknownQuery` signal a
/// handle referencing a record that does not (or no longer) exists.
/// `StorageError` is a pass-through from the storage collaborator; the
/// enclosing transactional scope has already rolled back by the time it
/// reaches the caller. The solver loop itself never raises a recoverable
/// error — `Cancelled` is the one exception, surfaced only when the caller
/// supplied a cancellation probe that fired.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A node id could not be represented as an unsigned graph-local id.
    #[error("bad node id {node_id}: {reason}")]
    BadNode { node_id: String, reason: String },

    /// An edge endpoint was invalid, or the edge was a self-loop.
    #[error("bad edge ({start}, {end}): {reason}")]
    BadEdge {
        start: String,
        end: String,
        reason: String,
    },

    /// A candidate match had an invalid endpoint or an out-of-range weight.
    #[error("bad match ({q_node}, {t_node}, weight={weight}): {reason}")]
    BadMatch {
        q_node: String,
        t_node: String,
        weight: String,
        reason: String,
    },

    /// `graph_id` does not reference any stored graph.
    #[error("unknown graph id {0}")]
    UnknownGraph(GraphId),

    /// `query_id` does not reference any stored query, or references one
    /// with no matches.
    #[error("unknown query id {0}")]
    UnknownQuery(QueryId),

    /// The storage collaborator failed; the enclosing transaction rolled
    /// back.
    #[error("storage error: {0}")]
    StorageError(String),

    /// The caller's cancellation probe fired between solver iterations.
    #[error("execution cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, Error>;
