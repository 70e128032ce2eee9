//! Input validation, ported in spirit from `fornax.api.check_nodes` /
//! `check_edges` / `check_matches` (`examples/original_source/fornax/api.py`).
//!
//! The Python original validates that ids are integers and weights are
//! numbers because its callers are untyped. This crate's callers are typed
//! Rust, so the same validation surfaces as: ids arrive as `i64` (the
//! natural type for a caller who hasn't yet decided these are graph-local
//! unsigned ids) and are rejected if they don't fit in a [`NodeId`]; weights
//! arrive as `f64` and are rejected if non-finite or outside `(0, 1]`.

use std::collections::BTreeSet;

use crate::error::Error;
use crate::ids::NodeId;
use crate::model::Match;

fn to_node_id(n: i64) -> Result<NodeId, Error> {
    NodeId::try_from(n).map_err(|_| Error::BadNode {
        node_id: n.to_string(),
        reason: "node_id must be a non-negative integer".to_string(),
    })
}

/// Validates a set of raw node ids, returning them as [`NodeId`]s.
///
/// Does not itself reject duplicates: a graph's node set is naturally
/// deduplicated by the caller constructing it (e.g. `0..n`), and the storage
/// layer keys nodes by id regardless.
pub fn check_nodes(nodes: impl IntoIterator<Item = i64>) -> Result<Vec<NodeId>, Error> {
    nodes.into_iter().map(to_node_id).collect()
}

/// Validates a set of raw edges: integer endpoints, `start != end`.
pub fn check_edges(
    edges: impl IntoIterator<Item = (i64, i64)>,
) -> Result<Vec<(NodeId, NodeId)>, Error> {
    edges
        .into_iter()
        .map(|(start, end)| {
            let start = to_node_id(start).map_err(|_| Error::BadEdge {
                start: start.to_string(),
                end: end.to_string(),
                reason: "edge endpoints must be non-negative integers".to_string(),
            })?;
            let end = to_node_id(end).map_err(|_| Error::BadEdge {
                start: start.to_string(),
                end: end.to_string(),
                reason: "edge endpoints must be non-negative integers".to_string(),
            })?;
            if start == end {
                return Err(Error::BadEdge {
                    start: start.to_string(),
                    end: end.to_string(),
                    reason: "edges must start and end on different nodes".to_string(),
                });
            }
            Ok((start, end))
        })
        .collect()
}

/// Validates a set of raw candidate matches: integer endpoints, weight in
/// `(0, 1]`, and no duplicate `(q_node, t_node)` pair within the same batch.
///
/// The source (`fornax`) does not check the last of these explicitly
/// (`SPEC_FULL.md` §4.5 / §9, "Match duplication ambiguity"); this
/// implementation resolves that open question by rejecting duplicates
/// within a single `Query::create` call rather than silently merging them.
pub fn check_matches(
    matches: impl IntoIterator<Item = (i64, i64, f64)>,
) -> Result<Vec<Match>, Error> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for (q_node, t_node, weight) in matches {
        let q = to_node_id(q_node).map_err(|_| Error::BadMatch {
            q_node: q_node.to_string(),
            t_node: t_node.to_string(),
            weight: weight.to_string(),
            reason: "match endpoints must be non-negative integers".to_string(),
        })?;
        let t = to_node_id(t_node).map_err(|_| Error::BadMatch {
            q_node: q_node.to_string(),
            t_node: t_node.to_string(),
            weight: weight.to_string(),
            reason: "match endpoints must be non-negative integers".to_string(),
        })?;
        if !weight.is_finite() || !(0.0 < weight && weight <= 1.0) {
            return Err(Error::BadMatch {
                q_node: q.to_string(),
                t_node: t.to_string(),
                weight: weight.to_string(),
                reason: "weight must satisfy 0 < weight <= 1".to_string(),
            });
        }
        if !seen.insert((q, t)) {
            return Err(Error::BadMatch {
                q_node: q.to_string(),
                t_node: t.to_string(),
                weight: weight.to_string(),
                reason: "duplicate (q_node, t_node) pair within one query".to_string(),
            });
        }
        out.push(Match {
            q_node: q,
            t_node: t,
            weight,
        });
    }
    Ok(out)
}
