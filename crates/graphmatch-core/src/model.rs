//! Core data model: matches, join rows, and the tunable option structs that
//! stand in for this crate's "configuration" (see `SPEC_FULL.md` §7).

use serde::{Deserialize, Serialize};

use crate::ids::NodeId;

/// A weighted candidate pairing of a query node with a target node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    pub q_node: NodeId,
    pub t_node: NodeId,
    /// Always in `(0, 1]`.
    pub weight: f64,
}

/// One row of the neighborhood assembler's join table.
///
/// `weight` is the weight of the pivot match `(v, u)`, carried alongside the
/// neighbor pair so the solver can group rows by pivot without a second
/// lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoinRow {
    pub v: NodeId,
    pub u: NodeId,
    pub vv: NodeId,
    pub uu: NodeId,
    pub dv: u32,
    pub du: u32,
    pub weight: f64,
}

/// Options recognized by [`crate::query::Query::execute`].
///
/// Defaults mirror the reference values from `SPEC_FULL.md` §6:
/// `hopping_distance=2, max_iters=10, n=5, edges=false`.
#[derive(Debug, Clone, Copy)]
pub struct ExecuteOptions {
    pub hopping_distance: u32,
    pub max_iters: u32,
    pub n: usize,
    pub edges: bool,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        ExecuteOptions {
            hopping_distance: 2,
            max_iters: 10,
            n: 5,
            edges: false,
        }
    }
}

/// Tunable constants of the solver's update rule (`SPEC_FULL.md` §4.3).
///
/// `alpha` weights neighbor evidence against the distance penalty; `epsilon`
/// is the fixed-point convergence threshold.
#[derive(Debug, Clone, Copy)]
pub struct SolverConfig {
    pub alpha: f64,
    pub epsilon: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            alpha: 1.0,
            epsilon: 1e-6,
        }
    }
}

/// One returned subgraph match and its scoring breakdown.
///
/// `individual_scores` are the raw per-pair inference costs (lower is
/// better), in the same order as `subgraph_match`. `total_score` is their
/// sum plus one penalty point per query node the subgraph left unmatched;
/// `Payload::subgraph_matches` is sorted by `total_score` ascending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubgraphMatchResult {
    pub subgraph_match: Vec<(NodeId, NodeId)>,
    pub total_score: f64,
    pub individual_scores: Vec<f64>,
}

/// The payload returned by `Query::execute`, per `SPEC_FULL.md` §4.4.
///
/// `target_nodes` is the union of `t_node` across `subgraph_matches` only
/// (not every node of the target graph), and `target_edges` is restricted
/// to edges whose both endpoints lie in that set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payload {
    pub iterations: u32,
    pub subgraph_matches: Vec<SubgraphMatchResult>,
    pub query_nodes: Vec<NodeId>,
    pub query_edges: Option<Vec<(NodeId, NodeId)>>,
    pub target_nodes: Vec<NodeId>,
    pub target_edges: Vec<(NodeId, NodeId)>,
}
