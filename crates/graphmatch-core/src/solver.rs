//! Solver (`SPEC_FULL.md` §4.3): synchronous fixed-point iteration over
//! inference costs, followed by greedy subgraph extraction.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::Error;
use crate::ids::{GraphId, NodeId};
use crate::model::{JoinRow, Match, SolverConfig};
use crate::store::GraphStore;

/// `(q_node, t_node) -> inference cost`.
pub type CostMap = HashMap<(NodeId, NodeId), f64>;

pub struct SolverOutput {
    pub costs: CostMap,
    pub iterations: u32,
    /// Candidate subgraphs, deduplicated, each a `q_node`-ascending list of
    /// `(q_node, t_node)` pairs.
    pub subgraphs: Vec<Vec<(NodeId, NodeId)>>,
}

/// Distance penalty: 0 at the pivot itself, 1 at the `dv + du = 2h`
/// boundary, linear in between. Any schedule with the same monotonicity and
/// endpoints satisfies the contract (`SPEC_FULL.md` §4.3); this is the
/// reference choice.
fn beta(dv: u32, du: u32, h: u32) -> f64 {
    if h == 0 {
        return 0.0;
    }
    (dv + du) as f64 / (2.0 * h as f64)
}

/// Runs the synchronous relaxation to a fixed point (or `max_iters`,
/// whichever comes first), then extracts candidate subgraphs.
///
/// `should_cancel` is polled between iterations; if it ever returns `true`
/// the call returns [`Error::Cancelled`] without completing.
pub fn solve(
    graph_store: &dyn GraphStore,
    query_graph_id: GraphId,
    target_graph_id: GraphId,
    matches: &[Match],
    rows: &[JoinRow],
    h: u32,
    config: SolverConfig,
    max_iters: u32,
    mut should_cancel: impl FnMut() -> bool,
) -> Result<SolverOutput, Error> {
    let mut rows_by_pivot: HashMap<(NodeId, NodeId), Vec<&JoinRow>> = HashMap::new();
    for row in rows {
        rows_by_pivot.entry((row.v, row.u)).or_default().push(row);
    }

    let mut costs: CostMap = matches
        .iter()
        .map(|m| ((m.q_node, m.t_node), 1.0 - m.weight))
        .collect();

    let mut iterations = 0u32;
    let mut converged = false;

    for iter in 1..=max_iters {
        if should_cancel() {
            return Err(Error::Cancelled);
        }

        let mut next = CostMap::with_capacity(costs.len());
        for m in matches {
            let pivot = (m.q_node, m.t_node);
            let seed = 1.0 - m.weight;

            let mut by_vv: BTreeMap<NodeId, Vec<&JoinRow>> = BTreeMap::new();
            if let Some(group) = rows_by_pivot.get(&pivot) {
                for row in group {
                    by_vv.entry(row.vv).or_default().push(row);
                }
            }

            let mut others = Vec::with_capacity(by_vv.len());
            for (&vv, vv_rows) in &by_vv {
                if vv == m.q_node {
                    continue;
                }
                let g = vv_rows
                    .iter()
                    .map(|r| {
                        let c_vv_uu = *costs.get(&(r.vv, r.uu)).unwrap_or(&1.0);
                        config.alpha * c_vv_uu + beta(r.dv, r.du, h)
                    })
                    .fold(f64::INFINITY, f64::min);
                others.push(g);
            }

            let mean_other = if others.is_empty() {
                0.0
            } else {
                others.iter().sum::<f64>() / others.len() as f64
            };

            let c_new = (seed + mean_other).clamp(0.0, 1.0);
            next.insert(pivot, c_new);
        }

        let max_delta = matches
            .iter()
            .map(|m| {
                let pivot = (m.q_node, m.t_node);
                (next[&pivot] - costs[&pivot]).abs()
            })
            .fold(0.0_f64, f64::max);

        costs = next;
        iterations = iter;

        tracing::debug!(iteration = iter, max_delta, "solver iteration");

        if max_delta < config.epsilon {
            converged = true;
            break;
        }
    }

    if !converged {
        tracing::warn!(
            max_iters,
            "solver did not converge within max_iters; returning best-effort costs"
        );
    }

    let subgraphs = extract_subgraphs(
        graph_store,
        query_graph_id,
        target_graph_id,
        matches,
        &costs,
        h,
    )?;

    Ok(SolverOutput {
        costs,
        iterations,
        subgraphs,
    })
}

/// Greedy subgraph extraction, implemented to the behavioral contract of
/// `SPEC_FULL.md` §4.3 step 2: starting from every match in turn as a pivot,
/// walk the query graph in BFS order, and for each newly visited query node
/// pick the lowest-cost legal target node (not already used in this
/// subgraph, and within `h` hops of some already-chosen target node). A
/// query node with no legal extension is simply left unmatched rather than
/// aborting the whole subgraph, matching the "best partial subgraphs"
/// failure semantics of `SPEC_FULL.md` §4.3.
fn extract_subgraphs(
    graph_store: &dyn GraphStore,
    query_graph_id: GraphId,
    target_graph_id: GraphId,
    matches: &[Match],
    costs: &CostMap,
    h: u32,
) -> Result<Vec<Vec<(NodeId, NodeId)>>, Error> {
    let mut candidates_by_q: HashMap<NodeId, Vec<(NodeId, f64)>> = HashMap::new();
    for m in matches {
        candidates_by_q
            .entry(m.q_node)
            .or_default()
            .push((m.t_node, costs[&(m.q_node, m.t_node)]));
    }
    for candidates in candidates_by_q.values_mut() {
        candidates.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
    }

    let mut seen_sets: BTreeSet<Vec<(NodeId, NodeId)>> = BTreeSet::new();
    let mut subgraphs = Vec::new();

    for pivot in matches {
        let order = bfs_order(graph_store, query_graph_id, pivot.q_node)?;
        let mut assigned: BTreeMap<NodeId, NodeId> = BTreeMap::new();
        assigned.insert(pivot.q_node, pivot.t_node);

        for vv in order {
            if vv == pivot.q_node {
                continue;
            }
            let used: BTreeSet<NodeId> = assigned.values().copied().collect();
            let chosen = candidates_by_q.get(&vv).and_then(|candidates| {
                candidates.iter().find(|&&(uu, _)| {
                    !used.contains(&uu)
                        && within_h_hops(graph_store, target_graph_id, &used, uu, h)
                            .unwrap_or(false)
                })
            });
            if let Some(&(uu, _)) = chosen {
                assigned.insert(vv, uu);
            }
        }

        let ordered: Vec<(NodeId, NodeId)> = assigned.into_iter().collect();
        if seen_sets.insert(ordered.clone()) {
            subgraphs.push(ordered);
        }
    }

    Ok(subgraphs)
}

/// BFS visit order over the query graph from `start` (unbounded depth — the
/// whole query graph is meant to be covered).
fn bfs_order(store: &dyn GraphStore, graph_id: GraphId, start: NodeId) -> Result<Vec<NodeId>, Error> {
    use std::collections::{HashSet, VecDeque};

    let mut visited = HashSet::new();
    let mut order = Vec::new();
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        order.push(current);
        for neighbor in store.neighbors(graph_id, current)? {
            if visited.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }
    Ok(order)
}

/// Whether `candidate` lies within `h` hops of any node in `anchors`.
fn within_h_hops(
    store: &dyn GraphStore,
    graph_id: GraphId,
    anchors: &BTreeSet<NodeId>,
    candidate: NodeId,
    h: u32,
) -> Result<bool, Error> {
    use std::collections::{HashSet, VecDeque};

    for &anchor in anchors {
        if anchor == candidate {
            return Ok(true);
        }
        let mut visited = HashSet::new();
        visited.insert(anchor);
        let mut queue = VecDeque::new();
        queue.push_back((anchor, 0u32));
        while let Some((node, dist)) = queue.pop_front() {
            if node == candidate {
                return Ok(true);
            }
            if dist >= h {
                continue;
            }
            for neighbor in store.neighbors(graph_id, node)? {
                if visited.insert(neighbor) {
                    queue.push_back((neighbor, dist + 1));
                }
            }
        }
    }
    Ok(false)
}
