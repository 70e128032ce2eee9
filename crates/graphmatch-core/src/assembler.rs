//! Neighborhood Assembler (`SPEC_FULL.md` §4.2): builds the join table that
//! is the solver's sole evidence.
//!
//! BFS here follows the same shape as the teacher's
//! `graph::algorithms::bfs` — a `VecDeque`-driven frontier over neighbors
//! produced by the abstract store, never touching a concrete representation
//! directly — bounded to `h` hops and tracking distance instead of visit
//! order.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use crate::error::Error;
use crate::ids::{GraphId, NodeId, QueryId};
use crate::model::JoinRow;
use crate::store::{GraphStore, MatchStore};

/// The join table plus the target edges incident to any `uu` it mentions
/// (kept for the Ranker's `target_edges` closure).
pub struct JoinTable {
    pub rows: Vec<JoinRow>,
    pub target_edges_near: BTreeSet<(NodeId, NodeId)>,
}

/// Single-source BFS bounded to `h` hops. Each node's shortest distance is
/// recorded exactly once, which is what makes the join table's "keep the
/// smallest `dv + du`, ties to smaller `dv`" dedup rule automatic: a
/// bounded BFS from a single source never produces two distances for the
/// same node to begin with.
fn bfs_within(
    store: &dyn GraphStore,
    graph_id: GraphId,
    start: NodeId,
    h: u32,
) -> Result<HashMap<NodeId, u32>, Error> {
    let mut dist = HashMap::new();
    dist.insert(start, 0u32);
    let mut queue = VecDeque::new();
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        let d = dist[&current];
        if d >= h {
            continue;
        }
        for neighbor in store.neighbors(graph_id, current)? {
            if !dist.contains_key(&neighbor) {
                dist.insert(neighbor, d + 1);
                queue.push_back(neighbor);
            }
        }
    }

    Ok(dist)
}

/// Builds the join table for `query_id` at hopping distance `h`.
///
/// Fails with [`Error::UnknownQuery`] if `query_id` has no matches.
pub fn build_join_table(
    graph_store: &dyn GraphStore,
    match_store: &dyn MatchStore,
    query_id: QueryId,
    h: u32,
) -> Result<JoinTable, Error> {
    let matches = match_store.matches_of(query_id)?;
    if matches.is_empty() {
        return Err(Error::UnknownQuery(query_id));
    }
    let (query_graph_id, target_graph_id) = match_store.graphs_of(query_id)?;

    let match_index: HashSet<(NodeId, NodeId)> =
        matches.iter().map(|m| (m.q_node, m.t_node)).collect();

    let mut rows = Vec::new();
    let mut uu_seen: BTreeSet<NodeId> = BTreeSet::new();

    for pivot in &matches {
        let dv_map = bfs_within(graph_store, query_graph_id, pivot.q_node, h)?;
        let du_map = bfs_within(graph_store, target_graph_id, pivot.t_node, h)?;

        for (&vv, &dv) in &dv_map {
            for (&uu, &du) in &du_map {
                if match_index.contains(&(vv, uu)) {
                    rows.push(JoinRow {
                        v: pivot.q_node,
                        u: pivot.t_node,
                        vv,
                        uu,
                        dv,
                        du,
                        weight: pivot.weight,
                    });
                    uu_seen.insert(uu);
                }
            }
        }
    }

    rows.sort_by_key(|r| (r.v, r.u, r.vv, r.uu));

    let mut target_edges_near = BTreeSet::new();
    for &(start, end) in graph_store.edges_of(target_graph_id)?.iter() {
        if start < end && (uu_seen.contains(&start) || uu_seen.contains(&end)) {
            target_edges_near.insert((start, end));
        }
    }

    Ok(JoinTable {
        rows,
        target_edges_near,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Match;
    use crate::store::{InMemoryGraphStore, InMemoryMatchStore};

    fn two_path_graphs() -> (InMemoryGraphStore, GraphId, GraphId) {
        let store = InMemoryGraphStore::new();
        // query: 0 - 1 - 2
        let q = store
            .create_graph(vec![0, 1, 2], vec![(0, 1), (1, 2)])
            .unwrap();
        // target: 10 - 11 - 12 - 13
        let t = store
            .create_graph(vec![10, 11, 12, 13], vec![(10, 11), (11, 12), (12, 13)])
            .unwrap();
        (store, q, t)
    }

    #[test]
    fn unknown_query_fails() {
        let (gstore, _, _) = two_path_graphs();
        let mstore = InMemoryMatchStore::new();
        let err = build_join_table(&gstore, &mstore, 999, 2).unwrap_err();
        assert!(matches!(err, Error::UnknownQuery(999)));
    }

    #[test]
    fn self_row_always_present_for_every_pivot() {
        let (gstore, q, t) = two_path_graphs();
        let mstore = InMemoryMatchStore::new();
        let matches = vec![
            Match {
                q_node: 0,
                t_node: 10,
                weight: 1.0,
            },
            Match {
                q_node: 1,
                t_node: 11,
                weight: 1.0,
            },
            Match {
                q_node: 2,
                t_node: 12,
                weight: 1.0,
            },
        ];
        let query_id = mstore.create_query(q, t, matches).unwrap();
        let table = build_join_table(&gstore, &mstore, query_id, 1).unwrap();
        for pivot in [(0u64, 10u64), (1, 11), (2, 12)] {
            assert!(table
                .rows
                .iter()
                .any(|r| (r.v, r.u) == pivot && r.vv == pivot.0 && r.uu == pivot.1 && r.dv == 0 && r.du == 0));
        }
    }

    #[test]
    fn rows_sorted_by_pivot_then_neighbor() {
        let (gstore, q, t) = two_path_graphs();
        let mstore = InMemoryMatchStore::new();
        let matches = vec![
            Match {
                q_node: 0,
                t_node: 10,
                weight: 1.0,
            },
            Match {
                q_node: 1,
                t_node: 11,
                weight: 1.0,
            },
        ];
        let query_id = mstore.create_query(q, t, matches).unwrap();
        let table = build_join_table(&gstore, &mstore, query_id, 2).unwrap();
        let mut sorted = table.rows.clone();
        sorted.sort_by_key(|r| (r.v, r.u, r.vv, r.uu));
        assert_eq!(
            table.rows.iter().map(|r| (r.v, r.u, r.vv, r.uu)).collect::<Vec<_>>(),
            sorted.iter().map(|r| (r.v, r.u, r.vv, r.uu)).collect::<Vec<_>>()
        );
    }
}
