//! Snapshot tests for `execute`'s payload shape.
//!
//! These capture the rendered payload of a small, deterministic query so
//! regressions in formatting or field ordering show up as a snapshot diff.

use graphmatch_core::{Database, ExecuteOptions, Graph, Query, SolverConfig};
use insta::assert_snapshot;

#[test]
fn perfect_match_payload_snapshot() {
    let db = Database::new();
    let q = Graph::create(db.clone(), vec![0, 1, 2], vec![(0, 1), (1, 2)]).unwrap();
    let t = Graph::create(
        db.clone(),
        vec![10, 11, 12],
        vec![(10, 11), (11, 12)],
    )
    .unwrap();
    let query = Query::create(
        db,
        q.id(),
        t.id(),
        vec![(0, 10, 1.0), (1, 11, 1.0), (2, 12, 1.0)],
    )
    .unwrap();

    let options = ExecuteOptions {
        edges: true,
        ..ExecuteOptions::default()
    };
    let payload = query
        .execute(options, SolverConfig::default(), || false)
        .unwrap();

    assert_snapshot!("perfect_match_query_nodes", format!("{:?}", payload.query_nodes));
    assert_snapshot!("perfect_match_query_edges", format!("{:?}", payload.query_edges));
    assert_snapshot!(
        "perfect_match_best_subgraph",
        format!("{:?}", payload.subgraph_matches[0].subgraph_match)
    );
}
