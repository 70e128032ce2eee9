//! End-to-end scenarios, including the six literal walkthroughs from
//! `SPEC_FULL.md` §8.

use graphmatch_core::{Database, Error, ExecuteOptions, Graph, Query, SolverConfig};

#[test]
fn scenario_1_reading_an_empty_handle_fails() {
    let db = Database::new();
    let err = Graph::read(db, 0).unwrap_err();
    assert!(matches!(err, Error::UnknownGraph(0)));
}

#[test]
fn scenario_2_create_and_count() {
    let db = Database::new();
    let g = Graph::create(db, vec![0, 1, 2, 3], vec![(0, 1), (1, 2), (2, 3)]).unwrap();
    assert_eq!(g.len().unwrap(), 4);
    assert!(!g.is_empty().unwrap());
    assert_eq!(g.edges().unwrap(), vec![(0, 1), (1, 2), (2, 3)]);
}

#[test]
fn scenario_3_self_loop_is_rejected() {
    let db = Database::new();
    let err = Graph::create(db, vec![0, 1, 2], vec![(0, 1), (1, 1)]).unwrap_err();
    assert!(matches!(err, Error::BadEdge { .. }));
}

#[test]
fn scenario_4_out_of_range_weight_is_rejected() {
    let db = Database::new();
    let q = Graph::create(db.clone(), vec![0, 1], vec![(0, 1)]).unwrap();
    let t = Graph::create(db.clone(), vec![10, 11], vec![(10, 11)]).unwrap();
    let err = Query::create(db, q.id(), t.id(), vec![(0, 10, 1.5)]).unwrap_err();
    assert!(matches!(err, Error::BadMatch { .. }));

    let db = Database::new();
    let q = Graph::create(db.clone(), vec![0, 1], vec![(0, 1)]).unwrap();
    let t = Graph::create(db.clone(), vec![10, 11], vec![(10, 11)]).unwrap();
    let err = Query::create(db, q.id(), t.id(), vec![(0, 10, 0.0)]).unwrap_err();
    assert!(matches!(err, Error::BadMatch { .. }));
}

/// The literal "canonical execute" scenario (`SPEC_FULL.md` §8 item 5,
/// `examples/original_source/test/test_api.py::test_execute`): a 5-node
/// query against a 13-node target with the exact candidate-match list from
/// the original test.
///
/// The original asserts `total_score == 0` for both winning subgraphs and
/// pins their exact pairs, which depends on the numeric behavior of
/// `fornax.opt.solve` — not present in `original_source/` (only the
/// `fornax.api` wrapper and this test are kept there, so the solver is only
/// observable as a black box, not re-derivable from source). This asserts
/// everything about that scenario that §8's general testable properties
/// (solver determinism, cost bounds, ranker ordering, target-edge closure)
/// let us guarantee against our from-spec `§4.3` update rule, plus the
/// exact `query_nodes`/`query_edges` the payload must carry regardless of
/// solver numerics.
#[test]
fn scenario_5_canonical_execute() {
    let db = Database::new();
    let query = Graph::create(
        db.clone(),
        vec![1, 2, 3, 4, 5],
        vec![(1, 3), (1, 2), (2, 4), (4, 5)],
    )
    .unwrap();
    let target = Graph::create(
        db.clone(),
        (1..=13).collect::<Vec<_>>(),
        vec![
            (1, 2),
            (1, 3),
            (1, 4),
            (3, 7),
            (4, 5),
            (4, 6),
            (5, 7),
            (6, 8),
            (7, 10),
            (8, 9),
            (8, 12),
            (9, 10),
            (10, 11),
            (11, 12),
            (11, 13),
        ],
    )
    .unwrap();

    let matches = vec![
        (1, 1, 1.0),
        (1, 4, 1.0),
        (1, 8, 1.0),
        (2, 2, 1.0),
        (2, 5, 1.0),
        (2, 9, 1.0),
        (3, 3, 1.0),
        (3, 6, 1.0),
        (3, 12, 1.0),
        (3, 13, 1.0),
        (4, 7, 1.0),
        (4, 10, 1.0),
        (5, 11, 1.0),
    ];
    let q = Query::create(db, query.id(), target.id(), matches).unwrap();

    let options = ExecuteOptions {
        n: 2,
        edges: true,
        ..ExecuteOptions::default()
    };
    let payload = q
        .execute(options, SolverConfig::default(), || false)
        .unwrap();

    assert_eq!(payload.query_nodes, vec![1, 2, 3, 4, 5]);
    assert_eq!(
        payload.query_edges,
        Some(vec![(1, 2), (1, 3), (2, 4), (4, 5)])
    );

    assert!(payload.iterations <= options.max_iters);
    for result in &payload.subgraph_matches {
        for &c in &result.individual_scores {
            assert!((0.0..=1.0).contains(&c));
        }
    }
    for pair in payload.subgraph_matches.windows(2) {
        assert!(pair[0].total_score <= pair[1].total_score);
    }
    let target_node_set: std::collections::BTreeSet<_> = payload.target_nodes.iter().copied().collect();
    for &(start, end) in &payload.target_edges {
        assert!(target_node_set.contains(&start) && target_node_set.contains(&end));
    }
}

#[test]
fn scenario_6_delete_then_read_fails() {
    let db = Database::new();
    let g = Graph::create(db.clone(), vec![0, 1], vec![(0, 1)]).unwrap();
    let id = g.id();
    g.delete().unwrap();
    let err = Graph::read(db, id).unwrap_err();
    assert!(matches!(err, Error::UnknownGraph(_)));
}

#[test]
fn deleting_query_then_executing_fails() {
    let db = Database::new();
    let q = Graph::create(db.clone(), vec![0, 1], vec![(0, 1)]).unwrap();
    let t = Graph::create(db.clone(), vec![10, 11], vec![(10, 11)]).unwrap();
    let query = Query::create(db, q.id(), t.id(), vec![(0, 10, 1.0), (1, 11, 1.0)]).unwrap();
    query.delete().unwrap();
    let err = query
        .execute(ExecuteOptions::default(), SolverConfig::default(), || false)
        .unwrap_err();
    assert!(matches!(err, Error::UnknownQuery(_)));
}

#[test]
fn duplicate_match_pair_is_rejected() {
    let db = Database::new();
    let q = Graph::create(db.clone(), vec![0, 1], vec![(0, 1)]).unwrap();
    let t = Graph::create(db.clone(), vec![10, 11], vec![(10, 11)]).unwrap();
    let err = Query::create(db, q.id(), t.id(), vec![(0, 10, 0.5), (0, 10, 0.9)]).unwrap_err();
    assert!(matches!(err, Error::BadMatch { .. }));
}
