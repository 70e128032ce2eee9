//! Runs the canonical query/target/match scenario end to end and prints the
//! resulting subgraph matches.
//!
//! `cargo run --example canonical_scenario`

use graphmatch_core::{Database, ExecuteOptions, Graph, Query, SolverConfig};

fn main() -> Result<(), graphmatch_core::Error> {
    let db = Database::new();

    // Query: a 3-node path 0 - 1 - 2.
    let query = Graph::create(db.clone(), vec![0, 1, 2], vec![(0, 1), (1, 2)])?;

    // Target: a 6-node graph containing two overlapping occurrences of the
    // query's path shape.
    let target = Graph::create(
        db.clone(),
        vec![10, 11, 12, 13, 14, 15],
        vec![(10, 11), (11, 12), (12, 13), (13, 14), (14, 15)],
    )?;

    let matches = vec![
        (0, 10, 0.9),
        (1, 11, 0.95),
        (2, 12, 0.8),
        (0, 12, 0.6),
        (1, 13, 0.85),
        (2, 14, 0.7),
    ];
    let query = Query::create(db, query.id(), target.id(), matches)?;

    let payload = query.execute(
        ExecuteOptions {
            hopping_distance: 2,
            max_iters: 10,
            n: 5,
            edges: true,
        },
        SolverConfig::default(),
        || false,
    )?;

    println!("converged after {} iteration(s)", payload.iterations);
    for (rank, result) in payload.subgraph_matches.iter().enumerate() {
        println!(
            "#{rank}: score={:.4} matches={:?}",
            result.total_score, result.subgraph_match
        );
    }
    println!(
        "query: {} nodes, target: {} nodes, {} target edges near the matches",
        payload.query_nodes.len(),
        payload.target_nodes.len(),
        payload.target_edges.len()
    );

    println!("{}", serde_json::to_string_pretty(&payload).unwrap());

    Ok(())
}
