//! The [`Query`] handle: a candidate-match set between two stored graphs,
//! and the `execute` entry point that drives the whole pipeline
//! (`SPEC_FULL.md` §4, §6).

use std::sync::atomic::{AtomicBool, Ordering};

use crate::assembler::build_join_table;
use crate::error::Error;
use crate::ids::{GraphId, QueryId};
use crate::model::{ExecuteOptions, Payload, SolverConfig};
use crate::ranker;
use crate::solver::solve;
use crate::store::{Database, GraphStore, MatchStore, SharedStore};
use crate::validate;

/// A handle to a query stored in a [`Database`].
///
/// Like [`crate::graph::Graph`], a handle is permanently invalid once
/// [`Query::delete`] has run on it, even though the underlying query id
/// could in principle be reassigned to a later `create` call.
pub struct Query {
    db: SharedStore<Database>,
    id: QueryId,
    query_graph_id: GraphId,
    target_graph_id: GraphId,
    deleted: AtomicBool,
}

impl Query {
    /// Validates the raw matches and that every endpoint lies within its
    /// graph's node set, then stores the query.
    pub fn create(
        db: SharedStore<Database>,
        query_graph_id: GraphId,
        target_graph_id: GraphId,
        matches: impl IntoIterator<Item = (i64, i64, f64)>,
    ) -> Result<Self, Error> {
        let matches = validate::check_matches(matches)?;

        let query_nodes = db.graphs.nodes_of(query_graph_id)?;
        let target_nodes = db.graphs.nodes_of(target_graph_id)?;
        for m in &matches {
            if !query_nodes.contains(&m.q_node) {
                return Err(Error::BadMatch {
                    q_node: m.q_node.to_string(),
                    t_node: m.t_node.to_string(),
                    weight: m.weight.to_string(),
                    reason: "q_node is not a node of the query graph".to_string(),
                });
            }
            if !target_nodes.contains(&m.t_node) {
                return Err(Error::BadMatch {
                    q_node: m.q_node.to_string(),
                    t_node: m.t_node.to_string(),
                    weight: m.weight.to_string(),
                    reason: "t_node is not a node of the target graph".to_string(),
                });
            }
        }

        let id = db
            .matches
            .create_query(query_graph_id, target_graph_id, matches)?;
        Ok(Query {
            db,
            id,
            query_graph_id,
            target_graph_id,
            deleted: AtomicBool::new(false),
        })
    }

    pub fn id(&self) -> QueryId {
        self.id
    }

    fn check_live(&self) -> Result<(), Error> {
        if self.deleted.load(Ordering::Acquire) {
            return Err(Error::UnknownQuery(self.id));
        }
        Ok(())
    }

    pub fn delete(&self) -> Result<(), Error> {
        self.check_live()?;
        self.db.matches.delete_query(self.id)?;
        self.deleted.store(true, Ordering::Release);
        Ok(())
    }

    /// Runs the Neighborhood Assembler, the Solver, and the Ranker in
    /// sequence, and assembles the resulting [`Payload`].
    ///
    /// `should_cancel` is threaded through to the solver; see
    /// [`crate::solver::solve`].
    pub fn execute(
        &self,
        options: ExecuteOptions,
        solver_config: SolverConfig,
        should_cancel: impl FnMut() -> bool,
    ) -> Result<Payload, Error> {
        self.check_live()?;
        let table = build_join_table(
            &self.db.graphs,
            &self.db.matches,
            self.id,
            options.hopping_distance,
        )?;
        let matches = self.db.matches.matches_of(self.id)?;

        let out = solve(
            &self.db.graphs,
            self.query_graph_id,
            self.target_graph_id,
            &matches,
            &table.rows,
            options.hopping_distance,
            solver_config,
            options.max_iters,
            should_cancel,
        )?;

        let query_nodes = self.db.graphs.nodes_of(self.query_graph_id)?;
        let subgraph_matches = ranker::rank(out.subgraphs, &out.costs, query_nodes.len(), options.n);

        let query_edges = if options.edges {
            Some(
                self.db
                    .graphs
                    .canonical_edges_of(self.query_graph_id)?
                    .into_iter()
                    .collect(),
            )
        } else {
            None
        };

        // Per spec.md §4.4 / `fornax.api.Query.execute`: `target_nodes` is the
        // union of `t_node` across the *returned* subgraphs, not every node of
        // the target graph, and `target_edges` is that same set's induced
        // edges rather than every edge the assembler touched pre-solve.
        let target_node_set: std::collections::BTreeSet<_> = subgraph_matches
            .iter()
            .flat_map(|r| r.subgraph_match.iter().map(|&(_, t_node)| t_node))
            .collect();
        let target_edges = table
            .target_edges_near
            .into_iter()
            .filter(|(start, end)| target_node_set.contains(start) && target_node_set.contains(end))
            .collect();

        Ok(Payload {
            iterations: out.iterations,
            subgraph_matches,
            query_nodes: query_nodes.into_iter().collect(),
            query_edges,
            target_nodes: target_node_set.into_iter().collect(),
            target_edges,
        })
    }
}
