//! Storage collaborators: the narrow interfaces the core consumes
//! (`SPEC_FULL.md` §4.1), plus an in-memory implementation of both.
//!
//! The teacher crate wraps its own backing container (`PatternGraph`) behind
//! a struct-of-closures query interface (`graph_query::GraphQuery`) so that
//! algorithms never assume a representation. The same shape is used here as
//! two plain traits, `GraphStore` and `MatchStore`, so the solver and
//! assembler never assume an in-memory (or SQL, or anything else) backing.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use crate::error::Error;
use crate::ids::{GraphId, NodeId, QueryId};
use crate::model::Match;

#[cfg(not(feature = "thread-safe"))]
pub type SharedStore<T> = std::rc::Rc<T>;
#[cfg(feature = "thread-safe")]
pub type SharedStore<T> = std::sync::Arc<T>;

/// Read access to a graph's nodes and (symmetric) edges.
///
/// Implementations must uphold the invariants of `SPEC_FULL.md` §3: node ids
/// unique within a graph, no self-loops, and every stored `(a, b)` edge
/// mirrored by a stored `(b, a)` edge.
pub trait GraphStore {
    /// All node ids belonging to `graph_id`.
    fn nodes_of(&self, graph_id: GraphId) -> Result<BTreeSet<NodeId>, Error>;

    /// All edges of `graph_id`, in both stored orientations.
    fn edges_of(&self, graph_id: GraphId) -> Result<BTreeSet<(NodeId, NodeId)>, Error>;

    /// The neighbors of `node_id` within `graph_id`.
    fn neighbors(&self, graph_id: GraphId, node_id: NodeId) -> Result<BTreeSet<NodeId>, Error>;

    /// Canonical (deduplicated, `start < end`) edge iteration.
    fn canonical_edges_of(&self, graph_id: GraphId) -> Result<BTreeSet<(NodeId, NodeId)>, Error> {
        Ok(self
            .edges_of(graph_id)?
            .into_iter()
            .filter(|&(start, end)| start < end)
            .collect())
    }
}

/// Read access to a query's candidate matches and the graph pair it
/// references.
pub trait MatchStore {
    /// All candidate matches tagged with `query_id`.
    fn matches_of(&self, query_id: QueryId) -> Result<Vec<Match>, Error>;

    /// The `(query_graph_id, target_graph_id)` pair `query_id` references.
    fn graphs_of(&self, query_id: QueryId) -> Result<(GraphId, GraphId), Error>;
}

#[derive(Debug, Default, Clone)]
struct GraphRecord {
    nodes: BTreeSet<NodeId>,
    /// Both orientations materialized, per `SPEC_FULL.md` §3.
    edges: BTreeSet<(NodeId, NodeId)>,
}

/// In-memory [`GraphStore`]. Cheap to clone behind [`SharedStore`]; all
/// mutation goes through a single `RwLock` so a `create`/`delete` call is
/// atomic with respect to readers.
#[derive(Default)]
pub struct InMemoryGraphStore {
    graphs: RwLock<BTreeMap<GraphId, GraphRecord>>,
}

impl InMemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<GraphId, GraphRecord>> {
        self.graphs
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn require(&self, graph_id: GraphId) -> Result<GraphRecord, Error> {
        self.read()
            .get(&graph_id)
            .cloned()
            .ok_or(Error::UnknownGraph(graph_id))
    }

    pub fn exists(&self, graph_id: GraphId) -> bool {
        self.read().contains_key(&graph_id)
    }

    pub fn len_of(&self, graph_id: GraphId) -> Result<usize, Error> {
        Ok(self.require(graph_id)?.nodes.len())
    }

    /// Assigns `max(existing graph_id) + 1` (or `0`), validates that every
    /// edge endpoint is among `nodes`, and commits nodes and edges together.
    ///
    /// This realizes the two-phase-commit design note (`SPEC_FULL.md` §5)
    /// more strongly than literally: the candidate [`GraphRecord`] is built
    /// and fully validated locally first, so a phase-two failure (a dangling
    /// edge endpoint) never makes the phase-one nodes observable at all —
    /// there is nothing to roll back.
    pub fn create_graph(
        &self,
        nodes: Vec<NodeId>,
        edges: Vec<(NodeId, NodeId)>,
    ) -> Result<GraphId, Error> {
        let node_set: BTreeSet<NodeId> = nodes.into_iter().collect();
        let mut edge_set = BTreeSet::new();
        for (start, end) in edges {
            if !node_set.contains(&start) || !node_set.contains(&end) {
                return Err(Error::BadEdge {
                    start: start.to_string(),
                    end: end.to_string(),
                    reason: "edge endpoint is not among the graph's nodes".to_string(),
                });
            }
            edge_set.insert((start, end));
            edge_set.insert((end, start));
        }

        let mut guard = self
            .graphs
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let graph_id = guard.keys().next_back().map_or(0, |max| max + 1);
        guard.insert(
            graph_id,
            GraphRecord {
                nodes: node_set,
                edges: edge_set,
            },
        );
        Ok(graph_id)
    }

    /// Removes edges, then nodes, for `graph_id` (`SPEC_FULL.md` §6).
    pub fn delete_graph(&self, graph_id: GraphId) -> Result<(), Error> {
        let mut guard = self
            .graphs
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if guard.remove(&graph_id).is_none() {
            return Err(Error::UnknownGraph(graph_id));
        }
        Ok(())
    }
}

impl GraphStore for InMemoryGraphStore {
    fn nodes_of(&self, graph_id: GraphId) -> Result<BTreeSet<NodeId>, Error> {
        Ok(self.require(graph_id)?.nodes)
    }

    fn edges_of(&self, graph_id: GraphId) -> Result<BTreeSet<(NodeId, NodeId)>, Error> {
        Ok(self.require(graph_id)?.edges)
    }

    fn neighbors(&self, graph_id: GraphId, node_id: NodeId) -> Result<BTreeSet<NodeId>, Error> {
        let record = self.require(graph_id)?;
        Ok(record
            .edges
            .iter()
            .filter(|&&(start, _)| start == node_id)
            .map(|&(_, end)| end)
            .collect())
    }
}

#[derive(Debug, Clone)]
struct QueryRecord {
    query_graph_id: GraphId,
    target_graph_id: GraphId,
    matches: Vec<Match>,
}

/// In-memory [`MatchStore`].
#[derive(Default)]
pub struct InMemoryMatchStore {
    queries: RwLock<BTreeMap<QueryId, QueryRecord>>,
}

impl InMemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<QueryId, QueryRecord>> {
        self.queries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn exists(&self, query_id: QueryId) -> bool {
        self.read().contains_key(&query_id)
    }

    /// Assigns `max(existing query_id) + 1` (or `0`) and commits the query
    /// row and its match rows together. Callers are expected to have already
    /// validated match endpoints against the referenced graphs (this
    /// requires a [`GraphStore`], which this store does not itself hold).
    pub fn create_query(
        &self,
        query_graph_id: GraphId,
        target_graph_id: GraphId,
        matches: Vec<Match>,
    ) -> Result<QueryId, Error> {
        let mut guard = self
            .queries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let query_id = guard.keys().next_back().map_or(0, |max| max + 1);
        guard.insert(
            query_id,
            QueryRecord {
                query_graph_id,
                target_graph_id,
                matches,
            },
        );
        Ok(query_id)
    }

    /// Removes the match rows (and the query row itself) for `query_id`.
    pub fn delete_query(&self, query_id: QueryId) -> Result<(), Error> {
        let mut guard = self
            .queries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if guard.remove(&query_id).is_none() {
            return Err(Error::UnknownQuery(query_id));
        }
        Ok(())
    }
}

impl MatchStore for InMemoryMatchStore {
    fn matches_of(&self, query_id: QueryId) -> Result<Vec<Match>, Error> {
        self.read()
            .get(&query_id)
            .map(|record| record.matches.clone())
            .ok_or(Error::UnknownQuery(query_id))
    }

    fn graphs_of(&self, query_id: QueryId) -> Result<(GraphId, GraphId), Error> {
        self.read()
            .get(&query_id)
            .map(|record| (record.query_graph_id, record.target_graph_id))
            .ok_or(Error::UnknownQuery(query_id))
    }
}

/// Bundles the two collaborators [`Graph`](crate::graph::Graph) and
/// [`Query`](crate::query::Query) need. Constructed once by the caller and
/// shared (via [`SharedStore`]) across every handle created from it.
#[derive(Default)]
pub struct Database {
    pub graphs: InMemoryGraphStore,
    pub matches: InMemoryMatchStore,
}

impl Database {
    /// Creates an empty database and wraps it for sharing across handles.
    pub fn new() -> SharedStore<Database> {
        SharedStore::new(Database::default())
    }
}
