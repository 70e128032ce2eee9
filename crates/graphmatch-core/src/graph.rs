//! The [`Graph`] handle: a thin, cheaply-cloned reference to one stored
//! graph (`SPEC_FULL.md` §6).

use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::Error;
use crate::ids::{GraphId, NodeId};
use crate::store::{Database, SharedStore};
use crate::validate;

/// A handle to a graph stored in a [`Database`].
///
/// Once [`Graph::delete`] has run, the handle is permanently invalid: every
/// other method then returns [`Error::UnknownGraph`], even though the
/// underlying storage has already forgotten the id and a fresh `create`
/// could in principle reuse it. This mirrors `examples/original_source/fornax`'s
/// behavior, where a deleted handle never becomes live again by accident.
pub struct Graph {
    db: SharedStore<Database>,
    id: GraphId,
    deleted: AtomicBool,
}

impl Graph {
    /// Validates `nodes` and `edges`, then stores a new graph.
    pub fn create(
        db: SharedStore<Database>,
        nodes: impl IntoIterator<Item = i64>,
        edges: impl IntoIterator<Item = (i64, i64)>,
    ) -> Result<Self, Error> {
        let nodes = validate::check_nodes(nodes)?;
        let edges = validate::check_edges(edges)?;
        let id = db.graphs.create_graph(nodes, edges)?;
        Ok(Graph {
            db,
            id,
            deleted: AtomicBool::new(false),
        })
    }

    /// Opens a handle to an existing graph id, failing if it does not exist.
    pub fn read(db: SharedStore<Database>, graph_id: GraphId) -> Result<Self, Error> {
        if !db.graphs.exists(graph_id) {
            return Err(Error::UnknownGraph(graph_id));
        }
        Ok(Graph {
            db,
            id: graph_id,
            deleted: AtomicBool::new(false),
        })
    }

    pub fn id(&self) -> GraphId {
        self.id
    }

    fn check_live(&self) -> Result<(), Error> {
        if self.deleted.load(Ordering::Acquire) {
            return Err(Error::UnknownGraph(self.id));
        }
        Ok(())
    }

    pub fn nodes(&self) -> Result<Vec<NodeId>, Error> {
        self.check_live()?;
        Ok(self.db.graphs.nodes_of(self.id)?.into_iter().collect())
    }

    /// Canonical (`start < end`, deduplicated) edges.
    pub fn edges(&self) -> Result<Vec<(NodeId, NodeId)>, Error> {
        self.check_live()?;
        Ok(self
            .db
            .graphs
            .canonical_edges_of(self.id)?
            .into_iter()
            .collect())
    }

    pub fn len(&self) -> Result<usize, Error> {
        self.check_live()?;
        self.db.graphs.len_of(self.id)
    }

    pub fn is_empty(&self) -> Result<bool, Error> {
        Ok(self.len()? == 0)
    }

    /// Removes the graph from storage and permanently invalidates this
    /// handle.
    pub fn delete(&self) -> Result<(), Error> {
        self.check_live()?;
        self.db.graphs.delete_graph(self.id)?;
        self.deleted.store(true, Ordering::Release);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Database;

    #[test]
    fn create_then_read_roundtrips() {
        let db = Database::new();
        let g = Graph::create(db.clone(), vec![0, 1, 2], vec![(0, 1), (1, 2)]).unwrap();
        let id = g.id();
        let reopened = Graph::read(db, id).unwrap();
        assert_eq!(reopened.len().unwrap(), 3);
        assert_eq!(reopened.edges().unwrap(), vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn read_unknown_graph_fails() {
        let db = Database::new();
        let err = Graph::read(db, 999).unwrap_err();
        assert!(matches!(err, Error::UnknownGraph(999)));
    }

    #[test]
    fn self_loop_is_rejected() {
        let db = Database::new();
        let err = Graph::create(db, vec![0, 1], vec![(0, 0)]).unwrap_err();
        assert!(matches!(err, Error::BadEdge { .. }));
    }

    #[test]
    fn handle_is_permanently_invalid_after_delete() {
        let db = Database::new();
        let g = Graph::create(db, vec![0, 1], vec![(0, 1)]).unwrap();
        g.delete().unwrap();
        assert!(matches!(g.len().unwrap_err(), Error::UnknownGraph(_)));
        assert!(matches!(g.delete().unwrap_err(), Error::UnknownGraph(_)));
    }
}
