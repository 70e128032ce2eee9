//! An approximate fuzzy subgraph-matching engine.
//!
//! Given a small query graph, a larger target graph, and a set of weighted
//! candidate node matches between them, this crate relaxes those weights to
//! a fixed point of structural agreement and extracts the best-scoring
//! subgraphs of the target that resemble the query.
//!
//! The pipeline, end to end:
//!
//! 1. [`Graph::create`] stores the query and target graphs.
//! 2. [`Query::create`] stores a candidate match set between them.
//! 3. [`Query::execute`] runs the [`assembler`], the [`solver`], and the
//!    [`ranker`] in sequence and returns a [`model::Payload`].
//!
//! ```
//! use graphmatch_core::{Database, Graph, Query, ExecuteOptions, SolverConfig};
//!
//! let db = Database::new();
//! let query = Graph::create(db.clone(), vec![0, 1], vec![(0, 1)]).unwrap();
//! let target = Graph::create(db.clone(), vec![10, 11, 12], vec![(10, 11), (11, 12)]).unwrap();
//! let q = Query::create(db, query.id(), target.id(), vec![(0, 10, 1.0), (1, 11, 1.0)]).unwrap();
//! let payload = q.execute(ExecuteOptions::default(), SolverConfig::default(), || false).unwrap();
//! assert!(!payload.subgraph_matches.is_empty());
//! ```

pub mod assembler;
pub mod error;
pub mod graph;
pub mod ids;
pub mod model;
pub mod query;
pub mod ranker;
pub mod solver;
pub mod store;
pub mod validate;

pub use error::{Error, Result};
pub use graph::Graph;
pub use ids::{GraphId, NodeId, QueryId};
pub use model::{ExecuteOptions, Match, Payload, SolverConfig, SubgraphMatchResult};
pub use query::Query;
pub use store::{Database, GraphStore, MatchStore, SharedStore};
