//! Identifier type aliases shared across the crate.

/// Identifies a stored graph (query graph or target graph).
pub type GraphId = u64;

/// Identifies a node within a single graph. Node ids are only unique within
/// the graph that owns them, never globally.
pub type NodeId = u64;

/// Identifies a query: a `(query_graph_id, target_graph_id)` pair plus its
/// candidate matches.
pub type QueryId = u64;
