//! Ranker (`SPEC_FULL.md` §4.4): turns solver costs and extracted
//! subgraphs into scored, sorted [`SubgraphMatchResult`]s.

use crate::ids::NodeId;
use crate::model::SubgraphMatchResult;
use crate::solver::CostMap;

/// The raw per-pair inference cost, `c(v, u)`. Lower is better: `0` is
/// perfect structural agreement, `1` is none.
fn cost_of(costs: &CostMap, pair: (NodeId, NodeId)) -> f64 {
    costs.get(&pair).copied().unwrap_or(1.0)
}

/// Scores every candidate subgraph, sorts by `total_score` ascending (lower
/// is better; ties broken by the subgraph's own pair list, for
/// determinism), and keeps the top `n`.
///
/// `individual_scores` is the raw per-pair cost list (spec.md §4.4).
/// `total_score` is the sum of those costs plus a penalty of one per query
/// node the subgraph left unmatched (`query_node_count - subgraph.len()`),
/// so a smaller, sparser subgraph doesn't automatically outscore a larger
/// one that covers the whole query.
pub fn rank(
    subgraphs: Vec<Vec<(NodeId, NodeId)>>,
    costs: &CostMap,
    query_node_count: usize,
    n: usize,
) -> Vec<SubgraphMatchResult> {
    let mut results: Vec<SubgraphMatchResult> = subgraphs
        .into_iter()
        .map(|subgraph_match| {
            let individual_scores: Vec<f64> = subgraph_match
                .iter()
                .map(|&pair| cost_of(costs, pair))
                .collect();
            let unmatched = query_node_count.saturating_sub(subgraph_match.len());
            let total_score = individual_scores.iter().sum::<f64>() + unmatched as f64;
            SubgraphMatchResult {
                subgraph_match,
                total_score,
                individual_scores,
            }
        })
        .collect();

    results.sort_by(|a, b| {
        a.total_score
            .total_cmp(&b.total_score)
            .then_with(|| a.subgraph_match.cmp(&b.subgraph_match))
    });
    results.truncate(n);
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_scoring_subgraph_ranks_first() {
        let mut costs = CostMap::new();
        costs.insert((0, 10), 0.0);
        costs.insert((1, 11), 0.0);
        costs.insert((2, 20), 0.9);

        let subgraphs = vec![vec![(2, 20)], vec![(0, 10), (1, 11)]];
        let ranked = rank(subgraphs, &costs, 2, 5);
        assert_eq!(ranked[0].subgraph_match, vec![(0, 10), (1, 11)]);
        assert!((ranked[0].total_score - 0.0).abs() < 1e-9);
        assert!((ranked[1].total_score - (0.9 + 1.0)).abs() < 1e-9);
    }

    #[test]
    fn unmatched_query_nodes_add_a_penalty() {
        let mut costs = CostMap::new();
        costs.insert((0, 10), 0.0);
        let subgraphs = vec![vec![(0, 10)]];
        let ranked = rank(subgraphs, &costs, 3, 5);
        assert!((ranked[0].total_score - 2.0).abs() < 1e-9);
    }

    #[test]
    fn n_truncates_results() {
        let mut costs = CostMap::new();
        costs.insert((0, 10), 0.0);
        let subgraphs = vec![vec![(0, 10)], vec![(0, 10)], vec![(0, 10)]];
        let ranked = rank(subgraphs, &costs, 1, 1);
        assert_eq!(ranked.len(), 1);
    }
}
