//! Leaf ordering for clustered heatmaps
//!
//! Rows and columns are ordered by agglomerative hierarchical clustering with
//! average linkage over Euclidean distances. The leaf order of the resulting
//! dendrogram is the axis order of the clustered heatmap.

use crate::aggregator::AggregationResult;
use serde::Serialize;
use tracing::debug;

/// Axis permutations for a clustered view of an [`AggregationResult`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterOrder {
    pub rows: Vec<usize>,
    pub columns: Vec<usize>,
}

impl ClusterOrder {
    /// Cluster the rows and the columns of `result` independently
    pub fn for_result(result: &AggregationResult) -> Self {
        let order = Self {
            rows: leaf_order(&result.row_vectors()),
            columns: leaf_order(&result.column_vectors()),
        };
        debug!(rows = ?order.rows, columns = ?order.columns, "Computed cluster leaf order");
        order
    }

    /// `result` with both axes permuted into leaf order
    pub fn apply(&self, result: &AggregationResult) -> AggregationResult {
        result.reordered(&self.rows, &self.columns)
    }
}

pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

struct Cluster {
    id: usize,
    members: Vec<usize>,
    /// Leaves left to right
    leaves: Vec<usize>,
}

/// Dendrogram leaf order of `vectors` under average linkage.
///
/// At each step the two clusters with the smallest mean pairwise distance
/// merge; ties go to the pair created first. The older cluster's leaves are
/// placed on the left.
pub fn leaf_order(vectors: &[Vec<f64>]) -> Vec<usize> {
    let n = vectors.len();
    if n < 3 {
        return (0..n).collect();
    }

    let mut distances = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = euclidean(&vectors[i], &vectors[j]);
            distances[i][j] = d;
            distances[j][i] = d;
        }
    }

    let mut clusters: Vec<Cluster> = (0..n)
        .map(|i| Cluster {
            id: i,
            members: vec![i],
            leaves: vec![i],
        })
        .collect();
    let mut next_id = n;

    while clusters.len() > 1 {
        let mut best: Option<(f64, usize, usize)> = None;
        for a in 0..clusters.len() {
            for b in (a + 1)..clusters.len() {
                let d = average_linkage(&distances, &clusters[a].members, &clusters[b].members);
                let better = match best {
                    None => true,
                    Some((best_d, _, _)) => d < best_d,
                };
                if better {
                    best = Some((d, a, b));
                }
            }
        }

        let Some((_, a, b)) = best else {
            break;
        };

        // b > a, so removing b first keeps a's index valid
        let second = clusters.remove(b);
        let first = clusters.remove(a);
        let (left, right) = if first.id <= second.id {
            (first, second)
        } else {
            (second, first)
        };

        let mut members = left.members;
        members.extend(right.members);
        let mut leaves = left.leaves;
        leaves.extend(right.leaves);

        clusters.push(Cluster {
            id: next_id,
            members,
            leaves,
        });
        next_id += 1;
    }

    clusters.pop().map(|c| c.leaves).unwrap_or_default()
}

fn average_linkage(distances: &[Vec<f64>], a: &[usize], b: &[usize]) -> f64 {
    let total: f64 = a
        .iter()
        .flat_map(|&i| b.iter().map(move |&j| distances[i][j]))
        .sum();
    total / (a.len() * b.len()) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_permutation(order: &[usize], n: usize) -> bool {
        let mut sorted = order.to_vec();
        sorted.sort_unstable();
        sorted == (0..n).collect::<Vec<_>>()
    }

    #[test]
    fn test_small_inputs_keep_order() {
        assert!(leaf_order(&[]).is_empty());
        assert_eq!(leaf_order(&[vec![1.0]]), vec![0]);
        assert_eq!(leaf_order(&[vec![1.0], vec![9.0]]), vec![0, 1]);
    }

    #[test]
    fn test_similar_rows_end_up_adjacent() {
        let vectors = vec![
            vec![0.0, 0.0],
            vec![100.0, 100.0],
            vec![1.0, 0.0],
            vec![101.0, 99.0],
            vec![0.0, 1.0],
        ];
        let order = leaf_order(&vectors);
        assert!(is_permutation(&order, 5));

        let pos = |i: usize| order.iter().position(|&x| x == i).unwrap();
        assert_eq!(pos(1).abs_diff(pos(3)), 1);
        let low: Vec<usize> = vec![pos(0), pos(2), pos(4)];
        let (min, max) = (low.iter().min().unwrap(), low.iter().max().unwrap());
        assert_eq!(max - min, 2);
    }

    #[test]
    fn test_deterministic_on_ties() {
        let vectors = vec![vec![1.0]; 6];
        assert_eq!(leaf_order(&vectors), leaf_order(&vectors));
        assert!(is_permutation(&leaf_order(&vectors), 6));
    }

    #[test]
    fn test_euclidean() {
        assert_eq!(euclidean(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
        assert_eq!(euclidean(&[2.0], &[2.0]), 0.0);
    }
}
