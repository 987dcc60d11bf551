//! Flat, exact nearest-neighbor index over embedding vectors.

use crate::error::{Result, RetrieverError};

/// An in-memory collection of embedding vectors keyed by insertion position,
/// supporting exact k-nearest-neighbor queries under Euclidean distance.
///
/// `build` replaces any prior contents wholesale; there is no incremental
/// update. Searching an unbuilt index returns an empty result rather than
/// failing, and ties are broken by insertion order.
#[derive(Debug, Default)]
pub struct FlatIndex {
    vectors: Vec<Vec<f32>>,
    dimension: Option<usize>,
}

impl FlatIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the index contents with `vectors`, O(n).
    ///
    /// All vectors must share one dimension; the dimension is fixed by the
    /// first vector. An empty input leaves an empty index.
    pub fn build(&mut self, vectors: Vec<Vec<f32>>) -> Result<()> {
        let dimension = match vectors.first() {
            Some(first) => first.len(),
            None => {
                self.vectors = Vec::new();
                self.dimension = None;
                return Ok(());
            }
        };
        for vector in &vectors {
            if vector.len() != dimension {
                return Err(RetrieverError::DimensionMismatch {
                    expected: dimension,
                    actual: vector.len(),
                });
            }
        }

        tracing::debug!("Built flat index with {} vectors of dimension {dimension}", vectors.len());
        self.vectors = vectors;
        self.dimension = Some(dimension);
        Ok(())
    }

    /// Return the `k` stored vectors closest to `query` as
    /// `(insertion position, Euclidean distance)` pairs, ordered by
    /// non-decreasing distance with ties in insertion order.
    ///
    /// An empty or unbuilt index returns an empty result. If `k` exceeds the
    /// number of stored vectors, all of them are returned.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>> {
        let Some(dimension) = self.dimension else {
            return Ok(Vec::new());
        };
        if query.len() != dimension {
            return Err(RetrieverError::DimensionMismatch {
                expected: dimension,
                actual: query.len(),
            });
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(position, vector)| (position, euclidean_distance(query, vector)))
            .collect();

        // Stable sort keeps insertion order for equal distances.
        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Returns `true` when no vectors are stored.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Dimension of the stored vectors, if any are stored.
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Drop all stored vectors.
    pub fn clear(&mut self) {
        self.vectors.clear();
        self.dimension = None;
    }
}

fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_unbuilt_index_is_empty() {
        let index = FlatIndex::new();
        assert!(index.search(&[1.0, 2.0], 5).unwrap().is_empty());
        assert!(index.is_empty());
        assert_eq!(index.dimension(), None);
    }

    #[test]
    fn test_search_orders_by_distance() {
        let mut index = FlatIndex::new();
        index
            .build(vec![vec![10.0, 0.0], vec![1.0, 0.0], vec![5.0, 0.0]])
            .unwrap();

        let results = index.search(&[0.0, 0.0], 3).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0, 1);
        assert_eq!(results[1].0, 2);
        assert_eq!(results[2].0, 0);
        // Non-decreasing distances.
        assert!(results.windows(2).all(|w| w[0].1 <= w[1].1));
        assert!((results[0].1 - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_ties_break_by_insertion_order() {
        let mut index = FlatIndex::new();
        index
            .build(vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![-1.0, 0.0]])
            .unwrap();

        // All three vectors are at distance 1 from the origin.
        let results = index.search(&[0.0, 0.0], 3).unwrap();
        let positions: Vec<usize> = results.iter().map(|(p, _)| *p).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn test_k_larger_than_index_returns_all() {
        let mut index = FlatIndex::new();
        index.build(vec![vec![1.0], vec![2.0]]).unwrap();

        let results = index.search(&[0.0], 10).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_repeat_search_is_deterministic() {
        let mut index = FlatIndex::new();
        index
            .build(vec![vec![0.3, 0.7], vec![0.9, 0.1], vec![0.5, 0.5]])
            .unwrap();

        let first = index.search(&[0.4, 0.6], 3).unwrap();
        let second = index.search(&[0.4, 0.6], 3).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_build_replaces_prior_contents() {
        let mut index = FlatIndex::new();
        index.build(vec![vec![1.0], vec![2.0], vec![3.0]]).unwrap();
        assert_eq!(index.len(), 3);

        index.build(vec![vec![9.0]]).unwrap();
        assert_eq!(index.len(), 1);
        let results = index.search(&[9.0], 10).unwrap();
        assert_eq!(results, vec![(0, 0.0)]);
    }

    #[test]
    fn test_mixed_dimensions_rejected() {
        let mut index = FlatIndex::new();
        let err = index.build(vec![vec![1.0, 2.0], vec![1.0]]).unwrap_err();
        assert!(matches!(
            err,
            RetrieverError::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_query_dimension_mismatch_rejected() {
        let mut index = FlatIndex::new();
        index.build(vec![vec![1.0, 2.0]]).unwrap();
        let err = index.search(&[1.0], 1).unwrap_err();
        assert!(matches!(err, RetrieverError::DimensionMismatch { .. }));
    }
}
