use crate::errors::IndexError;

use indicatif::ParallelProgressIterator;
use log::info;
use ndarray::{Array2, ArrayView1, ArrayView2};
use rayon::prelude::*;

/// One retrieved candidate: stored positional id and inner-product score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbour {
    pub id: usize,
    pub score: f32,
}

///
/// An exact inner-product nearest-neighbour index over a fixed set of
/// row vectors. Positional row ids are the retrievable ids. The index
/// is read-only after `build`, so shared references can search
/// concurrently.
///
pub struct SimilarityIndex {
    vectors: Array2<f32>,
}

impl SimilarityIndex {
    /// Build an index over `vectors` (`n x d`, one row per item)
    pub fn build(vectors: Array2<f32>) -> Self {
        Self { vectors }
    }

    pub fn len(&self) -> usize {
        self.vectors.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.nrows() == 0
    }

    pub fn dim(&self) -> usize {
        self.vectors.ncols()
    }

    /// Retrieve the `top_k` stored ids for every query row, ranked by
    /// descending inner product. Ties are broken by stored-index order,
    /// so repeated calls on the same input return the same ranking.
    ///
    /// * `queries` - query vectors (`m x d`)
    /// * `top_k` - number of ids per query, `1 <= top_k <= n`
    pub fn search(
        &self,
        queries: ArrayView2<f32>,
        top_k: usize,
    ) -> Result<Vec<Vec<Neighbour>>, IndexError> {
        if queries.ncols() != self.dim() {
            return Err(IndexError::DimensionMismatch {
                expected: self.dim(),
                found: queries.ncols(),
            });
        }

        if top_k == 0 || top_k > self.len() {
            return Err(IndexError::InsufficientCandidates {
                requested: top_k,
                available: self.len(),
            });
        }

        let nqueries = queries.nrows();

        Ok((0..nqueries)
            .into_par_iter()
            .progress_count(nqueries as u64)
            .map(|i| self.search_one(queries.row(i), top_k))
            .collect())
    }

    /// Exhaustive scan for one query; caller has validated `top_k`
    fn search_one(&self, query: ArrayView1<f32>, top_k: usize) -> Vec<Neighbour> {
        let scores = self.vectors.dot(&query);

        let mut order: Vec<usize> = (0..scores.len()).collect();
        order.sort_by(|&a, &b| {
            scores[b]
                .partial_cmp(&scores[a])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });

        order
            .into_iter()
            .take(top_k)
            .map(|id| Neighbour {
                id,
                score: scores[id],
            })
            .collect()
    }
}

/// Shortlist `top_k` stored ids for every query row in one pass,
/// building a throwaway index over `stored`.
pub fn recall_similar(
    stored: Array2<f32>,
    queries: ArrayView2<f32>,
    top_k: usize,
) -> Result<Vec<Vec<Neighbour>>, IndexError> {
    info!(
        "embedding shape: {} x {}",
        stored.nrows(),
        stored.ncols()
    );
    let index = SimilarityIndex::build(stored);
    index.search(queries, top_k)
}
