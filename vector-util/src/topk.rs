use crate::errors::IndexError;

/// Keep the `k` highest-scoring payloads out of `n >= k` scored
/// candidates, in descending score order. Ties are resolved by the
/// original position (stable), so the output is deterministic.
///
/// * `scores` - candidate scores
/// * `ids` - payload identifiers parallel to `scores`
/// * `k` - number of entries to keep
///
/// # Returns `(scores, ids)` of length `k`
pub fn top_k_filter<T: Clone>(
    scores: &[f32],
    ids: &[T],
    k: usize,
) -> Result<(Vec<f32>, Vec<T>), IndexError> {
    if scores.len() != ids.len() {
        return Err(IndexError::LengthMismatch {
            scores: scores.len(),
            ids: ids.len(),
        });
    }

    if scores.len() < k {
        return Err(IndexError::InsufficientCandidates {
            requested: k,
            available: scores.len(),
        });
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });
    order.truncate(k);

    let top_scores = order.iter().map(|&j| scores[j]).collect();
    let top_ids = order.iter().map(|&j| ids[j].clone()).collect();

    Ok((top_scores, top_ids))
}
