use approx::assert_abs_diff_eq;
use ndarray::{arr2, Array2};
use ndarray_rand::rand_distr::StandardNormal;
use ndarray_rand::RandomExt;
use vector_util::errors::IndexError;
use vector_util::normalize::NormalizeRows;
use vector_util::similarity::{recall_similar, SimilarityIndex};

#[test]
fn exact_inner_product_ranking() -> anyhow::Result<()> {
    let stored = arr2(&[[1.0_f32, 0.0], [0.0, 1.0], [0.6, 0.8]]);
    let index = SimilarityIndex::build(stored);

    let queries = arr2(&[[1.0_f32, 0.0]]);
    let hits = index.search(queries.view(), 3)?;

    let ids: Vec<usize> = hits[0].iter().map(|h| h.id).collect();
    assert_eq!(ids, vec![0, 2, 1]);

    assert_abs_diff_eq!(hits[0][0].score, 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(hits[0][1].score, 0.6, epsilon = 1e-6);
    assert_abs_diff_eq!(hits[0][2].score, 0.0, epsilon = 1e-6);

    Ok(())
}

#[test]
fn scores_non_increasing_and_repeatable() -> anyhow::Result<()> {
    let stored = Array2::<f32>::random((20, 8), StandardNormal).normalize_rows();
    let queries = Array2::<f32>::random((5, 8), StandardNormal).normalize_rows();

    let index = SimilarityIndex::build(stored);

    let first = index.search(queries.view(), 5)?;
    let second = index.search(queries.view(), 5)?;

    for hits in first.iter() {
        for w in hits.windows(2) {
            assert!(w[0].score >= w[1].score);
        }
    }

    for (a, b) in first.iter().zip(second.iter()) {
        let a_ids: Vec<usize> = a.iter().map(|h| h.id).collect();
        let b_ids: Vec<usize> = b.iter().map(|h| h.id).collect();
        assert_eq!(a_ids, b_ids);
    }

    Ok(())
}

#[test]
fn ties_broken_by_stored_order() -> anyhow::Result<()> {
    // all stored vectors identical, so every score ties
    let stored = arr2(&[[0.6_f32, 0.8], [0.6, 0.8], [0.6, 0.8], [0.6, 0.8]]);
    let index = SimilarityIndex::build(stored);

    let queries = arr2(&[[1.0_f32, 0.0]]);
    let hits = index.search(queries.view(), 3)?;

    let ids: Vec<usize> = hits[0].iter().map(|h| h.id).collect();
    assert_eq!(ids, vec![0, 1, 2]);

    Ok(())
}

#[test]
fn dimension_mismatch_is_an_error() {
    let stored = Array2::<f32>::zeros((4, 8));
    let index = SimilarityIndex::build(stored);

    let queries = Array2::<f32>::zeros((2, 5));
    let err = index.search(queries.view(), 2).unwrap_err();

    assert_eq!(
        err,
        IndexError::DimensionMismatch {
            expected: 8,
            found: 5
        }
    );
}

#[test]
fn top_k_beyond_pool_is_an_error() {
    let stored = Array2::<f32>::zeros((4, 8));
    let index = SimilarityIndex::build(stored);
    let queries = Array2::<f32>::zeros((1, 8));

    let err = index.search(queries.view(), 5).unwrap_err();
    assert_eq!(
        err,
        IndexError::InsufficientCandidates {
            requested: 5,
            available: 4
        }
    );

    let err = index.search(queries.view(), 0).unwrap_err();
    assert_eq!(
        err,
        IndexError::InsufficientCandidates {
            requested: 0,
            available: 4
        }
    );
}

#[test]
fn recall_wrapper_matches_index_search() -> anyhow::Result<()> {
    let stored = Array2::<f32>::random((12, 4), StandardNormal).normalize_rows();
    let queries = Array2::<f32>::random((3, 4), StandardNormal).normalize_rows();

    let index = SimilarityIndex::build(stored.clone());
    let expected = index.search(queries.view(), 4)?;
    let observed = recall_similar(stored, queries.view(), 4)?;

    for (a, b) in expected.iter().zip(observed.iter()) {
        let a_ids: Vec<usize> = a.iter().map(|h| h.id).collect();
        let b_ids: Vec<usize> = b.iter().map(|h| h.id).collect();
        assert_eq!(a_ids, b_ids);
    }

    Ok(())
}
