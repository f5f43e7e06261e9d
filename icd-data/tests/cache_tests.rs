use icd_data::errors::CacheError;
use icd_data::feature_cache::{FeatureCache, FeatureEncoderT};
use icd_data::pool::{CandidatePool, ContentField};
use icd_data::simulate::random_text_pool;

use ndarray::Array2;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Deterministic stand-in encoder that counts its invocations
struct CountingEncoder {
    dim: usize,
    calls: AtomicUsize,
}

impl CountingEncoder {
    fn new(dim: usize) -> Self {
        Self {
            dim,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FeatureEncoderT for CountingEncoder {
    fn encode_pool(
        &self,
        pool: &CandidatePool,
        _field: ContentField,
        _batch_size: usize,
    ) -> anyhow::Result<Array2<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Array2::from_shape_fn((pool.len(), self.dim), |(i, j)| {
            (i + 1) as f32 + 0.25 * j as f32
        }))
    }
}

/// Encoder returning the wrong number of rows
struct ShortEncoder;

impl FeatureEncoderT for ShortEncoder {
    fn encode_pool(
        &self,
        pool: &CandidatePool,
        _field: ContentField,
        _batch_size: usize,
    ) -> anyhow::Result<Array2<f32>> {
        Ok(Array2::zeros((pool.len() - 1, 4)))
    }
}

#[test]
fn second_request_reuses_the_artifact() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let artifact = dir.path().join("text_features.parquet");
    let cache = FeatureCache::new(artifact.to_str().unwrap());

    let pool = random_text_pool(6);
    let encoder = CountingEncoder::new(3);

    assert!(!cache.exists());

    let first = cache.get_or_compute(&pool, ContentField::Text, &encoder, 2)?;
    assert!(cache.exists());
    assert_eq!(encoder.calls(), 1);
    assert_eq!(first.dim(), (6, 3));

    let second = cache.get_or_compute(&pool, ContentField::Text, &encoder, 2)?;
    assert_eq!(encoder.calls(), 1);

    // bit-identical reuse, not a recomputation
    assert_eq!(first, second);

    Ok(())
}

#[test]
fn rows_are_unit_normalized_before_storage() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let artifact = dir.path().join("normed.parquet");
    let cache = FeatureCache::new(artifact.to_str().unwrap());

    let pool = random_text_pool(4);
    let encoder = CountingEncoder::new(5);

    let x_nd = cache.get_or_compute(&pool, ContentField::Text, &encoder, 2)?;

    for row in x_nd.rows() {
        let norm = row.iter().map(|x| x * x).sum::<f32>().sqrt();
        approx::assert_abs_diff_eq!(norm, 1.0, epsilon = 1e-5);
    }

    Ok(())
}

#[test]
fn encoder_size_mismatch_leaves_no_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let artifact = dir.path().join("bad.parquet");
    let cache = FeatureCache::new(artifact.to_str().unwrap());

    let pool = random_text_pool(5);

    let err = cache
        .get_or_compute(&pool, ContentField::Text, &ShortEncoder, 2)
        .unwrap_err();

    assert_eq!(
        err.downcast_ref::<CacheError>(),
        Some(&CacheError::EncodingSizeMismatch {
            expected: 5,
            found: 4
        })
    );

    // failed encode must not have committed anything
    assert!(!cache.exists());
}
