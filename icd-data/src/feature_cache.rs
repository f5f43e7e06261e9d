use crate::errors::CacheError;
use crate::pool::{CandidatePool, ContentField};

use log::info;
use ndarray::Array2;
use vector_util::normalize::NormalizeRows;
use vector_util::parquet_io::{read_feature_matrix, write_feature_matrix};

/// An external encoder that turns one content field of every pool
/// item into a dense feature vector (`|pool| x d`). Batching over
/// `batch_size` items at a time is the encoder's own business.
pub trait FeatureEncoderT {
    fn encode_pool(
        &self,
        pool: &CandidatePool,
        field: ContentField,
        batch_size: usize,
    ) -> anyhow::Result<Array2<f32>>;
}

///
/// Compute-once feature vectors for a candidate pool. The artifact on
/// disk is the sole signal for recompute-vs-reuse: if it exists, load
/// it; otherwise run the encoder once, L2-normalize the rows, persist,
/// and return. Concurrent first-time computation for the same artifact
/// is not serialized here; run the precomputation in a single process.
///
pub struct FeatureCache {
    artifact_path: Box<str>,
}

impl FeatureCache {
    pub fn new(artifact_path: &str) -> Self {
        Self {
            artifact_path: artifact_path.into(),
        }
    }

    pub fn artifact_path(&self) -> &str {
        &self.artifact_path
    }

    pub fn exists(&self) -> bool {
        std::path::Path::new(self.artifact_path.as_ref()).exists()
    }

    /// Load the persisted feature matrix, or encode and persist it.
    /// At most one encode pass happens per artifact path; the encoder
    /// output must have exactly one row per pool item, checked before
    /// anything is written.
    pub fn get_or_compute<Enc>(
        &self,
        pool: &CandidatePool,
        field: ContentField,
        encoder: &Enc,
        batch_size: usize,
    ) -> anyhow::Result<Array2<f32>>
    where
        Enc: FeatureEncoderT,
    {
        if self.exists() {
            info!("loading cached features: {}", self.artifact_path);
            let (x_nd, _) = read_feature_matrix(&self.artifact_path)?;
            return Ok(x_nd);
        }

        info!(
            "encoding {} features for {} items",
            field,
            pool.len()
        );

        let mut x_nd = encoder.encode_pool(pool, field, batch_size)?;

        if x_nd.nrows() != pool.len() {
            return Err(CacheError::EncodingSizeMismatch {
                expected: pool.len(),
                found: x_nd.nrows(),
            }
            .into());
        }

        x_nd.normalize_rows_inplace();
        write_feature_matrix(&self.artifact_path, &x_nd, None)?;
        info!("wrote feature cache: {}", self.artifact_path);

        Ok(x_nd)
    }
}
