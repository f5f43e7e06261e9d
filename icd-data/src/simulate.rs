#![allow(dead_code)]

use crate::pool::{CandidatePool, PoolItem};
use crate::records::IcdSequenceRecord;

use ndarray::Array2;
use ndarray_rand::rand_distr::StandardNormal;
use ndarray_rand::RandomExt;
use rand::Rng;
use vector_util::normalize::NormalizeRows;

/// A text-only pool of `num_items` items with synthetic captions
pub fn random_text_pool(num_items: usize) -> CandidatePool {
    let items = (0..num_items)
        .map(|i| PoolItem {
            source_id: Some(i as i64),
            text: Some(format!("caption for item {}", i).into_boxed_str()),
            image: None,
        })
        .collect();
    CandidatePool::new(items)
}

/// A pool whose items carry both a caption and an image locator
pub fn random_multimodal_pool(num_items: usize) -> CandidatePool {
    let items = (0..num_items)
        .map(|i| PoolItem {
            source_id: Some(i as i64),
            text: Some(format!("caption for item {}", i).into_boxed_str()),
            image: Some(format!("images/{:012}.jpg", i).into_boxed_str()),
        })
        .collect();
    CandidatePool::new(items)
}

/// Random unit-norm feature vectors (`num_items x dim`)
pub fn random_unit_features(num_items: usize, dim: usize) -> Array2<f32> {
    Array2::<f32>::random((num_items, dim), StandardNormal).normalize_rows()
}

/// Random demonstration sequences, `shots` demonstrations per record
/// and one record per query id in `0..num_queries`
pub fn random_records(num_queries: usize, pool_size: usize, shots: usize) -> Vec<IcdSequenceRecord> {
    let mut rng = rand::rng();
    (0..num_queries)
        .map(|query_id| IcdSequenceRecord {
            demonstrations: (0..shots).map(|_| rng.random_range(0..pool_size)).collect(),
            query_id,
        })
        .collect()
}
