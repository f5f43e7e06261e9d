use crate::errors::SplitError;
use crate::records::IcdSequenceRecord;

use log::info;
use std::collections::BTreeSet;

/// A deterministic train/validation partition of generated sequences.
/// The two id sets are disjoint and cover every distinct query id;
/// each record sits in the partition of its query id.
#[derive(Debug, Clone, Default)]
pub struct DataSplit {
    pub train_ids: BTreeSet<usize>,
    pub validation_ids: BTreeSet<usize>,
    pub train: Vec<IcdSequenceRecord>,
    pub validation: Vec<IcdSequenceRecord>,
}

/// Split records by their query ids so that no query id leaks across
/// the two sides. Distinct query ids are sorted ascending and the
/// first `floor(train_ratio * |ids|)` go to train; the rest to
/// validation. Same input and ratio always produce the same split, so
/// an evaluation harness can reproduce the held-out set across runs.
///
/// * `records` - generated sequences (terminal element = query id)
/// * `train_ratio` - fraction of distinct query ids for training, in (0, 1)
pub fn split_records(
    records: &[IcdSequenceRecord],
    train_ratio: f64,
) -> Result<DataSplit, SplitError> {
    if !(train_ratio > 0.0 && train_ratio < 1.0) {
        return Err(SplitError::InvalidTrainRatio(train_ratio));
    }

    if records.is_empty() {
        return Err(SplitError::EmptyInput);
    }

    let query_ids: BTreeSet<usize> = records.iter().map(|r| r.query_id).collect();

    let num_train = (train_ratio * query_ids.len() as f64).floor() as usize;

    let train_ids: BTreeSet<usize> = query_ids.iter().copied().take(num_train).collect();
    let validation_ids: BTreeSet<usize> = query_ids
        .iter()
        .copied()
        .skip(num_train)
        .collect();

    let mut train = Vec::new();
    let mut validation = Vec::new();

    for record in records {
        if train_ids.contains(&record.query_id) {
            train.push(record.clone());
        } else if validation_ids.contains(&record.query_id) {
            validation.push(record.clone());
        } else {
            // unreachable by construction; guards against the two
            // passes ever computing query ids differently
            return Err(SplitError::ConsistencyViolation(record.query_id));
        }
    }

    info!(
        "split {} records into {} train / {} validation ({} / {} query ids)",
        records.len(),
        train.len(),
        validation.len(),
        train_ids.len(),
        validation_ids.len()
    );

    Ok(DataSplit {
        train_ids,
        validation_ids,
        train,
        validation,
    })
}
