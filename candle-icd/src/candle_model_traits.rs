#![allow(dead_code)]

use crate::candle_icd_dataset::IcdSample;
use candle_core::{Result, Tensor};
use icd_data::pool::Content;

/// Input to one forward pass of the sequence model
pub struct SequenceModelInput<'a> {
    /// query feature (1 x d)
    pub query_embedding: &'a Tensor,
    /// features of the demonstrations chosen so far (1 x m x d),
    /// absent before the first step
    pub demo_embeddings: Option<&'a Tensor>,
    /// running token-id sequence (1 x t), starting `[bos, query]`
    pub token_ids: &'a Tensor,
}

/// An autoregressive model over the demonstration vocabulary
pub trait SequenceModelT {
    /// Per-position logits over the full vocabulary
    ///
    /// # Returns `logits_tv` (1 x t x vocab)
    fn forward(&self, input: SequenceModelInput) -> Result<Tensor>;

    /// Output width; must equal `Vocabulary::size()`
    fn vocab_size(&self) -> usize;
}

/// An external encoder that embeds raw demonstration content. The
/// decoder re-encodes the whole chosen set after every step, since the
/// embedding depends on the set and order chosen so far.
pub trait ContentEncoderT {
    /// # Returns `features_md` (m x d), one row per content item
    fn encode_content(&self, contents: &[Content]) -> Result<Tensor>;

    fn dim(&self) -> usize;
}

/// Heavy batching is deferred to an external collaborator; the
/// dataset itself stays a pure projection
pub trait BatchCollatorT {
    type Batch;

    fn collate(&self, samples: Vec<IcdSample>) -> anyhow::Result<Self::Batch>;
}
