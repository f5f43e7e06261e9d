use crate::candle_model_traits::{ContentEncoderT, SequenceModelInput, SequenceModelT};
use crate::candle_vocabulary::Vocabulary;

use candle_core::{IndexOp, Tensor};
use candle_nn::ops;
use icd_data::errors::LookupError;
use icd_data::pool::{Content, ContentField, ContentLookup};
use indicatif::{ProgressBar, ProgressDrawTarget};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("sequence model vocabulary {model} does not match pool vocabulary {expected}")]
    VocabularyMismatch { model: usize, expected: usize },

    #[error("sequence model failure: {0}")]
    SequenceModel(#[from] candle_core::Error),

    #[error("content lookup failure: {0}")]
    ContentLookup(#[from] LookupError),
}

#[derive(Debug, Clone)]
pub struct DecodeConfig {
    /// number of demonstrations to select
    pub shot_num: usize,
    /// divides the logit of every already-selected id; `> 1`
    /// discourages re-selection
    pub repetition_penalty: f32,
    /// which content field of a chosen demonstration feeds the next
    /// step's embedding
    pub demo_field: ContentField,
    pub show_progress: bool,
}

/// The growing decode context, threaded step to step. Each transition
/// consumes the previous state and produces the next one; nothing is
/// shared between steps besides this value.
struct DecodeState {
    token_ids: Vec<u32>,
    demo_contents: Vec<Content>,
}

impl DecodeState {
    fn start(vocabulary: &Vocabulary) -> Self {
        Self {
            token_ids: vocabulary.sequence_prefix().to_vec(),
            demo_contents: vec![],
        }
    }

    fn advance(mut self, next_id: u32, content: Content) -> Self {
        self.token_ids.push(next_id);
        self.demo_contents.push(content);
        self
    }
}

///
/// Greedy autoregressive selection of a demonstration sequence for one
/// query. Every step asks the sequence model for next-token logits,
/// masks the reserved ids, penalizes already-chosen ids, and takes the
/// arg-max -- width-1 search, no sampling.
///
/// The decoder holds no mutable state, so independent queries can be
/// decoded concurrently through shared references.
///
pub struct IcdSequenceDecoder<'a, Model, Enc, L>
where
    Model: SequenceModelT,
    Enc: ContentEncoderT,
    L: ContentLookup,
{
    model: &'a Model,
    content_encoder: &'a Enc,
    lookup: &'a L,
    vocabulary: Vocabulary,
}

impl<'a, Model, Enc, L> std::fmt::Debug for IcdSequenceDecoder<'a, Model, Enc, L>
where
    Model: SequenceModelT,
    Enc: ContentEncoderT,
    L: ContentLookup,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IcdSequenceDecoder")
            .field("vocabulary", &self.vocabulary)
            .finish_non_exhaustive()
    }
}

impl<'a, Model, Enc, L> IcdSequenceDecoder<'a, Model, Enc, L>
where
    Model: SequenceModelT,
    Enc: ContentEncoderT,
    L: ContentLookup,
{
    /// Build a decoder; the model's output width must match the
    /// vocabulary exactly
    pub fn build(
        model: &'a Model,
        content_encoder: &'a Enc,
        lookup: &'a L,
        vocabulary: Vocabulary,
    ) -> Result<Self, DecodeError> {
        if model.vocab_size() != vocabulary.size() {
            return Err(DecodeError::VocabularyMismatch {
                model: model.vocab_size(),
                expected: vocabulary.size(),
            });
        }

        Ok(Self {
            model,
            content_encoder,
            lookup,
            vocabulary,
        })
    }

    /// Decode one query into `[bos, query, d_1 .. d_shot_num]`. EOS is
    /// a training-time delimiter and is never emitted here. A model or
    /// lookup failure aborts the whole sequence; there is no partial
    /// result.
    ///
    /// * `query_embedding` - query feature (1 x d)
    pub fn decode(
        &self,
        query_embedding: &Tensor,
        config: &DecodeConfig,
    ) -> Result<Vec<u32>, DecodeError> {
        let mut state = DecodeState::start(&self.vocabulary);

        for _step in 0..config.shot_num {
            state = self.step(query_embedding, state, config)?;
        }

        Ok(state.token_ids)
    }

    /// Decode a batch of independent queries one after another
    pub fn decode_many(
        &self,
        query_embeddings: &[Tensor],
        config: &DecodeConfig,
    ) -> Result<Vec<Vec<u32>>, DecodeError> {
        let pb = ProgressBar::new(query_embeddings.len() as u64);
        if !config.show_progress {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }

        let mut sequences = Vec::with_capacity(query_embeddings.len());
        for query_embedding in query_embeddings {
            sequences.push(self.decode(query_embedding, config)?);
            pb.inc(1);
        }
        pb.finish_and_clear();

        Ok(sequences)
    }

    /// One transition: logits for the last position, mask and
    /// penalize, pick the arg-max, resolve its content for the next
    /// step's embedding
    fn step(
        &self,
        query_embedding: &Tensor,
        state: DecodeState,
        config: &DecodeConfig,
    ) -> Result<DecodeState, DecodeError> {
        let device = query_embedding.device();

        let token_ids = Tensor::new(&state.token_ids[..], device)?.unsqueeze(0)?;

        let demo_embeddings = match state.demo_contents.is_empty() {
            true => None,
            false => Some(
                self.content_encoder
                    .encode_content(&state.demo_contents)?
                    .unsqueeze(0)?,
            ),
        };

        let logits_tv = self.model.forward(SequenceModelInput {
            query_embedding,
            demo_embeddings: demo_embeddings.as_ref(),
            token_ids: &token_ids,
        })?;

        let (_, seq_len, _) = logits_tv.dims3()?;
        let logits_v: Vec<f32> = logits_tv.i((0, seq_len - 1))?.to_vec1()?;

        if logits_v.len() != self.vocabulary.size() {
            return Err(DecodeError::VocabularyMismatch {
                model: logits_v.len(),
                expected: self.vocabulary.size(),
            });
        }

        let logits_v = mask_and_penalize(
            logits_v,
            &state.token_ids,
            &self.vocabulary,
            config.repetition_penalty,
        );

        let probs_v = ops::softmax(&Tensor::from_vec(logits_v, self.vocabulary.size(), device)?, 0)?;
        let next_id = probs_v.argmax(0)?.to_scalar::<u32>()?;

        let content = self.lookup.content_at(next_id as usize, config.demo_field)?;

        Ok(state.advance(next_id, content))
    }
}

/// Reserved ids can never be selected; already-used ids have their
/// logits divided by the penalty (dividing the masked `-inf` entries
/// is a no-op)
fn mask_and_penalize(
    mut logits_v: Vec<f32>,
    used_ids: &[u32],
    vocabulary: &Vocabulary,
    repetition_penalty: f32,
) -> Vec<f32> {
    for logit in logits_v[vocabulary.first_reserved()..].iter_mut() {
        *logit = f32::NEG_INFINITY;
    }

    for &id in used_ids {
        logits_v[id as usize] /= repetition_penalty;
    }

    logits_v
}
