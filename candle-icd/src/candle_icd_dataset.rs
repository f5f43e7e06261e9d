use crate::candle_vocabulary::Vocabulary;
use icd_data::pool::{Content, ContentField, ContentLookup};
use icd_data::records::IcdSequenceRecord;

/// Raw content of the query item, restricted to the fields configured
/// at dataset construction time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryInput {
    pub text: Option<Box<str>>,
    pub image: Option<Box<str>>,
}

/// One model-ready sample: the delimited token sequence and the
/// query's raw content bundle
#[derive(Debug, Clone, PartialEq)]
pub struct IcdSample {
    /// `[bos, query] + demonstration_ids + [eos]`
    pub token_ids: Vec<u32>,
    pub query_input: QueryInput,
}

///
/// Wraps generated sequence records into model-ready samples: inserts
/// the special tokens and resolves the query's raw content through an
/// injected lookup. A pure projection; collation into padded batches
/// belongs to a `BatchCollatorT`.
///
pub struct IcdSequenceDataset<'a, L>
where
    L: ContentLookup,
{
    records: Vec<IcdSequenceRecord>,
    lookup: &'a L,
    vocabulary: Vocabulary,
    query_fields: Vec<ContentField>,
}

impl<'a, L> IcdSequenceDataset<'a, L>
where
    L: ContentLookup,
{
    /// * `records` - generated demonstration sequences
    /// * `lookup` - content-indexed collection holding the query items
    /// * `vocabulary` - token layout shared with the sequence model
    /// * `query_fields` - which query content fields to resolve
    pub fn new(
        records: Vec<IcdSequenceRecord>,
        lookup: &'a L,
        vocabulary: Vocabulary,
        query_fields: Vec<ContentField>,
    ) -> Self {
        Self {
            records,
            lookup,
            vocabulary,
            query_fields,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn item_at(&self, index: usize) -> anyhow::Result<IcdSample> {
        let record = self
            .records
            .get(index)
            .ok_or_else(|| anyhow::anyhow!("sample index {} out of bounds", index))?;

        let mut token_ids = Vec::with_capacity(record.demonstrations.len() + 3);
        token_ids.extend_from_slice(&self.vocabulary.sequence_prefix());
        token_ids.extend(record.demonstrations.iter().map(|&id| id as u32));
        token_ids.push(self.vocabulary.eos());

        let mut query_input = QueryInput::default();
        for &field in self.query_fields.iter() {
            match self.lookup.content_at(record.query_id, field)? {
                Content::Text(text) => query_input.text = Some(text),
                Content::Image(image) => query_input.image = Some(image),
            }
        }

        Ok(IcdSample {
            token_ids,
            query_input,
        })
    }
}
