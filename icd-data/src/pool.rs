use crate::errors::LookupError;
use serde::{Deserialize, Serialize};
use vector_util::common_io::{read_lines, write_lines};

/// Which raw content a pool item (or a query) carries. The enabled
/// fields are resolved once at configuration time; nothing probes for
/// fields at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentField {
    Text,
    Image,
}

impl std::fmt::Display for ContentField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentField::Text => write!(f, "text"),
            ContentField::Image => write!(f, "image"),
        }
    }
}

/// Raw content payload of one field. Image content is an opaque
/// locator (file path or URI); decoding pixels is the encoder's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Content {
    Text(Box<str>),
    Image(Box<str>),
}

impl Content {
    pub fn field(&self) -> ContentField {
        match self {
            Content::Text(_) => ContentField::Text,
            Content::Image(_) => ContentField::Image,
        }
    }
}

/// One candidate item. The positional index in the pool is the item's
/// id; `source_id` only orders items at load time so that positional
/// ids stay stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoolItem {
    #[serde(default)]
    pub source_id: Option<i64>,
    #[serde(default)]
    pub text: Option<Box<str>>,
    #[serde(default)]
    pub image: Option<Box<str>>,
}

/// Looking up raw content by pool id; implemented by `CandidatePool`
/// and by any external content-indexed collection
pub trait ContentLookup {
    fn content_at(&self, id: usize, field: ContentField) -> Result<Content, LookupError>;
}

///
/// An ordered, index-addressable collection of candidate items.
/// Membership is immutable after construction.
///
pub struct CandidatePool {
    items: Vec<PoolItem>,
}

impl CandidatePool {
    /// Items keep the given order; positional index becomes the id
    pub fn new(items: Vec<PoolItem>) -> Self {
        Self { items }
    }

    /// Sort items by `source_id` before assigning positional ids, the
    /// same ordering the pool had when features were computed
    pub fn from_unsorted(mut items: Vec<PoolItem>) -> Self {
        items.sort_by_key(|item| item.source_id);
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<&PoolItem> {
        self.items.get(id)
    }

    pub fn items(&self) -> &[PoolItem] {
        &self.items
    }

    /// Read one JSON item per line; sorts by `source_id`
    pub fn read_json(input_file: &str) -> anyhow::Result<Self> {
        let mut items = Vec::new();
        for line in read_lines(input_file)? {
            items.push(serde_json::from_str::<PoolItem>(&line)?);
        }
        Ok(Self::from_unsorted(items))
    }

    /// Write one JSON item per line, in positional-id order
    pub fn write_json(&self, output_file: &str) -> anyhow::Result<()> {
        let lines = self
            .items
            .iter()
            .map(|item| Ok(serde_json::to_string(item)?.into_boxed_str()))
            .collect::<anyhow::Result<Vec<_>>>()?;
        write_lines(&lines, output_file)
    }
}

impl ContentLookup for CandidatePool {
    fn content_at(&self, id: usize, field: ContentField) -> Result<Content, LookupError> {
        let item = self.items.get(id).ok_or(LookupError::IdOutOfRange {
            id,
            size: self.items.len(),
        })?;

        let missing = LookupError::MissingField { id, field };

        match field {
            ContentField::Text => item
                .text
                .as_ref()
                .map(|x| Content::Text(x.clone()))
                .ok_or(missing),
            ContentField::Image => item
                .image
                .as_ref()
                .map(|x| Content::Image(x.clone()))
                .ok_or(missing),
        }
    }
}
