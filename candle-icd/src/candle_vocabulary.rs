/// Number of reserved ids beyond the candidate-id range
pub const NUM_RESERVED: usize = 3;

///
/// The sequence model's output space: candidate ids `0..pool_size`
/// followed by the three reserved delimiter ids. Constructed once from
/// the pool size and passed to every component that needs a token
/// layout, so no call site hard-codes a threshold.
///
/// Layout: `eos = pool_size`, `bos = pool_size + 1`,
/// `query = pool_size + 2`; every generated sequence starts
/// `[bos, query]`.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vocabulary {
    pool_size: usize,
}

impl Vocabulary {
    pub fn new(pool_size: usize) -> anyhow::Result<Self> {
        if pool_size == 0 {
            return Err(anyhow::anyhow!("cannot build a vocabulary over an empty pool"));
        }
        Ok(Self { pool_size })
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// `pool_size + 3`; must match the sequence model's output width
    pub fn size(&self) -> usize {
        self.pool_size + NUM_RESERVED
    }

    pub fn eos(&self) -> u32 {
        self.pool_size as u32
    }

    pub fn bos(&self) -> u32 {
        (self.pool_size + 1) as u32
    }

    pub fn query(&self) -> u32 {
        (self.pool_size + 2) as u32
    }

    /// Ids at or beyond this threshold are never valid demonstrations
    pub fn first_reserved(&self) -> usize {
        self.pool_size
    }

    pub fn is_reserved(&self, id: usize) -> bool {
        id >= self.pool_size
    }

    /// The `[bos, query]` prefix every sequence starts with
    pub fn sequence_prefix(&self) -> [u32; 2] {
        [self.bos(), self.query()]
    }
}
