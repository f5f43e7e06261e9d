use vector_util::common_io::{read_lines, write_lines};

/// One generated demonstration sequence. The raw on-disk form is a
/// JSON id list whose terminal element is the query id; demonstrations
/// keep their selection order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcdSequenceRecord {
    pub demonstrations: Vec<usize>,
    pub query_id: usize,
}

impl IcdSequenceRecord {
    /// Split a raw id list into demonstrations and the terminal query
    /// id; the list must hold at least the query id itself.
    pub fn from_id_list(ids: &[usize]) -> anyhow::Result<Self> {
        match ids.split_last() {
            Some((&query_id, demonstrations)) => Ok(Self {
                demonstrations: demonstrations.to_vec(),
                query_id,
            }),
            None => Err(anyhow::anyhow!("empty id sequence")),
        }
    }

    pub fn to_id_list(&self) -> Vec<usize> {
        let mut ids = self.demonstrations.clone();
        ids.push(self.query_id);
        ids
    }

    pub fn shot_num(&self) -> usize {
        self.demonstrations.len()
    }
}

/// Read JSON-lines id lists (`.gz` transparent), one record per line
pub fn read_records(input_file: &str) -> anyhow::Result<Vec<IcdSequenceRecord>> {
    let mut records = Vec::new();
    for line in read_lines(input_file)? {
        let ids: Vec<usize> = serde_json::from_str(&line)?;
        records.push(IcdSequenceRecord::from_id_list(&ids)?);
    }
    Ok(records)
}

/// Write records as JSON-lines id lists (`.gz` transparent)
pub fn write_records(records: &[IcdSequenceRecord], output_file: &str) -> anyhow::Result<()> {
    let lines = records
        .iter()
        .map(|r| Ok(serde_json::to_string(&r.to_id_list())?.into_boxed_str()))
        .collect::<anyhow::Result<Vec<_>>>()?;
    write_lines(&lines, output_file)
}
