//! Catalog request models

/// Parameters of one page request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchPageParams {
    /// Records to skip
    pub offset: u64,

    /// Maximum records to return
    pub limit: u32,

    /// Only records modified at or after this timestamp
    pub modified_since: Option<String>,

    /// Dataset filter
    pub dataset: Option<String>,
}

impl FetchPageParams {
    pub fn new(offset: u64, limit: u32) -> Self {
        Self {
            offset,
            limit,
            ..Default::default()
        }
    }

    /// Query pairs in the order they are sent
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
        ];
        if let Some(modified_since) = &self.modified_since {
            pairs.push(("modifiedsince", modified_since.clone()));
        }
        if let Some(dataset) = &self.dataset {
            pairs.push(("dataset", dataset.clone()));
        }
        pairs
    }
}
