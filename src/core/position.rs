use serde::{Deserialize, Serialize};

/// A single curated genomic coordinate tracked for a gene
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Chromosome name (e.g. `chr10`)
    pub chromosome: String,

    /// 1-based genomic coordinate
    pub position: u64,

    /// Reference allele at this coordinate
    #[serde(rename = "ref")]
    pub ref_allele: String,

    /// Stable variant identifier, usually a dbSNP rsid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsid: Option<String>,
}

impl Position {
    pub fn new(chromosome: impl Into<String>, position: u64, ref_allele: impl Into<String>) -> Self {
        Self {
            chromosome: chromosome.into(),
            position,
            ref_allele: ref_allele.into(),
            rsid: None,
        }
    }

    #[must_use]
    pub fn with_rsid(mut self, rsid: impl Into<String>) -> Self {
        self.rsid = Some(rsid.into());
        self
    }

    /// Whether this position is at the same coordinate as another
    pub fn same_locus(&self, chromosome: &str, position: u64) -> bool {
        self.position == position && self.chromosome == chromosome
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.rsid {
            Some(rsid) => write!(f, "{}:{} ({rsid})", self.chromosome, self.position),
            None => write!(f, "{}:{}", self.chromosome, self.position),
        }
    }
}
