use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Allele string used for a missing call
pub const NO_CALL: &str = ".";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenotypeError {
    #[error("genotype has {0} alleles, at most 2 are supported")]
    TooManyAlleles(usize),
}

/// Observed alleles at one position
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub enum Genotype {
    /// No call (including half-calls such as `./A`)
    Missing,
    /// A single observed allele (hemizygous)
    Haploid(String),
    /// Two observed alleles, in phase order when the call is phased
    Diploid(String, String),
}

impl Genotype {
    pub fn diploid(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self::Diploid(a.into(), b.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn is_heterozygous(&self) -> bool {
        matches!(self, Self::Diploid(a, b) if a != b)
    }

    /// Observed alleles, without the missing marker
    pub fn alleles(&self) -> Vec<&str> {
        match self {
            Self::Missing => Vec::new(),
            Self::Haploid(a) => vec![a.as_str()],
            Self::Diploid(a, b) => vec![a.as_str(), b.as_str()],
        }
    }
}

impl TryFrom<Vec<String>> for Genotype {
    type Error = GenotypeError;

    fn try_from(alleles: Vec<String>) -> Result<Self, Self::Error> {
        if alleles.len() > 2 {
            return Err(GenotypeError::TooManyAlleles(alleles.len()));
        }
        if alleles.is_empty() || alleles.iter().any(|a| a == NO_CALL || a.is_empty()) {
            return Ok(Self::Missing);
        }
        let mut iter = alleles.into_iter();
        match (iter.next(), iter.next()) {
            (Some(a), Some(b)) => Ok(Self::Diploid(a, b)),
            (Some(a), None) => Ok(Self::Haploid(a)),
            _ => Ok(Self::Missing),
        }
    }
}

impl From<Genotype> for Vec<String> {
    fn from(genotype: Genotype) -> Self {
        match genotype {
            Genotype::Missing => Vec::new(),
            Genotype::Haploid(a) => vec![a],
            Genotype::Diploid(a, b) => vec![a, b],
        }
    }
}

impl std::fmt::Display for Genotype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "{NO_CALL}"),
            Self::Haploid(a) => write!(f, "{a}"),
            Self::Diploid(a, b) => write!(f, "{a}/{b}"),
        }
    }
}

/// A sample's observed data at one curated position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleCall {
    pub chromosome: String,

    /// 1-based coordinate; must match the gene position at the same index
    pub position: u64,

    #[serde(rename = "alleles")]
    pub genotype: Genotype,

    #[serde(default)]
    pub phased: bool,

    /// Every allele the source record declared at this site (REF plus ALTs)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vcf_alleles: Vec<String>,
}

impl SampleCall {
    pub fn new(chromosome: impl Into<String>, position: u64, genotype: Genotype, phased: bool) -> Self {
        Self {
            chromosome: chromosome.into(),
            position,
            genotype,
            phased,
            vcf_alleles: Vec::new(),
        }
    }

    pub fn missing(chromosome: impl Into<String>, position: u64) -> Self {
        Self::new(chromosome, position, Genotype::Missing, false)
    }

    #[must_use]
    pub fn with_vcf_alleles(mut self, alleles: Vec<String>) -> Self {
        self.vcf_alleles = alleles;
        self
    }

    pub fn is_missing(&self) -> bool {
        self.genotype.is_missing()
    }

    pub fn is_heterozygous(&self) -> bool {
        self.genotype.is_heterozygous()
    }

    /// Observed alleles that are not among the declared VCF alleles
    pub fn undeclared_alleles(&self) -> Vec<&str> {
        if self.vcf_alleles.is_empty() {
            return Vec::new();
        }
        self.genotype
            .alleles()
            .into_iter()
            .filter(|a| !self.vcf_alleles.iter().any(|v| v == a))
            .collect()
    }
}

/// All of one sample's calls, grouped by gene
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SampleCalls {
    pub sample: String,
    pub genes: BTreeMap<String, Vec<SampleCall>>,
}

impl SampleCalls {
    pub fn new(sample: impl Into<String>) -> Self {
        Self {
            sample: sample.into(),
            genes: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_gene(mut self, gene: impl Into<String>, calls: Vec<SampleCall>) -> Self {
        self.genes.insert(gene.into(), calls);
        self
    }
}
