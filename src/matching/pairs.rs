//! Diplotype assembly from matched haplotype definitions.

use std::sync::Arc;

use crate::core::definition::HaplotypeDefinition;

/// A matched haplotype together with its score against one sample.
///
/// The score may differ from [`HaplotypeDefinition::score`] when the sample leaves
/// some of the definition's wobbles uninformative.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScoredHaplotype {
    definition: Arc<HaplotypeDefinition>,
    score: i32,
}

impl ScoredHaplotype {
    pub fn new(definition: Arc<HaplotypeDefinition>, score: i32) -> Self {
        Self { definition, score }
    }

    /// Scores `definition` with its sample-independent base score
    pub fn unadjusted(definition: Arc<HaplotypeDefinition>) -> Self {
        let score = definition.score();
        Self { definition, score }
    }

    pub fn definition(&self) -> &Arc<HaplotypeDefinition> {
        &self.definition
    }

    pub fn score(&self) -> i32 {
        self.score
    }
}

/// An unordered pair of haplotypes, stored in canonical order
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiplotypeCandidate {
    first: ScoredHaplotype,
    second: ScoredHaplotype,
}

impl DiplotypeCandidate {
    pub fn new(a: ScoredHaplotype, b: ScoredHaplotype) -> Self {
        if b.definition < a.definition {
            Self { first: b, second: a }
        } else {
            Self { first: a, second: b }
        }
    }

    pub fn first(&self) -> &Arc<HaplotypeDefinition> {
        &self.first.definition
    }

    pub fn second(&self) -> &Arc<HaplotypeDefinition> {
        &self.second.definition
    }

    pub fn is_homozygous(&self) -> bool {
        self.first.definition == self.second.definition
    }

    /// Sum of both haplotypes' scores against the sample
    pub fn score(&self) -> i32 {
        self.first.score + self.second.score
    }

    /// Display name, e.g. `*1/*2`
    pub fn name(&self) -> String {
        format!("{}/{}", self.first().name(), self.second().name())
    }
}

impl std::fmt::Display for DiplotypeCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.first().name(), self.second().name())
    }
}

/// Every unordered pair of `matched` haplotypes, including self-pairs.
///
/// Repeated definitions in the input are ignored (the first score seen is kept), so
/// `n` distinct definitions produce exactly `n * (n + 1) / 2` candidates, returned
/// in canonical order. No biological plausibility filtering happens here.
pub fn assemble_pairs(matched: &[ScoredHaplotype]) -> Vec<DiplotypeCandidate> {
    let mut haplotypes: Vec<ScoredHaplotype> = matched.to_vec();
    haplotypes.sort_by(|a, b| a.definition.cmp(&b.definition));
    haplotypes.dedup_by(|a, b| a.definition == b.definition);

    let mut pairs = Vec::with_capacity(haplotypes.len() * (haplotypes.len() + 1) / 2);
    for (i, a) in haplotypes.iter().enumerate() {
        for b in &haplotypes[i..] {
            pairs.push(DiplotypeCandidate::new(a.clone(), b.clone()));
        }
    }
    pairs.sort();
    pairs
}
