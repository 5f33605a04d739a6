use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::store::{CatalogError, DefinitionCatalog, GeneDefinitions};
use crate::core::definition::{DefinitionError, HaplotypeDefinition, RawDefinition};
use crate::core::position::Position;
use crate::core::sample::{SampleCall, SampleCalls};
use crate::core::types::CallKind;
use crate::matching::combination;
use crate::matching::pairs::{assemble_pairs, DiplotypeCandidate, ScoredHaplotype};
use crate::matching::permutation::{
    PermutationError, PermutationSpace, SamplePermutation, DEFAULT_MAX_UNPHASED_HETEROZYGOUS,
};
use crate::matching::scoring::MatchScore;

/// Why a gene could not be called for a sample
#[derive(Error, Debug)]
pub enum MatchError {
    #[error("Unknown gene: {gene}")]
    UnknownGene { gene: String },

    #[error("{gene} was rejected when the catalog was loaded: {reason}")]
    RejectedGene { gene: String, reason: String },

    #[error("{gene}: sample call {index} is at {found}, expected {expected}")]
    SampleMisaligned {
        gene: String,
        index: usize,
        expected: String,
        found: String,
    },

    #[error("{gene}: {found} sample calls do not match {expected} positions")]
    SampleLengthMismatch {
        gene: String,
        expected: usize,
        found: usize,
    },

    #[error(
        "{gene}: {heterozygous} unphased heterozygous positions exceed the limit of {limit}"
    )]
    CombinatorialLimitExceeded {
        gene: String,
        heterozygous: usize,
        limit: usize,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Failed to build combination definition: {0}")]
    Definition(#[from] DefinitionError),

    #[error("Failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Configuration for the matching engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Most unphased heterozygous positions combined per gene before failing
    pub max_unphased_heterozygous: usize,

    /// Synthesize combination/partial definitions for unexplained permutations
    pub find_combinations: bool,

    /// Worker threads; `None` lets rayon decide
    pub threads: Option<usize>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            max_unphased_heterozygous: DEFAULT_MAX_UNPHASED_HETEROZYGOUS,
            find_combinations: true,
            threads: None,
        }
    }
}

/// A definition that matched at least one of a sample's permutations
#[derive(Debug, Clone)]
pub struct MatchResult {
    /// The matched definition (curated or synthesized)
    pub definition: Arc<HaplotypeDefinition>,

    /// Indices of matched permutations within [`GeneMatchResult::space`]
    pub permutations: Vec<usize>,

    /// Match score details
    pub score: MatchScore,
}

impl MatchResult {
    pub fn kind(&self) -> CallKind {
        self.definition.kind()
    }

    pub fn name(&self) -> &str {
        self.definition.name()
    }
}

/// Everything called for one gene of one sample
#[derive(Debug, Clone)]
pub struct GeneMatchResult {
    pub gene: String,

    /// The sample's permutations for this gene
    pub space: PermutationSpace,

    /// Ranked by score (highest first), ties in canonical order
    pub matches: Vec<MatchResult>,

    /// Every pair of matched definitions, in canonical order
    pub diplotypes: Vec<DiplotypeCandidate>,

    /// Positions the sample has no call for
    pub missing_positions: Vec<Position>,
}

impl GeneMatchResult {
    /// Decoded permutations matched by `result`
    pub fn matched_permutations<'s>(
        &'s self,
        result: &'s MatchResult,
    ) -> impl Iterator<Item = SamplePermutation> + 's {
        result
            .permutations
            .iter()
            .filter_map(move |&idx| self.space.get(idx))
    }

    /// Whether any curated (non-synthesized) definition matched
    pub fn has_curated_call(&self) -> bool {
        self.matches.iter().any(|m| m.kind() == CallKind::Curated)
    }

    /// Matches that were synthesized for this sample
    pub fn synthesized(&self) -> impl Iterator<Item = &MatchResult> {
        self.matches.iter().filter(|m| m.definition.num_combinations() > 0)
    }

    pub fn best_score(&self) -> Option<i32> {
        self.matches.first().map(|m| m.score.score)
    }
}

/// Per-gene results for one sample; one gene failing never affects the others
#[derive(Debug)]
pub struct SampleMatchResult {
    pub sample: String,
    pub genes: BTreeMap<String, Result<GeneMatchResult, MatchError>>,
}

/// The main matching engine
pub struct MatchingEngine<'a> {
    catalog: &'a DefinitionCatalog,
    config: MatchingConfig,
}

impl<'a> MatchingEngine<'a> {
    /// Create a new matching engine with default configuration
    pub fn new(catalog: &'a DefinitionCatalog) -> Self {
        Self {
            catalog,
            config: MatchingConfig::default(),
        }
    }

    /// Create a new matching engine with custom configuration
    pub fn with_config(catalog: &'a DefinitionCatalog, config: MatchingConfig) -> Self {
        Self { catalog, config }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Match one sample's calls for one gene.
    ///
    /// # Errors
    ///
    /// Returns an error if the gene is unknown or was rejected, if the calls are not
    /// aligned with the gene's positions, or if the sample has more unphased
    /// heterozygous positions than the configured ceiling.
    pub fn match_gene(&self, gene: &str, calls: &[SampleCall]) -> Result<GeneMatchResult, MatchError> {
        let definitions = self.lookup(gene)?;
        check_alignment(definitions, calls)?;

        for call in calls {
            let undeclared = call.undeclared_alleles();
            if !undeclared.is_empty() {
                warn!(
                    "{gene}: {}:{} has alleles {:?} not among declared alleles {:?}",
                    call.chromosome, call.position, undeclared, call.vcf_alleles
                );
            }
        }

        // Step 1: Drop the sample's missing positions from every definition
        let missing: BTreeSet<usize> = calls
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_missing())
            .map(|(i, _)| i)
            .collect();
        let specialized = definitions.specialize(&missing)?;

        // Step 2: Expand the calls into permutations
        let space = PermutationSpace::new(
            definitions.positions(),
            calls,
            self.config.max_unphased_heterozygous,
        )
        .map_err(|e| match e {
            PermutationError::LimitExceeded {
                heterozygous,
                limit,
            } => {
                warn!("{gene}: {heterozygous} unphased heterozygous positions, limit is {limit}");
                MatchError::CombinatorialLimitExceeded {
                    gene: gene.to_string(),
                    heterozygous,
                    limit,
                }
            }
            PermutationError::LengthMismatch { calls, positions } => {
                MatchError::SampleLengthMismatch {
                    gene: gene.to_string(),
                    expected: positions,
                    found: calls,
                }
            }
        })?;
        debug!(
            "{gene}: {} permutations ({} unphased heterozygous, {} missing)",
            space.len(),
            space.unphased_heterozygous(),
            missing.len()
        );

        // Step 3: Test every permutation against every definition
        let mut matched: Vec<(Arc<HaplotypeDefinition>, Vec<usize>)> = specialized
            .par_iter()
            .filter_map(|def| {
                let hits = matching_permutations(&space, def);
                (!hits.is_empty()).then(|| (Arc::clone(def), hits))
            })
            .collect();
        debug!("{gene}: {} curated definitions matched", matched.len());

        // Step 4: Build combinations for permutations nothing explains
        if self.config.find_combinations {
            for def in synthesize_combinations(&space, &specialized, &matched)? {
                let hits = matching_permutations(&space, &def);
                if hits.is_empty() {
                    continue;
                }
                debug!("{gene}: synthesized {}", def.name());
                matched.push((Arc::new(def), hits));
            }
        }

        // Step 5: Score and rank
        let mut matches: Vec<MatchResult> = matched
            .into_iter()
            .map(|(definition, permutations)| {
                let score = MatchScore::calculate(&definition, &space, &permutations);
                MatchResult {
                    definition,
                    permutations,
                    score,
                }
            })
            .collect();
        matches.sort_by(|a, b| {
            b.score
                .score
                .cmp(&a.score.score)
                .then_with(|| a.definition.cmp(&b.definition))
        });

        // Step 6: Pair up everything that matched
        let haplotypes: Vec<ScoredHaplotype> = matches
            .iter()
            .map(|m| ScoredHaplotype::new(Arc::clone(&m.definition), m.score.score))
            .collect();
        let diplotypes = assemble_pairs(&haplotypes);

        let missing_positions = missing
            .iter()
            .map(|&i| definitions.positions()[i].clone())
            .collect();

        Ok(GeneMatchResult {
            gene: gene.to_string(),
            space,
            matches,
            diplotypes,
            missing_positions,
        })
    }

    /// Match every gene of one sample.
    ///
    /// # Errors
    ///
    /// Only fails if the worker pool cannot be built; per-gene failures are reported
    /// inside the result.
    pub fn match_sample(&self, sample: &SampleCalls) -> Result<SampleMatchResult, MatchError> {
        let mut results = self.match_samples(std::slice::from_ref(sample))?;
        Ok(results.remove(0))
    }

    /// Match many samples, one task per (sample, gene).
    ///
    /// Results come back in input order regardless of which tasks finish first.
    ///
    /// # Errors
    ///
    /// Only fails if the worker pool cannot be built.
    pub fn match_samples(&self, samples: &[SampleCalls]) -> Result<Vec<SampleMatchResult>, MatchError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads.unwrap_or(0))
            .build()?;

        let tasks: Vec<(usize, &str, &[SampleCall])> = samples
            .iter()
            .enumerate()
            .flat_map(|(i, sample)| {
                sample
                    .genes
                    .iter()
                    .map(move |(gene, calls)| (i, gene.as_str(), calls.as_slice()))
            })
            .collect();

        let outcomes: Vec<(usize, String, Result<GeneMatchResult, MatchError>)> = pool.install(|| {
            tasks
                .par_iter()
                .map(|&(i, gene, calls)| (i, gene.to_string(), self.match_gene(gene, calls)))
                .collect()
        });

        let mut results: Vec<SampleMatchResult> = samples
            .iter()
            .map(|s| SampleMatchResult {
                sample: s.sample.clone(),
                genes: BTreeMap::new(),
            })
            .collect();
        for (i, gene, outcome) in outcomes {
            if let Err(e) = &outcome {
                warn!("{}: {e}", results[i].sample);
            }
            results[i].genes.insert(gene, outcome);
        }
        Ok(results)
    }

    fn lookup(&self, gene: &str) -> Result<&'a GeneDefinitions, MatchError> {
        if let Some(definitions) = self.catalog.get(gene) {
            return Ok(definitions);
        }
        match self.catalog.rejection(gene) {
            Some(reason) => Err(MatchError::RejectedGene {
                gene: gene.to_string(),
                reason: reason.to_string(),
            }),
            None => Err(MatchError::UnknownGene {
                gene: gene.to_string(),
            }),
        }
    }
}

fn check_alignment(definitions: &GeneDefinitions, calls: &[SampleCall]) -> Result<(), MatchError> {
    let positions = definitions.positions();
    if calls.len() != positions.len() {
        return Err(MatchError::SampleLengthMismatch {
            gene: definitions.gene().to_string(),
            expected: positions.len(),
            found: calls.len(),
        });
    }
    let misaligned = positions
        .iter()
        .zip(calls)
        .enumerate()
        .find(|(_, (p, c))| !p.same_locus(&c.chromosome, c.position));
    if let Some((index, (position, call))) = misaligned {
        return Err(MatchError::SampleMisaligned {
            gene: definitions.gene().to_string(),
            index,
            expected: format!("{}:{}", position.chromosome, position.position),
            found: format!("{}:{}", call.chromosome, call.position),
        });
    }
    Ok(())
}

/// Indices of the permutations `definition` matches
fn matching_permutations(space: &PermutationSpace, definition: &HaplotypeDefinition) -> Vec<usize> {
    (0..space.len())
        .filter(|&idx| definition.pattern().matches_with(|pos| space.call(idx, pos)))
        .collect()
}

/// Derived definitions for every permutation no matched definition explains,
/// deduplicated by allele content.
fn synthesize_combinations(
    space: &PermutationSpace,
    specialized: &[Arc<HaplotypeDefinition>],
    matched: &[(Arc<HaplotypeDefinition>, Vec<usize>)],
) -> Result<Vec<HaplotypeDefinition>, MatchError> {
    // Larger definitions get first claim on a permutation's deviations
    let mut candidates: Vec<Arc<HaplotypeDefinition>> = specialized.to_vec();
    candidates.sort_by(|a, b| b.score().cmp(&a.score()).then_with(|| a.cmp(b)));

    let raws: Vec<RawDefinition> = (0..space.len())
        .into_par_iter()
        .filter(|&idx| {
            let explaining: Vec<&HaplotypeDefinition> = matched
                .iter()
                .filter(|(_, hits)| hits.binary_search(&idx).is_ok())
                .map(|(def, _)| def.as_ref())
                .collect();
            !combination::is_explained(space, idx, &explaining)
        })
        .filter_map(|idx| combination::synthesize(space, idx, &candidates))
        .collect();

    let mut seen: HashSet<Vec<Option<String>>> = HashSet::new();
    let mut out = Vec::new();
    for raw in raws {
        if seen.insert(raw.alleles.clone()) {
            out.push(raw.initialize(space.positions())?);
        }
    }
    Ok(out)
}
