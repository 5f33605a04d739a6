//! # allele-matcher
//!
//! A library for calling star-allele haplotypes and diplotypes from sample genotypes.
//!
//! Pharmacogenes are described by curated haplotype definitions ("named alleles"):
//! a call at each of a fixed set of positions, where some calls are ambiguity codes
//! and some positions are left undefined. A sample's genotype at those positions
//! does not say which alleles sit on the same chromosome unless it is phased.
//!
//! `allele-matcher` expands a sample's calls into every chromosome copy they allow,
//! matches each copy against the curated definitions, and reports the ranked matches
//! and every candidate diplotype in a deterministic order.
//!
//! ## Features
//!
//! - **Phase-aware expansion**: Phased data yields two copies, unphased
//!   heterozygous positions are combined, with a configurable ceiling
//! - **IUPAC matching**: Ambiguity codes match any base they stand for
//! - **Wobble-aware scoring**: Ambiguity codes only count when the data uses them
//! - **Missing data**: Positions without a call never disqualify or score
//! - **Combination calls**: Unexplained copies get a synthesized definition
//! - **Parallel**: One task per sample and gene on a rayon pool
//!
//! ## Example
//!
//! ```rust,no_run
//! use allele_matcher::{DefinitionCatalog, MatchingEngine};
//! use allele_matcher::core::sample::{Genotype, SampleCall};
//! use std::path::Path;
//!
//! let catalog = DefinitionCatalog::load_from_file(Path::new("definitions.json")).unwrap();
//! let calls = vec![SampleCall::new("chr10", 94_781_859, Genotype::diploid("G", "A"), false)];
//!
//! let engine = MatchingEngine::new(&catalog);
//! let result = engine.match_gene("CYP2C19", &calls).unwrap();
//!
//! for m in &result.matches {
//!     println!("{}: {}", m.name(), m.score.score);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Definition catalog storage and validation
//! - [`core`]: Core data types for positions, definitions and sample calls
//! - [`matching`]: Permutation, matching, scoring, synthesis and pairing
//! - [`cli`]: Command-line interface implementation
//! - [`utils`]: Natural name ordering

pub mod catalog;
pub mod cli;
pub mod core;
pub mod matching;
pub mod utils;

// Re-export commonly used types for convenience
pub use catalog::store::{DefinitionCatalog, GeneDefinitions};
pub use core::definition::{HaplotypeDefinition, RawDefinition};
pub use core::position::Position;
pub use core::sample::{Genotype, SampleCall, SampleCalls};
pub use core::types::*;
pub use matching::engine::{
    GeneMatchResult, MatchError, MatchResult, MatchingConfig, MatchingEngine, SampleMatchResult,
};
pub use matching::pairs::{DiplotypeCandidate, ScoredHaplotype};
