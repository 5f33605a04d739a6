//! Haplotype matching engine and scoring algorithms.
//!
//! This module provides the core matching functionality:
//!
//! - [`MatchingEngine`]: Main entry point for calling a sample's genes
//! - [`PermutationSpace`]: The chromosome copies a sample's calls allow
//! - [`MatchScore`]: Wobble-aware score of a matched definition
//! - [`DiplotypeCandidate`]: An unordered pair of matched haplotypes
//!
//! ## Matching Algorithm
//!
//! For each gene of a sample:
//!
//! 1. **Specialization**: Definitions lose the positions the sample is missing
//! 2. **Permutation**: Calls expand into candidate chromosome copies; phased
//!    heterozygous positions add two threads, unphased ones double the count
//! 3. **Matching**: Every definition's per-position predicates are tested
//!    against every permutation, in parallel over definitions
//! 4. **Synthesis**: Permutations no matched definition explains get a derived
//!    combination definition such as `[*2 + g.94775367A>G]`
//! 5. **Scoring and pairing**: Matches are scored, ranked, and paired into
//!    every candidate diplotype
//!
//! ## Example
//!
//! ```rust,no_run
//! use allele_matcher::{DefinitionCatalog, MatchingEngine, SampleCalls};
//! use std::path::Path;
//!
//! let catalog = DefinitionCatalog::load_from_file(Path::new("definitions.json")).unwrap();
//! let sample = SampleCalls::new("NA12878");
//!
//! let engine = MatchingEngine::new(&catalog);
//! let result = engine.match_sample(&sample).unwrap();
//!
//! for (gene, outcome) in &result.genes {
//!     if let Ok(called) = outcome {
//!         for pair in &called.diplotypes {
//!             println!("{gene}: {pair} ({})", pair.score());
//!         }
//!     }
//! }
//! ```

pub mod combination;
pub mod engine;
pub mod pairs;
pub mod pattern;
pub mod permutation;
pub mod scoring;

pub use engine::{MatchingConfig, MatchingEngine};
pub use pairs::{DiplotypeCandidate, ScoredHaplotype};
pub use permutation::PermutationSpace;
pub use scoring::MatchScore;
