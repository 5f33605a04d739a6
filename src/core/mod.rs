//! Core data types for haplotype matching.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`Position`]: A curated genomic coordinate with its reference allele
//! - [`RawDefinition`] / [`HaplotypeDefinition`]: A named allele before and after initialization
//! - [`SampleCall`], [`Genotype`]: A sample's observed data at one position
//! - [`DefinitionId`], [`CallKind`]: Identifier and classification types
//!
//! ## Allele Calls
//!
//! Definition calls are strings aligned to the gene's positions:
//!
//! | Call | Meaning |
//! |------|---------|
//! | `A`, `C`, `G`, `T` | exactly that base |
//! | `R`, `Y`, `N`, ... | any base in the IUPAC expansion (a "wobble") |
//! | `delC`, `TA`, ... | exactly that allele string |
//! | undefined | any observed call, including a missing one |
//!
//! [`Position`]: position::Position
//! [`RawDefinition`]: definition::RawDefinition
//! [`HaplotypeDefinition`]: definition::HaplotypeDefinition
//! [`SampleCall`]: sample::SampleCall
//! [`Genotype`]: sample::Genotype
//! [`DefinitionId`]: types::DefinitionId
//! [`CallKind`]: types::CallKind

pub mod definition;
pub mod iupac;
pub mod position;
pub mod sample;
pub mod types;
