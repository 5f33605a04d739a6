//! Command-line interface for allele-matcher.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **call**: Match samples' calls against a definition catalog
//! - **definitions**: List or show the genes and definitions in a catalog
//!
//! ## Usage
//!
//! ```text
//! # Call every gene for every sample
//! allele-matcher call --definitions defs.json --samples samples.json
//!
//! # One gene only, JSON output for scripting
//! allele-matcher call --definitions defs.json --samples samples.json --gene CYP2C19 --format json
//!
//! # Inspect the catalog
//! allele-matcher definitions list --definitions defs.json
//! allele-matcher definitions show CYP2C19 --definitions defs.json
//! ```

use clap::{Parser, Subcommand};

pub mod call;
pub mod definitions;

#[derive(Parser)]
#[command(name = "allele-matcher")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Match sample genotypes against curated haplotype definitions")]
#[command(
    long_about = "allele-matcher calls star-allele haplotypes and diplotypes from per-position sample genotypes.\n\nIt expands each sample's calls into candidate chromosome copies and matches them against a catalog of curated definitions, providing:\n- Ranked haplotype matches with wobble-aware scores\n- Every candidate diplotype in a deterministic order\n- Synthesized combination calls when no curated definition explains the data"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Call haplotypes and diplotypes for samples
    Call(call::CallArgs),

    /// Inspect a definition catalog
    Definitions(definitions::DefinitionsArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
