use std::path::{Path, PathBuf};

use clap::Args;

use crate::catalog::store::DefinitionCatalog;
use crate::cli::OutputFormat;
use crate::core::sample::SampleCalls;
use crate::matching::engine::{
    GeneMatchResult, MatchError, MatchingConfig, MatchingEngine, SampleMatchResult,
};
use crate::matching::permutation::DEFAULT_MAX_UNPHASED_HETEROZYGOUS;

#[derive(Args)]
pub struct CallArgs {
    /// Definition catalog (JSON)
    #[arg(long, required = true)]
    pub definitions: PathBuf,

    /// Sample calls (JSON array of samples)
    #[arg(long, required = true)]
    pub samples: PathBuf,

    /// Only call this gene
    #[arg(long)]
    pub gene: Option<String>,

    /// Most unphased heterozygous positions combined per gene
    #[arg(long = "max-unphased-het", default_value_t = DEFAULT_MAX_UNPHASED_HETEROZYGOUS)]
    pub max_unphased_het: usize,

    /// Do not synthesize combination calls
    #[arg(long)]
    pub no_combinations: bool,

    /// Number of worker threads (defaults to the number of CPUs)
    #[arg(short, long)]
    pub threads: Option<usize>,
}

pub fn run(args: CallArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let catalog = DefinitionCatalog::load_from_file(&args.definitions)?;
    if verbose {
        eprintln!("Loaded catalog with {} genes", catalog.len());
    }

    let mut samples = load_samples(&args.samples)?;
    if let Some(gene) = &args.gene {
        if catalog.get(gene).is_none() && catalog.rejection(gene).is_none() {
            anyhow::bail!("Gene '{}' not found in catalog", gene);
        }
        for sample in &mut samples {
            sample.genes.retain(|g, _| g == gene);
        }
    }
    if verbose {
        eprintln!("Loaded {} samples", samples.len());
    }

    let config = MatchingConfig {
        max_unphased_heterozygous: args.max_unphased_het,
        find_combinations: !args.no_combinations,
        threads: args.threads,
    };
    let engine = MatchingEngine::with_config(&catalog, config);
    let results = engine.match_samples(&samples)?;

    match format {
        OutputFormat::Text => print_text_results(&results, verbose),
        OutputFormat::Json => print_json_results(&results)?,
        OutputFormat::Tsv => print_tsv_results(&results),
    }

    Ok(())
}

fn load_samples(path: &Path) -> anyhow::Result<Vec<SampleCalls>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
    let samples: Vec<SampleCalls> = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
    Ok(samples)
}

fn print_text_results(results: &[SampleMatchResult], verbose: bool) {
    for sample in results {
        println!("Sample: {}", sample.sample);
        for (gene, outcome) in &sample.genes {
            match outcome {
                Ok(result) => print_gene_text(result, verbose),
                Err(e) => println!("\n  {gene}: ERROR {e}"),
            }
        }
        println!();
    }
}

fn print_gene_text(result: &GeneMatchResult, verbose: bool) {
    println!(
        "\n  {} ({} permutations{})",
        result.gene,
        result.space.len(),
        if result.space.is_phased() { ", phased" } else { "" }
    );

    if result.matches.is_empty() {
        println!("    No matching haplotypes");
        return;
    }

    let name_width = result
        .matches
        .iter()
        .map(|m| m.name().len())
        .max()
        .unwrap_or(4)
        .max(4);

    println!(
        "    {:<name_w$} {:>5} {:<12}",
        "Haplotype",
        "Score",
        "Kind",
        name_w = name_width
    );
    for m in &result.matches {
        println!(
            "    {:<name_w$} {:>5} {:<12}",
            m.name(),
            m.score.score,
            m.kind().to_string(),
            name_w = name_width
        );
        if verbose {
            for permutation in result.matched_permutations(m) {
                println!("      {}", permutation.key());
            }
        }
    }

    println!("\n    Diplotypes:");
    for pair in &result.diplotypes {
        println!("      {:<30} {:>5}", pair.name(), pair.score());
    }

    if !result.missing_positions.is_empty() {
        let missing: Vec<String> = result
            .missing_positions
            .iter()
            .map(ToString::to_string)
            .collect();
        println!("\n    Missing: {}", missing.join(", "));
    }
}

fn gene_json(outcome: &Result<GeneMatchResult, MatchError>) -> serde_json::Value {
    match outcome {
        Ok(result) => serde_json::json!({
            "permutations": result.space.len(),
            "unphasedHeterozygous": result.space.unphased_heterozygous(),
            "phased": result.space.is_phased(),
            "matches": result.matches.iter().map(|m| serde_json::json!({
                "id": m.definition.id(),
                "name": m.name(),
                "kind": m.kind(),
                "score": m.score.score,
                "baseScore": m.score.base,
                "uninformativeWobbles": m.score.uninformative_wobbles,
                "numCombinations": m.definition.num_combinations(),
                "numPartials": m.definition.num_partials(),
                "alleles": m.definition.alleles(),
                "matchedPermutations": result
                    .matched_permutations(m)
                    .map(|p| p.key().to_string())
                    .collect::<Vec<_>>(),
            })).collect::<Vec<_>>(),
            "diplotypes": result.diplotypes.iter().map(|d| serde_json::json!({
                "name": d.name(),
                "haplotypes": [d.first().name(), d.second().name()],
                "score": d.score(),
            })).collect::<Vec<_>>(),
            "missingPositions": result.missing_positions,
        }),
        Err(e) => serde_json::json!({ "error": e.to_string() }),
    }
}

fn print_json_results(results: &[SampleMatchResult]) -> anyhow::Result<()> {
    let output: Vec<serde_json::Value> = results
        .iter()
        .map(|sample| {
            let genes: serde_json::Map<String, serde_json::Value> = sample
                .genes
                .iter()
                .map(|(gene, outcome)| (gene.clone(), gene_json(outcome)))
                .collect();
            serde_json::json!({
                "sample": sample.sample,
                "genes": genes,
            })
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_results(results: &[SampleMatchResult]) {
    println!("sample\tgene\trank\thaplotype\tid\tkind\tscore\tnum_combinations\tnum_partials\terror");
    for sample in results {
        for (gene, outcome) in &sample.genes {
            match outcome {
                Ok(result) => {
                    for (i, m) in result.matches.iter().enumerate() {
                        println!(
                            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t",
                            sample.sample,
                            gene,
                            i + 1,
                            m.name(),
                            m.definition.id(),
                            m.kind(),
                            m.score.score,
                            m.definition.num_combinations(),
                            m.definition.num_partials(),
                        );
                    }
                }
                Err(e) => println!("{}\t{}\t\t\t\t\t\t\t\t{}", sample.sample, gene, e),
            }
        }
    }
}
