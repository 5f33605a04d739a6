use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::catalog::store::DefinitionCatalog;
use crate::cli::OutputFormat;

#[derive(Args)]
pub struct DefinitionsArgs {
    #[command(subcommand)]
    pub command: DefinitionsCommands,
}

#[derive(Subcommand)]
pub enum DefinitionsCommands {
    /// List all genes in the catalog
    List {
        /// Definition catalog (JSON)
        #[arg(long, required = true)]
        definitions: PathBuf,
    },

    /// Show the positions and definitions of one gene
    Show {
        /// Gene symbol
        #[arg(required = true)]
        gene: String,

        /// Definition catalog (JSON)
        #[arg(long, required = true)]
        definitions: PathBuf,
    },
}

pub fn run(args: DefinitionsArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    match args.command {
        DefinitionsCommands::List { definitions } => run_list(definitions, format, verbose),
        DefinitionsCommands::Show { gene, definitions } => run_show(&gene, definitions, format),
    }
}

fn run_list(path: PathBuf, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let catalog = DefinitionCatalog::load_from_file(&path)?;

    if verbose {
        eprintln!("Loaded catalog with {} genes", catalog.len());
    }

    match format {
        OutputFormat::Text => {
            let gene_width = catalog
                .genes()
                .iter()
                .map(|g| g.gene().len())
                .max()
                .unwrap_or(4)
                .max(4);

            println!("Definition Catalog ({} genes)\n", catalog.len());
            println!(
                "{:<gene_w$} {:<12} {:>9} {:>11}",
                "Gene",
                "Reference",
                "Positions",
                "Definitions",
                gene_w = gene_width
            );
            println!("{}", "-".repeat(gene_width + 35));
            for gene in catalog.genes() {
                println!(
                    "{:<gene_w$} {:<12} {:>9} {:>11}",
                    gene.gene(),
                    gene.reference().name(),
                    gene.positions().len(),
                    gene.len(),
                    gene_w = gene_width
                );
            }
        }
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = catalog
                .genes()
                .iter()
                .map(|g| {
                    serde_json::json!({
                        "gene": g.gene(),
                        "reference": g.reference().name(),
                        "positions": g.positions().len(),
                        "definitions": g.len(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("gene\treference\tpositions\tdefinitions");
            for g in catalog.genes() {
                println!(
                    "{}\t{}\t{}\t{}",
                    g.gene(),
                    g.reference().name(),
                    g.positions().len(),
                    g.len()
                );
            }
        }
    }

    Ok(())
}

fn run_show(gene: &str, path: PathBuf, format: OutputFormat) -> anyhow::Result<()> {
    let catalog = DefinitionCatalog::load_from_file(&path)?;

    let definitions = match catalog.get(gene) {
        Some(definitions) => definitions,
        None => match catalog.rejection(gene) {
            Some(reason) => anyhow::bail!("Gene '{}' was rejected: {}", gene, reason),
            None => anyhow::bail!("Gene '{}' not found", gene),
        },
    };

    match format {
        OutputFormat::Text => {
            println!("Gene: {}\n", definitions.gene());
            println!("Positions:");
            for (i, position) in definitions.positions().iter().enumerate() {
                println!("  {:>3}  {}", i, position);
            }

            let name_width = definitions
                .definitions()
                .iter()
                .map(|d| d.name().len())
                .max()
                .unwrap_or(4)
                .max(4);

            println!("\nDefinitions:");
            for def in definitions.definitions() {
                let calls: Vec<&str> = def
                    .alleles()
                    .iter()
                    .map(|a| a.as_deref().unwrap_or("-"))
                    .collect();
                println!(
                    "  {:<name_w$} {:<14} {}{}",
                    def.name(),
                    def.id().as_str(),
                    calls.join(" "),
                    if def.is_reference() { "  (reference)" } else { "" },
                    name_w = name_width
                );
            }
        }
        OutputFormat::Json => {
            let named: Vec<_> = definitions.definitions().iter().map(|d| d.raw()).collect();
            let output = serde_json::json!({
                "gene": definitions.gene(),
                "positions": &definitions.positions()[..],
                "namedAlleles": named,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            let header: Vec<String> = definitions
                .positions()
                .iter()
                .map(|p| p.position.to_string())
                .collect();
            println!("id\tname\treference\t{}", header.join("\t"));
            for def in definitions.definitions() {
                let calls: Vec<&str> = def
                    .alleles()
                    .iter()
                    .map(|a| a.as_deref().unwrap_or(""))
                    .collect();
                println!(
                    "{}\t{}\t{}\t{}",
                    def.id(),
                    def.name(),
                    def.is_reference(),
                    calls.join("\t")
                );
            }
        }
    }

    Ok(())
}
