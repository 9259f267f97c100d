//! `owlgraph` — load RDF/OWL documents into an entity graph and report
//! what came out.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use owlgraph_ingest::rdf::{self, RdfFormat};
use owlgraph_ingest::{EngineConfig, LoadReport, Severity, TripleEngine};
use owlgraph_model::{EntityKind, KnowledgeGraph};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "owlgraph", version, about = "RDF/OWL triple-ingestion engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load one or more RDF documents and print graph statistics.
    Load {
        /// Input files (.nt, .ttl, .rdf, .owl, .xml).
        files: Vec<PathBuf>,

        /// Force an input format instead of inferring from extensions.
        #[arg(long, value_parser = parse_format)]
        format: Option<RdfFormat>,

        /// Emit the report as JSON instead of human-readable text.
        #[arg(long)]
        json: bool,

        /// Drop statements referencing undefined names instead of
        /// creating placeholder entities for them.
        #[arg(long)]
        no_untyped: bool,
    },
}

fn parse_format(s: &str) -> Result<RdfFormat, String> {
    match s {
        "nt" => Ok(RdfFormat::NTriples),
        "ttl" => Ok(RdfFormat::Turtle),
        "xml" | "rdf" => Ok(RdfFormat::RdfXml),
        other => Err(format!("unknown format `{other}` (expected nt, ttl, or xml)")),
    }
}

#[derive(Serialize)]
struct JsonReport {
    entity_counts: BTreeMap<String, usize>,
    report: LoadReport,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Load {
            files,
            format,
            json,
            no_untyped,
        } => load(files, format, json, no_untyped),
    }
}

fn load(
    files: Vec<PathBuf>,
    format: Option<RdfFormat>,
    json: bool,
    no_untyped: bool,
) -> Result<()> {
    if files.is_empty() {
        return Err(anyhow!("no input files"));
    }

    let config = EngineConfig {
        create_untyped_resources: !no_untyped,
    };
    let mut engine = TripleEngine::new(KnowledgeGraph::new(), config);

    for path in &files {
        match format {
            Some(f) => {
                let reader = BufReader::new(File::open(path)?);
                let locator = format!("file://{}", path.display());
                rdf::load_reader(&mut engine, reader, f, &locator)?;
            }
            None => rdf::load_file(&mut engine, path)?,
        }
        tracing::info!(file = %path.display(), "loaded document");
    }

    let report = engine.end_of_stream();
    let graph = engine.into_graph();
    let counts = entity_counts(&graph);

    if json {
        let out = JsonReport {
            entity_counts: counts,
            report,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        if out.report.has_high_severity() {
            std::process::exit(1);
        }
        return Ok(());
    }

    println!(
        "{} {} statements, {} entities",
        "loaded".green().bold(),
        report.triples_seen,
        report.entities_created
    );
    for (kind, count) in &counts {
        println!("  {kind:<20} {count}");
    }
    if report.triples_deferred > 0 {
        println!(
            "  {:<20} {}",
            "deferred (replayed)".dimmed(),
            report.triples_deferred
        );
    }
    if report.triples_dropped > 0 {
        println!("  {:<20} {}", "dropped".yellow(), report.triples_dropped);
    }
    for diagnostic in &report.diagnostics {
        let tag = match diagnostic.severity {
            Severity::High => "error".red().bold(),
            Severity::Warning => "warning".yellow(),
        };
        eprintln!("{tag}: {diagnostic}");
    }
    if report.halted {
        eprintln!("{}", "load halted on an internal invariant violation".red());
    }
    if report.has_high_severity() {
        std::process::exit(1);
    }
    Ok(())
}

fn entity_counts(graph: &KnowledgeGraph) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for entity in graph.user_entities() {
        let bucket = match entity.kind {
            EntityKind::Property(_) => "property".to_string(),
            EntityKind::Logical(_) => "logical-expression".to_string(),
            EntityKind::Untyped(_) => "untyped".to_string(),
            other => other.to_string(),
        };
        *counts.entry(bucket).or_default() += 1;
    }
    counts
}
