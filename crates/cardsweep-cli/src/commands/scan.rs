//! Scan command: run the extraction pipeline over document files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use cardsweep_core::{
    builtin_rows, CompiledRules, Document, ExtractionPipeline, RuleTable, ScanConfig, ScanReport,
};

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Rule table CSV (network,ranges,length); builtin rules when omitted
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Compiled rule-table cache; read when present, written after a fresh compile
    #[arg(long)]
    cache: Option<PathBuf>,

    /// Output file; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Number of parallel workers (default: available parallelism)
    #[arg(short = 'j', long)]
    jobs: Option<usize>,
}

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
}

pub fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = match config_path {
        Some(path) => ScanConfig::from_file(Path::new(path))?,
        None => ScanConfig::default(),
    };
    if args.jobs.is_some() {
        config.workers = args.jobs;
    }

    let rules = Arc::new(load_rules(&args)?);

    let documents = load_documents(&args.input)?;
    if documents.is_empty() {
        anyhow::bail!("no readable documents matched pattern: {}", args.input);
    }
    println!(
        "{} Found {} documents to scan",
        style("ℹ").blue(),
        documents.len()
    );

    let bar = ProgressBar::new(documents.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents")?
            .progress_chars("=>-"),
    );

    let bar_for_updates = bar.clone();
    let pipeline = ExtractionPipeline::new(Arc::clone(&rules), config)?
        .on_progress(move |done, _total| bar_for_updates.set_position(done as u64));

    let report = pipeline.run(&documents)?;
    bar.finish_and_clear();

    write_report(&report, args.output.as_deref(), args.format)?;

    println!(
        "{} Scanned {} documents in {:?}",
        style("✓").green(),
        documents.len(),
        start.elapsed()
    );
    println!(
        "   {} matches, {} issuer-valid, {} Luhn-valid, {} failed documents",
        report.matches.len(),
        style(report.issuer_valid_count()).green(),
        report.luhn_valid_count(),
        style(report.failure_count()).red()
    );

    Ok(())
}

/// Resolve the compiled rules: a cache snapshot when present, otherwise a
/// fresh compile from the CSV or builtin rows, written back to the cache.
fn load_rules(args: &ScanArgs) -> anyhow::Result<CompiledRules> {
    if let Some(cache) = &args.cache {
        if cache.exists() {
            let content = fs::read_to_string(cache)
                .with_context(|| format!("failed to read rule cache {}", cache.display()))?;
            let table: RuleTable = serde_json::from_str(&content)
                .with_context(|| format!("malformed rule cache {}", cache.display()))?;
            debug!(path = %cache.display(), "rule table restored from cache");
            return Ok(CompiledRules::compile(table));
        }
    }

    let rows = match &args.rules {
        Some(path) => super::load_rule_rows(path)?,
        None => builtin_rows(),
    };
    let rules = CompiledRules::from_rows(rows);

    if let Some(cache) = &args.cache {
        let json = serde_json::to_string(rules.snapshot())?;
        fs::write(cache, json)
            .with_context(|| format!("failed to write rule cache {}", cache.display()))?;
        debug!(path = %cache.display(), "rule table cached");
    }

    Ok(rules)
}

/// Expand the input pattern and read every matching file as UTF-8 text.
/// Unreadable or undecodable files are skipped with a warning.
fn load_documents(pattern: &str) -> anyhow::Result<Vec<Document>> {
    let mut documents = Vec::new();
    for entry in glob::glob(pattern).context("invalid input pattern")? {
        let path = entry?;
        if !path.is_file() {
            continue;
        }
        match fs::read_to_string(&path) {
            Ok(text) => documents.push(Document::new(path.display().to_string(), text)),
            Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable document"),
        }
    }
    Ok(documents)
}

fn write_report(
    report: &ScanReport,
    output: Option<&Path>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let content = match format {
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            for m in &report.matches {
                wtr.serialize(m)?;
            }
            String::from_utf8(wtr.into_inner()?)?
        }
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
    };

    match output {
        Some(path) => fs::write(path, content)
            .with_context(|| format!("failed to write report to {}", path.display()))?,
        None => print!("{content}"),
    }
    Ok(())
}
