//! Rules command: compile, inspect and cache the rule table.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use console::style;

use cardsweep_core::{builtin_rows, CompiledRules};

/// Arguments for the rules command.
#[derive(Args)]
pub struct RulesArgs {
    /// Rule table CSV (network,ranges,length); builtin rules when omitted
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Write the compiled snapshot to this path as JSON
    #[arg(long)]
    cache: Option<PathBuf>,
}

pub fn run(args: RulesArgs, _config_path: Option<&str>) -> anyhow::Result<()> {
    let rows = match &args.rules {
        Some(path) => super::load_rule_rows(path)?,
        None => builtin_rows(),
    };
    let row_count = rows.len();
    let rules = CompiledRules::from_rows(rows);
    let table = rules.snapshot();

    println!("{} {} rule rows compiled", style("ℹ").blue(), row_count);
    println!("   {} fixed prefixes", table.fixed.len());
    println!(
        "   {} interval rows at prefix widths {:?}",
        table.intervals.len(),
        rules.interval_widths()
    );

    if let Some(cache) = &args.cache {
        let json = serde_json::to_string(table)?;
        fs::write(cache, json)
            .with_context(|| format!("failed to write snapshot to {}", cache.display()))?;
        println!(
            "{} Snapshot written to {}",
            style("✓").green(),
            cache.display()
        );
    }

    Ok(())
}
