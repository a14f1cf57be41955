use std::fs;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use tracing::info;
use trimerge_merge::{MergeOutcome, MergerConfig};
use trimerge_types::Value;

use crate::cli::*;
use crate::document;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Merge(args) => cmd_merge(args),
        Command::Config(args) => cmd_config(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<MergerConfig> {
    let Some(path) = path else {
        return Ok(MergerConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

/// Config file settings, with command-line defaults layered on top.
fn effective_config(args: &MergeArgs) -> anyhow::Result<MergerConfig> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(favor) = args.favor {
        config.default_favor = favor.into();
    }
    if let Some(field) = &args.identity_field {
        config.default_identity_field = field.clone();
    }
    Ok(config)
}

fn cmd_merge(args: MergeArgs) -> anyhow::Result<()> {
    let config = effective_config(&args)?;
    let merger = config.build();

    let root = document::load(&args.root)?;
    let update = document::load(&args.update)?;
    let head = match &args.head {
        Some(path) => document::load(path)?,
        None => Value::Absent,
    };

    let outcome = merger
        .merge_with_report(&root, &head, &update)
        .context("documents cannot be merged")?;
    info!(conflicts = outcome.conflicts.len(), "merged documents");

    let text = document::render(&outcome.value, args.format)?;
    match &args.output {
        Some(path) => fs::write(path, text + "\n")
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{text}"),
    }

    if args.report {
        print_report(&outcome);
    }
    Ok(())
}

fn print_report(outcome: &MergeOutcome) {
    if outcome.is_clean() {
        eprintln!("{} Merged cleanly.", "✓".green().bold());
        return;
    }
    eprintln!(
        "{} Merged with {} automatically resolved conflict(s):",
        "!".yellow().bold(),
        outcome.conflicts.len().to_string().bold()
    );
    for conflict in &outcome.conflicts {
        eprintln!("  {} {}", "•".yellow(), conflict);
    }
}

fn cmd_config(args: ConfigArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
