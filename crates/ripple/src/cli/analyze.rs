//! `ripple analyze` command implementation.

use std::path::Path;

use colored::Colorize;
use ripple::BlastRadiusResult;

use super::display::{colored_level, format_tags, relative};
use super::Context;

/// Run the analyze command.
///
/// Returns `false` when a threshold is given and the score reaches it.
pub fn run(
    ctx: &Context,
    file: &Path,
    symbol: Option<&str>,
    depth: Option<usize>,
    json: bool,
    fail_above: Option<u8>,
) -> Result<bool, ripple::Error> {
    let engine = ctx.engine()?;
    let depth = ctx.depth(depth);

    let result = match symbol {
        Some(symbol) => engine.analyze(file, symbol, depth)?,
        None => engine.analyze_file(file, depth)?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_report(engine.root()?, &result);
    }

    let within_threshold = fail_above.is_none_or(|threshold| result.total_risk_score < threshold);
    if !within_threshold && !json {
        println!();
        println!(
            "{}: risk score {} reaches the threshold of {}",
            "blocked".red().bold(),
            result.total_risk_score,
            fail_above.unwrap_or_default()
        );
    }

    Ok(within_threshold)
}

/// Display a blast radius result.
fn print_report(root: &Path, result: &BlastRadiusResult) {
    println!(
        "Blast radius of {} in {}:",
        result.target_symbol.cyan().bold(),
        relative(root, &result.target_file).cyan()
    );
    println!();

    println!(
        "  {}: {} ({})",
        "Risk score".white().bold(),
        result.total_risk_score.to_string().bold(),
        colored_level(result.risk_level())
    );
    println!(
        "  {}: {}",
        "Risk tags".white().bold(),
        format_tags(&result.risk_tags)
    );
    println!();

    println!(
        "  {} ({} files):",
        "Impacted files".white().bold(),
        result.impacted_files.len().to_string().yellow()
    );
    if result.impacted_files.is_empty() {
        println!("    {}", "(none)".dimmed());
    }
    for file in &result.impacted_files {
        println!(
            "    {} {} {} [{}] {}",
            "•".dimmed(),
            format!("d={}", file.distance).dimmed(),
            relative(root, &file.path),
            colored_level(file.risk_level),
            format_tags(&file.risk_tags)
        );
    }
    println!();

    println!(
        "  {} ({} edges)",
        "Dependency chain".white().bold(),
        result.dependency_chain.len().to_string().green()
    );
    for edge in &result.dependency_chain {
        let symbols = if edge.symbols.is_empty() {
            String::new()
        } else {
            format!(" {{{}}}", edge.symbols.join(", "))
        };
        println!(
            "    {} {} {}{}",
            relative(root, &edge.from),
            "→".dimmed(),
            relative(root, &edge.to),
            symbols.dimmed()
        );
    }
}
