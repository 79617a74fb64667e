//! `ripple tags` command implementation.

use std::path::Path;

use colored::Colorize;
use ripple::{RiskLevel, RiskTagger};

use super::display::{colored_level, format_tags};
use super::Context;

/// Run the tags command. Only the risk tables are needed; no project is loaded.
pub fn run(ctx: &Context, path: &Path, symbols: &[String]) {
    let tagger = RiskTagger::new(ctx.config.risk.clone());

    let file_tags = tagger.tag_file(path);
    let symbol_tags = tagger.tag_symbols(symbols);
    let all = tagger.tag_all(path, symbols);
    let score = tagger.calculate_risk_score(&all);

    println!("Risk tags for {}:", path.display().to_string().cyan().bold());
    println!();
    println!("  {}: {}", "Path".white().bold(), format_tags(&file_tags));
    if !symbols.is_empty() {
        println!("  {}: {}", "Symbols".white().bold(), format_tags(&symbol_tags));
    }
    println!(
        "  {}: {} ({})",
        "Score".white().bold(),
        score.to_string().bold(),
        colored_level(RiskLevel::from_score(score))
    );
}
