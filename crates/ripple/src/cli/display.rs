//! Common display utilities for CLI commands.

use std::collections::BTreeSet;
use std::path::Path;

use colored::{ColoredString, Colorize};
use ripple::{RiskLevel, RiskTag, TransitiveDependent};

const MAX_DISPLAY_ITEMS: usize = 10;

/// Path relative to the project root, for display.
pub fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Risk level colored by severity.
pub fn colored_level(level: RiskLevel) -> ColoredString {
    match level {
        RiskLevel::Critical => level.as_str().red().bold(),
        RiskLevel::High => level.as_str().red(),
        RiskLevel::Medium => level.as_str().yellow(),
        RiskLevel::Low => level.as_str().green(),
    }
}

/// Comma-separated tags, or a dimmed placeholder.
pub fn format_tags(tags: &BTreeSet<RiskTag>) -> String {
    if tags.is_empty() {
        return "(none)".dimmed().to_string();
    }
    tags.iter()
        .map(RiskTag::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Display a list of dependent files with optional truncation.
///
/// Shows up to `MAX_DISPLAY_ITEMS` files with bullet points. If there are more,
/// shows "... and N more". If empty, shows the provided `empty_message`.
pub fn print_dependents(root: &Path, dependents: &[TransitiveDependent], empty_message: &str) {
    if dependents.is_empty() {
        println!("    {}", empty_message.dimmed());
        return;
    }

    for dep in dependents.iter().take(MAX_DISPLAY_ITEMS) {
        println!(
            "    {} {} {}",
            "•".dimmed(),
            relative(root, &dep.path),
            format!("(distance {})", dep.distance).dimmed()
        );
    }

    if dependents.len() > MAX_DISPLAY_ITEMS {
        println!(
            "    {} ... and {} more",
            "•".dimmed(),
            dependents.len() - MAX_DISPLAY_ITEMS
        );
    }
}
