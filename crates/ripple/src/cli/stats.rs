//! `ripple stats` command implementation.

use colored::Colorize;

use super::display::relative;
use super::Context;

/// Run the stats command.
pub fn run(ctx: &Context) -> Result<(), ripple::Error> {
    let engine = ctx.engine()?;
    let root = engine.root()?;
    let stats = engine.stats()?;

    println!("{}", "Ripple Dependency Graph Statistics".cyan().bold());
    println!();
    println!("  {}: {}", "Project".white().bold(), root.display());
    println!();

    println!(
        "  {}: {} discovered, {} parsed, {} skipped",
        "Files".white().bold(),
        stats.files_discovered.to_string().green(),
        stats.files_parsed.to_string().green(),
        stats.files_skipped.to_string().yellow()
    );
    println!(
        "  {}: {}",
        "Import edges".white().bold(),
        stats.edges.to_string().green()
    );
    println!(
        "  {}: {}",
        "Unresolved imports".white().bold(),
        stats.unresolved_imports
    );
    println!(
        "  {}: {} ms",
        "Build time".white().bold(),
        stats.duration.as_millis()
    );

    if !stats.errors.is_empty() {
        println!();
        println!(
            "  {} ({}):",
            "Extraction errors".yellow().bold(),
            stats.errors.len()
        );
        for error in &stats.errors {
            println!(
                "    {} {}: {} ({})",
                "•".dimmed(),
                relative(root, &error.path),
                error.message,
                error.kind.to_string().dimmed()
            );
        }
    }

    if !stats.directories_skipped.is_empty() {
        println!();
        println!(
            "  {} ({}):",
            "Unreadable directories".yellow().bold(),
            stats.directories_skipped.len()
        );
        for (dir, reason) in &stats.directories_skipped {
            println!("    {} {}: {}", "•".dimmed(), relative(root, dir), reason.dimmed());
        }
    }

    Ok(())
}
