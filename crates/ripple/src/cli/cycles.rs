//! `ripple cycles` command implementation.

use colored::Colorize;

use super::display::relative;
use super::Context;

/// Run the cycles command.
pub fn run(ctx: &Context) -> Result<(), ripple::Error> {
    let engine = ctx.engine()?;
    let root = engine.root()?;

    let cycles = engine.detect_cycles()?;

    if cycles.is_empty() {
        println!("{}", "No circular imports detected.".green());
        return Ok(());
    }

    println!(
        "Found {} circular import chains:",
        cycles.len().to_string().red().bold()
    );
    println!();

    for (i, cycle) in cycles.iter().enumerate() {
        println!("  {} {}:", "Cycle".yellow().bold(), i + 1);

        let mut path_str = cycle
            .files
            .iter()
            .map(|p| relative(root, p))
            .collect::<Vec<_>>()
            .join(" → ");

        // Repeat the first file to show the cycle closes
        if let Some(first) = cycle.files.first() {
            path_str.push_str(" → ");
            path_str.push_str(&relative(root, first));
        }

        println!("    {}", path_str.dimmed());
    }

    Ok(())
}
