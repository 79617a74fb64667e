//! `ripple dependents` command implementation.

use std::path::Path;

use colored::Colorize;

use super::display::{print_dependents, relative};
use super::Context;

/// Run the dependents command.
pub fn run(
    ctx: &Context,
    file: &Path,
    transitive: bool,
    depth: Option<usize>,
) -> Result<(), ripple::Error> {
    let engine = ctx.engine()?;
    let root = engine.root()?;
    let target = engine.identity(file)?;

    let direct = engine.dependents(&target, false, 1)?;
    println!("Dependents of {}:", relative(root, &target).cyan().bold());
    println!();
    println!(
        "  {} ({} files):",
        "Direct dependents".white().bold(),
        direct.len().to_string().green()
    );
    print_dependents(root, &direct, "(none)");

    if transitive {
        let all = engine.dependents(&target, true, ctx.depth(depth))?;
        let indirect: Vec<_> = all.into_iter().filter(|d| d.distance > 1).collect();
        println!();
        println!(
            "  {} ({} files):",
            "Transitive dependents".white().bold(),
            indirect.len().to_string().yellow()
        );
        print_dependents(root, &indirect, "(none beyond direct)");
    }

    Ok(())
}
