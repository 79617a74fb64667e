//! `ripple definition` command implementation.

use colored::Colorize;

use super::display::relative;
use super::Context;

/// Run the definition command.
pub fn run(ctx: &Context, symbol: &str) -> Result<(), ripple::Error> {
    let mut engine = ctx.engine()?;
    let locations = engine.find_symbol_definition(symbol)?;
    let root = engine.root()?;

    if locations.is_empty() {
        println!("No declaration of \"{}\" found.", symbol.cyan());
        return Ok(());
    }

    println!(
        "Found {} declaration(s) of \"{}\":",
        locations.len().to_string().green(),
        symbol.cyan().bold()
    );
    for location in &locations {
        println!(
            "    {} {}:{}",
            "•".dimmed(),
            relative(root, &location.file_identity),
            location.line
        );
    }

    Ok(())
}
