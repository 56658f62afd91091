//! `trackside init` command - Create the listing tables

use console::style;
use miette::Result;

use crate::cli::helpers::{open_database, repository};
use crate::cli::GlobalOpts;
use crate::resources::{Event, Race};

#[derive(clap::Args, Debug)]
pub struct InitArgs {}

pub fn run(_args: InitArgs, global: &GlobalOpts) -> Result<()> {
    let db = open_database(global)?;

    repository::<Race>(&db)?;
    repository::<Event>(&db)?;

    if !global.quiet {
        let location = db
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| ":memory:".to_string());
        println!("{} Initialized database at {}", style("✓").green(), style(location).cyan());
    }

    Ok(())
}
