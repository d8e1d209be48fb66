//! ldcontext CLI: JSON-LD context generator for Turtle ontologies.
//!
//! Scans the ontology tree under a project root and prints (or writes) the
//! `@context` document covering its prefixes and properties.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
