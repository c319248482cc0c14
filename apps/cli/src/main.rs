//! bibcloud CLI: word-cloud text from bibliographies and PDF documents.
//!
//! Pulls titles, abstracts and keywords out of `.bib` files and page text out
//! of PDFs, then writes a cleaned token stream and its frequency table.

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
