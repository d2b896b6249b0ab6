mod config;
mod format;
mod parse;
mod sim;
mod system;

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};

use anyhow::Context;
use clap::Parser;
use log::debug;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use crate::config::{Cli, FileConfig, Settings};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    // logs go to stderr, stdout only carries the simulation output
    TermLogger::init(cli.log_level, Config::default(), TerminalMode::Stderr, ColorChoice::Auto)?;

    let file = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(&cli, file);
    debug!("Running with {settings:?}");

    let input = match &cli.input {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            parse::parse(BufReader::new(file))
        }
        None => parse::parse(io::stdin().lock()),
    }
    .context("invalid input")?;
    debug!(
        "Parsed {} nodes, {} topology edges, {} updates",
        input.nodes.len(),
        input.topology.len(),
        input.updates.len()
    );

    let mut out = BufWriter::new(io::stdout().lock());
    sim::simulate(&input, &settings, &mut out)?;
    out.flush()?;
    Ok(())
}
