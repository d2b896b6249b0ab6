use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use dvsim::framework::ProtocolParams;
use log::LevelFilter;
use serde::Deserialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Policy {
    /// every neighbour receives the full distance vector
    #[default]
    Plain,
    /// routes are never advertised back to where they were learned from
    SplitHorizon,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "dvsim", about = "Simulates distance-vector routing convergence")]
pub struct Cli {
    /// input description, reads stdin if omitted
    pub input: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub policy: Option<Policy>,

    /// safety bound on the number of rounds per convergence run
    #[arg(long)]
    pub max_rounds: Option<usize>,

    /// JSON file with `policy` and `protocol` settings
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[arg(long, default_value_t = LevelFilter::Warn)]
    pub log_level: LevelFilter,
}

/// Settings read from the config file, every field is optional
#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub policy: Option<Policy>,
    pub protocol: Option<ProtocolParams>,
}

impl FileConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&data).with_context(|| format!("parsing config {}", path.display()))
    }
}

/// Effective settings for a simulation run
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub policy: Policy,
    pub params: ProtocolParams,
    pub format: OutputFormat,
}

impl Settings {
    /// Command line flags win over the config file, which wins over the defaults
    pub fn resolve(cli: &Cli, file: FileConfig) -> Self {
        let mut params = file.protocol.unwrap_or_default();
        if let Some(max_rounds) = cli.max_rounds {
            params.max_rounds = max_rounds;
        }
        Self {
            policy: cli.policy.or(file.policy).unwrap_or_default(),
            params,
            format: cli.format,
        }
    }
}
