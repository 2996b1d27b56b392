//! Command-line front end for rapip: times a URL through each transport
//! and prints the resulting metrics records.

use clap::ValueEnum;

pub mod commands;

/// How measured records are written to stdout
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// One styled block per transport
    Pretty,
    /// The records as a JSON array, field names in camelCase
    Json,
    /// One row per transport, proxy columns blank when absent
    Table,
}

impl OutputFormat {
    /// Name accepted by `--format`
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Pretty => "pretty",
            OutputFormat::Json => "json",
            OutputFormat::Table => "table",
        }
    }
}
