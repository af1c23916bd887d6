//! Command-line interface parsing for surfcast
//!
//! Parses arguments with clap, layers the flags over the loaded
//! [`Config`], and resolves the subcommand into a [`Request`].

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use thiserror::Error;

use crate::config::Config;

/// Error types for CLI argument handling
#[derive(Debug, Error)]
pub enum CliError {
    /// A command needs a region and neither `--region` nor the config gave one
    #[error("no region given: pass --region or set forecast.default_region in the config")]
    MissingRegion,
}

/// Surf forecasts and regional summaries for beach condition feeds
#[derive(Parser, Debug)]
#[command(name = "surfcast")]
#[command(about = "Normalized surf forecasts and regional wind/wave summaries")]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Base URL of the forecast API
    #[arg(long, global = true, env = "SURFCAST_BASE_URL", value_name = "URL")]
    pub base_url: Option<String>,

    /// Read forecasts from a local JSON dataset instead of the API
    #[arg(long, global = true, value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the forecast series of one beach
    Forecast {
        /// Beach identifier
        beach_id: i64,
        /// Region the beach belongs to
        #[arg(long)]
        region: Option<String>,
        /// Days of history before the last update
        #[arg(long)]
        days: Option<u32>,
        /// Maximum number of records to fetch
        #[arg(long)]
        limit: Option<usize>,
        /// Add a rolling circular-mean wind direction over WINDOW points
        #[arg(long, value_name = "WINDOW")]
        smooth: Option<usize>,
    },
    /// Summarize wind and waves across beaches
    ///
    /// With beach ids, those beaches (in --region) are averaged. Without,
    /// every beach the source lists for --region is used.
    Region {
        /// Beach identifiers to aggregate
        beach_ids: Vec<i64>,
        /// Region of the beaches
        #[arg(long)]
        region: Option<String>,
        /// Days of history before each beach's last update
        #[arg(long)]
        days: Option<u32>,
        /// Maximum number of records to fetch per beach
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List known beaches
    Beaches {
        /// Only beaches of this region
        #[arg(long)]
        region: Option<String>,
    },
}

/// What the binary should do, with every default resolved
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Forecast {
        beach_id: i64,
        region: String,
        days_back: u32,
        smooth: Option<usize>,
    },
    RegionalBeaches {
        beaches: Vec<(i64, String)>,
    },
    Region {
        region: Option<String>,
    },
    Beaches {
        region: Option<String>,
    },
}

impl Cli {
    /// Applies command-line overrides to a loaded config
    ///
    /// `--data` wins over a base URL from any layer. An explicit
    /// `--base-url` replaces a dataset from the config file.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(ref base_url) = self.base_url {
            config.source.base_url = Some(base_url.clone());
            config.source.dataset = None;
        }
        if let Some(ref data) = self.data {
            config.source.dataset = Some(data.clone());
            config.source.base_url = None;
        }

        let (days, limit) = match &self.command {
            Command::Forecast { days, limit, .. } | Command::Region { days, limit, .. } => {
                (*days, *limit)
            }
            Command::Beaches { .. } => (None, None),
        };
        if let Some(days) = days {
            config.forecast.days_back = days;
        }
        if let Some(limit) = limit {
            config.forecast.record_limit = limit;
        }
    }
}

impl Request {
    /// Resolves the parsed command against the effective config
    pub fn from_cli(cli: &Cli, config: &Config) -> Result<Self, CliError> {
        let region_or_default = |region: &Option<String>| {
            region
                .clone()
                .or_else(|| config.forecast.default_region.clone())
        };

        match &cli.command {
            Command::Forecast {
                beach_id,
                region,
                smooth,
                ..
            } => Ok(Request::Forecast {
                beach_id: *beach_id,
                region: region_or_default(region).ok_or(CliError::MissingRegion)?,
                days_back: config.forecast.days_back,
                smooth: *smooth,
            }),
            Command::Region {
                beach_ids, region, ..
            } if beach_ids.is_empty() => Ok(Request::Region {
                region: region_or_default(region),
            }),
            Command::Region {
                beach_ids, region, ..
            } => {
                let region = region_or_default(region).ok_or(CliError::MissingRegion)?;
                Ok(Request::RegionalBeaches {
                    beaches: beach_ids.iter().map(|id| (*id, region.clone())).collect(),
                })
            }
            Command::Beaches { region } => Ok(Request::Beaches {
                region: region_or_default(region),
            }),
        }
    }
}
