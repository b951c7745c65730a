use std::path::PathBuf;

use clap::{ArgAction, ArgGroup, Parser};

use crate::config::DEFAULT_CONFIG_PATH;

/// Keep only the newest N recordings per show on a network DVR.
#[derive(Debug, Parser)]
#[command(name = "dvr-cleanup", version, disable_version_flag = true)]
#[command(group(ArgGroup::new("mode").args(["list", "once", "continuous"])))]
pub struct Cli {
    /// Target a specific show (case-insensitive partial match)
    #[arg(short = 's', long, value_name = "TITLE")]
    pub show: Option<String>,

    /// Number of episodes to keep (overrides config for all shows)
    #[arg(short = 'm', long = "max-episodes", value_name = "N")]
    pub max_episodes: Option<u32>,

    /// Path to config file
    #[arg(short = 'c', long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// List all shows and their recording counts, then exit
    #[arg(long)]
    pub list: bool,

    /// Run cleanup once for all shows, then exit
    #[arg(long)]
    pub once: bool,

    /// Run continuously (default if no --show or --once specified)
    #[arg(long)]
    pub continuous: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Print version
    #[arg(short = 'v', long, action = ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    List,
    Show(String),
    Once,
    Continuous,
}

impl Cli {
    /// List wins over a show target, which wins over `--once`.
    pub fn mode(&self) -> Mode {
        if self.list {
            Mode::List
        } else if let Some(show) = &self.show {
            Mode::Show(show.clone())
        } else if self.once {
            Mode::Once
        } else {
            Mode::Continuous
        }
    }
}
