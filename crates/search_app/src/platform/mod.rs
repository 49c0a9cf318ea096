//! Terminal driver: wires the pure search core to the async engine.
mod app;
mod config;
mod effects;
mod input;
mod persistence;
mod render;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use search_core::Msg;
use search_logging::{LogDestination, DEFAULT_LOG_FILE};

pub use app::run_app;

/// Everything the message loop reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbox {
    Core(Msg),
    /// Leave once the current search is idle.
    Quit,
}

#[derive(Debug, Parser)]
#[command(
    name = "search_app",
    about = "Debounced search across location and apartment sources. Each stdin line is the search box text."
)]
pub struct Cli {
    /// RON configuration file; built-in defaults when missing.
    #[arg(long, default_value = "search.ron")]
    pub config: PathBuf,

    /// Where log output goes.
    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    pub log: LogTarget,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,

    /// Exclude a source from searches (repeatable).
    #[arg(long = "disable", value_name = "SOURCE")]
    pub disabled: Vec<String>,

    /// Ask history-recording sources to save settled queries.
    #[arg(long)]
    pub save_history: bool,
}

impl Cli {
    fn level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
}

impl LogTarget {
    fn destination(self) -> LogDestination {
        match self {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File(PathBuf::from(DEFAULT_LOG_FILE)),
            LogTarget::Both => LogDestination::Both(PathBuf::from(DEFAULT_LOG_FILE)),
        }
    }
}
