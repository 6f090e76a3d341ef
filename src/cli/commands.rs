use std::path::PathBuf;

use clap::Parser;

use crate::model::Config;

#[derive(Parser, Debug)]
#[command(name = "twdeck", about = concat!("twdeck v", env!("CARGO_PKG_VERSION"), " - a terminal dashboard for Taskwarrior"), version)]
pub struct Cli {
    /// Config file (default: <config dir>/twdeck/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// The task binary to run, instead of the configured one
    #[arg(long = "task-bin")]
    pub task_bin: Option<String>,

    /// Write logs to this file
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Command-line flags win over the config file
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(bin) = &self.task_bin {
            config.task.command = bin.clone();
        }
        if let Some(path) = &self.log_file {
            config.log_file = Some(path.clone());
        }
    }
}
