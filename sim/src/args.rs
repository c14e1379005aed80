use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use course::DeploymentMode;

#[derive(Parser, Debug, Clone)]
#[command(name = "survey-sim")]
#[command(about = "Headless runner for the survey drive", long_about = None)]
pub struct Args {
    /// Path to the TOML config (defaults apply when missing)
    #[arg(long, default_value = "sim.toml")]
    pub config: PathBuf,
    /// Drive script to replay; without one the car cruises straight ahead
    #[arg(long)]
    pub script: Option<PathBuf>,
    /// Override the deployment mode from the config
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,
    /// Cruise duration when no script is given
    #[arg(long, default_value_t = 30.0)]
    pub seconds: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Gated,
    Concurrent,
}

impl From<ModeArg> for DeploymentMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Gated => DeploymentMode::Gated,
            ModeArg::Concurrent => DeploymentMode::Concurrent,
        }
    }
}
