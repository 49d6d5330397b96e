//! Command-line argument definitions.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Silences logcat noise until the device goes quiet.
///
/// Pipe `adb logcat` into this command. Every kind of log activity is
/// swallowed until no new kind has shown up for the quiet period, after
/// which all lines are passed through.
#[derive(Debug, Parser)]
#[command(name = "logcat-silencer", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Seconds without a new category before all lines are passed through.
    #[arg(long, value_name = "SECS")]
    pub quiet_secs: Option<u64>,

    /// 1-based whitespace-separated field holding the category.
    #[arg(long, value_name = "N")]
    pub field: Option<usize>,

    /// Do not print the waiting progress indicator.
    #[arg(long)]
    pub no_status: bool,
}

impl Cli {
    /// Applies flags given on the command line on top of loaded configuration.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(quiet_secs) = self.quiet_secs {
            config.quiet_secs = quiet_secs;
        }
        if let Some(field) = self.field {
            config.category_field = field;
        }
        if self.no_status {
            config.status = false;
        }
    }
}
