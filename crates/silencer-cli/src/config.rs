//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use silencer_core::{ConfigError, DEFAULT_CATEGORY_FIELD, DEFAULT_QUIET_PERIOD, GateConfig};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Seconds without a new category before the gate opens.
    pub quiet_secs: u64,
    /// 1-based field position of the category token.
    pub category_field: usize,
    /// Show the waiting progress indicator on stderr.
    pub status: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quiet_secs: DEFAULT_QUIET_PERIOD.as_secs(),
            category_field: DEFAULT_CATEGORY_FIELD + 1,
            status: true,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (LOGCAT_SILENCER_*)
        figment = figment.merge(Env::prefixed("LOGCAT_SILENCER_"));

        figment.extract()
    }

    /// Validates the settings the gate depends on.
    pub fn gate_config(&self) -> Result<GateConfig, ConfigError> {
        GateConfig::new(self.quiet_secs, self.category_field)
    }
}

/// Returns the platform-specific config directory.
///
/// On Linux: `~/.config/logcat-silencer`
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("logcat-silencer"))
}
