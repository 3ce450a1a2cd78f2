//! Engine configuration, loaded from TOML.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub database: DatabaseConfig,
    pub presence: PresenceConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file; `None` means in-memory
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PresenceConfig {
    /// How long `confirm_synthesis` waits on the presence feed
    pub timeout_ms: u64,
    /// Heartbeats older than this are not "present"
    pub stale_after_secs: u64,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5_000,
            stale_after_secs: 120,
        }
    }
}

impl PresenceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_after_secs)
    }
}

impl EngineConfig {
    /// Load from `path`, falling back to defaults if the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            Self::from_toml(&content).with_context(|| format!("parsing config {}", path.display()))?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.presence.timeout_ms == 0 {
            bail!("presence.timeout_ms must be greater than 0");
        }
        if self.presence.stale_after_secs == 0 {
            bail!("presence.stale_after_secs must be greater than 0");
        }
        Ok(())
    }
}
