use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    #[serde(default = "default_assist_cooldown_secs")]
    pub assist_cooldown_secs: u64,
    /// Pause after a solved word before the next one activates.
    #[serde(default = "default_reveal_delay_ms")]
    pub reveal_delay_ms: u64,
    /// How long a wrong guess stays on screen.
    #[serde(default = "default_mismatch_delay_ms")]
    pub mismatch_delay_ms: u64,
    #[serde(default = "default_assist_letter_delay_ms")]
    pub assist_letter_delay_ms: u64,
    #[serde(default = "default_snapshot_max_age_days")]
    pub snapshot_max_age_days: i64,
    /// Quote catalog to use instead of the bundled one.
    #[serde(default)]
    pub catalog_path: Option<String>,
    /// Sync endpoint for completion history.
    #[serde(default)]
    pub remote_url: Option<String>,
    #[serde(default = "default_share_base_url")]
    pub share_base_url: String,
}

fn default_theme() -> String {
    "terminal-default".to_string()
}
fn default_tick_rate_ms() -> u64 {
    100
}
fn default_assist_cooldown_secs() -> u64 {
    60
}
fn default_reveal_delay_ms() -> u64 {
    1200
}
fn default_mismatch_delay_ms() -> u64 {
    1000
}
fn default_assist_letter_delay_ms() -> u64 {
    200
}
fn default_snapshot_max_age_days() -> i64 {
    7
}
fn default_share_base_url() -> String {
    "https://unquote.app/".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            tick_rate_ms: default_tick_rate_ms(),
            assist_cooldown_secs: default_assist_cooldown_secs(),
            reveal_delay_ms: default_reveal_delay_ms(),
            mismatch_delay_ms: default_mismatch_delay_ms(),
            assist_letter_delay_ms: default_assist_letter_delay_ms(),
            snapshot_max_age_days: default_snapshot_max_age_days(),
            catalog_path: None,
            remote_url: None,
            share_base_url: default_share_base_url(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("unquote")
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Clamp values read from disk into usable ranges.
    pub fn validate(&mut self) {
        self.tick_rate_ms = self.tick_rate_ms.clamp(16, 1000);
        self.assist_cooldown_secs = self.assist_cooldown_secs.min(3600);
        self.reveal_delay_ms = self.reveal_delay_ms.min(10_000);
        self.mismatch_delay_ms = self.mismatch_delay_ms.min(10_000);
        self.assist_letter_delay_ms = self.assist_letter_delay_ms.clamp(10, 2000);
        self.snapshot_max_age_days = self.snapshot_max_age_days.clamp(1, 365);
        if self.theme.trim().is_empty() {
            self.theme = default_theme();
        }
        if self.remote_url.as_deref().is_some_and(|url| url.trim().is_empty()) {
            self.remote_url = None;
        }
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    pub fn assist_cooldown(&self) -> Duration {
        Duration::from_secs(self.assist_cooldown_secs)
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    pub fn mismatch_delay(&self) -> Duration {
        Duration::from_millis(self.mismatch_delay_ms)
    }

    pub fn assist_letter_delay(&self) -> Duration {
        Duration::from_millis(self.assist_letter_delay_ms)
    }

    /// Empty means sharing is turned off.
    pub fn share_base(&self) -> Option<&str> {
        let base = self.share_base_url.trim();
        (!base.is_empty()).then_some(base)
    }
}
