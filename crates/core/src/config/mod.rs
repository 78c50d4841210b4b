use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::timeline::{Timing, DEFAULT_TONE_HZ, DEFAULT_UNIT};
use crate::{Result, TranscoderError};

const MIN_TONE_HZ: u32 = 20;
const MAX_TONE_HZ: u32 = 20_000;
const MAX_UNIT_MS: u64 = 5_000;

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,
}

impl AppConfig {
    /// Reads and validates a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_json(&raw)?;
        tracing::debug!(?path, ?config, "loaded configuration");
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.playback.validate()
    }
}

/// Configuration specific to the playback scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Length of one dot in milliseconds; every other duration derives from it.
    pub unit_ms: u64,
    pub tone_hz: u32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            unit_ms: DEFAULT_UNIT.as_millis() as u64,
            tone_hz: DEFAULT_TONE_HZ,
        }
    }
}

impl PlaybackConfig {
    pub fn validate(&self) -> Result<()> {
        if self.unit_ms == 0 {
            return Err(TranscoderError::InvalidConfig(
                "playback.unit_ms must be greater than zero".to_string(),
            ));
        }
        if self.unit_ms > MAX_UNIT_MS {
            return Err(TranscoderError::InvalidConfig(format!(
                "playback.unit_ms must be at most {MAX_UNIT_MS}, got {}",
                self.unit_ms
            )));
        }
        if !(MIN_TONE_HZ..=MAX_TONE_HZ).contains(&self.tone_hz) {
            return Err(TranscoderError::InvalidConfig(format!(
                "playback.tone_hz must be between {MIN_TONE_HZ} and {MAX_TONE_HZ}, got {}",
                self.tone_hz
            )));
        }
        Ok(())
    }

    pub fn timing(&self) -> Timing {
        Timing::new(Duration::from_millis(self.unit_ms), self.tone_hz)
    }
}
