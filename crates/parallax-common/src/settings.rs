//! Runtime settings shared by the engine, the scroll broadcaster, and tools.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ParallaxError, Result};

/// Tunables for one page's parallax setup.
///
/// Every field has a default, so an empty JSON object is a valid settings
/// file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParallaxSettings {
    /// Scroll sampling period in milliseconds.
    pub interval_ms: u64,
    /// Quiet period before a burst of resize events triggers one update.
    pub resize_debounce_ms: u64,
    /// Extra margin (px) around the viewport used by the visibility check.
    pub viewport_margin: f64,
    /// Prefix of the state classes (`<prefix>--above`, ...).
    pub class_prefix: String,
}

impl Default for ParallaxSettings {
    fn default() -> Self {
        Self {
            interval_ms: 16,
            resize_debounce_ms: 150,
            viewport_margin: 50.0,
            class_prefix: "Plx".to_string(),
        }
    }
}

impl ParallaxSettings {
    /// Scroll sampling period.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Resize quiet period.
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    /// Parse settings from a JSON string and validate them.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&text)?;
        debug!(path = %path.display(), ?settings, "Loaded parallax settings");
        Ok(settings)
    }

    /// Reject values the runtime cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.interval_ms == 0 {
            return Err(ParallaxError::config("intervalMs must be greater than zero"));
        }
        if !self.viewport_margin.is_finite() || self.viewport_margin < 0.0 {
            return Err(ParallaxError::config(format!(
                "viewportMargin must be a non-negative number, got {}",
                self.viewport_margin
            )));
        }
        if self.class_prefix.trim().is_empty() || self.class_prefix.contains(char::is_whitespace) {
            return Err(ParallaxError::config(format!(
                "classPrefix must be a single non-empty class name, got {:?}",
                self.class_prefix
            )));
        }
        Ok(())
    }
}
