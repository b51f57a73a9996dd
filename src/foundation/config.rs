use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;

use crate::{
    foundation::core::Canvas,
    foundation::error::{KioskError, KioskResult},
    transit::ArrivalQuery,
};

/// Environment variable consulted for the transit API key when the config omits it.
pub const TRANSIT_KEY_ENV: &str = "KIOSK_TRANSIT_KEY";

/// Top-level kiosk configuration, loaded from JSON. Every field has a default.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KioskConfig {
    /// Display surface size; the background is resized to exactly this.
    pub canvas: Canvas,
    /// Background file polled once per refresh tick.
    pub background_path: PathBuf,
    /// Data-refresh cadence.
    pub refresh_ms: u64,
    /// Animation frame cadence shared by both emitters.
    pub frame_ms: u64,
    pub feed: FeedConfig,
    pub labels: Labels,
    /// Font used when rasterizing text into snapshots.
    pub font_path: Option<PathBuf>,
    /// Seed for particle randomness. Unset means OS entropy.
    pub seed: Option<u64>,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::new(800, 480),
            background_path: PathBuf::from("background/current.jpg"),
            refresh_ms: 15_000,
            frame_ms: 33,
            feed: FeedConfig::default(),
            labels: Labels::default(),
            font_path: None,
            seed: None,
        }
    }
}

/// Transit feed selection and filtering.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    pub stop_id: String,
    /// Route code, e.g. `Brn`.
    pub route: String,
    /// Case-insensitive destination substring.
    pub destination: String,
    pub max_results: usize,
    pub timeout_ms: u64,
    /// Read arrivals from a payload file written by an external fetcher instead of
    /// invoking `command`.
    pub payload_path: Option<PathBuf>,
    pub api_key: Option<String>,
    /// External HTTP client used for the live feed.
    pub command: String,
    pub base_url: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            stop_id: "30254".to_string(),
            route: "Brn".to_string(),
            destination: "loop".to_string(),
            max_results: 2,
            timeout_ms: 10_000,
            payload_path: None,
            api_key: None,
            command: "curl".to_string(),
            base_url: "http://lapi.transitchicago.com/api/1.0/ttarrivals.aspx".to_string(),
        }
    }
}

impl FeedConfig {
    pub fn query(&self) -> ArrivalQuery {
        ArrivalQuery {
            stop_id: self.stop_id.clone(),
            route: self.route.clone(),
            destination: self.destination.clone(),
            max_results: self.max_results,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Static text shown around the countdowns.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Labels {
    pub title: String,
    /// Used in "No service to {destination_label}".
    pub destination_label: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            title: "Paulina → Loop".to_string(),
            destination_label: "Loop".to_string(),
        }
    }
}

impl KioskConfig {
    /// Read a JSON config file. Missing fields fall back to defaults.
    pub fn from_path(path: &Path) -> KioskResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read config '{}'", path.display()))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| KioskError::config(format!("parse '{}': {e}", path.display())))
    }

    /// Fill unset fields from the environment via `lookup`.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if self.feed.api_key.is_none() {
            self.feed.api_key = lookup(TRANSIT_KEY_ENV).filter(|k| !k.trim().is_empty());
        }
        self
    }

    /// Fill unset fields from the process environment.
    pub fn with_process_env(self) -> Self {
        self.with_env(|key| std::env::var(key).ok())
    }

    pub fn validate(&self) -> KioskResult<()> {
        if self.canvas.is_empty() {
            return Err(KioskError::config("canvas width/height must be non-zero"));
        }
        if self.canvas.width > u32::from(u16::MAX) || self.canvas.height > u32::from(u16::MAX) {
            return Err(KioskError::config("canvas width/height must fit in u16"));
        }
        if self.refresh_ms == 0 {
            return Err(KioskError::config("refresh_ms must be > 0"));
        }
        if self.frame_ms == 0 {
            return Err(KioskError::config("frame_ms must be > 0"));
        }
        if self.feed.max_results == 0 {
            return Err(KioskError::config("feed.max_results must be > 0"));
        }
        if self.feed.timeout_ms == 0 {
            return Err(KioskError::config("feed.timeout_ms must be > 0"));
        }
        if self.feed.payload_path.is_none() && self.feed.api_key.is_none() {
            return Err(KioskError::config(format!(
                "transit API key must be set (feed.api_key or {TRANSIT_KEY_ENV})"
            )));
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
