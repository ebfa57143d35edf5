//! Application configuration constants and typed deck settings.
//!
//! Every deck declares its settings as a [`DeckConfig`] with a default instance.
//! Partial settings read from disk arrive as [`DeckOverrides`] and are folded in
//! with [`DeckConfig::merge`].

use crate::error::{AppError, Result};
use log::warn;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Time during which further next/previous intents are dropped.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(1000);

/// Autoplay progress gained per step interval, in percent.
pub const DEFAULT_AUTOPLAY_STEP_PERCENT: f32 = 0.5;

/// Interval at which autoplay progress is advanced.
pub const DEFAULT_AUTOPLAY_INTERVAL: Duration = Duration::from_millis(50);

/// Delay before a painted wrap frame is released to its resting layout.
pub const WRAP_SETTLE_DELAY: Duration = Duration::from_millis(16);

/// Key under which the fully-booked flag is stored.
pub const FULLY_BOOKED_KEY: &str = "btq_fully_booked";

/// Subject line of the content change email.
pub const CHANGE_EMAIL_SUBJECT: &str = "Website Content Updates - BTQ Cleaning";

/// Subject line of the contact form email.
pub const CONTACT_EMAIL_SUBJECT: &str = "New Contact Form Submission";

/// Environment variable naming an optional JSON configuration file.
pub const CONFIG_ENV_VAR: &str = "BTQ_SHOWCASE_CONFIG";

/// Autoplay dwell settings for decks that advance on their own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoplayConfig {
    pub step_percent: f32,
    pub step_interval: Duration,
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            step_percent: DEFAULT_AUTOPLAY_STEP_PERCENT,
            step_interval: DEFAULT_AUTOPLAY_INTERVAL,
        }
    }
}

impl AutoplayConfig {
    /// Progress in percent gained over `elapsed`.
    pub fn progress_for(&self, elapsed: Duration) -> f32 {
        if self.step_interval.is_zero() {
            return 100.0;
        }
        let steps = elapsed.as_nanos() as f64 / self.step_interval.as_nanos() as f64;
        self.step_percent * steps as f32
    }
}

/// Settings for a single slide deck.
#[derive(Debug, Clone, PartialEq)]
pub struct DeckConfig {
    pub cooldown: Duration,
    /// `None` disables autoplay.
    pub autoplay: Option<AutoplayConfig>,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            cooldown: DEFAULT_COOLDOWN,
            autoplay: None,
        }
    }
}

impl DeckConfig {
    /// Default settings for the hero banner, which advances by itself.
    pub fn hero() -> Self {
        Self {
            autoplay: Some(AutoplayConfig::default()),
            ..Self::default()
        }
    }

    /// Default settings for the gallery, which only moves on user input.
    pub fn gallery() -> Self {
        Self::default()
    }

    /// Folds `overrides` into `defaults`. Fields left unset keep their default.
    ///
    /// A zero autoplay interval and a step that is not a positive finite
    /// percentage are rejected with a warning and keep the default.
    pub fn merge(defaults: &DeckConfig, overrides: &DeckOverrides) -> DeckConfig {
        let autoplay = match overrides.autoplay {
            Some(false) => None,
            Some(true) => Some(defaults.autoplay.unwrap_or_default()),
            None => defaults.autoplay,
        };
        let autoplay = autoplay.map(|base| AutoplayConfig {
            step_percent: match overrides.autoplay_step_percent {
                Some(step) if step.is_finite() && step > 0.0 => step,
                Some(step) => {
                    warn!("Ignoring autoplay step of {}%; must be positive", step);
                    base.step_percent
                }
                None => base.step_percent,
            },
            step_interval: match overrides.autoplay_interval_ms {
                Some(0) => {
                    warn!("Ignoring autoplay interval of 0 ms");
                    base.step_interval
                }
                Some(ms) => Duration::from_millis(ms),
                None => base.step_interval,
            },
        });

        DeckConfig {
            cooldown: overrides
                .cooldown_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.cooldown),
            autoplay,
        }
    }
}

/// Partial deck settings as they appear in the configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeckOverrides {
    pub cooldown_ms: Option<u64>,
    pub autoplay: Option<bool>,
    pub autoplay_step_percent: Option<f32>,
    pub autoplay_interval_ms: Option<u64>,
}

/// Top-level configuration file contents.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShowcaseConfig {
    pub hero: DeckOverrides,
    pub gallery: DeckOverrides,
    /// Page document to show instead of the built-in content.
    pub content_path: Option<PathBuf>,
    /// JSON file the fully-booked flag is kept in; in memory when unset.
    pub store_path: Option<PathBuf>,
}

impl ShowcaseConfig {
    /// Parses a configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Reads a configuration file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Reads the file named by [`CONFIG_ENV_VAR`], falling back to defaults.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV_VAR) else {
            return Self::default();
        };

        match Self::load(Path::new(&path)) {
            Ok(config) => {
                log::info!("Loaded configuration from {:?}", path);
                config
            }
            Err(e) => {
                log::warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    pub fn hero_deck(&self) -> DeckConfig {
        DeckConfig::merge(&DeckConfig::hero(), &self.hero)
    }

    pub fn gallery_deck(&self) -> DeckConfig {
        DeckConfig::merge(&DeckConfig::gallery(), &self.gallery)
    }
}
