//! Configuration system for brightr.
//!
//! Settings live in a TOML file, by default at
//! `$XDG_CONFIG_HOME/brightr/brightr.toml` (created with commented
//! defaults on first run):
//!
//! ```toml
//! #[Location]
//! latitude = 53.075144         # Geographic latitude (-90 to 90)
//! longitude = 8.802161         # Geographic longitude (-180 to 180)
//! timezone = "Europe/Berlin"   # IANA name; resolved from coordinates when omitted
//!
//! #[Scheduling]
//! adjust_steps = 5             # Brightness plateaus per transition window (1-10)
//! interval_minutes = 12        # Minutes between passes (10, 12, 15, 20 or 30)
//! sunrise_sunset_offset = 60   # Minutes past sunrise / before sunset (0-120)
//! single_step_mode = "plateau" # adjust_steps = 1 behavior: "plateau" or "jump"
//! notifications = true         # Desktop notification when brightness changes
//!
//! [default.summer]
//! day_brightness = 100
//! night_brightness = 60
//!
//! [default.winter]
//! day_brightness = 90
//! night_brightness = 60
//!
//! # Per-monitor overrides are keyed by serial number and must cover both
//! # seasons:
//! [monitors.ABC123.summer]
//! day_brightness = 80
//! night_brightness = 40
//!
//! [monitors.ABC123.winter]
//! day_brightness = 75
//! night_brightness = 40
//! ```
//!
//! Range validation happens at load time; the scheduling engine never sees
//! out-of-range values. Per-monitor entries missing either season are
//! rejected here rather than at evaluation time.

pub mod builder;
pub mod loading;
pub mod validation;


use anyhow::{Context, Result, anyhow};
use chrono_tz::Tz;
use serde::Deserialize;
use std::collections::HashMap;

use crate::constants::*;
use crate::core::{DefaultProfiles, SeasonProfiles, StepPolicy};

// Re-export public API
pub use builder::create_default_config;
pub use loading::{get_config_path, get_custom_config_dir, load_from_path, set_config_dir};

/// Deserialized configuration. Missing scalar fields fall back to the
/// defaults in `constants.rs` through the accessor methods.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
    pub adjust_steps: Option<u8>,
    pub interval_minutes: Option<u32>,
    pub sunrise_sunset_offset: Option<i64>,
    pub single_step_mode: Option<String>,
    pub notifications: Option<bool>,
    pub default: Option<DefaultProfiles>,
    pub monitors: Option<HashMap<String, SeasonProfiles>>,
}

impl Config {
    /// Load configuration using automatic path detection, creating a
    /// default file on first run.
    pub fn load() -> Result<Config> {
        loading::load()
    }

    pub fn adjust_steps(&self) -> u8 {
        self.adjust_steps.unwrap_or(DEFAULT_ADJUST_STEPS)
    }

    pub fn interval_minutes(&self) -> u32 {
        self.interval_minutes.unwrap_or(DEFAULT_INTERVAL_MINUTES)
    }

    pub fn sunrise_sunset_offset(&self) -> i64 {
        self.sunrise_sunset_offset
            .unwrap_or(DEFAULT_SUNRISE_SUNSET_OFFSET)
    }

    pub fn notifications_enabled(&self) -> bool {
        self.notifications.unwrap_or(true)
    }

    pub fn latitude(&self) -> f64 {
        self.latitude.unwrap_or(DEFAULT_LATITUDE)
    }

    pub fn longitude(&self) -> f64 {
        self.longitude.unwrap_or(DEFAULT_LONGITUDE)
    }

    pub fn step_policy(&self) -> StepPolicy {
        match self.single_step_mode.as_deref() {
            Some("jump") => StepPolicy::Jump,
            _ => StepPolicy::Plateau,
        }
    }

    pub fn default_profiles(&self) -> DefaultProfiles {
        self.default.unwrap_or(DefaultProfiles {
            summer: crate::core::BrightnessProfile {
                day_brightness: DEFAULT_SUMMER_DAY_BRIGHTNESS,
                night_brightness: DEFAULT_SUMMER_NIGHT_BRIGHTNESS,
            },
            winter: crate::core::BrightnessProfile {
                day_brightness: DEFAULT_WINTER_DAY_BRIGHTNESS,
                night_brightness: DEFAULT_WINTER_NIGHT_BRIGHTNESS,
            },
        })
    }

    pub fn monitor_profiles(&self) -> HashMap<String, SeasonProfiles> {
        self.monitors.clone().unwrap_or_default()
    }

    /// Resolve the timezone used for all solar arithmetic: the configured
    /// name, else the timezone covering the configured coordinates, else
    /// the built-in default.
    pub fn resolve_timezone(&self) -> Result<Tz> {
        if let Some(name) = &self.timezone {
            return name
                .parse()
                .map_err(|_| anyhow!("Unknown timezone '{name}' in configuration"));
        }
        if let Some(tz) = crate::geo::timezone_for_coordinates(self.latitude(), self.longitude()) {
            return Ok(tz);
        }
        DEFAULT_TIMEZONE
            .parse()
            .map_err(|_| anyhow!("Built-in default timezone is invalid"))
            .context("Failed to resolve a timezone")
    }

    /// Log the effective settings as an indented block.
    pub fn log_summary(&self) {
        log_block_start!("Loaded configuration");
        log_indented!("Location: {:.4}, {:.4}", self.latitude(), self.longitude());
        match self.resolve_timezone() {
            Ok(tz) => log_indented!("Timezone: {tz}"),
            Err(_) => log_indented!("Timezone: unresolved"),
        }
        log_indented!("Adjustment steps: {}", self.adjust_steps());
        log_indented!("Pass interval: {} min", self.interval_minutes());
        log_indented!("Sunrise/sunset offset: {} min", self.sunrise_sunset_offset());
        let defaults = self.default_profiles();
        log_indented!(
            "Default summer profile: day {}%, night {}%",
            defaults.summer.day_brightness,
            defaults.summer.night_brightness
        );
        log_indented!(
            "Default winter profile: day {}%, night {}%",
            defaults.winter.day_brightness,
            defaults.winter.night_brightness
        );
        let monitors = self.monitor_profiles();
        if !monitors.is_empty() {
            log_indented!("Per-monitor overrides: {}", monitors.len());
        }
    }
}
