//! Default configuration file generation.
//!
//! Builds the commented TOML written on first run, keeping key/comment
//! columns aligned the same way a hand-maintained file would be.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::constants::*;

/// Incrementally assembles the commented configuration text.
struct ConfigBuilder {
    content: String,
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            content: String::new(),
        }
    }

    fn add_section(mut self, name: &str) -> Self {
        if !self.content.is_empty() {
            self.content.push('\n');
        }
        self.content.push_str(&format!("#[{name}]\n"));
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        let entry = format!("{key} = {value}");
        self.content.push_str(&format!("{entry:<28} # {comment}\n"));
        self
    }

    fn add_profile_table(mut self, table: &str, day: u16, night: u16) -> Self {
        self.content.push_str(&format!(
            "\n[{table}]\nday_brightness = {day}\nnight_brightness = {night}\n"
        ));
        self
    }

    fn add_raw(mut self, text: &str) -> Self {
        self.content.push_str(text);
        self
    }

    fn build(self) -> String {
        self.content
    }
}

/// Write a default configuration file at `path`.
pub fn create_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    let content = ConfigBuilder::new()
        .add_section("Location")
        .add_setting(
            "latitude",
            &format!("{DEFAULT_LATITUDE}"),
            "Geographic latitude (-90 to 90)",
        )
        .add_setting(
            "longitude",
            &format!("{DEFAULT_LONGITUDE}"),
            "Geographic longitude (-180 to 180)",
        )
        .add_setting(
            "timezone",
            &format!("\"{DEFAULT_TIMEZONE}\""),
            "IANA name; resolved from coordinates when omitted",
        )
        .add_section("Scheduling")
        .add_setting(
            "adjust_steps",
            &DEFAULT_ADJUST_STEPS.to_string(),
            "Brightness plateaus per transition window (1-10)",
        )
        .add_setting(
            "interval_minutes",
            &DEFAULT_INTERVAL_MINUTES.to_string(),
            "Minutes between passes (10, 12, 15, 20 or 30)",
        )
        .add_setting(
            "sunrise_sunset_offset",
            &DEFAULT_SUNRISE_SUNSET_OFFSET.to_string(),
            "Minutes past sunrise / before sunset (0-120)",
        )
        .add_setting(
            "single_step_mode",
            "\"plateau\"",
            "adjust_steps = 1 behavior: \"plateau\" or \"jump\"",
        )
        .add_setting(
            "notifications",
            "true",
            "Desktop notification when brightness changes",
        )
        .add_profile_table(
            "default.summer",
            DEFAULT_SUMMER_DAY_BRIGHTNESS,
            DEFAULT_SUMMER_NIGHT_BRIGHTNESS,
        )
        .add_profile_table(
            "default.winter",
            DEFAULT_WINTER_DAY_BRIGHTNESS,
            DEFAULT_WINTER_NIGHT_BRIGHTNESS,
        )
        .add_raw(
            "\n# Per-monitor overrides are keyed by serial number (see\n\
             # `ddcutil detect`) and must cover both seasons:\n\
             #\n\
             # [monitors.ABC123.summer]\n\
             # day_brightness = 80\n\
             # night_brightness = 40\n\
             #\n\
             # [monitors.ABC123.winter]\n\
             # day_brightness = 75\n\
             # night_brightness = 40\n",
        )
        .build();

    fs::write(path, content)
        .with_context(|| format!("Failed to write default config: {}", path.display()))
}
