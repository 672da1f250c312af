//! Configuration validation.
//!
//! All range checks happen here, at the boundary. The scheduling engine
//! assumes validated inputs; a per-monitor entry that reaches evaluation
//! with a missing season is reported there as a per-monitor error, but a
//! well-formed load never lets one through.

use anyhow::{Result, bail};
use chrono_tz::Tz;

use super::Config;
use crate::constants::*;
use crate::core::BrightnessProfile;

/// Validate a loaded configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(steps) = config.adjust_steps
        && !(MINIMUM_ADJUST_STEPS..=MAXIMUM_ADJUST_STEPS).contains(&steps)
    {
        bail!(
            "adjust_steps ({steps}) must be between {MINIMUM_ADJUST_STEPS} and {MAXIMUM_ADJUST_STEPS}"
        );
    }

    if let Some(interval) = config.interval_minutes
        && !ALLOWED_INTERVAL_MINUTES.contains(&interval)
    {
        bail!("interval_minutes ({interval}) must be one of 10, 12, 15, 20 or 30");
    }

    if let Some(offset) = config.sunrise_sunset_offset
        && !(MINIMUM_SUNRISE_SUNSET_OFFSET..=MAXIMUM_SUNRISE_SUNSET_OFFSET).contains(&offset)
    {
        bail!(
            "sunrise_sunset_offset ({offset} minutes) must be between \
             {MINIMUM_SUNRISE_SUNSET_OFFSET} and {MAXIMUM_SUNRISE_SUNSET_OFFSET}"
        );
    }

    if let Some(mode) = config.single_step_mode.as_deref()
        && mode != "plateau"
        && mode != "jump"
    {
        bail!("single_step_mode (\"{mode}\") must be \"plateau\" or \"jump\"");
    }

    if let Some(lat) = config.latitude
        && !(-90.0..=90.0).contains(&lat)
    {
        bail!("latitude must be between -90 and 90 degrees (got {lat})");
    }

    if let Some(lon) = config.longitude
        && !(-180.0..=180.0).contains(&lon)
    {
        bail!("longitude must be between -180 and 180 degrees (got {lon})");
    }

    if let Some(name) = &config.timezone
        && name.parse::<Tz>().is_err()
    {
        bail!("timezone (\"{name}\") is not a known IANA timezone");
    }

    if let Some(defaults) = &config.default {
        validate_profile(&defaults.summer, "default.summer")?;
        validate_profile(&defaults.winter, "default.winter")?;
    }

    // Per-monitor entries must be complete for both seasons. Rejecting
    // incomplete entries here keeps evaluation-time failures out of
    // well-formed setups.
    if let Some(monitors) = &config.monitors {
        for (serial, entry) in monitors {
            match (&entry.summer, &entry.winter) {
                (Some(summer), Some(winter)) => {
                    validate_profile(summer, &format!("monitors.{serial}.summer"))?;
                    validate_profile(winter, &format!("monitors.{serial}.winter"))?;
                }
                (None, _) => {
                    bail!("monitor entry {serial} is missing its summer profile");
                }
                (_, None) => {
                    bail!("monitor entry {serial} is missing its winter profile");
                }
            }
        }
    }

    Ok(())
}

fn validate_profile(profile: &BrightnessProfile, context: &str) -> Result<()> {
    for (field, value) in [
        ("day_brightness", profile.day_brightness),
        ("night_brightness", profile.night_brightness),
    ] {
        if value > MAXIMUM_BRIGHTNESS {
            bail!(
                "{context}.{field} ({value}%) must be between \
                 {MINIMUM_BRIGHTNESS}% and {MAXIMUM_BRIGHTNESS}%"
            );
        }
    }
    Ok(())
}
