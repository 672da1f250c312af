//! Per-monitor brightness profile resolution.
//!
//! Monitors are matched by serial number only; the model string is carried
//! for display purposes. A monitor without an entry in the per-monitor
//! table falls back to the default profile for the resolved season. An
//! entry that exists but lacks the resolved season's sub-profile is a
//! configuration error surfaced for that monitor, never silently defaulted.

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

use super::ScheduleError;
use super::season::Season;

/// Day/night brightness pair, percent.
///
/// `night_brightness <= day_brightness` is the expected shape but is not
/// enforced; an inverted pair produces an inverted ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BrightnessProfile {
    pub day_brightness: u16,
    pub night_brightness: u16,
}

/// Optional per-season profiles of one monitor entry.
///
/// Both seasons are required for a usable entry; load-time validation
/// rejects incomplete ones, and [`resolve_profile`] reports any that slip
/// through as a per-monitor error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct SeasonProfiles {
    pub summer: Option<BrightnessProfile>,
    pub winter: Option<BrightnessProfile>,
}

impl SeasonProfiles {
    pub fn for_season(&self, season: Season) -> Option<BrightnessProfile> {
        match season {
            Season::Summer => self.summer,
            Season::Winter => self.winter,
        }
    }
}

/// The fallback profiles applied to monitors without their own entry.
/// Deserialization requires both seasons, so the fallback is always total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DefaultProfiles {
    pub summer: BrightnessProfile,
    pub winter: BrightnessProfile,
}

impl DefaultProfiles {
    pub fn for_season(&self, season: Season) -> BrightnessProfile {
        match season {
            Season::Summer => self.summer,
            Season::Winter => self.winter,
        }
    }
}

/// A connected monitor as reported by the device channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MonitorIdentity {
    /// Model name, informational only.
    pub model: String,
    /// Serial number, the identifying key.
    pub serial: String,
}

impl fmt::Display for MonitorIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.model, self.serial)
    }
}

/// Look up the brightness profile for one monitor in one season.
pub fn resolve_profile(
    identity: &MonitorIdentity,
    season: Season,
    monitors: &HashMap<String, SeasonProfiles>,
    defaults: &DefaultProfiles,
) -> Result<BrightnessProfile, ScheduleError> {
    match monitors.get(&identity.serial) {
        None => Ok(defaults.for_season(season)),
        Some(entry) => {
            entry
                .for_season(season)
                .ok_or_else(|| ScheduleError::MissingSeasonProfile {
                    serial: identity.serial.clone(),
                    season,
                })
        }
    }
}
