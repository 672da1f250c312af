//! The brightness curve: time of day to target brightness percentage.
//!
//! Evaluation follows a fixed precedence order:
//! 1. before the morning window or at/after the evening window's end: night
//! 2. between `morning.end` and `evening.start`: day
//! 3. inside the morning window: ascending plateau staircase
//! 4. inside the evening window: descending plateau staircase
//!
//! Each window is divided into `steps` equal-length plateaus. Plateau `k`
//! (1-indexed) carries the value `night + k/(steps+1) * (day - night)`, so
//! the staircase approaches but never reaches the full day value inside the
//! window; the pure day value only applies once rule 2 takes over. The
//! evening staircase indexes by time remaining until the window's end,
//! mirroring the morning ramp.
//!
//! The curve is pure and total: it never rounds (the device channel owns
//! integer quantization) and never returns a value outside
//! `[min(day, night), max(day, night)]`. An inverted profile simply yields
//! an inverted ramp.

use chrono::DateTime;
use chrono_tz::Tz;

use super::profile::BrightnessProfile;
use super::windows::{TransitionWindow, TransitionWindows};
use crate::constants::{MAXIMUM_ADJUST_STEPS, MINIMUM_ADJUST_STEPS};

/// Behavior of a transition window when `adjust_steps` is 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StepPolicy {
    /// One intermediate plateau at the midpoint between night and day.
    #[default]
    Plateau,
    /// No intermediate plateau: the full day value applies for the whole
    /// span between dawn and dusk.
    Jump,
}

/// Compute the target brightness percentage for `now`.
pub fn evaluate(
    now: &DateTime<Tz>,
    windows: &TransitionWindows,
    profile: &BrightnessProfile,
    steps: u8,
    policy: StepPolicy,
) -> f64 {
    let day = f64::from(profile.day_brightness);
    let night = f64::from(profile.night_brightness);

    if *now < windows.morning.start || *now >= windows.evening.end {
        return night;
    }
    if *now >= windows.morning.end && *now < windows.evening.start {
        return day;
    }

    let steps = steps.clamp(MINIMUM_ADJUST_STEPS, MAXIMUM_ADJUST_STEPS);
    if steps == 1 && policy == StepPolicy::Jump {
        return day;
    }

    // When the windows overlap the morning ramp takes precedence.
    if windows.morning.contains(now) {
        let elapsed = (*now - windows.morning.start).num_milliseconds();
        let k = plateau_index(elapsed, &windows.morning, steps);
        plateau_value(k, steps, night, day)
    } else {
        let remaining = (windows.evening.end - *now).num_milliseconds();
        let k = plateau_index(remaining, &windows.evening, steps);
        plateau_value(k, steps, night, day)
    }
}

/// 1-indexed plateau for a position within a window.
///
/// `position` is milliseconds of elapsed time for the morning ramp, or
/// milliseconds remaining for the evening ramp. The window is known to
/// contain `now`, so its duration is strictly positive.
fn plateau_index(position: i64, window: &TransitionWindow, steps: u8) -> u8 {
    let length = window.duration().num_milliseconds();
    let plateau_length = length as f64 / f64::from(steps);
    let k = (position as f64 / plateau_length) as i64 + 1;
    k.clamp(1, i64::from(steps)) as u8
}

fn plateau_value(k: u8, steps: u8, night: f64, day: f64) -> f64 {
    night + f64::from(k) / f64::from(steps + 1) * (day - night)
}
