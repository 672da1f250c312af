//! Transition window construction from solar instants.
//!
//! A day has two transition windows: the morning ramp-up from dawn until
//! `sunrise + offset`, and the evening ramp-down from `sunset - offset`
//! until dusk. Windows are half-open `[start, end)` so that a time exactly
//! at `morning.end` already counts as full daytime.

use chrono::{DateTime, Duration};
use chrono_tz::Tz;

use super::ScheduleError;

/// The four solar events bounding one day's brightness cycle.
///
/// All values carry the coordinate timezone so comparisons against the
/// current time are unambiguous across day boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct SolarInstants {
    pub dawn: DateTime<Tz>,
    pub sunrise: DateTime<Tz>,
    pub sunset: DateTime<Tz>,
    pub dusk: DateTime<Tz>,
}

impl SolarInstants {
    /// Verify `dawn <= sunrise` and `sunset <= dusk`.
    ///
    /// Malformed upstream data must fail here rather than silently produce
    /// reversed windows.
    fn ensure_ordered(&self) -> Result<(), ScheduleError> {
        if self.dawn > self.sunrise {
            return Err(ScheduleError::InvalidSolarOrdering {
                reason: format!(
                    "dawn ({}) is after sunrise ({})",
                    self.dawn.format("%H:%M:%S"),
                    self.sunrise.format("%H:%M:%S")
                ),
            });
        }
        if self.sunset > self.dusk {
            return Err(ScheduleError::InvalidSolarOrdering {
                reason: format!(
                    "sunset ({}) is after dusk ({})",
                    self.sunset.format("%H:%M:%S"),
                    self.dusk.format("%H:%M:%S")
                ),
            });
        }
        Ok(())
    }
}

/// A half-open `[start, end)` span during which brightness ramps.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionWindow {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl TransitionWindow {
    /// Whether `t` falls inside the window.
    pub fn contains(&self, t: &DateTime<Tz>) -> bool {
        *t >= self.start && *t < self.end
    }

    /// Window length. Non-negative for windows built by [`build_windows`].
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// The morning ramp-up and evening ramp-down windows for one day.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionWindows {
    pub morning: TransitionWindow,
    pub evening: TransitionWindow,
}

/// Derive the two transition windows from solar instants and the configured
/// sunrise/sunset offset.
///
/// Overlapping morning/evening windows are not rejected; near polar
/// latitudes with a large offset they are a valid state the curve resolves
/// deterministically.
pub fn build_windows(
    instants: &SolarInstants,
    offset_minutes: i64,
) -> Result<TransitionWindows, ScheduleError> {
    instants.ensure_ordered()?;

    let offset = Duration::minutes(offset_minutes);
    Ok(TransitionWindows {
        morning: TransitionWindow {
            start: instants.dawn,
            end: instants.sunrise + offset,
        },
        evening: TransitionWindow {
            start: instants.sunset - offset,
            end: instants.dusk,
        },
    })
}
