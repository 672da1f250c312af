//! One guarded pass over all connected monitors.
//!
//! The coordinator takes the run lock, builds the day's transition windows
//! once, then walks the enumerated monitors in order: resolve profile,
//! evaluate the curve, read the current brightness, apply the target if it
//! differs. Per-monitor failures are recorded and never abort the rest of
//! the pass; ordering errors abort the pass before any device command is
//! issued. The lock is released on every exit path.

use chrono::DateTime;
use chrono_tz::Tz;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use super::ScheduleError;
use super::curve::{self, StepPolicy};
use super::profile::{DefaultProfiles, MonitorIdentity, SeasonProfiles, resolve_profile};
use super::season::{Season, SeasonStrategy};
use super::windows::{SolarInstants, TransitionWindows, build_windows};
use crate::ddc::{BrightnessSink, DdcError, DetectedDisplay};
use crate::io::lock::RunLock;

/// Curve and window parameters for one pass.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleSettings {
    pub adjust_steps: u8,
    pub offset_minutes: i64,
    pub step_policy: StepPolicy,
}

/// A failure scoped to a single monitor.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error(transparent)]
    Device(#[from] DdcError),
}

/// Brightness applied (or confirmed) for one monitor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Applied {
    /// Raw curve output, percent.
    pub target: f64,
    /// Value sent to the device after quantization.
    pub device_value: u16,
    /// False when the monitor already showed the target value and the
    /// write was skipped.
    pub changed: bool,
}

/// Outcome for one monitor within a pass.
#[derive(Debug)]
pub struct MonitorResult {
    pub identity: MonitorIdentity,
    pub outcome: Result<Applied, MonitorError>,
}

/// Everything one pass produced, in enumeration order. Created fresh per
/// invocation and discarded after reporting; nothing persists.
#[derive(Debug)]
pub struct RunReport {
    pub season: Season,
    pub results: Vec<MonitorResult>,
}

impl RunReport {
    /// Monitors whose brightness was actually rewritten.
    pub fn changed(&self) -> impl Iterator<Item = (&MonitorIdentity, &Applied)> {
        self.results.iter().filter_map(|r| match &r.outcome {
            Ok(applied) if applied.changed => Some((&r.identity, applied)),
            _ => None,
        })
    }

    pub fn failure_count(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_err()).count()
    }
}

/// Runs guarded brightness passes.
pub struct RunCoordinator<'a> {
    settings: ScheduleSettings,
    monitors: &'a HashMap<String, SeasonProfiles>,
    defaults: &'a DefaultProfiles,
    season_strategy: SeasonStrategy,
}

impl<'a> RunCoordinator<'a> {
    pub fn new(
        settings: ScheduleSettings,
        monitors: &'a HashMap<String, SeasonProfiles>,
        defaults: &'a DefaultProfiles,
        season_strategy: SeasonStrategy,
    ) -> Self {
        Self {
            settings,
            monitors,
            defaults,
            season_strategy,
        }
    }

    /// Execute one pass over `displays`.
    ///
    /// Returns [`ScheduleError::AlreadyRunning`] without touching any
    /// monitor when another pass holds the run lock. A concurrent pass
    /// means brightness is already being adjusted this cycle, so there is
    /// nothing to retry.
    pub fn run(
        &self,
        now: DateTime<Tz>,
        displays: &[DetectedDisplay],
        instants: &SolarInstants,
        sink: &dyn BrightnessSink,
        lock_path: &Path,
    ) -> Result<RunReport, ScheduleError> {
        let Some(_lock) = RunLock::try_acquire(lock_path)? else {
            return Err(ScheduleError::AlreadyRunning {
                holder_pid: RunLock::holder_pid(lock_path),
            });
        };

        // Windows are shared by all monitors; an ordering error is fatal
        // before any device command goes out.
        let windows = build_windows(instants, self.settings.offset_minutes)?;
        let season = (self.season_strategy)(now.date_naive());

        let mut results = Vec::with_capacity(displays.len());
        for display in displays {
            let outcome = self.adjust_monitor(&now, &windows, season, display, sink);
            results.push(MonitorResult {
                identity: display.identity.clone(),
                outcome,
            });
        }

        Ok(RunReport { season, results })
        // _lock dropped here, releasing the guard on success and on every
        // earlier error return above.
    }

    fn adjust_monitor(
        &self,
        now: &DateTime<Tz>,
        windows: &TransitionWindows,
        season: Season,
        display: &DetectedDisplay,
        sink: &dyn BrightnessSink,
    ) -> Result<Applied, MonitorError> {
        let profile = resolve_profile(&display.identity, season, self.monitors, self.defaults)?;
        let target = curve::evaluate(
            now,
            windows,
            &profile,
            self.settings.adjust_steps,
            self.settings.step_policy,
        );
        let device_value = target.round() as u16;

        let current = sink.current_brightness(display)?;
        if current == device_value {
            return Ok(Applied {
                target,
                device_value,
                changed: false,
            });
        }
        sink.set_brightness(display, device_value)?;
        Ok(Applied {
            target,
            device_value,
            changed: true,
        })
    }
}
