//! Periodic pass execution and the main loop.
//!
//! The loop runs one pass immediately at startup, then sleeps until the
//! next minute boundary aligned to `interval_minutes` (the same grid a
//! `*/N` cron entry would fire on). Sleeping happens in short slices so a
//! shutdown signal is honored within half a second.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveTime, TimeZone, Timelike};
use chrono_tz::Tz;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::config::Config;
use crate::constants::*;
use crate::core::{
    RunCoordinator, RunReport, ScheduleError, ScheduleSettings, SolarInstants, northern_by_month,
};
use crate::ddc::DdcutilController;
use crate::geo;
use crate::io::lock;
use crate::notify;
use crate::time_source;

/// What one scheduled trigger amounted to.
pub enum PassOutcome {
    Completed(RunReport),
    /// Another pass held the run lock; nothing was touched.
    Skipped { holder_pid: Option<u32> },
    NoDisplays,
}

/// Run passes until the shutdown flag is raised.
pub fn run_loop(config: &Config, shutdown: &AtomicBool) -> Result<()> {
    let controller = DdcutilController::new();
    let tz = config.resolve_timezone()?;

    execute_pass(config, &controller, tz);

    while !shutdown.load(Ordering::SeqCst) {
        let now = time_source::now().with_timezone(&tz);
        let pause = duration_until_next_tick(&now, config.interval_minutes());
        log_debug!("Next pass in {}s", pause.as_secs());
        sleep_interruptibly(pause, shutdown);
        if shutdown.load(Ordering::SeqCst) {
            break;
        }
        execute_pass(config, &controller, tz);
    }
    Ok(())
}

/// Run one pass and log its outcome. Never propagates pass failures into
/// the loop; the next trigger gets a fresh attempt.
pub fn execute_pass(config: &Config, controller: &DdcutilController, tz: Tz) {
    match run_pass(config, controller, tz) {
        Ok(PassOutcome::Completed(report)) => announce(config, &report),
        Ok(PassOutcome::Skipped { holder_pid }) => match holder_pid {
            Some(pid) => log_info!("Skipping pass, another is in progress (pid {pid})"),
            None => log_info!("Skipping pass, another is in progress"),
        },
        Ok(PassOutcome::NoDisplays) => {
            log_block_start!("No DDC-capable external displays detected");
        }
        Err(e) => {
            log_pipe!();
            log_error!("Brightness pass failed: {e:#}");
        }
    }
}

/// One full pass: solar instants, enumeration, guarded adjustment.
pub fn run_pass(
    config: &Config,
    controller: &DdcutilController,
    tz: Tz,
) -> Result<PassOutcome> {
    let now = time_source::now().with_timezone(&tz);

    let instants = match geo::solar_instants(
        now.date_naive(),
        config.latitude(),
        config.longitude(),
        tz,
    ) {
        Ok(instants) => instants,
        Err(ScheduleError::NoSolarEvent) => {
            log_warning!("Solar events undefined for this date, using fixed fallback times");
            fallback_instants(&now, tz)?
        }
        Err(e) => return Err(e.into()),
    };

    let displays = controller
        .detect()
        .context("Failed to enumerate DDC displays")?;
    if displays.is_empty() {
        return Ok(PassOutcome::NoDisplays);
    }

    let settings = ScheduleSettings {
        adjust_steps: config.adjust_steps(),
        offset_minutes: config.sunrise_sunset_offset(),
        step_policy: config.step_policy(),
    };
    let monitors = config.monitor_profiles();
    let defaults = config.default_profiles();
    let coordinator = RunCoordinator::new(settings, &monitors, &defaults, northern_by_month);

    match coordinator.run(
        now,
        &displays,
        &instants,
        controller,
        &lock::default_lock_path(),
    ) {
        Ok(report) => Ok(PassOutcome::Completed(report)),
        Err(ScheduleError::AlreadyRunning { holder_pid }) => {
            Ok(PassOutcome::Skipped { holder_pid })
        }
        Err(e) => Err(e.into()),
    }
}

/// Fixed clock-time instants for days without defined solar events.
fn fallback_instants(now: &DateTime<Tz>, tz: Tz) -> Result<SolarInstants> {
    let date = now.date_naive();
    let local = |hhmm: &str| -> Result<DateTime<Tz>> {
        let time = NaiveTime::parse_from_str(hhmm, "%H:%M")
            .context("Invalid fallback time constant")?;
        tz.from_local_datetime(&date.and_time(time))
            .earliest()
            .context("Fallback time does not exist in this timezone")
    };
    Ok(SolarInstants {
        dawn: local(FALLBACK_DAWN)?,
        sunrise: local(FALLBACK_SUNRISE)?,
        sunset: local(FALLBACK_SUNSET)?,
        dusk: local(FALLBACK_DUSK)?,
    })
}

/// Time until the next minute boundary on the `interval`-minute grid.
fn duration_until_next_tick(now: &DateTime<Tz>, interval: u32) -> Duration {
    let minute = now.minute();
    let next_slot = (minute / interval + 1) * interval;
    let minutes_ahead = next_slot - minute;
    let seconds = u64::from(minutes_ahead) * 60 - u64::from(now.second());
    Duration::from_secs(seconds.max(1))
}

fn sleep_interruptibly(duration: Duration, shutdown: &AtomicBool) {
    let mut remaining = duration;
    while !shutdown.load(Ordering::SeqCst) && remaining > Duration::ZERO {
        let slice = remaining.min(Duration::from_millis(500));
        time_source::sleep(slice);
        remaining = remaining.saturating_sub(slice);
    }
}

/// Log the report and notify for every monitor whose brightness changed.
fn announce(config: &Config, report: &RunReport) {
    log_block_start!(
        "Brightness pass complete ({} season, {} monitor(s))",
        report.season,
        report.results.len()
    );

    for result in &report.results {
        match &result.outcome {
            Ok(applied) if applied.changed => {
                log_indented!("{}: {}%", result.identity, applied.device_value);
                if config.notifications_enabled() {
                    let body = format!("{}: {}%", result.identity.model, applied.device_value);
                    if let Err(e) = notify::send_notification("Display Brightness", &body) {
                        log_warning!("Notification failed: {e:#}");
                    }
                }
            }
            Ok(applied) => {
                log_debug!("{}: unchanged at {}%", result.identity, applied.device_value);
            }
            Err(e) => {
                log_error!("{}: {e}", result.identity);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Europe::Berlin;

    fn at(hour: u32, minute: u32, second: u32) -> DateTime<Tz> {
        Berlin
            .with_ymd_and_hms(2025, 6, 21, hour, minute, second)
            .unwrap()
    }

    #[test]
    fn tick_lands_on_the_interval_grid() {
        let pause = duration_until_next_tick(&at(10, 3, 0), 12);
        assert_eq!(pause, Duration::from_secs(9 * 60));
    }

    #[test]
    fn tick_accounts_for_seconds_into_the_minute() {
        let pause = duration_until_next_tick(&at(10, 3, 30), 12);
        assert_eq!(pause, Duration::from_secs(9 * 60 - 30));
    }

    #[test]
    fn tick_on_a_boundary_waits_a_full_interval() {
        let pause = duration_until_next_tick(&at(10, 12, 0), 12);
        assert_eq!(pause, Duration::from_secs(12 * 60));
    }

    #[test]
    fn tick_wraps_to_the_top_of_the_hour() {
        let pause = duration_until_next_tick(&at(10, 55, 0), 30);
        assert_eq!(pause, Duration::from_secs(5 * 60));
    }

    #[test]
    fn fallback_instants_are_ordered() {
        let now = at(12, 0, 0);
        let instants = fallback_instants(&now, Berlin).unwrap();
        assert!(instants.dawn < instants.sunrise);
        assert!(instants.sunrise < instants.sunset);
        assert!(instants.sunset < instants.dusk);
    }
}
