//! End-to-end tests of a guarded scheduling pass with a fake device sink.

use brightr::core::{
    BrightnessProfile, DefaultProfiles, MonitorIdentity, RunCoordinator, ScheduleError,
    ScheduleSettings, SeasonProfiles, SolarInstants, StepPolicy, northern_by_month,
};
use brightr::ddc::{BrightnessSink, DdcError, DetectedDisplay};
use brightr::io::lock::RunLock;
use chrono::{DateTime, TimeZone};
use chrono_tz::Europe::Berlin;
use chrono_tz::Tz;
use serial_test::serial;
use std::cell::RefCell;
use std::collections::HashMap;
use tempfile::tempdir;

/// In-memory sink recording every write, in order.
struct FakeSink {
    current: RefCell<HashMap<u32, u16>>,
    writes: RefCell<Vec<(u32, u16)>>,
}

impl FakeSink {
    fn new(initial: &[(u32, u16)]) -> Self {
        Self {
            current: RefCell::new(initial.iter().copied().collect()),
            writes: RefCell::new(Vec::new()),
        }
    }
}

impl BrightnessSink for FakeSink {
    fn current_brightness(&self, display: &DetectedDisplay) -> Result<u16, DdcError> {
        self.current
            .borrow()
            .get(&display.index)
            .copied()
            .ok_or_else(|| DdcError::Parse("unknown display".to_string()))
    }

    fn set_brightness(&self, display: &DetectedDisplay, percent: u16) -> Result<(), DdcError> {
        self.current.borrow_mut().insert(display.index, percent);
        self.writes.borrow_mut().push((display.index, percent));
        Ok(())
    }
}

fn at(hour: u32, min: u32) -> DateTime<Tz> {
    Berlin.with_ymd_and_hms(2025, 6, 21, hour, min, 0).unwrap()
}

fn instants() -> SolarInstants {
    SolarInstants {
        dawn: at(5, 0),
        sunrise: at(6, 0),
        sunset: at(21, 0),
        dusk: at(22, 0),
    }
}

fn defaults() -> DefaultProfiles {
    DefaultProfiles {
        summer: BrightnessProfile {
            day_brightness: 100,
            night_brightness: 60,
        },
        winter: BrightnessProfile {
            day_brightness: 90,
            night_brightness: 60,
        },
    }
}

fn settings() -> ScheduleSettings {
    ScheduleSettings {
        adjust_steps: 2,
        offset_minutes: 0,
        step_policy: StepPolicy::Plateau,
    }
}

fn display(index: u32, serial: &str) -> DetectedDisplay {
    DetectedDisplay {
        index,
        identity: MonitorIdentity {
            model: "DELL U2720Q".to_string(),
            serial: serial.to_string(),
        },
    }
}

#[test]
#[serial]
fn results_preserve_enumeration_order() {
    let dir = tempdir().unwrap();
    let lock_path = dir.path().join("run.lock");
    let monitors = HashMap::new();
    let defaults = defaults();
    let coordinator = RunCoordinator::new(settings(), &monitors, &defaults, northern_by_month);

    let sink = FakeSink::new(&[(1, 10), (2, 10), (3, 10)]);
    let displays = vec![display(1, "AAA"), display(2, "BBB"), display(3, "CCC")];
    let report = coordinator
        .run(at(13, 0), &displays, &instants(), &sink, &lock_path)
        .unwrap();

    let serials: Vec<&str> = report
        .results
        .iter()
        .map(|r| r.identity.serial.as_str())
        .collect();
    assert_eq!(serials, ["AAA", "BBB", "CCC"]);
    assert_eq!(
        sink.writes.borrow().as_slice(),
        &[(1, 100), (2, 100), (3, 100)]
    );
}

#[test]
#[serial]
fn morning_ramp_writes_the_reference_plateau() {
    let dir = tempdir().unwrap();
    let lock_path = dir.path().join("run.lock");
    let monitors = HashMap::new();
    let defaults = defaults();
    let coordinator = RunCoordinator::new(settings(), &monitors, &defaults, northern_by_month);

    // steps=2, morning [05:00, 06:00): first plateau is 60 + 1/3 * 40,
    // quantized to 73 at the device.
    let sink = FakeSink::new(&[(1, 60)]);
    let displays = vec![display(1, "AAA")];
    coordinator
        .run(at(5, 10), &displays, &instants(), &sink, &lock_path)
        .unwrap();
    assert_eq!(sink.writes.borrow().as_slice(), &[(1, 73)]);
}

#[test]
#[serial]
fn matching_target_skips_the_device_write() {
    let dir = tempdir().unwrap();
    let lock_path = dir.path().join("run.lock");
    let monitors = HashMap::new();
    let defaults = defaults();
    let coordinator = RunCoordinator::new(settings(), &monitors, &defaults, northern_by_month);

    let sink = FakeSink::new(&[(1, 100)]);
    let displays = vec![display(1, "AAA")];
    let report = coordinator
        .run(at(13, 0), &displays, &instants(), &sink, &lock_path)
        .unwrap();
    assert!(sink.writes.borrow().is_empty());
    assert_eq!(report.changed().count(), 0);
}

#[test]
#[serial]
fn per_monitor_profile_overrides_apply() {
    let dir = tempdir().unwrap();
    let lock_path = dir.path().join("run.lock");
    let mut monitors = HashMap::new();
    monitors.insert(
        "BBB".to_string(),
        SeasonProfiles {
            summer: Some(BrightnessProfile {
                day_brightness: 80,
                night_brightness: 40,
            }),
            winter: Some(BrightnessProfile {
                day_brightness: 70,
                night_brightness: 40,
            }),
        },
    );
    let defaults = defaults();
    let coordinator = RunCoordinator::new(settings(), &monitors, &defaults, northern_by_month);

    let sink = FakeSink::new(&[(1, 0), (2, 0)]);
    let displays = vec![display(1, "AAA"), display(2, "BBB")];
    coordinator
        .run(at(13, 0), &displays, &instants(), &sink, &lock_path)
        .unwrap();
    assert_eq!(sink.writes.borrow().as_slice(), &[(1, 100), (2, 80)]);
}

#[test]
#[serial]
fn concurrent_passes_are_mutually_exclusive() {
    let dir = tempdir().unwrap();
    let lock_path = dir.path().join("run.lock");

    // A pass in another process holds the guard.
    let held = RunLock::try_acquire(&lock_path).unwrap().unwrap();

    let monitors = HashMap::new();
    let defaults = defaults();
    let coordinator = RunCoordinator::new(settings(), &monitors, &defaults, northern_by_month);
    let sink = FakeSink::new(&[(1, 0)]);
    let displays = vec![display(1, "AAA")];

    let err = coordinator
        .run(at(13, 0), &displays, &instants(), &sink, &lock_path)
        .unwrap_err();
    assert!(matches!(err, ScheduleError::AlreadyRunning { .. }));
    assert!(sink.writes.borrow().is_empty());

    // Once the guard is released the next pass proceeds.
    drop(held);
    let report = coordinator
        .run(at(13, 0), &displays, &instants(), &sink, &lock_path)
        .unwrap();
    assert_eq!(report.changed().count(), 1);
}

#[test]
#[serial]
fn stale_lock_does_not_wedge_the_guard() {
    let dir = tempdir().unwrap();
    let lock_path = dir.path().join("run.lock");
    // Leftover lock file from a crashed pass, no live owner.
    std::fs::write(&lock_path, "999999999\n").unwrap();

    let monitors = HashMap::new();
    let defaults = defaults();
    let coordinator = RunCoordinator::new(settings(), &monitors, &defaults, northern_by_month);
    let sink = FakeSink::new(&[(1, 0)]);
    let displays = vec![display(1, "AAA")];

    let report = coordinator
        .run(at(13, 0), &displays, &instants(), &sink, &lock_path)
        .unwrap();
    assert_eq!(report.changed().count(), 1);
    assert!(!lock_path.exists());
}

#[test]
#[serial]
fn winter_pass_uses_the_winter_profile() {
    let dir = tempdir().unwrap();
    let lock_path = dir.path().join("run.lock");
    let monitors = HashMap::new();
    let defaults = defaults();
    let coordinator = RunCoordinator::new(settings(), &monitors, &defaults, northern_by_month);

    let sink = FakeSink::new(&[(1, 0)]);
    let displays = vec![display(1, "AAA")];
    let january = Berlin.with_ymd_and_hms(2025, 1, 15, 13, 0, 0).unwrap();
    let winter_instants = SolarInstants {
        dawn: Berlin.with_ymd_and_hms(2025, 1, 15, 7, 30, 0).unwrap(),
        sunrise: Berlin.with_ymd_and_hms(2025, 1, 15, 8, 15, 0).unwrap(),
        sunset: Berlin.with_ymd_and_hms(2025, 1, 15, 16, 30, 0).unwrap(),
        dusk: Berlin.with_ymd_and_hms(2025, 1, 15, 17, 15, 0).unwrap(),
    };
    coordinator
        .run(january, &displays, &winter_instants, &sink, &lock_path)
        .unwrap();
    assert_eq!(sink.writes.borrow().as_slice(), &[(1, 90)]);
}
