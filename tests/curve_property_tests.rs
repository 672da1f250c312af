//! Property tests for the brightness curve.

use brightr::core::{
    BrightnessProfile, SolarInstants, StepPolicy, TransitionWindows, build_windows, evaluate,
};
use chrono::{DateTime, TimeZone};
use chrono_tz::Europe::Berlin;
use chrono_tz::Tz;
use proptest::prelude::*;

/// Minute of day to a concrete timestamp on a fixed date.
fn at_minute(minute: u32) -> DateTime<Tz> {
    Berlin
        .with_ymd_and_hms(2025, 6, 21, minute / 60, minute % 60, 0)
        .unwrap()
}

/// Morning window [06:00, 07:00), evening window [20:00, 21:00).
fn windows() -> TransitionWindows {
    let instants = SolarInstants {
        dawn: at_minute(6 * 60),
        sunrise: at_minute(7 * 60),
        sunset: at_minute(20 * 60),
        dusk: at_minute(21 * 60),
    };
    build_windows(&instants, 0).unwrap()
}

fn profile_strategy() -> impl Strategy<Value = BrightnessProfile> {
    (0u16..=100, 0u16..=100).prop_map(|(day, night)| BrightnessProfile {
        day_brightness: day,
        night_brightness: night,
    })
}

fn steps_strategy() -> impl Strategy<Value = u8> {
    1u8..=10
}

proptest! {
    /// Any time before the morning window yields exactly the night value.
    #[test]
    fn night_before_dawn(
        profile in profile_strategy(),
        steps in steps_strategy(),
        minute in 0u32..(6 * 60),
    ) {
        let value = evaluate(&at_minute(minute), &windows(), &profile, steps, StepPolicy::Plateau);
        prop_assert_eq!(value, f64::from(profile.night_brightness));
    }

    /// Any time at/after dusk yields exactly the night value.
    #[test]
    fn night_after_dusk(
        profile in profile_strategy(),
        steps in steps_strategy(),
        minute in (21 * 60)..(24 * 60u32),
    ) {
        let value = evaluate(&at_minute(minute), &windows(), &profile, steps, StepPolicy::Plateau);
        prop_assert_eq!(value, f64::from(profile.night_brightness));
    }

    /// The full daytime plateau yields exactly the day value.
    #[test]
    fn day_on_the_plateau(
        profile in profile_strategy(),
        steps in steps_strategy(),
        minute in (7 * 60)..(20 * 60u32),
    ) {
        let value = evaluate(&at_minute(minute), &windows(), &profile, steps, StepPolicy::Plateau);
        prop_assert_eq!(value, f64::from(profile.day_brightness));
    }

    /// The curve never leaves [min(day, night), max(day, night)].
    #[test]
    fn value_stays_within_profile_bounds(
        profile in profile_strategy(),
        steps in steps_strategy(),
        minute in 0u32..(24 * 60),
    ) {
        let day = f64::from(profile.day_brightness);
        let night = f64::from(profile.night_brightness);
        let value = evaluate(&at_minute(minute), &windows(), &profile, steps, StepPolicy::Plateau);
        prop_assert!(value >= day.min(night));
        prop_assert!(value <= day.max(night));
    }

    /// Pure function: identical inputs, identical output.
    #[test]
    fn evaluation_is_idempotent(
        profile in profile_strategy(),
        steps in steps_strategy(),
        minute in 0u32..(24 * 60),
    ) {
        let now = at_minute(minute);
        let first = evaluate(&now, &windows(), &profile, steps, StepPolicy::Plateau);
        let second = evaluate(&now, &windows(), &profile, steps, StepPolicy::Plateau);
        prop_assert_eq!(first, second);
    }

    /// The morning staircase never decreases as time advances.
    #[test]
    fn morning_staircase_is_non_decreasing(
        profile in profile_strategy(),
        steps in steps_strategy(),
        (earlier, later) in (6 * 60u32..7 * 60, 6 * 60u32..7 * 60)
            .prop_map(|(a, b)| (a.min(b), a.max(b))),
    ) {
        prop_assume!(profile.day_brightness >= profile.night_brightness);
        let w = windows();
        let v1 = evaluate(&at_minute(earlier), &w, &profile, steps, StepPolicy::Plateau);
        let v2 = evaluate(&at_minute(later), &w, &profile, steps, StepPolicy::Plateau);
        prop_assert!(v1 <= v2);
    }

    /// The evening staircase never increases as time advances.
    #[test]
    fn evening_staircase_is_non_increasing(
        profile in profile_strategy(),
        steps in steps_strategy(),
        (earlier, later) in (20 * 60u32..21 * 60, 20 * 60u32..21 * 60)
            .prop_map(|(a, b)| (a.min(b), a.max(b))),
    ) {
        prop_assume!(profile.day_brightness >= profile.night_brightness);
        let w = windows();
        let v1 = evaluate(&at_minute(earlier), &w, &profile, steps, StepPolicy::Plateau);
        let v2 = evaluate(&at_minute(later), &w, &profile, steps, StepPolicy::Plateau);
        prop_assert!(v1 >= v2);
    }

    /// The staircase never reaches the full day value inside the window.
    #[test]
    fn staircase_stays_strictly_below_day(
        profile in profile_strategy(),
        steps in steps_strategy(),
        minute in 6 * 60u32..7 * 60,
    ) {
        prop_assume!(profile.day_brightness > profile.night_brightness);
        let value = evaluate(&at_minute(minute), &windows(), &profile, steps, StepPolicy::Plateau);
        prop_assert!(value < f64::from(profile.day_brightness));
    }
}
