//! Solar event computation for the configured location.
//!
//! Civil twilight bounds (dawn/dusk) and horizon crossings
//! (sunrise/sunset) come from the `sunrise` crate and are converted into
//! the coordinate timezone before the engine sees them. Degenerate days at
//! polar latitudes, where the sun never crosses the relevant elevation,
//! surface as `NoSolarEvent` and the caller picks the fallback policy.

use chrono::NaiveDate;
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use sunrise::{Coordinates, DawnType, SolarDay, SolarEvent};
use tzf_rs::DefaultFinder;

use crate::core::{ScheduleError, SolarInstants};

static TIMEZONE_FINDER: Lazy<DefaultFinder> = Lazy::new(DefaultFinder::new);

/// Compute the four solar instants for one date and location.
pub fn solar_instants(
    date: NaiveDate,
    latitude: f64,
    longitude: f64,
    tz: Tz,
) -> Result<SolarInstants, ScheduleError> {
    let coord = Coordinates::new(latitude, longitude).ok_or(ScheduleError::NoSolarEvent)?;
    let solar_day = SolarDay::new(coord, date);

    let dawn = solar_day
        .event_time(SolarEvent::Dawn(DawnType::Civil))
        .with_timezone(&tz);
    let sunrise = solar_day
        .event_time(SolarEvent::Sunrise)
        .with_timezone(&tz);
    let sunset = solar_day.event_time(SolarEvent::Sunset).with_timezone(&tz);
    let dusk = solar_day
        .event_time(SolarEvent::Dusk(DawnType::Civil))
        .with_timezone(&tz);

    // Polar day/night collapses the events; there is no meaningful cycle
    // to schedule against.
    if sunrise >= sunset || dawn >= dusk {
        return Err(ScheduleError::NoSolarEvent);
    }

    Ok(SolarInstants {
        dawn,
        sunrise,
        sunset,
        dusk,
    })
}

/// Resolve the IANA timezone covering the given coordinates.
pub fn timezone_for_coordinates(latitude: f64, longitude: f64) -> Option<Tz> {
    // tzf-rs takes (longitude, latitude).
    TIMEZONE_FINDER
        .get_tz_name(longitude, latitude)
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn bremen_midsummer_has_ordered_events() {
        let tz: Tz = "Europe/Berlin".parse().unwrap();
        let instants = solar_instants(date(2025, 6, 21), 53.075144, 8.802161, tz).unwrap();
        assert!(instants.dawn <= instants.sunrise);
        assert!(instants.sunrise < instants.sunset);
        assert!(instants.sunset <= instants.dusk);
    }

    #[test]
    fn coordinates_resolve_to_a_timezone() {
        let tz = timezone_for_coordinates(53.075144, 8.802161).unwrap();
        assert_eq!(tz.name(), "Europe/Berlin");
    }

    #[test]
    fn equator_days_are_always_defined() {
        let tz: Tz = "Africa/Nairobi".parse().unwrap();
        for month in 1..=12 {
            assert!(solar_instants(date(2025, month, 15), -1.28, 36.82, tz).is_ok());
        }
    }
}
