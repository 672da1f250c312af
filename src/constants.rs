//! Default values and validation limits shared across the application.

/// Default latitude when no location is configured (Bremen, Germany).
pub const DEFAULT_LATITUDE: f64 = 53.075144;
/// Default longitude when no location is configured.
pub const DEFAULT_LONGITUDE: f64 = 8.802161;
/// Default IANA timezone matching the default coordinates.
pub const DEFAULT_TIMEZONE: &str = "Europe/Berlin";

/// Default number of brightness plateaus per transition window.
pub const DEFAULT_ADJUST_STEPS: u8 = 5;
/// Valid range for `adjust_steps`.
pub const MINIMUM_ADJUST_STEPS: u8 = 1;
pub const MAXIMUM_ADJUST_STEPS: u8 = 10;

/// Default offset applied past sunrise / before sunset, in minutes.
pub const DEFAULT_SUNRISE_SUNSET_OFFSET: i64 = 60;
/// Valid range for `sunrise_sunset_offset` in minutes.
pub const MINIMUM_SUNRISE_SUNSET_OFFSET: i64 = 0;
pub const MAXIMUM_SUNRISE_SUNSET_OFFSET: i64 = 120;

/// Default scheduling interval in minutes.
pub const DEFAULT_INTERVAL_MINUTES: u32 = 12;
/// Scheduling intervals that divide the hour evenly.
pub const ALLOWED_INTERVAL_MINUTES: [u32; 5] = [10, 12, 15, 20, 30];

/// Default brightness profiles, percent.
pub const DEFAULT_SUMMER_DAY_BRIGHTNESS: u16 = 100;
pub const DEFAULT_SUMMER_NIGHT_BRIGHTNESS: u16 = 60;
pub const DEFAULT_WINTER_DAY_BRIGHTNESS: u16 = 90;
pub const DEFAULT_WINTER_NIGHT_BRIGHTNESS: u16 = 60;

/// Valid brightness range, percent.
pub const MINIMUM_BRIGHTNESS: u16 = 0;
pub const MAXIMUM_BRIGHTNESS: u16 = 100;

/// Clock-time fallbacks used when solar events are undefined for the
/// configured location (polar day or night). Format: "HH:MM".
pub const FALLBACK_DAWN: &str = "06:00";
pub const FALLBACK_SUNRISE: &str = "06:30";
pub const FALLBACK_SUNSET: &str = "19:30";
pub const FALLBACK_DUSK: &str = "20:00";

/// VCP feature code for monitor brightness (MCCS "Luminance").
pub const VCP_BRIGHTNESS: u8 = 0x10;

/// Timeout for a single ddcutil invocation, in seconds.
pub const DDCUTIL_TIMEOUT_SECS: u64 = 10;

/// Lock file name placed in the runtime directory.
pub const LOCK_FILE_NAME: &str = "brightr.lock";

/// Name under which notifications are sent.
pub const NOTIFICATION_APP_NAME: &str = "brightr";

/// Process exit code for fatal startup errors.
pub const EXIT_FAILURE: i32 = 1;
