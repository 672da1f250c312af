//! The brightness scheduling engine.
//!
//! Everything in this module is deterministic: given a point in time, a set
//! of solar instants, a season and per-monitor profiles, the engine computes
//! the target brightness percentage for each monitor. The only state it
//! touches is the run lock that serializes concurrent passes.
//!
//! ## Structure
//! - [`season`]: calendar date to season mapping (injectable strategy)
//! - [`windows`]: solar instants to morning/evening transition windows
//! - [`curve`]: the plateau staircase between night and day brightness
//! - [`profile`]: serial-keyed per-monitor profile resolution
//! - [`runner`]: one full pass over all connected monitors, guarded by the
//!   run lock

pub mod curve;
pub mod profile;
pub mod runner;
pub mod season;
pub mod windows;

pub use curve::{StepPolicy, evaluate};
pub use profile::{
    BrightnessProfile, DefaultProfiles, MonitorIdentity, SeasonProfiles, resolve_profile,
};
pub use runner::{Applied, MonitorError, MonitorResult, RunCoordinator, RunReport, ScheduleSettings};
pub use season::{Season, SeasonStrategy, northern_by_month};
pub use windows::{SolarInstants, TransitionWindow, TransitionWindows, build_windows};

use thiserror::Error;

/// Failures of the scheduling engine itself.
///
/// Per-monitor device failures are not represented here; they are isolated
/// inside a pass and reported through [`runner::MonitorResult`].
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Upstream solar data violated `dawn <= sunrise <= sunset <= dusk`.
    /// Fatal to the whole pass; window semantics would be undefined.
    #[error("solar events out of order: {reason}")]
    InvalidSolarOrdering { reason: String },

    /// A per-monitor entry exists but lacks the resolved season's profile.
    #[error("monitor {serial} has no {season} profile configured")]
    MissingSeasonProfile { serial: String, season: Season },

    /// Another pass currently holds the run lock. Expected under normal
    /// periodic triggering; the pass is skipped, not retried.
    #[error("another brightness pass is already running")]
    AlreadyRunning { holder_pid: Option<u32> },

    /// The solar provider could not produce events for this date and
    /// location (polar day or night). The caller decides the fallback.
    #[error("solar events are undefined for this date and location")]
    NoSolarEvent,

    /// The run lock could not be opened or written.
    #[error("run lock unavailable: {0}")]
    LockIo(#[from] std::io::Error),
}
