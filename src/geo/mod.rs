//! Geographic solar calculations.

pub mod solar;

pub use solar::{solar_instants, timezone_for_coordinates};
