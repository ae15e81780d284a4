//! Day/night signal - sun elevation and the day/night split
//!
//! The engine never owns a sun; it only reads an elevation angle in degrees
//! through [`DayNightSignal`]. [`SunCycle`] is a simple rotating sun for
//! headless runs.

use serde::{Deserialize, Serialize};

/// Degrees in a full sun revolution
pub const FULL_TURN_DEGREES: f32 = 360.0;

/// Source of the current sun elevation
pub trait DayNightSignal {
    /// Current sun elevation angle in degrees, 0-360
    fn sun_elevation_degrees(&self) -> f32;

    /// Move the signal forward by `dt` seconds; static signals ignore this
    fn advance(&mut self, _dt: f32) {}
}

/// Day or night, derived from the sun elevation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeOfDay {
    /// Elevation strictly between 0 and 180 degrees
    Day,
    /// Elevation at 0 or from 180 up to 360 degrees
    Night,
}

impl TimeOfDay {
    pub fn from_elevation(degrees: f32) -> Self {
        if degrees > 0.0 && degrees < 180.0 {
            TimeOfDay::Day
        } else {
            TimeOfDay::Night
        }
    }

    pub fn is_day(&self) -> bool {
        matches!(self, TimeOfDay::Day)
    }

    pub fn is_night(&self) -> bool {
        matches!(self, TimeOfDay::Night)
    }
}

/// A sun rotating at a constant rate around the horizon axis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SunCycle {
    elevation: f32,
    /// Degrees advanced per second of simulation time
    pub degrees_per_second: f32,
}

impl SunCycle {
    pub fn new(start_elevation: f32, degrees_per_second: f32) -> Self {
        Self {
            elevation: start_elevation.rem_euclid(FULL_TURN_DEGREES),
            degrees_per_second,
        }
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::from_elevation(self.elevation)
    }
}

impl Default for SunCycle {
    /// Sunrise, rotating 3 degrees per second (0.05 degrees per frame at 60 fps)
    fn default() -> Self {
        Self::new(0.0, 3.0)
    }
}

impl DayNightSignal for SunCycle {
    fn sun_elevation_degrees(&self) -> f32 {
        self.elevation
    }

    /// Rotate the sun by `dt` seconds worth of motion
    fn advance(&mut self, dt: f32) {
        self.elevation = (self.elevation + self.degrees_per_second * dt).rem_euclid(FULL_TURN_DEGREES);
    }
}

/// A fixed elevation, useful for tests and static scenes
#[derive(Debug, Clone, Copy)]
pub struct FixedSun(pub f32);

impl DayNightSignal for FixedSun {
    fn sun_elevation_degrees(&self) -> f32 {
        self.0
    }
}
