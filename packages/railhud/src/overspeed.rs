//! Rail colour from speed and the over-speed accumulator it drives.

use serde::{Deserialize, Serialize};

use crate::text::{colors, Rgba};

/// Minimum time in red before it counts towards the cumulative duration.
const OVERSPEED_GRACE_S: f64 = 1.0;

/// Colour of the monitor's rails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrackColor {
    Green,
    PaleGreen,
    Orange,
    Red,
}

impl TrackColor {
    pub fn from_speeds(speed_mps: f32, allowed_mps: f32) -> Self {
        let speed = speed_mps.abs();
        if speed < allowed_mps - 1.0 {
            TrackColor::Green
        } else if speed < allowed_mps {
            TrackColor::PaleGreen
        } else if speed < allowed_mps + 5.0 {
            TrackColor::Orange
        } else {
            TrackColor::Red
        }
    }

    pub fn rgba(self) -> Rgba {
        match self {
            TrackColor::Green => colors::GREEN,
            TrackColor::PaleGreen => colors::PALE_GREEN,
            TrackColor::Orange => colors::ORANGE,
            TrackColor::Red => colors::RED,
        }
    }
}

/// Counts over-speed events and how long they lasted.
///
/// Owned by the host session and handed to the monitor every frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverspeedTracker {
    /// Completed over-speed episodes.
    pub events: u32,
    /// Time spent over speed, counted in chunks once an episode passes the grace period.
    pub duration_s: f64,
    #[serde(skip)]
    red_since_s: Option<f64>,
}

impl OverspeedTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_over_speed(&self) -> bool {
        self.red_since_s.is_some()
    }

    /// Feeds this frame's rail colour. Returns true when the cumulative
    /// duration changed.
    pub fn observe(&mut self, color: TrackColor, clock_s: f64) -> bool {
        let red = color == TrackColor::Red;
        match (red, self.red_since_s) {
            (true, None) => {
                self.red_since_s = Some(clock_s);
                false
            }
            (false, Some(_)) => {
                self.red_since_s = None;
                self.events += 1;
                log::debug!("over-speed episode ended ({} so far)", self.events);
                false
            }
            (true, Some(since)) if clock_s - since > OVERSPEED_GRACE_S => {
                self.duration_s += clock_s - since;
                self.red_since_s = Some(clock_s);
                true
            }
            _ => false,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
