//! Metric/imperial conversion and the short strings the monitor prints.

use serde::{Deserialize, Serialize};

const METRES_PER_MILE: f32 = 1609.344;
const METRES_PER_YARD: f32 = 0.9144;
const MPS_TO_KMPH: f32 = 3.6;
const MPS_TO_MPH: f32 = 2.236_936_3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn from_metric_flag(metric: bool) -> Self {
        if metric {
            UnitSystem::Metric
        } else {
            UnitSystem::Imperial
        }
    }

    /// Metres to the long display unit (km or miles).
    pub fn from_metres(self, metres: f32) -> f32 {
        match self {
            UnitSystem::Metric => metres / 1000.0,
            UnitSystem::Imperial => metres / METRES_PER_MILE,
        }
    }

    /// Long display unit (km or miles) back to metres.
    pub fn to_metres(self, distance: f32) -> f32 {
        match self {
            UnitSystem::Metric => distance * 1000.0,
            UnitSystem::Imperial => distance * METRES_PER_MILE,
        }
    }

    /// Metres per second to km/h or mph.
    pub fn speed_from_mps(self, mps: f32) -> f32 {
        match self {
            UnitSystem::Metric => mps * MPS_TO_KMPH,
            UnitSystem::Imperial => mps * MPS_TO_MPH,
        }
    }

    /// Distance with unit: metres/yards when short, otherwise km/miles to one decimal.
    pub fn format_distance(self, metres: f32) -> String {
        match self {
            UnitSystem::Metric if metres.abs() < 100.0 => format!("{:.0} m", metres),
            UnitSystem::Metric => format!("{:.1} km", metres / 1000.0),
            UnitSystem::Imperial if metres.abs() < 0.1 * METRES_PER_MILE => {
                format!("{:.0} yd", metres / METRES_PER_YARD)
            }
            UnitSystem::Imperial => format!("{:.1} mi", metres / METRES_PER_MILE),
        }
    }

    /// Speed limit without a unit, whole numbers only.
    pub fn format_speed_limit(self, mps: f32) -> String {
        format!("{:.0}", self.speed_from_mps(mps))
    }
}
