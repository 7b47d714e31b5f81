//! Fixed distance tick marks for the track monitor.
//!
//! The raw interval (maximum distance / tick count, in km or miles) is snapped
//! to a multiple of a rounding step that grows with the scale, so labels read
//! "1.0 km", "1.5 km", never "1.3 km".

use serde::Serialize;

use crate::units::UnitSystem;

/// (interval above, rounding step) in display units, ascending.
const ROUNDING_STEPS: [(f32, f32); 3] = [(0.0, 0.5), (5.0, 1.0), (10.0, 2.0)];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceMarker {
    pub distance_m: f32,
    /// Pixels from the train's zero point along the band.
    pub offset_px: i32,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarkerSet {
    /// Rounded interval between ticks, in metres. Zero when nothing could be computed.
    pub interval_m: f32,
    pub markers: Vec<DistanceMarker>,
}

/// Rounding step for an interval expressed in display units.
pub fn rounding_step(interval: f32) -> f32 {
    ROUNDING_STEPS
        .iter()
        .filter(|(above, _)| interval > *above)
        .map(|(_, step)| *step)
        .last()
        .unwrap_or(ROUNDING_STEPS[0].1)
}

/// Ticks for a band of `pixel_band` pixels representing `max_distance_m`.
///
/// Only ticks strictly closer than `max_distance_m` are returned. A zero or
/// non-finite distance, band or tick count yields an empty set.
pub fn generate_ticks(max_distance_m: f32, pixel_band: f32, tick_count: u32, units: UnitSystem) -> MarkerSet {
    if tick_count == 0 || !max_distance_m.is_finite() || max_distance_m <= 0.0 || !pixel_band.is_finite() {
        return MarkerSet::default();
    }
    let distance_factor = pixel_band / max_distance_m;

    let raw = units.from_metres(max_distance_m) / tick_count as f32;
    let step = rounding_step(raw);
    let mut interval = (raw / step).round_ties_even() * step;
    if interval <= 0.0 {
        interval = step;
    }
    let interval_m = units.to_metres(interval);

    let markers = (1..=tick_count)
        .map(|i| interval_m * i as f32)
        .filter(|&distance_m| distance_m < max_distance_m)
        .map(|distance_m| DistanceMarker {
            distance_m,
            offset_px: (distance_m * distance_factor).round_ties_even() as i32,
            label: units.format_distance(distance_m),
        })
        .collect();

    MarkerSet { interval_m, markers }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounding_step_table() {
        assert_eq!(rounding_step(0.3), 0.5);
        assert_eq!(rounding_step(5.0), 0.5);
        assert_eq!(rounding_step(5.1), 1.0);
        assert_eq!(rounding_step(12.0), 2.0);
    }

    #[test]
    fn test_metric_default_scale() {
        let set = generate_ticks(5000.0, 200.0, 4, UnitSystem::Metric);
        assert_eq!(set.interval_m, 1000.0);
        let distances: Vec<f32> = set.markers.iter().map(|m| m.distance_m).collect();
        assert_eq!(distances, vec![1000.0, 2000.0, 3000.0, 4000.0]);
        let offsets: Vec<i32> = set.markers.iter().map(|m| m.offset_px).collect();
        assert_eq!(offsets, vec![40, 80, 120, 160]);
        assert_eq!(set.markers[0].label, "1.0 km");
    }

    #[test]
    fn test_ticks_are_round_and_increasing() {
        for (max, count) in [(5000.0, 3), (5000.0, 4), (12_000.0, 4), (50_000.0, 4), (800.0, 4)] {
            let set = generate_ticks(max, 300.0, count, UnitSystem::Metric);
            assert!(!set.markers.is_empty());
            for pair in set.markers.windows(2) {
                assert!(pair[1].distance_m > pair[0].distance_m);
            }
            for m in &set.markers {
                let half_km = m.distance_m / 500.0;
                assert!((half_km - half_km.round()).abs() < 1e-3, "{} is not round", m.distance_m);
                assert!(m.distance_m < max);
            }
        }
    }

    #[test]
    fn test_imperial_uses_miles() {
        let set = generate_ticks(5000.0, 200.0, 4, UnitSystem::Imperial);
        assert!((set.interval_m - 1609.344).abs() < 0.01);
        assert_eq!(set.markers.len(), 3);
        assert_eq!(set.markers[0].label, "1.0 mi");
    }

    #[test]
    fn test_degenerate_inputs_yield_nothing() {
        assert_eq!(generate_ticks(0.0, 200.0, 4, UnitSystem::Metric), MarkerSet::default());
        assert_eq!(generate_ticks(5000.0, 200.0, 0, UnitSystem::Metric), MarkerSet::default());
        assert_eq!(generate_ticks(f32::NAN, 200.0, 4, UnitSystem::Metric), MarkerSet::default());
    }

    #[test]
    fn test_tiny_scale_never_zero_interval() {
        let set = generate_ticks(100.0, 200.0, 4, UnitSystem::Metric);
        assert_eq!(set.interval_m, 500.0);
        assert!(set.markers.is_empty());
    }
}
