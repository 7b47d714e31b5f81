//! Per-frame telemetry fed to the graph screens.

use serde::{Deserialize, Serialize};

/// Diesel engine power figures, present only for diesel locomotives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DieselPower {
    pub max_output_power_w: f32,
    pub power_w: f32,
    pub max_power_w: f32,
}

/// Wall-clock load of each simulator thread, percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessLoad {
    pub render: f32,
    pub updater: f32,
    pub loader: f32,
    pub sound: f32,
}

/// One frame of host telemetry. Missing fields read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryFrame {
    pub throttle_percent: f32,
    pub motive_force_n: f32,
    /// Force the motive-force graph is scaled against. For geared
    /// locomotives the host reports the current gear's maximum.
    pub max_force_n: f32,
    pub max_power_w: f32,
    pub speed_mps: f32,
    pub substeps_per_s: f32,
    pub diesel: Option<DieselPower>,
    pub memory_working_set_bytes: u64,
    pub memory_limit_bytes: u64,
    /// Cumulative collection counts for generations 0, 1 and 2.
    pub gc_counts: [u32; 3],
    pub frame_time_s: f32,
    pub process_load: ProcessLoad,
}

/// Input and output power as fractions of maximum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerFractions {
    pub input: f32,
    pub output: f32,
}

impl TelemetryFrame {
    /// Resolves the power pair once per frame: diesel engines report it
    /// directly, everything else is derived from throttle and tractive power.
    pub fn power_fractions(&self) -> PowerFractions {
        match self.diesel {
            Some(d) => PowerFractions {
                input: ratio(d.max_output_power_w, d.max_power_w),
                output: ratio(d.power_w, d.max_power_w),
            },
            None => PowerFractions {
                input: self.throttle_percent * 0.01,
                output: ratio(self.motive_force_n, self.max_power_w) * self.speed_mps,
            },
        }
    }

    pub fn motive_force_fraction(&self) -> f32 {
        ratio(self.motive_force_n, self.max_force_n)
    }

    pub fn memory_fraction(&self) -> f32 {
        if self.memory_limit_bytes == 0 {
            return 0.0;
        }
        (self.memory_working_set_bytes as f64 / self.memory_limit_bytes as f64) as f32
    }

    pub fn is_blank(&self) -> bool {
        *self == Self::default()
    }
}

fn ratio(value: f32, max: f32) -> f32 {
    if max == 0.0 {
        0.0
    } else {
        value / max
    }
}

/// Remembers the previous collection counts so each frame can report
/// the oldest generation collected since the last one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GcCounter {
    last: [u32; 3],
}

impl GcCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 1.0 for a gen 2 collection, 0.5 for gen 1, 0.25 for gen 0, else 0.
    pub fn sample(&mut self, counts: [u32; 3]) -> f32 {
        let value = if counts[2] > self.last[2] {
            1.0
        } else if counts[1] > self.last[1] {
            0.5
        } else if counts[0] > self.last[0] {
            0.25
        } else {
            0.0
        };
        self.last = counts;
        value
    }

    pub fn reset(&mut self) {
        self.last = [0; 3];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_fractions_prefer_diesel() {
        let frame = TelemetryFrame {
            throttle_percent: 80.0,
            diesel: Some(DieselPower {
                max_output_power_w: 900.0,
                power_w: 600.0,
                max_power_w: 1200.0,
            }),
            ..Default::default()
        };
        let p = frame.power_fractions();
        assert!((p.input - 0.75).abs() < 1e-6);
        assert!((p.output - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_power_fractions_fallback() {
        let frame = TelemetryFrame {
            throttle_percent: 40.0,
            motive_force_n: 100_000.0,
            max_power_w: 2_000_000.0,
            speed_mps: 10.0,
            ..Default::default()
        };
        let p = frame.power_fractions();
        assert!((p.input - 0.4).abs() < 1e-6);
        assert!((p.output - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_zero_maxima_give_zero() {
        let frame = TelemetryFrame {
            motive_force_n: 5.0,
            memory_working_set_bytes: 10,
            ..Default::default()
        };
        assert_eq!(frame.motive_force_fraction(), 0.0);
        assert_eq!(frame.memory_fraction(), 0.0);
        assert_eq!(frame.power_fractions().output, 0.0);
    }

    #[test]
    fn test_gc_counter_reports_oldest_generation() {
        let mut gc = GcCounter::new();
        assert_eq!(gc.sample([0, 0, 0]), 0.0);
        assert_eq!(gc.sample([1, 0, 0]), 0.25);
        assert_eq!(gc.sample([2, 1, 0]), 0.5);
        assert_eq!(gc.sample([3, 2, 1]), 1.0);
        assert_eq!(gc.sample([3, 2, 1]), 0.0);
        gc.reset();
        assert_eq!(gc.sample([3, 2, 1]), 1.0);
    }

    #[test]
    fn test_partial_json_defaults() {
        let frame: TelemetryFrame = serde_json::from_str(r#"{ "throttle_percent": 55.0 }"#).unwrap();
        assert_eq!(frame.throttle_percent, 55.0);
        assert!(frame.diesel.is_none());
        assert!(!frame.is_blank());
        assert!(TelemetryFrame::default().is_blank());
    }
}
