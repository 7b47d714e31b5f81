//! Track features reported ahead of (or behind) the train each frame.

use serde::{Deserialize, Serialize};

use crate::signal_aspect::SignalAspect;

/// Why the train's movement authority ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorityKind {
    EndOfTrack,
    EndOfPath,
    ReservedSwitch,
    Loop,
    TrainAhead,
    MaxDistance,
    NoPathReserved,
    Signal,
    EndOfAuthority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpeedPostKind {
    #[default]
    Standard,
    TempRestrictedStart,
    TempRestrictedResume,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TrackItemKind {
    Signal {
        aspect: SignalAspect,
        #[serde(default)]
        allowed_speed_mps: f32,
    },
    /// Speed post or speed-only signal.
    SpeedPost {
        allowed_speed_mps: f32,
        #[serde(default)]
        kind: SpeedPostKind,
        #[serde(default)]
        is_warning: bool,
    },
    Station {
        #[serde(default)]
        platform_length_m: f32,
    },
    WaitingPoint {
        #[serde(default)]
        enabled: bool,
    },
    Milepost {
        label: String,
    },
    Switch {
        #[serde(default)]
        right: bool,
    },
    Reversal {
        #[serde(default = "default_true")]
        valid: bool,
        #[serde(default)]
        enabled: bool,
    },
    Authority {
        kind: AuthorityKind,
    },
}

fn default_true() -> bool {
    true
}

/// A feature at a signed distance from the train (positive = ahead).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackObjectItem {
    pub distance_m: f32,
    #[serde(flatten)]
    pub kind: TrackItemKind,
}

impl TrackObjectItem {
    pub fn new(distance_m: f32, kind: TrackItemKind) -> Self {
        Self { distance_m, kind }
    }

    pub fn signal(distance_m: f32, aspect: SignalAspect, allowed_speed_mps: f32) -> Self {
        Self::new(distance_m, TrackItemKind::Signal { aspect, allowed_speed_mps })
    }

    pub fn speed_post(distance_m: f32, allowed_speed_mps: f32) -> Self {
        Self::new(
            distance_m,
            TrackItemKind::SpeedPost {
                allowed_speed_mps,
                kind: SpeedPostKind::Standard,
                is_warning: false,
            },
        )
    }

    pub fn switch(distance_m: f32, right: bool) -> Self {
        Self::new(distance_m, TrackItemKind::Switch { right })
    }

    pub fn authority(distance_m: f32, kind: AuthorityKind) -> Self {
        Self::new(distance_m, TrackItemKind::Authority { kind })
    }

    pub fn is_signal(&self) -> bool {
        matches!(self.kind, TrackItemKind::Signal { .. })
    }
}

/// Which side of the train a list of items lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemDirection {
    /// Drawn from the zero point towards the top of the band.
    Forward,
    /// Drawn from the zero point towards the bottom of the band.
    Backward,
}

impl ItemDirection {
    pub fn is_forward(self) -> bool {
        matches!(self, ItemDirection::Forward)
    }

    /// Pixel location of something `offset` pixels from `zero_point`.
    pub fn locate(self, zero_point: i32, offset: i32) -> i32 {
        match self {
            ItemDirection::Forward => zero_point - offset,
            ItemDirection::Backward => zero_point + offset,
        }
    }
}
