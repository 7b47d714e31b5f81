//! Signal aspects, the monitor display mode and sprite-sheet cells.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Aspect of a signal as reported to the track monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SignalAspect {
    #[default]
    None,
    Clear2,
    Clear1,
    Approach3,
    Approach2,
    Approach1,
    Restricted,
    StopAndProceed,
    Stop,
    Permission,
}

/// What the track monitor reveals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DisplayMode {
    /// All track and routing features.
    #[default]
    All,
    /// Only the static features a driver would know from memory: no live
    /// aspects, no signal speeds, no switch positions.
    StaticOnly,
}

impl DisplayMode {
    /// Next mode in the user's cycle.
    pub fn cycle(self) -> Self {
        match self {
            DisplayMode::All => DisplayMode::StaticOnly,
            DisplayMode::StaticOnly => DisplayMode::All,
        }
    }

    pub fn shows_live_state(self) -> bool {
        matches!(self, DisplayMode::All)
    }
}

/// Texture a sprite is cut from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpriteSheet {
    SignalAspects,
    TrackMonitorImages,
}

/// Every sprite the track monitor draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SpriteKey {
    Signal(SignalAspect),
    Eye,
    TrainAutoForwards,
    TrainAutoBackwards,
    TrainManualOnRoute,
    TrainManualOffRoute,
    EndAuthority,
    OppositeTrainForward,
    OppositeTrainBackward,
    Station,
    Reversal,
    InvalidReversal,
    WaitingPoint,
    ForwardArrow,
    BackwardArrow,
    LeftSwitch,
    RightSwitch,
}

/// Source rectangle of a sprite within its sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpriteCell {
    pub sheet: SpriteSheet,
    pub origin: IVec2,
    pub size: IVec2,
}

impl SpriteCell {
    const fn signal(x: i32, y: i32) -> Self {
        Self {
            sheet: SpriteSheet::SignalAspects,
            origin: IVec2::new(x, y),
            size: IVec2::new(16, 16),
        }
    }

    const fn image(x: i32, y: i32) -> Self {
        Self {
            sheet: SpriteSheet::TrackMonitorImages,
            origin: IVec2::new(x, y),
            size: IVec2::new(24, 24),
        }
    }
}

impl SpriteKey {
    pub fn cell(self) -> SpriteCell {
        match self {
            SpriteKey::Signal(aspect) => match aspect {
                SignalAspect::Clear2 => SpriteCell::signal(0, 0),
                SignalAspect::Clear1 => SpriteCell::signal(16, 0),
                SignalAspect::Approach3 => SpriteCell::signal(0, 16),
                SignalAspect::Approach2 => SpriteCell::signal(16, 16),
                SignalAspect::Approach1 => SpriteCell::signal(0, 32),
                SignalAspect::Restricted => SpriteCell::signal(16, 32),
                SignalAspect::StopAndProceed => SpriteCell::signal(0, 48),
                SignalAspect::Stop => SpriteCell::signal(16, 48),
                SignalAspect::Permission => SpriteCell::signal(0, 64),
                SignalAspect::None => SpriteCell::signal(16, 64),
            },
            SpriteKey::EndAuthority => SpriteCell::image(0, 0),
            SpriteKey::Station => SpriteCell::image(24, 0),
            SpriteKey::Reversal => SpriteCell::image(0, 24),
            SpriteKey::WaitingPoint => SpriteCell::image(24, 24),
            SpriteKey::BackwardArrow => SpriteCell::image(0, 48),
            SpriteKey::ForwardArrow => SpriteCell::image(24, 48),
            SpriteKey::TrainAutoForwards => SpriteCell::image(0, 72),
            SpriteKey::TrainAutoBackwards => SpriteCell::image(24, 72),
            SpriteKey::TrainManualOffRoute => SpriteCell::image(0, 96),
            SpriteKey::TrainManualOnRoute => SpriteCell::image(24, 96),
            SpriteKey::OppositeTrainBackward => SpriteCell::image(0, 120),
            SpriteKey::OppositeTrainForward => SpriteCell::image(24, 120),
            SpriteKey::Eye => SpriteCell::image(0, 144),
            SpriteKey::InvalidReversal => SpriteCell::image(24, 144),
            SpriteKey::LeftSwitch => SpriteCell::image(0, 168),
            SpriteKey::RightSwitch => SpriteCell::image(24, 168),
        }
    }
}

/// Sprite for a signal. Static-only mode hides the live aspect.
pub fn resolve(aspect: SignalAspect, mode: DisplayMode) -> SpriteKey {
    match mode {
        DisplayMode::All => SpriteKey::Signal(aspect),
        DisplayMode::StaticOnly => SpriteKey::Signal(SignalAspect::None),
    }
}
