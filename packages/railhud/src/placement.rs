//! Monitor-local geometry: where each kind of element sits relative to the
//! pixel location of the item it belongs to.
//!
//! All offsets are authored against a 150 pixel wide monitor and scaled
//! (integer arithmetic) to the real width.

use glam::IVec2;
use serde::Serialize;

use crate::track_item::ItemDirection;

/// Width the design offsets were authored for.
pub const DESIGN_WIDTH: i32 = 150;

/// Screen rectangle of a drawn element, monitor-local pixels (y down).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlacementBox {
    pub origin: IVec2,
    pub size: IVec2,
}

impl PlacementBox {
    pub fn new(origin: IVec2, size: IVec2) -> Self {
        Self { origin, size }
    }

    pub fn with_height(self, height: i32) -> Self {
        Self {
            size: IVec2::new(self.size.x, height),
            ..self
        }
    }
}

/// Where an element is drawn relative to its item's location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub x: i32,
    /// Vertical offset from the item location when drawn in the forward list.
    pub forward_dy: i32,
    /// Vertical offset from the item location when drawn in the backward list.
    pub backward_dy: i32,
    pub size: IVec2,
}

impl Anchor {
    const fn new(x: i32, forward_dy: i32, backward_dy: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            forward_dy,
            backward_dy,
            size: IVec2::new(width, height),
        }
    }

    fn scaled(self, width: i32) -> Self {
        Self::new(
            scale(self.x, width),
            scale(self.forward_dy, width),
            scale(self.backward_dy, width),
            scale(self.size.x, width),
            scale(self.size.y, width),
        )
    }

    pub fn dy(self, direction: ItemDirection) -> i32 {
        match direction {
            ItemDirection::Forward => self.forward_dy,
            ItemDirection::Backward => self.backward_dy,
        }
    }

    pub fn place(self, location: i32, direction: ItemDirection) -> PlacementBox {
        PlacementBox::new(IVec2::new(self.x, location + self.dy(direction)), self.size)
    }
}

fn scale(value: i32, width: i32) -> i32 {
    value * width / DESIGN_WIDTH
}

/// Scaled offsets for every monitor element.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorLayout {
    pub width: i32,
    pub height: i32,
    /// Space kept free at the top and bottom for out-of-range information.
    pub additional_info_height: i32,
    /// Minimum vertical distance between two labels.
    pub text_spacing: i32,

    pub track_x: i32,
    pub rail1_x: i32,
    pub rail2_x: i32,
    pub rail_width: i32,

    /// Label baseline offset for forward (0) and backward (1) lists.
    pub text_dy: [i32; 2],
    pub distance_text_x: i32,
    pub speed_text_x: i32,
    pub milepost_text_x: i32,

    pub eye: Anchor,
    pub train: Anchor,
    pub other_train: Anchor,
    pub station: Anchor,
    pub reversal: Anchor,
    pub waiting_point: Anchor,
    pub end_authority: Anchor,
    pub signal: Anchor,
    pub arrow: Anchor,
    pub invalid_reversal: Anchor,
    pub left_switch: Anchor,
    pub right_switch: Anchor,
}

impl MonitorLayout {
    pub fn new(width: i32, height: i32) -> Self {
        let s = |v| scale(v, width);
        Self {
            width,
            height,
            additional_info_height: s(16),
            text_spacing: s(10),

            track_x: s(42),
            rail1_x: s(6),
            rail2_x: s(6 + 2 + 8),
            rail_width: s(2),

            text_dy: [s(-11), s(-3)],
            distance_text_x: s(117),
            speed_text_x: s(70),
            milepost_text_x: s(0),

            eye: Anchor::new(42, -4, -20, 24, 24).scaled(width),
            train: Anchor::new(42, -12, -12, 24, 24).scaled(width),
            other_train: Anchor::new(42, -24, 0, 24, 24).scaled(width),
            station: Anchor::new(42, 0, -24, 24, 12).scaled(width),
            reversal: Anchor::new(42, -21, -3, 24, 24).scaled(width),
            waiting_point: Anchor::new(42, -21, -3, 24, 24).scaled(width),
            end_authority: Anchor::new(42, -14, -10, 24, 24).scaled(width),
            signal: Anchor::new(95, -16, 0, 16, 16).scaled(width),
            arrow: Anchor::new(22, -12, -12, 24, 24).scaled(width),
            invalid_reversal: Anchor::new(42, -14, -10, 24, 24).scaled(width),
            left_switch: Anchor::new(37, -14, -10, 24, 24).scaled(width),
            right_switch: Anchor::new(47, -14, -10, 24, 24).scaled(width),
        }
    }

    pub fn text_dy(&self, direction: ItemDirection) -> i32 {
        self.text_dy[if direction.is_forward() { 0 } else { 1 }]
    }

    /// Text anchor for a label at `location` in column `x`.
    pub fn text_position(&self, x: i32, location: i32, direction: ItemDirection) -> IVec2 {
        IVec2::new(x, location + self.text_dy(direction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_design_width_is_identity() {
        let layout = MonitorLayout::new(DESIGN_WIDTH, 300);
        assert_eq!(layout.text_spacing, 10);
        assert_eq!(layout.signal.x, 95);
        assert_eq!(layout.train.size, IVec2::new(24, 24));
    }

    #[test]
    fn test_double_width_scales_everything() {
        let layout = MonitorLayout::new(300, 600);
        assert_eq!(layout.text_spacing, 20);
        assert_eq!(layout.text_dy, [-22, -6]);
        assert_eq!(layout.station.size, IVec2::new(48, 24));
    }

    #[test]
    fn test_anchor_place_uses_direction_offset() {
        let layout = MonitorLayout::new(DESIGN_WIDTH, 300);
        let fwd = layout.signal.place(100, ItemDirection::Forward);
        let bwd = layout.signal.place(100, ItemDirection::Backward);
        assert_eq!(fwd.origin, IVec2::new(95, 84));
        assert_eq!(bwd.origin, IVec2::new(95, 100));
        assert_eq!(fwd.size, IVec2::new(16, 16));
    }
}
