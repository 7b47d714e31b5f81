//! Text labels handed to the host's text renderer.
//!
//! Neither the graph screens nor the track monitor rasterise text. They emit
//! [`TextLabel`]s into a [`TextSink`] and the host draws them with whatever
//! font it owns.

use glam::IVec2;
use serde::Serialize;

/// RGBA colour, components in [0, 1].
pub type Rgba = [f32; 4];

pub mod colors {
    use super::Rgba;

    pub const WHITE: Rgba = [1.0, 1.0, 1.0, 1.0];
    pub const RED: Rgba = [1.0, 0.0, 0.0, 1.0];
    pub const GREEN: Rgba = [0.0, 0.5, 0.0, 1.0];
    pub const BLUE: Rgba = [0.0, 0.0, 1.0, 1.0];
    pub const YELLOW: Rgba = [1.0, 1.0, 0.0, 1.0];
    pub const ORANGE: Rgba = [1.0, 0.647, 0.0, 1.0];
    pub const MAGENTA: Rgba = [1.0, 0.0, 1.0, 1.0];
    pub const CYAN: Rgba = [0.0, 1.0, 1.0, 1.0];
    pub const LIGHT_GREEN: Rgba = [0.565, 0.933, 0.565, 1.0];
    pub const PALE_GREEN: Rgba = [0.596, 0.984, 0.596, 1.0];
    pub const DARK_GRAY: Rgba = [0.663, 0.663, 0.663, 1.0];
    /// White with zero alpha, used for the graph border.
    pub const TRANSPARENT_WHITE: Rgba = [1.0, 1.0, 1.0, 0.0];
}

/// Horizontal alignment of a label inside its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LabelAlignment {
    Left,
    Right,
}

/// One piece of text to draw, in screen pixels (y down).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLabel {
    pub position: IVec2,
    /// Width of the box the text is aligned in. Zero for point-anchored text.
    pub box_width: i32,
    pub alignment: LabelAlignment,
    pub text: String,
    pub color: Rgba,
}

impl TextLabel {
    /// Left-aligned text anchored at `position`.
    pub fn at(position: IVec2, text: impl Into<String>, color: Rgba) -> Self {
        Self {
            position,
            box_width: 0,
            alignment: LabelAlignment::Left,
            text: text.into(),
            color,
        }
    }

    /// Right-aligned text inside a box starting at `position`.
    pub fn right_aligned(position: IVec2, box_width: i32, text: impl Into<String>, color: Rgba) -> Self {
        Self {
            position,
            box_width,
            alignment: LabelAlignment::Right,
            text: text.into(),
            color,
        }
    }
}

/// Generic text-rendering sink.
pub trait TextSink {
    fn draw_text(&mut self, label: TextLabel);
}

impl TextSink for Vec<TextLabel> {
    fn draw_text(&mut self, label: TextLabel) {
        self.push(label);
    }
}
