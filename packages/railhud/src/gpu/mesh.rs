use bytemuck::{Pod, Zeroable};

use crate::text::{colors, Rgba};

/// Vertices written per sample slot (two triangles).
pub const VERTICES_PER_SAMPLE: usize = 6;
/// Vertices in the border triangle strip.
pub const BORDER_VERTEX_COUNT: usize = 10;

/// Graph-space vertex.
///
/// `position.xy` is in the unit square of the plot area. `position.z` selects
/// the column edge: 0 is the left edge of the slot, 1 the right edge. The
/// shader turns that into a one-pixel wide column.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GraphVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl GraphVertex {
    pub const fn new(position: [f32; 3], color: Rgba) -> Self {
        Self { position, color }
    }

    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GraphVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: 12, // [f32; 3] is 12 bytes
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// The two triangles covering sample slot `x` from the baseline up to `value`.
pub fn slot_quad(x: f32, value: f32, color: Rgba) -> [GraphVertex; VERTICES_PER_SAMPLE] {
    [
        GraphVertex::new([x, value, 0.0], color),
        GraphVertex::new([x, value, 1.0], color),
        GraphVertex::new([x, 0.0, 1.0], color),
        GraphVertex::new([x, 0.0, 1.0], color),
        GraphVertex::new([x, value, 0.0], color),
        GraphVertex::new([x, 0.0, 0.0], color),
    ]
}

/// Triangle strip framing the unit square, outset by one sample column
/// horizontally and one pixel vertically.
pub fn border_strip(capacity: usize, height_px: f32) -> [GraphVertex; BORDER_VERTEX_COUNT] {
    let ox = 1.0 / capacity.max(1) as f32;
    let oy = 1.0 / height_px.max(1.0);
    let c = colors::TRANSPARENT_WHITE;
    [
        // Bottom left
        GraphVertex::new([0.0 - ox, 0.0 - oy, 1.0], c),
        GraphVertex::new([0.0, 0.0, 1.0], c),
        // Bottom right
        GraphVertex::new([1.0 + ox, 0.0 - oy, 0.0], c),
        GraphVertex::new([1.0, 0.0, 0.0], c),
        // Top right
        GraphVertex::new([1.0 + ox, 1.0 + oy, 0.0], c),
        GraphVertex::new([1.0, 1.0, 0.0], c),
        // Top left
        GraphVertex::new([0.0 - ox, 1.0 + oy, 1.0], c),
        GraphVertex::new([0.0, 1.0, 1.0], c),
        // Back to bottom left
        GraphVertex::new([0.0 - ox, 0.0 - oy, 1.0], c),
        GraphVertex::new([0.0, 0.0, 1.0], c),
    ]
}
