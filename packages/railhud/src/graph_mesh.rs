//! Strip-chart geometry for one graph.
//!
//! Every sample slot owns six vertices in a flat store. Adding a sample
//! rewrites only that slot's vertices, so the GPU side is patched in place
//! rather than re-uploaded. At draw time the flat store is drawn as (at most)
//! two contiguous ranges that together read oldest to newest and skip the slot
//! under the write cursor.

use std::ops::Range;

use glam::Vec4;

use crate::gpu::mesh::{border_strip, slot_quad, GraphVertex, BORDER_VERTEX_COUNT, VERTICES_PER_SAMPLE};
use crate::sample_ring::SampleRing;
use crate::text::Rgba;

/// Destination of vertex patches.
///
/// Implemented by the GPU buffer in [`crate::gpu::renderer`] and by a plain
/// `Vec<GraphVertex>` for headless use.
pub trait VertexStore {
    /// Overwrite `vertices.len()` vertices starting at vertex index `first`.
    fn write_vertices(&mut self, first: usize, vertices: &[GraphVertex]);

    /// Receives the border outline once, when the graph is created.
    fn write_border(&mut self, _border: &[GraphVertex; BORDER_VERTEX_COUNT]) {}
}

impl VertexStore for Vec<GraphVertex> {
    fn write_vertices(&mut self, first: usize, vertices: &[GraphVertex]) {
        let end = first + vertices.len();
        if self.len() < end {
            self.resize(end, GraphVertex::default());
        }
        self[first..end].copy_from_slice(vertices);
    }
}

/// Receives the draw calls of one graph, in order.
///
/// Implemented by the wgpu render pass in [`crate::gpu::renderer`].
pub trait PrimitiveSink {
    /// Border triangle strip of `vertex_count` vertices.
    fn draw_border(&mut self, vertex_count: u32);

    /// Sample triangles covering `vertices` of the flat store. Never empty.
    fn draw_samples(&mut self, vertices: Range<u32>);
}

pub struct GraphMesh<S: VertexStore> {
    ring: SampleRing,
    /// CPU mirror of the whole store, used to restore lost GPU contents.
    vertices: Vec<GraphVertex>,
    border: [GraphVertex; BORDER_VERTEX_COUNT],
    color: Rgba,
    /// xy = position of the bottom-left corner (pixels, y up), zw = width/height.
    rect: Vec4,
    store: S,
}

impl<S: VertexStore> GraphMesh<S> {
    /// Create a graph with `capacity` sample slots, `height` pixels tall.
    ///
    /// The graph is one pixel wide per sample. Colour alpha is forced opaque.
    pub fn new(capacity: usize, height: u32, color: Rgba, store: S) -> Self {
        let ring = SampleRing::new(capacity);
        let capacity = ring.capacity();
        let mut color = color;
        color[3] = 1.0;
        let border = border_strip(capacity, height as f32);
        let mut store = store;
        store.write_border(&border);
        Self {
            vertices: vec![GraphVertex::default(); capacity * VERTICES_PER_SAMPLE],
            border,
            color,
            rect: Vec4::new(0.0, 0.0, capacity as f32, height as f32),
            ring,
            store,
        }
    }

    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Slot that the next sample will overwrite.
    pub fn cursor(&self) -> usize {
        self.ring.cursor()
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.rect.z
    }

    pub fn height(&self) -> f32 {
        self.rect.w
    }

    pub fn rect(&self) -> Vec4 {
        self.rect
    }

    pub fn set_origin(&mut self, x: f32, y: f32) {
        self.rect.x = x;
        self.rect.y = y;
    }

    pub fn ring(&self) -> &SampleRing {
        &self.ring
    }

    pub fn vertices(&self) -> &[GraphVertex] {
        &self.vertices
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Record a sample. Values outside [0, 1] are clamped.
    ///
    /// Writes the six vertices of the current slot to the store and advances
    /// the cursor. Nothing else in the store is touched.
    pub fn add_sample(&mut self, value: f32) {
        let slot = self.ring.push(value);
        let value = self.ring.get(slot).unwrap_or(0.0);
        let x = slot as f32 / self.ring.capacity() as f32;

        let first = slot * VERTICES_PER_SAMPLE;
        let quad = slot_quad(x, value, self.color);
        self.vertices[first..first + VERTICES_PER_SAMPLE].copy_from_slice(&quad);
        self.store.write_vertices(first, &quad);
        log::trace!("graph sample {} -> slot {}", value, slot);
    }

    /// Re-upload every vertex and the border. Only needed when the store lost its contents.
    pub fn restore(&mut self) {
        log::debug!("restoring {} graph vertices", self.vertices.len());
        self.store.write_border(&self.border);
        self.store.write_vertices(0, &self.vertices);
    }

    /// Border first, then the samples oldest to newest.
    pub fn draw(&self, sink: &mut impl PrimitiveSink) {
        sink.draw_border(BORDER_VERTEX_COUNT as u32);
        for range in self.draw_ranges() {
            sink.draw_samples(range);
        }
    }

    /// Vertex ranges to draw, oldest samples first. Never yields an empty range.
    pub fn draw_ranges(&self) -> impl Iterator<Item = Range<u32>> {
        self.ring.visible_ranges().map(|slots| {
            (slots.start * VERTICES_PER_SAMPLE) as u32..(slots.end * VERTICES_PER_SAMPLE) as u32
        })
    }

    /// Cursor and capacity as the shader expects them.
    pub fn sample_uniform(&self) -> [f32; 2] {
        [self.ring.cursor() as f32, self.ring.capacity() as f32]
    }
}
