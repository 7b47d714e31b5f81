//! A vertical stack of named strip-chart graphs.
//!
//! Graphs stack upwards from the bottom margin in the order they are added.
//! An overlapped graph shares the band of the graph added before it so two
//! series can be superimposed, and it takes no space of its own.

use glam::{IVec2, Vec2};

use crate::config::HudConfig;
use crate::graph_mesh::{GraphMesh, VertexStore};
use crate::text::{colors, Rgba, TextLabel, TextSink};

/// Identifies a graph within its group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphHandle(usize);

impl GraphHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

struct GraphEntry<S: VertexStore> {
    mesh: GraphMesh<S>,
    name: String,
    label_min: String,
    label_max: String,
    overlapped: bool,
    y_offset: f32,
}

pub struct GraphGroup<S: VertexStore> {
    graphs: Vec<GraphEntry<S>>,
    capacity: usize,
    margin: Vec2,
    spacing: f32,
    viewport: Vec2,
}

impl<S: VertexStore> GraphGroup<S> {
    pub fn new(capacity: usize, margin: Vec2, spacing: f32) -> Self {
        Self {
            graphs: Vec::new(),
            capacity,
            margin,
            spacing,
            viewport: Vec2::ZERO,
        }
    }

    pub fn from_config(config: &HudConfig) -> Self {
        Self::new(config.graph_capacity, config.graph_margin, config.label_spacing)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    /// Add a labelled graph on top of the stack.
    pub fn add_graph(
        &mut self,
        name: impl Into<String>,
        label_min: impl Into<String>,
        label_max: impl Into<String>,
        color: Rgba,
        height: u32,
        store: S,
    ) -> GraphHandle {
        self.push(name.into(), label_min.into(), label_max.into(), color, height, false, store)
    }

    /// Add an unlabelled series drawn into the band of the previous graph.
    pub fn add_overlapped_graph(&mut self, color: Rgba, height: u32, store: S) -> GraphHandle {
        self.push(String::new(), String::new(), String::new(), color, height, true, store)
    }

    #[allow(clippy::too_many_arguments)]
    fn push(
        &mut self,
        name: String,
        label_min: String,
        label_max: String,
        color: Rgba,
        height: u32,
        overlapped: bool,
        store: S,
    ) -> GraphHandle {
        if overlapped && self.graphs.is_empty() {
            log::warn!("overlapped graph added to an empty group; it takes the bottom band");
        }
        self.graphs.push(GraphEntry {
            mesh: GraphMesh::new(self.capacity, height, color, store),
            name,
            label_min,
            label_max,
            overlapped,
            y_offset: 0.0,
        });
        self.recompute_offsets();
        GraphHandle(self.graphs.len() - 1)
    }

    fn recompute_offsets(&mut self) {
        let mut band = 0.0;
        let mut next_band = 0.0;
        for graph in &mut self.graphs {
            if !graph.overlapped {
                band = next_band;
                next_band += graph.mesh.height() + self.spacing;
            }
            graph.y_offset = band;
        }
    }

    /// Vertical offset of a graph above the bottom margin.
    pub fn y_offset(&self, handle: GraphHandle) -> Option<f32> {
        self.graphs.get(handle.0).map(|g| g.y_offset)
    }

    pub fn add_sample(&mut self, handle: GraphHandle, value: f32) {
        match self.graphs.get_mut(handle.0) {
            Some(graph) => graph.mesh.add_sample(value),
            None => log::warn!("sample for unknown graph {:?}", handle),
        }
    }

    pub fn graph(&self, handle: GraphHandle) -> Option<&GraphMesh<S>> {
        self.graphs.get(handle.0).map(|g| &g.mesh)
    }

    /// Meshes in the order they were added.
    pub fn meshes(&self) -> impl Iterator<Item = &GraphMesh<S>> {
        self.graphs.iter().map(|g| &g.mesh)
    }

    /// Right-align every graph against the viewport and stack them from the
    /// bottom margin. Positions are y-up from the bottom edge.
    pub fn layout(&mut self, viewport: Vec2) {
        self.viewport = viewport;
        for graph in &mut self.graphs {
            let x = viewport.x - self.margin.x - graph.mesh.width();
            let y = self.margin.y + graph.y_offset;
            graph.mesh.set_origin(x, y);
        }
    }

    /// Name, max and min labels for every named graph, in screen pixels (y down).
    pub fn draw_labels(&self, sink: &mut impl TextSink) {
        let spacing = self.spacing as i32;
        for graph in self.graphs.iter().filter(|g| !g.name.is_empty()) {
            let rect = graph.mesh.rect();
            let height = rect.w as i32;
            let width = rect.z as i32;
            let x = rect.x as i32;
            let y = self.viewport.y as i32 - rect.y as i32 - height - spacing;

            sink.draw_text(TextLabel::right_aligned(IVec2::new(x, y), width, graph.name.clone(), colors::WHITE));

            let label_x = x + width + 3;
            let max_y = y + spacing - 3;
            sink.draw_text(TextLabel::at(IVec2::new(label_x, max_y), graph.label_max.clone(), colors::WHITE));

            let min_y = max_y + height - spacing + 7;
            sink.draw_text(TextLabel::at(IVec2::new(label_x, min_y), graph.label_min.clone(), colors::WHITE));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::mesh::GraphVertex;

    fn group() -> GraphGroup<Vec<GraphVertex>> {
        GraphGroup::new(100, Vec2::new(40.0, 10.0), 18.0)
    }

    #[test]
    fn test_overlapped_graph_shares_band() {
        let mut g = group();
        let a = g.add_graph("A", "0", "1", colors::GREEN, 50, Vec::new());
        let b = g.add_overlapped_graph(colors::RED, 50, Vec::new());
        let c = g.add_graph("C", "0", "1", colors::BLUE, 30, Vec::new());

        assert_eq!(g.y_offset(a), Some(0.0));
        assert_eq!(g.y_offset(b), Some(0.0));
        assert_eq!(g.y_offset(c), Some(50.0 + 18.0));
    }

    #[test]
    fn test_offsets_accumulate() {
        let mut g = group();
        g.add_graph("A", "", "", colors::GREEN, 50, Vec::new());
        g.add_graph("B", "", "", colors::GREEN, 20, Vec::new());
        let c = g.add_graph("C", "", "", colors::GREEN, 10, Vec::new());
        let d = g.add_overlapped_graph(colors::RED, 10, Vec::new());
        let e = g.add_graph("E", "", "", colors::GREEN, 10, Vec::new());
        assert_eq!(g.y_offset(c), Some(50.0 + 18.0 + 20.0 + 18.0));
        assert_eq!(g.y_offset(d), g.y_offset(c));
        assert_eq!(g.y_offset(e), Some(50.0 + 20.0 + 10.0 + 3.0 * 18.0));
    }

    #[test]
    fn test_layout_right_aligns() {
        let mut g = group();
        let a = g.add_graph("A", "0", "1", colors::GREEN, 50, Vec::new());
        let b = g.add_graph("B", "0", "1", colors::GREEN, 20, Vec::new());
        g.layout(Vec2::new(1280.0, 720.0));

        let ra = g.graph(a).map(|m| m.rect());
        let rb = g.graph(b).map(|m| m.rect());
        assert_eq!(ra.map(|r| (r.x, r.y)), Some((1280.0 - 40.0 - 100.0, 10.0)));
        assert_eq!(rb.map(|r| (r.x, r.y)), Some((1140.0, 10.0 + 68.0)));
    }

    #[test]
    fn test_labels_only_for_named_graphs() {
        let mut g = group();
        g.add_graph("Throttle", "0", "100%", colors::BLUE, 50, Vec::new());
        g.add_overlapped_graph(colors::RED, 50, Vec::new());
        g.layout(Vec2::new(1280.0, 720.0));

        let mut labels: Vec<TextLabel> = Vec::new();
        g.draw_labels(&mut labels);
        assert_eq!(labels.len(), 3);

        // Name box sits just above the plot area.
        assert_eq!(labels[0].text, "Throttle");
        assert_eq!(labels[0].position, IVec2::new(1140, 720 - 10 - 50 - 18));
        assert_eq!(labels[0].box_width, 100);
        // Max label near the top edge, min label near the baseline.
        assert_eq!(labels[1].text, "100%");
        assert_eq!(labels[1].position, IVec2::new(1243, 642 + 15));
        assert_eq!(labels[2].text, "0");
        assert_eq!(labels[2].position, IVec2::new(1243, 657 + 50 - 18 + 7));
    }

    #[test]
    fn test_add_sample_unknown_handle_is_ignored() {
        let mut g = group();
        g.add_sample(GraphHandle(3), 0.5);
        assert!(g.is_empty());
    }
}
