//! Headless strip-chart behaviour, driven through the public graph API.

use glam::Vec2;
use railhud::gpu::mesh::{GraphVertex, VERTICES_PER_SAMPLE};
use railhud::graph_group::GraphGroup;
use railhud::graph_mesh::GraphMesh;
use railhud::text::colors;

fn visible_values(mesh: &GraphMesh<Vec<GraphVertex>>) -> Vec<f32> {
    mesh.draw_ranges()
        .flat_map(|range| {
            let first = range.start as usize / VERTICES_PER_SAMPLE;
            let last = range.end as usize / VERTICES_PER_SAMPLE;
            first..last
        })
        .map(|slot| mesh.ring().get(slot).unwrap())
        .collect()
}

#[test]
fn test_draw_ranges_read_oldest_to_newest_after_wrap() {
    let mut mesh = GraphMesh::new(8, 40, colors::GREEN, Vec::new());
    for i in 0..11 {
        mesh.add_sample(i as f32 / 16.0);
    }

    // Capacity minus one samples are visible, the slot under the cursor is skipped.
    let expected: Vec<f32> = (4..11).map(|i| i as f32 / 16.0).collect();
    assert_eq!(visible_values(&mesh), expected);
    assert_eq!(mesh.cursor(), 3);
    assert_eq!(mesh.sample_uniform(), [3.0, 8.0]);
}

#[test]
fn test_vec_store_mirrors_patched_vertices() {
    let mut mesh = GraphMesh::new(16, 40, colors::CYAN, Vec::new());
    for i in 0..20 {
        mesh.add_sample((i % 5) as f32 * 0.25);
    }
    assert_eq!(mesh.store().as_slice(), mesh.vertices());
    assert_eq!(mesh.vertices().len(), 16 * VERTICES_PER_SAMPLE);
}

#[test]
fn test_group_stacks_bands_and_shares_overlaps() {
    let mut group: GraphGroup<Vec<GraphVertex>> = GraphGroup::new(64, Vec2::new(10.0, 40.0), 5.0);
    let force = group.add_graph("Motive force", "0%", "100%", colors::GREEN, 30, Vec::new());
    let power = group.add_overlapped_graph(colors::YELLOW, 30, Vec::new());
    let speed = group.add_graph("Speed", "0", "200", colors::RED, 20, Vec::new());

    assert_eq!(group.len(), 3);
    assert_eq!(group.y_offset(force), Some(0.0));
    assert_eq!(group.y_offset(power), Some(0.0));
    assert_eq!(group.y_offset(speed), Some(35.0));

    group.add_sample(speed, 0.5);
    assert_eq!(group.graph(speed).unwrap().cursor(), 1);
    assert_eq!(group.graph(force).unwrap().cursor(), 0);
}
