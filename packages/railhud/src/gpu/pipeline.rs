use crate::gpu::mesh::GraphVertex;

/// Vertex stage variants of the graph shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphStage {
    /// Sample columns, scrolled by the write cursor.
    Samples,
    /// The fixed outline around the plot area.
    Border,
}

impl GraphStage {
    fn entry_point(self) -> &'static str {
        match self {
            GraphStage::Samples => "vs_graph",
            GraphStage::Border => "vs_border",
        }
    }

    fn topology(self) -> wgpu::PrimitiveTopology {
        match self {
            GraphStage::Samples => wgpu::PrimitiveTopology::TriangleList,
            GraphStage::Border => wgpu::PrimitiveTopology::TriangleStrip,
        }
    }
}

pub fn create_graph_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    stage: GraphStage,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::include_wgsl!("shader_graph.wgsl"));

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(match stage {
            GraphStage::Samples => "Graph Pipeline",
            GraphStage::Border => "Graph Border Pipeline",
        }),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some(stage.entry_point()),
            buffers: &[GraphVertex::desc()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_graph"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: stage.topology(),
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Quads and the border strip wind both ways.
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}
