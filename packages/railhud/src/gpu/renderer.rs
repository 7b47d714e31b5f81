//! GPU renderer for the HUD graph screens.
//!
//! Each graph owns a vertex buffer patched in place through
//! [`GpuGraphStore`], a small border buffer and a uniform block carrying its
//! screen rectangle and write cursor.

use std::iter;
use std::ops::Range;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::gpu::mesh::{GraphVertex, BORDER_VERTEX_COUNT, VERTICES_PER_SAMPLE};
use crate::gpu::pipeline::{self, GraphStage};
use crate::graph_group::GraphGroup;
use crate::graph_mesh::{GraphMesh, PrimitiveSink, VertexStore};

/// Matches `GraphUniforms` in shader_graph.wgsl.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GraphUniforms {
    graph_pos: [f32; 4],
    sample: [f32; 2],
    screen_size: [f32; 2],
}

const VERTEX_SIZE: wgpu::BufferAddress = std::mem::size_of::<GraphVertex>() as wgpu::BufferAddress;

/// Per-graph GPU resources.
pub struct GpuGraphStore {
    queue: Arc<wgpu::Queue>,
    vertex_buffer: wgpu::Buffer,
    border_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl VertexStore for GpuGraphStore {
    fn write_vertices(&mut self, first: usize, vertices: &[GraphVertex]) {
        let offset = first as wgpu::BufferAddress * VERTEX_SIZE;
        self.queue
            .write_buffer(&self.vertex_buffer, offset, bytemuck::cast_slice(vertices));
    }

    fn write_border(&mut self, border: &[GraphVertex; BORDER_VERTEX_COUNT]) {
        self.queue
            .write_buffer(&self.border_buffer, 0, bytemuck::cast_slice(border));
    }
}

/// One graph's draw calls recorded into an open render pass.
struct GraphPass<'a, 'enc> {
    pass: &'a mut wgpu::RenderPass<'enc>,
    renderer: &'a HudRenderer,
    store: &'a GpuGraphStore,
}

impl PrimitiveSink for GraphPass<'_, '_> {
    fn draw_border(&mut self, vertex_count: u32) {
        self.pass.set_pipeline(&self.renderer.border_pipeline);
        self.pass.set_vertex_buffer(0, self.store.border_buffer.slice(..));
        self.pass.draw(0..vertex_count, 0..1);
    }

    fn draw_samples(&mut self, vertices: Range<u32>) {
        self.pass.set_pipeline(&self.renderer.graph_pipeline);
        self.pass.set_vertex_buffer(0, self.store.vertex_buffer.slice(..));
        self.pass.draw(vertices, 0..1);
    }
}

pub struct HudRenderer {
    device: wgpu::Device,
    queue: Arc<wgpu::Queue>,
    width: u32,
    height: u32,
    bind_group_layout: wgpu::BindGroupLayout,
    graph_pipeline: wgpu::RenderPipeline,
    border_pipeline: wgpu::RenderPipeline,
}

impl HudRenderer {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue, format: wgpu::TextureFormat, width: u32, height: u32) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<GraphUniforms>() as u64),
                },
                count: None,
            }],
            label: Some("graph_bind_group_layout"),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Graph Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let graph_pipeline = pipeline::create_graph_pipeline(&device, &pipeline_layout, format, GraphStage::Samples);
        let border_pipeline = pipeline::create_graph_pipeline(&device, &pipeline_layout, format, GraphStage::Border);

        log::info!("HUD renderer ready ({}x{}, {:?})", width, height, format);

        Self {
            device,
            queue: Arc::new(queue),
            width,
            height,
            bind_group_layout,
            graph_pipeline,
            border_pipeline,
        }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// GPU resources for one graph of `capacity` samples.
    pub fn new_graph_store(&self, capacity: usize) -> GpuGraphStore {
        let vertex_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Graph Vertex Buffer"),
            size: (capacity.max(1) * VERTICES_PER_SAMPLE) as wgpu::BufferAddress * VERTEX_SIZE,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let border_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Graph Border Buffer"),
            size: BORDER_VERTEX_COUNT as wgpu::BufferAddress * VERTEX_SIZE,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Graph Uniform Buffer"),
            contents: bytemuck::bytes_of(&GraphUniforms::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("graph_bind_group"),
        });

        GpuGraphStore {
            queue: Arc::clone(&self.queue),
            vertex_buffer,
            border_buffer,
            uniform_buffer,
            bind_group,
        }
    }

    fn write_uniforms(&self, mesh: &GraphMesh<GpuGraphStore>) {
        let uniforms = GraphUniforms {
            graph_pos: mesh.rect().to_array(),
            sample: mesh.sample_uniform(),
            screen_size: [self.width as f32, self.height as f32],
        };
        self.queue
            .write_buffer(&mesh.store().uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    /// Clears `view` and draws every graph of every group.
    pub fn render(&self, view: &wgpu::TextureView, groups: &[&GraphGroup<GpuGraphStore>]) {
        for mesh in groups.iter().flat_map(|g| g.meshes()) {
            self.write_uniforms(mesh);
        }

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("HUD Render Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("HUD Graph Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.1,
                            g: 0.1,
                            b: 0.1,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            for mesh in groups.iter().flat_map(|g| g.meshes()) {
                let store = mesh.store();
                render_pass.set_bind_group(0, &store.bind_group, &[]);
                mesh.draw(&mut GraphPass {
                    pass: &mut render_pass,
                    renderer: self,
                    store,
                });
            }
        }

        self.queue.submit(iter::once(encoder.finish()));
    }
}
