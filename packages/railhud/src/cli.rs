use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::HudConfig;
use crate::gpu::renderer::HudRenderer;
use crate::hud_graphs::{HudGraphs, HudScreen};
use crate::overspeed::OverspeedTracker;
use crate::signal_aspect::DisplayMode;
use crate::telemetry::{GcCounter, TelemetryFrame};
use crate::text::TextLabel;
use crate::track_monitor::{MonitorFrame, TrackMonitor, TrainInfo};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a graph screen from a telemetry replay to PNG frames
    Graphs {
        /// JSON array of telemetry frames
        #[arg(long)]
        input: PathBuf,

        /// Output directory for frames
        #[arg(long)]
        out: PathBuf,

        /// Which graph screen to draw
        #[arg(long, value_enum, default_value_t = HudScreen::Locomotive)]
        screen: HudScreen,

        /// Output width
        #[arg(long, default_value_t = 1280)]
        width: u32,

        /// Output height
        #[arg(long, default_value_t = 720)]
        height: u32,

        /// HUD config (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Project train snapshots onto the track monitor and print the frames as JSON
    Monitor {
        /// JSON train snapshot, or an array of them
        #[arg(long)]
        input: PathBuf,

        /// Show distances and speeds in imperial units
        #[arg(long)]
        imperial: bool,

        /// Hide live signal aspects, signal speeds and switch positions
        #[arg(long)]
        static_only: bool,

        /// Simulation seconds between snapshots
        #[arg(long, default_value_t = 0.1)]
        dt: f64,

        /// HUD config (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Graphs { input, out, screen, width, height, config } => {
            let config = HudConfig::load_or_default(config.as_deref())?;
            pollster::block_on(render_offline(&config, &input, &out, screen, width, height))?;
        }
        Commands::Monitor { input, imperial, static_only, dt, config } => {
            let mut config = HudConfig::load_or_default(config.as_deref())?;
            if imperial {
                config.monitor.metric = false;
            }
            if static_only {
                config.monitor.display_mode = DisplayMode::StaticOnly;
            }
            let report = project_monitor(&config, &input, dt)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MonitorInput {
    Many(Vec<TrainInfo>),
    One(Box<TrainInfo>),
}

#[derive(Serialize)]
struct MonitorReport {
    frames: Vec<MonitorFrame>,
    overspeed: OverspeedTracker,
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file)).with_context(|| format!("parsing {}", path.display()))
}

fn project_monitor(config: &HudConfig, input: &Path, dt: f64) -> Result<MonitorReport> {
    let snapshots = match read_json::<MonitorInput>(input)? {
        MonitorInput::Many(all) => all,
        MonitorInput::One(one) => vec![*one],
    };
    log::info!("projecting {} train snapshots", snapshots.len());

    let monitor = TrackMonitor::new(&config.monitor);
    let mut overspeed = OverspeedTracker::new();
    let frames = snapshots
        .iter()
        .enumerate()
        .map(|(i, info)| monitor.frame(info, &mut overspeed, i as f64 * dt))
        .collect();

    Ok(MonitorReport { frames, overspeed })
}

async fn render_offline(
    config: &HudConfig,
    input_path: &Path,
    out_dir: &Path,
    screen: HudScreen,
    width: u32,
    height: u32,
) -> Result<()> {
    let frames: Vec<TelemetryFrame> = read_json(input_path)?;
    if frames.is_empty() {
        log::warn!("{} holds no telemetry frames", input_path.display());
    }

    std::fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    // WGPU Init
    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None, // Headless
            force_fallback_adapter: false,
        })
        .await
        .ok_or_else(|| anyhow::anyhow!("No adapter found"))?;

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor::default(), None)
        .await?;

    let texture_desc = wgpu::TextureDescriptor {
        label: Some("Target Texture"),
        size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    };

    let texture = device.create_texture(&texture_desc);
    let texture_view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    // Rows are padded to 256 bytes for the copy
    let u32_size = std::mem::size_of::<u32>() as u32;
    let unpadded_bytes_per_row = u32_size * width;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    let padded_bytes_per_row_padding = (align - unpadded_bytes_per_row % align) % align;
    let padded_bytes_per_row = unpadded_bytes_per_row + padded_bytes_per_row_padding;

    let output_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Output Buffer"),
        size: (padded_bytes_per_row * height) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let renderer = HudRenderer::new(device, queue, texture_desc.format, width, height);
    let memory_limit = frames.first().map(|f| f.memory_limit_bytes).unwrap_or(0);
    let mut graphs = HudGraphs::new(screen, config, memory_limit, |capacity| renderer.new_graph_store(capacity));
    graphs.group_mut().layout(Vec2::new(width as f32, height as f32));
    let mut gc = GcCounter::new();

    println!("Rendering {} {:?} frames to {:?}...", frames.len(), screen, out_dir);

    for (i, frame) in frames.iter().enumerate() {
        graphs.update(frame, &mut gc);
        renderer.render(&texture_view, &[graphs.group()]);

        let mut encoder = renderer
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });

        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &output_buffer,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            texture_desc.size,
        );
        renderer.queue().submit(Some(encoder.finish()));

        let buffer_slice = output_buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |v| {
            let _ = tx.send(v);
        });
        renderer.device().poll(wgpu::Maintain::Wait);
        rx.recv()
            .context("frame readback channel closed")?
            .context("mapping frame readback buffer")?;

        let data = buffer_slice.get_mapped_range();
        let mut unpadded_data = Vec::with_capacity((width * height * 4) as usize);
        for row in 0..height {
            let start = (row * padded_bytes_per_row) as usize;
            let end = start + (width * 4) as usize;
            unpadded_data.extend_from_slice(&data[start..end]);
        }

        let frame_path = out_dir.join(format!("frame_{:05}.png", i));
        image::save_buffer(&frame_path, &unpadded_data, width, height, image::ColorType::Rgba8)
            .with_context(|| format!("writing {}", frame_path.display()))?;

        drop(data);
        output_buffer.unmap();

        if i % 60 == 0 {
            print!(".");
            std::io::stdout().flush()?;
        }
    }

    // Text is drawn by the host; hand it the labels of the final layout.
    let mut labels: Vec<TextLabel> = Vec::new();
    graphs.group().draw_labels(&mut labels);
    let labels_path = out_dir.join("labels.json");
    std::fs::write(&labels_path, serde_json::to_string_pretty(&labels)?)
        .with_context(|| format!("writing {}", labels_path.display()))?;

    println!("\nDone.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_monitor_flags_parse() {
        let cli = Cli::try_parse_from(["railhud", "monitor", "--input", "train.json", "--imperial", "--static-only"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Monitor { imperial: true, static_only: true, .. }
        ));
    }

    #[test]
    fn test_graphs_screen_value() {
        let cli = Cli::try_parse_from(["railhud", "graphs", "--input", "t.json", "--out", "o", "--screen", "debug"]).unwrap();
        assert!(matches!(cli.command, Commands::Graphs { screen: HudScreen::Debug, .. }));
    }

    #[test]
    fn test_project_monitor_from_file() {
        let dir = std::env::temp_dir().join(format!("railhud-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("train.json");
        std::fs::write(
            &path,
            r#"[
                { "control_mode": "AutoSignal", "speed_mps": 30.0, "allowed_speed_mps": 20.0 },
                { "control_mode": "AutoSignal", "speed_mps": 10.0, "allowed_speed_mps": 20.0 }
            ]"#,
        )
        .unwrap();

        let report = project_monitor(&HudConfig::default(), &path, 0.1).unwrap();
        assert_eq!(report.frames.len(), 2);
        assert_eq!(report.overspeed.events, 1);
        std::fs::remove_dir_all(&dir).ok();
    }
}
