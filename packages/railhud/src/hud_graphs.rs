//! The HUD's graph screens and the telemetry channel behind each graph.

use crate::config::HudConfig;
use crate::graph_group::{GraphGroup, GraphHandle};
use crate::graph_mesh::VertexStore;
use crate::telemetry::{GcCounter, TelemetryFrame};
use crate::text::{colors, Rgba};

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum HudScreen {
    Locomotive,
    Force,
    Debug,
}

/// Telemetry value a graph plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    Throttle,
    PowerIn,
    PowerOut,
    MotiveForce,
    DynamicForce,
    Substeps,
    Memory,
    Collections,
    FrameTime,
    RenderLoad,
    UpdaterLoad,
    LoaderLoad,
    SoundLoad,
}

struct GraphSpec {
    /// None for a series overlapped on the previous graph.
    labels: Option<(&'static str, String, String)>,
    color: Rgba,
    height: u32,
    channel: Channel,
}

fn named(name: &'static str, min: &str, max: &str, color: Rgba, height: u32, channel: Channel) -> GraphSpec {
    GraphSpec {
        labels: Some((name, min.to_string(), max.to_string())),
        color,
        height,
        channel,
    }
}

fn overlapped(color: Rgba, height: u32, channel: Channel) -> GraphSpec {
    GraphSpec {
        labels: None,
        color,
        height,
        channel,
    }
}

fn screen_specs(screen: HudScreen, memory_limit_bytes: u64) -> Vec<GraphSpec> {
    use Channel::*;
    match screen {
        HudScreen::Locomotive => vec![
            named("Throttle", "0", "100%", colors::BLUE, 50, Throttle),
            named("Power In/Out", "0", "100%", colors::YELLOW, 50, PowerIn),
            overlapped(colors::GREEN, 50, PowerOut),
        ],
        HudScreen::Force => vec![
            named("Motive force", "0%", "100%", colors::GREEN, 75, MotiveForce),
            overlapped(colors::RED, 75, DynamicForce),
            named("Num of substeps", "0", "100", colors::BLUE, 25, Substeps),
        ],
        HudScreen::Debug => {
            let limit = format!("{:.0}GB", memory_limit_bytes as f64 / BYTES_PER_GB);
            vec![
                named("Memory", "0GB", &limit, colors::ORANGE, 50, Memory),
                named("GCs", "0", "2", colors::MAGENTA, 20, Collections),
                named("Frame time", "0.0s", "0.1s", colors::LIGHT_GREEN, 50, FrameTime),
                named("Render process", "0%", "100%", colors::RED, 20, RenderLoad),
                named("Updater process", "0%", "100%", colors::YELLOW, 20, UpdaterLoad),
                named("Loader process", "0%", "100%", colors::MAGENTA, 20, LoaderLoad),
                named("Sound process", "0%", "100%", colors::CYAN, 20, SoundLoad),
            ]
        }
    }
}

/// One screen's graphs and the channels feeding them.
pub struct HudGraphs<S: VertexStore> {
    screen: HudScreen,
    group: GraphGroup<S>,
    channels: Vec<(GraphHandle, Channel)>,
}

impl<S: VertexStore> HudGraphs<S> {
    /// Builds a screen, asking `new_store` for a vertex store of
    /// `capacity` samples for every graph.
    pub fn new(
        screen: HudScreen,
        config: &HudConfig,
        memory_limit_bytes: u64,
        mut new_store: impl FnMut(usize) -> S,
    ) -> Self {
        let mut group = GraphGroup::from_config(config);
        let channels = screen_specs(screen, memory_limit_bytes)
            .into_iter()
            .map(|spec| {
                let store = new_store(group.capacity());
                let handle = match spec.labels {
                    Some((name, min, max)) => group.add_graph(name, min, max, spec.color, spec.height, store),
                    None => group.add_overlapped_graph(spec.color, spec.height, store),
                };
                (handle, spec.channel)
            })
            .collect();
        log::debug!("built {:?} graph screen with {} graphs", screen, group.len());
        Self {
            screen,
            group,
            channels,
        }
    }

    pub fn screen(&self) -> HudScreen {
        self.screen
    }

    pub fn group(&self) -> &GraphGroup<S> {
        &self.group
    }

    pub fn group_mut(&mut self) -> &mut GraphGroup<S> {
        &mut self.group
    }

    /// Pushes one sample into every graph of the screen.
    pub fn update(&mut self, frame: &TelemetryFrame, gc: &mut GcCounter) {
        if frame.is_blank() {
            log::warn!("telemetry frame carries no values");
        }
        let power = frame.power_fractions();
        for &(handle, channel) in &self.channels {
            let value = match channel {
                Channel::Throttle => frame.throttle_percent * 0.01,
                Channel::PowerIn => power.input,
                Channel::PowerOut => power.output,
                Channel::MotiveForce => frame.motive_force_fraction(),
                Channel::DynamicForce => -frame.motive_force_fraction(),
                Channel::Substeps => frame.substeps_per_s / 100.0,
                Channel::Memory => frame.memory_fraction(),
                Channel::Collections => gc.sample(frame.gc_counts),
                Channel::FrameTime => frame.frame_time_s * 10.0,
                Channel::RenderLoad => frame.process_load.render / 100.0,
                Channel::UpdaterLoad => frame.process_load.updater / 100.0,
                Channel::LoaderLoad => frame.process_load.loader / 100.0,
                Channel::SoundLoad => frame.process_load.sound / 100.0,
            };
            self.group.add_sample(handle, value);
        }
    }
}
