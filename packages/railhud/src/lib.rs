pub mod config;
pub mod gpu;
pub mod text;

// Strip-chart graph modules
pub mod sample_ring;
pub mod graph_mesh;
pub mod graph_group;
pub mod hud_graphs;
pub mod telemetry;

// Track monitor modules
pub mod track_item;
pub mod signal_aspect;
pub mod units;
pub mod distance_markers;
pub mod placement;
pub mod track_projector;
pub mod track_monitor;
pub mod overspeed;

pub mod cli;
