//! The track monitor: one frame of rails, distance markers, own-train
//! marker and projected track items for the current train state.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::config::MonitorConfig;
use crate::distance_markers::generate_ticks;
use crate::overspeed::{OverspeedTracker, TrackColor};
use crate::placement::{MonitorLayout, PlacementBox};
use crate::signal_aspect::{DisplayMode, SpriteKey};
use crate::text::{colors, Rgba, TextLabel, TextSink};
use crate::track_item::{AuthorityKind, ItemDirection, TrackItemKind, TrackObjectItem};
use crate::track_projector::{first_label_position, PixelBand, PlacedItem, PlacedSprite, TrackProjector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControlMode {
    AutoSignal,
    AutoNode,
    #[default]
    Manual,
    Explorer,
    OutOfControl,
    Inactive,
    Turntable,
    Undefined,
}

impl ControlMode {
    pub fn is_auto(self) -> bool {
        matches!(self, ControlMode::AutoSignal | ControlMode::AutoNode)
    }
}

/// Direction the train is set to travel in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TravelDirection {
    #[default]
    Forward,
    Backward,
    Unknown,
}

/// Snapshot of the player train, produced by the host every frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainInfo {
    pub control_mode: ControlMode,
    pub direction: TravelDirection,
    /// 0 when the driver faces the front of the train.
    pub cab_orientation: u8,
    pub is_on_path: bool,
    pub speed_mps: f32,
    pub allowed_speed_mps: f32,
    pub forward_items: Vec<TrackObjectItem>,
    pub backward_items: Vec<TrackObjectItem>,
    pub multiplayer: bool,
}

/// Which band geometry the frame was laid out with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MonitorMode {
    Idle,
    Auto,
    Manual,
    Multiplayer,
    Turntable,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FilledRect {
    pub placement: PlacementBox,
    pub color: Rgba,
}

/// Everything to draw for one monitor frame, in render order field by field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitorFrame {
    pub mode: MonitorMode,
    pub track_color: TrackColor,
    pub rails: Vec<FilledRect>,
    pub position_lines: Vec<FilledRect>,
    pub arrow: Option<PlacedSprite>,
    pub eye: Option<PlacedSprite>,
    pub markers: Vec<TextLabel>,
    pub forward: Vec<PlacedItem>,
    pub backward: Vec<PlacedItem>,
    pub own_train: Option<PlacedSprite>,
    /// Set when the over-speed duration grew this frame.
    pub overspeed_changed: bool,
}

impl MonitorFrame {
    fn new(mode: MonitorMode, track_color: TrackColor) -> Self {
        Self {
            mode,
            track_color,
            rails: Vec::new(),
            position_lines: Vec::new(),
            arrow: None,
            eye: None,
            markers: Vec::new(),
            forward: Vec::new(),
            backward: Vec::new(),
            own_train: None,
            overspeed_changed: false,
        }
    }

    /// Every sprite in render order.
    pub fn sprites(&self) -> impl Iterator<Item = &PlacedSprite> {
        self.arrow
            .iter()
            .chain(self.eye.iter())
            .chain(self.forward.iter().filter_map(|p| p.sprite.as_ref()))
            .chain(self.backward.iter().filter_map(|p| p.sprite.as_ref()))
            .chain(self.own_train.iter())
    }

    /// Hands every label to the host's text renderer, in render order.
    pub fn draw_labels(&self, sink: &mut impl TextSink) {
        let items = self.forward.iter().chain(self.backward.iter());
        for label in self.markers.iter().chain(items.flat_map(|p| p.labels.iter())) {
            sink.draw_text(label.clone());
        }
    }
}

/// Marker counts and geometry derived once per monitor size.
#[derive(Debug, Clone)]
pub struct TrackMonitor {
    projector: TrackProjector,
    marker_count_auto: u32,
    marker_count_manual: u32,
}

impl TrackMonitor {
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            projector: TrackProjector::from_config(config),
            marker_count_auto: config.marker_count_auto,
            marker_count_manual: config.marker_count_manual,
        }
    }

    pub fn projector(&self) -> &TrackProjector {
        &self.projector
    }

    pub fn layout(&self) -> &MonitorLayout {
        self.projector.layout()
    }

    pub fn cycle_display_mode(&mut self) -> DisplayMode {
        let mode = self.projector.cycle_display_mode();
        log::info!("track monitor display mode: {:?}", mode);
        mode
    }

    /// Frame shown while no train snapshot is available: rails only.
    ///
    /// Still feeds the over-speed tracker, so an open episode is closed.
    pub fn idle_frame(&self, overspeed: &mut OverspeedTracker, clock_s: f64) -> MonitorFrame {
        let color = TrackColor::from_speeds(0.0, 1.0);
        let mut frame = MonitorFrame::new(MonitorMode::Idle, color);
        frame.rails = self.rails(color);
        frame.overspeed_changed = overspeed.observe(color, clock_s);
        frame
    }

    pub fn frame(&self, info: &TrainInfo, overspeed: &mut OverspeedTracker, clock_s: f64) -> MonitorFrame {
        let color = TrackColor::from_speeds(info.speed_mps, info.allowed_speed_mps);
        let mode = if info.multiplayer {
            MonitorMode::Multiplayer
        } else if info.control_mode.is_auto() {
            MonitorMode::Auto
        } else if info.control_mode == ControlMode::Turntable {
            MonitorMode::Turntable
        } else {
            MonitorMode::Manual
        };

        let mut frame = MonitorFrame::new(mode, color);
        frame.rails = self.rails(color);
        frame.overspeed_changed = overspeed.observe(color, clock_s);

        match mode {
            MonitorMode::Auto => self.auto_info(info, &mut frame),
            MonitorMode::Manual => self.manual_info(info, &mut frame),
            MonitorMode::Multiplayer => self.multiplayer_info(info, &mut frame),
            MonitorMode::Turntable | MonitorMode::Idle => {}
        }
        log::trace!(
            "monitor frame {:?}: {} forward, {} backward",
            mode,
            frame.forward.len(),
            frame.backward.len()
        );
        frame
    }

    fn rails(&self, color: TrackColor) -> Vec<FilledRect> {
        let l = self.layout();
        [l.rail1_x, l.rail2_x]
            .into_iter()
            .map(|rail_x| FilledRect {
                placement: PlacementBox::new(
                    IVec2::new(l.track_x + rail_x, 0),
                    IVec2::new(l.rail_width, l.height),
                ),
                color: color.rgba(),
            })
            .collect()
    }

    fn auto_info(&self, info: &TrainInfo, frame: &mut MonitorFrame) {
        let l = self.layout();
        let start = l.additional_info_height;
        let end = l.height - l.additional_info_height - l.train.size.y;
        let zero_top = end;
        let zero_middle = zero_top - l.train.forward_dy;
        let zero_bottom = zero_middle - l.train.backward_dy;
        let factor = self.factor(end - start);

        let no_path_behind = matches!(
            info.backward_items.first(),
            Some(TrackObjectItem {
                kind: TrackItemKind::Authority { kind: AuthorityKind::NoPathReserved },
                ..
            })
        );
        let line_color = if no_path_behind { colors::RED } else { colors::DARK_GRAY };
        frame.position_lines.push(self.position_line(end, line_color));

        frame.arrow = self.arrow(info.direction, zero_middle);
        frame.eye = Some(self.eye(info.cab_orientation));

        let band = PixelBand {
            start,
            end,
            zero_point: zero_top,
            ladder_origin: zero_bottom,
            distance_factor: factor,
        };
        let first_label = self.markers(&band, self.marker_count_auto, ItemDirection::Forward, &mut frame.markers);
        frame.forward = self
            .projector
            .project(&info.forward_items, &band, ItemDirection::Forward, first_label);

        frame.own_train = Some(self.own_train(SpriteKey::TrainAutoForwards, zero_top));
    }

    fn manual_info(&self, info: &TrainInfo, frame: &mut MonitorFrame) {
        let l = self.layout();
        let start = l.additional_info_height;
        let end = l.height - l.additional_info_height;
        let zero_middle = start + (end - start) / 2;
        let zero_top = zero_middle + l.train.forward_dy;
        let zero_bottom = zero_middle - l.train.backward_dy;
        let factor = self.factor(zero_top - start);

        frame.position_lines.push(self.position_line(zero_top, colors::DARK_GRAY));
        frame.position_lines.push(self.position_line(zero_bottom - 1, colors::DARK_GRAY));

        frame.arrow = self.arrow(info.direction, zero_middle);
        frame.eye = Some(self.eye(info.cab_orientation));

        let forward_band = PixelBand {
            start,
            end,
            zero_point: zero_top,
            ladder_origin: zero_bottom,
            distance_factor: factor,
        };
        let backward_band = PixelBand {
            zero_point: zero_bottom,
            ladder_origin: zero_top,
            ..forward_band
        };
        let first_label = self.markers(
            &forward_band,
            self.marker_count_manual,
            ItemDirection::Forward,
            &mut frame.markers,
        );
        self.markers(
            &backward_band,
            self.marker_count_manual,
            ItemDirection::Backward,
            &mut frame.markers,
        );

        // both lists share the forward threshold
        frame.forward = self
            .projector
            .project(&info.forward_items, &forward_band, ItemDirection::Forward, first_label);
        frame.backward = self
            .projector
            .project(&info.backward_items, &backward_band, ItemDirection::Backward, first_label);

        let sprite = if info.is_on_path {
            SpriteKey::TrainManualOnRoute
        } else {
            SpriteKey::TrainManualOffRoute
        };
        frame.own_train = Some(self.own_train(sprite, zero_top));
    }

    fn multiplayer_info(&self, info: &TrainInfo, frame: &mut MonitorFrame) {
        let l = self.layout();
        let start = l.additional_info_height;
        let end = l.height - l.additional_info_height;
        let (zero_top, zero_middle) = match info.direction {
            TravelDirection::Forward => {
                let top = end - l.train.size.y;
                (top, top - l.train.forward_dy)
            }
            TravelDirection::Backward => (start, start - l.train.forward_dy),
            TravelDirection::Unknown => {
                let middle = start + (end - start) / 2;
                (middle + l.train.forward_dy, middle)
            }
        };
        let zero_bottom = zero_middle - l.train.backward_dy;
        let mut factor = self.factor(end - start - l.train.size.y);
        if info.direction == TravelDirection::Unknown {
            factor /= 2.0;
        }

        frame.arrow = self.arrow(info.direction, zero_middle);

        let forward_band = PixelBand {
            start,
            end,
            zero_point: zero_top,
            ladder_origin: zero_bottom,
            distance_factor: factor,
        };
        if info.direction != TravelDirection::Backward {
            let first_label = self.markers(
                &forward_band,
                self.marker_count_auto,
                ItemDirection::Forward,
                &mut frame.markers,
            );
            frame.forward = self
                .projector
                .project(&info.forward_items, &forward_band, ItemDirection::Forward, first_label);
        }
        if info.direction != TravelDirection::Forward {
            let backward_band = PixelBand {
                zero_point: zero_bottom,
                ladder_origin: zero_top,
                ..forward_band
            };
            let first_label = self.markers(
                &backward_band,
                self.marker_count_auto,
                ItemDirection::Backward,
                &mut frame.markers,
            );
            frame.backward = self
                .projector
                .project(&info.backward_items, &backward_band, ItemDirection::Backward, first_label);
        }

        let sprite = match info.direction {
            TravelDirection::Unknown => SpriteKey::TrainManualOnRoute,
            TravelDirection::Forward => SpriteKey::TrainAutoForwards,
            TravelDirection::Backward => SpriteKey::TrainAutoBackwards,
        };
        frame.own_train = Some(self.own_train(sprite, zero_top));
    }

    fn factor(&self, pixels: i32) -> f32 {
        pixels as f32 / self.projector.max_distance_m()
    }

    /// Pushes marker labels for one direction and returns the first-label threshold.
    fn markers(&self, band: &PixelBand, count: u32, direction: ItemDirection, out: &mut Vec<TextLabel>) -> i32 {
        let l = self.layout();
        let max = self.projector.max_distance_m();
        let set = generate_ticks(max, band.distance_factor * max, count, self.projector.units());
        out.extend(set.markers.into_iter().map(|marker| {
            let row = direction.locate(band.zero_point, marker.offset_px);
            TextLabel::at(l.text_position(l.distance_text_x, row, direction), marker.label, colors::WHITE)
        }));
        first_label_position(set.interval_m, band, l.text_spacing)
    }

    fn position_line(&self, row: i32, color: Rgba) -> FilledRect {
        FilledRect {
            placement: PlacementBox::new(IVec2::new(0, row), IVec2::new(self.layout().width, 1)),
            color,
        }
    }

    fn arrow(&self, direction: TravelDirection, zero_middle: i32) -> Option<PlacedSprite> {
        let arrow = self.layout().arrow;
        let (key, dy) = match direction {
            TravelDirection::Forward => (SpriteKey::ForwardArrow, arrow.forward_dy),
            TravelDirection::Backward => (SpriteKey::BackwardArrow, arrow.backward_dy),
            TravelDirection::Unknown => return None,
        };
        Some(white(key, PlacementBox::new(IVec2::new(arrow.x, zero_middle + dy), arrow.size)))
    }

    fn eye(&self, cab_orientation: u8) -> PlacedSprite {
        let l = self.layout();
        let y = if cab_orientation == 0 {
            l.eye.forward_dy
        } else {
            l.height + l.eye.backward_dy
        };
        white(SpriteKey::Eye, PlacementBox::new(IVec2::new(l.eye.x, y), l.eye.size))
    }

    fn own_train(&self, key: SpriteKey, row: i32) -> PlacedSprite {
        let train = self.layout().train;
        white(key, PlacementBox::new(IVec2::new(train.x, row), train.size))
    }
}

fn white(key: SpriteKey, placement: PlacementBox) -> PlacedSprite {
    PlacedSprite {
        key,
        placement,
        tint: colors::WHITE,
    }
}
