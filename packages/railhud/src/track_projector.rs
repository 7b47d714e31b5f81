//! Projection of distance-tagged track items onto the monitor's pixel band.
//!
//! One call to [`TrackProjector::project`] handles one list (forward or
//! backward) and returns draw operations in render order:
//!
//! 1. every item in distance order: authority, speed post, station, waiting
//!    point and milepost sprites and labels; labels only for signals,
//!    switches and reversals;
//! 2. switch and reversal sprites, so they sit on top of the track furniture;
//! 3. signal sprites, farthest first, so nearer signals overlap farther ones.
//!
//! Speed posts and mileposts share a label ladder: each label is pushed at
//! least `text_spacing` pixels beyond the previous one in the direction of
//! travel. Only the first item inside the first distance marker gets its
//! distance printed.

use glam::IVec2;
use serde::Serialize;

use crate::config::MonitorConfig;
use crate::placement::{MonitorLayout, PlacementBox};
use crate::signal_aspect::{self, DisplayMode, SignalAspect, SpriteKey};
use crate::text::{colors, Rgba, TextLabel};
use crate::track_item::{AuthorityKind, ItemDirection, SpeedPostKind, TrackItemKind, TrackObjectItem};
use crate::units::UnitSystem;

/// Speeds above this mean "no limit" and fall back to the route limit.
const UNLIMITED_SPEED_MPS: f32 = 998.0;

/// Vertical pixel extent items are projected onto, monitor-local (y down).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PixelBand {
    /// Top of the object area.
    pub start: i32,
    /// Bottom of the object area.
    pub end: i32,
    /// Pixel row at distance zero.
    pub zero_point: i32,
    /// Where the label ladder starts: the far edge of the own-train marker.
    pub ladder_origin: i32,
    /// Pixels per metre.
    pub distance_factor: f32,
}

impl PixelBand {
    pub fn offset(&self, distance_m: f32) -> i32 {
        (distance_m * self.distance_factor).round_ties_even() as i32
    }
}

/// Which of the three render passes produced a draw operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DrawPass {
    Items,
    SwitchesReversals,
    SignalsReversed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedSprite {
    pub key: SpriteKey,
    pub placement: PlacementBox,
    pub tint: Rgba,
}

/// One draw operation for one item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedItem {
    /// Index into the item slice passed to [`TrackProjector::project`].
    pub item_index: usize,
    pub pass: DrawPass,
    pub sprite: Option<PlacedSprite>,
    pub labels: Vec<TextLabel>,
    /// Row this item's labels were placed at after ladder clamping.
    pub ladder_position: Option<i32>,
}

impl PlacedItem {
    fn new(item_index: usize, pass: DrawPass) -> Self {
        Self {
            item_index,
            pass,
            sprite: None,
            labels: Vec::new(),
            ladder_position: None,
        }
    }

    /// Top-left of the sprite, if any.
    pub fn sprite_origin(&self) -> Option<IVec2> {
        self.sprite.as_ref().map(|s| s.placement.origin)
    }

    fn is_empty(&self) -> bool {
        self.sprite.is_none() && self.labels.is_empty()
    }
}

/// Per-list state carried through the passes.
struct PassState {
    signal_shown: bool,
    border_signal: Option<usize>,
    first_label_shown: bool,
    ladder: i32,
}

#[derive(Debug, Clone)]
pub struct TrackProjector {
    layout: MonitorLayout,
    max_distance_m: f32,
    units: UnitSystem,
    display_mode: DisplayMode,
    timetable_mode: bool,
    route_speed_limit_mps: Option<f32>,
}

impl TrackProjector {
    pub fn new(layout: MonitorLayout, max_distance_m: f32, units: UnitSystem) -> Self {
        Self {
            layout,
            max_distance_m,
            units,
            display_mode: DisplayMode::All,
            timetable_mode: false,
            route_speed_limit_mps: None,
        }
    }

    pub fn from_config(config: &MonitorConfig) -> Self {
        Self {
            layout: MonitorLayout::new(config.width, config.height),
            max_distance_m: config.max_distance_m,
            units: UnitSystem::from_metric_flag(config.metric),
            display_mode: config.display_mode,
            timetable_mode: config.timetable_mode,
            route_speed_limit_mps: config.route_speed_limit_mps,
        }
    }

    pub fn with_display_mode(mut self, mode: DisplayMode) -> Self {
        self.display_mode = mode;
        self
    }

    pub fn with_timetable_mode(mut self, timetable_mode: bool) -> Self {
        self.timetable_mode = timetable_mode;
        self
    }

    pub fn with_route_speed_limit(mut self, limit_mps: Option<f32>) -> Self {
        self.route_speed_limit_mps = limit_mps;
        self
    }

    pub fn layout(&self) -> &MonitorLayout {
        &self.layout
    }

    pub fn units(&self) -> UnitSystem {
        self.units
    }

    pub fn max_distance_m(&self) -> f32 {
        self.max_distance_m
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    /// Toggles between full and static-only display.
    pub fn cycle_display_mode(&mut self) -> DisplayMode {
        self.display_mode = self.display_mode.cycle();
        self.display_mode
    }

    /// Items closer than this are drawn. Everything but signals.
    pub fn item_cutoff_m(&self, band: &PixelBand) -> f32 {
        self.max_distance_m - self.layout.text_spacing as f32 / band.distance_factor
    }

    /// Signals closer than this are drawn at their own location.
    pub fn signal_cutoff_m(&self, band: &PixelBand) -> f32 {
        self.max_distance_m - (self.layout.text_spacing / 2) as f32 / band.distance_factor
    }

    /// Places one list of items. `first_label_position` is the pixel offset
    /// below which an item may print its distance.
    pub fn project(
        &self,
        items: &[TrackObjectItem],
        band: &PixelBand,
        direction: ItemDirection,
        first_label_position: i32,
    ) -> Vec<PlacedItem> {
        if items.is_empty() || !band.distance_factor.is_finite() || band.distance_factor <= 0.0 {
            return Vec::new();
        }

        // Stable, so equal distances keep the host's order.
        let mut order: Vec<usize> = (0..items.len())
            .filter(|&i| items[i].distance_m.is_finite())
            .collect();
        if order.len() < items.len() {
            log::debug!("skipping {} track items with non-finite distance", items.len() - order.len());
        }
        order.sort_by(|&a, &b| items[a].distance_m.total_cmp(&items[b].distance_m));

        let mut state = PassState {
            signal_shown: false,
            border_signal: None,
            first_label_shown: false,
            ladder: band.ladder_origin,
        };
        let mut placed = Vec::new();

        for &index in &order {
            let op = self.draw_item(index, &items[index], band, direction, first_label_position, &mut state);
            placed.extend(op.filter(|p| !p.is_empty()));
        }

        for &index in &order {
            let op = self.draw_switch_or_reversal(index, &items[index], band, direction);
            placed.extend(op);
        }

        for &index in order.iter().rev() {
            let op = self.draw_signal_sprite(index, &items[index], band, direction, &state);
            placed.extend(op);
        }

        log::trace!("projected {} of {} track items ({:?})", placed.len(), items.len(), direction);
        placed
    }

    fn draw_item(
        &self,
        index: usize,
        item: &TrackObjectItem,
        band: &PixelBand,
        direction: ItemDirection,
        first_label_position: i32,
        state: &mut PassState,
    ) -> Option<PlacedItem> {
        let d = item.distance_m;
        if let TrackItemKind::Signal { aspect, allowed_speed_mps } = item.kind {
            return self.draw_signal_labels(index, d, aspect, allowed_speed_mps, band, direction, first_label_position, state);
        }
        if d >= self.item_cutoff_m(band) {
            return None;
        }

        let offset = band.offset(d);
        let location = direction.locate(band.zero_point, offset);
        let first_label = offset < first_label_position && !state.first_label_shown;
        let mut op = PlacedItem::new(index, DrawPass::Items);

        match &item.kind {
            TrackItemKind::Authority { kind } => {
                let (key, anchor) = match kind {
                    AuthorityKind::EndOfAuthority
                    | AuthorityKind::EndOfPath
                    | AuthorityKind::EndOfTrack
                    | AuthorityKind::ReservedSwitch
                    | AuthorityKind::Loop => (SpriteKey::EndAuthority, self.layout.end_authority),
                    AuthorityKind::TrainAhead => {
                        let key = if direction.is_forward() {
                            SpriteKey::OppositeTrainForward
                        } else {
                            SpriteKey::OppositeTrainBackward
                        };
                        (key, self.layout.other_train)
                    }
                    _ => return None,
                };
                op.sprite = Some(sprite(key, anchor.place(location, direction), colors::WHITE));
                if first_label {
                    op.labels.push(self.distance_label(location, d, direction));
                    state.first_label_shown = true;
                }
            }
            TrackItemKind::SpeedPost { allowed_speed_mps, kind, is_warning } => {
                let ladder = self.climb_ladder(location, state.ladder, direction);
                state.ladder = ladder;
                op.ladder_position = Some(ladder);

                let color = match kind {
                    SpeedPostKind::Standard if *is_warning => colors::YELLOW,
                    SpeedPostKind::Standard => colors::WHITE,
                    SpeedPostKind::TempRestrictedStart => colors::RED,
                    SpeedPostKind::TempRestrictedResume => colors::LIGHT_GREEN,
                };
                let speed = self.displayed_speed_limit(*allowed_speed_mps);
                op.labels.push(TextLabel::at(
                    self.layout.text_position(self.layout.speed_text_x, ladder, direction),
                    self.units.format_speed_limit(speed),
                    color,
                ));
                if first_label {
                    op.labels.push(self.distance_label(ladder, d, direction));
                    state.first_label_shown = true;
                }
            }
            TrackItemKind::Station { platform_length_m } => {
                let anchor = self.layout.station;
                let height = anchor.size.y.max((platform_length_m * band.distance_factor) as i32);
                op.sprite = Some(sprite(
                    SpriteKey::Station,
                    anchor.place(location, direction).with_height(height),
                    colors::WHITE,
                ));
            }
            TrackItemKind::WaitingPoint { enabled } => {
                let label_row = self.climb_ladder(location, state.ladder, direction);
                op.ladder_position = Some(label_row);
                let tint = if *enabled { colors::YELLOW } else { colors::RED };
                op.sprite = Some(sprite(
                    SpriteKey::WaitingPoint,
                    self.layout.waiting_point.place(location, direction),
                    tint,
                ));
                if first_label {
                    op.labels.push(self.distance_label(label_row, d, direction));
                    state.first_label_shown = true;
                }
            }
            TrackItemKind::Milepost { label } => {
                let ladder = self.climb_ladder(location, state.ladder, direction);
                state.ladder = ladder;
                op.ladder_position = Some(ladder);
                op.labels.push(TextLabel::at(
                    self.layout.text_position(self.layout.milepost_text_x, ladder, direction),
                    label.clone(),
                    colors::WHITE,
                ));
            }
            TrackItemKind::Switch { .. } | TrackItemKind::Reversal { .. } => {
                if matches!(item.kind, TrackItemKind::Switch { .. }) && !self.display_mode.shows_live_state() {
                    return None;
                }
                let label_row = self.climb_ladder(location, state.ladder, direction);
                op.ladder_position = Some(label_row);
                if first_label && !self.timetable_mode {
                    op.labels.push(self.distance_label(label_row, d, direction));
                    state.first_label_shown = true;
                }
            }
            TrackItemKind::Signal { .. } => return None,
        }

        Some(op)
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_signal_labels(
        &self,
        index: usize,
        d: f32,
        aspect: SignalAspect,
        allowed_speed_mps: f32,
        band: &PixelBand,
        direction: ItemDirection,
        first_label_position: i32,
        state: &mut PassState,
    ) -> Option<PlacedItem> {
        let cutoff = self.signal_cutoff_m(band);
        let (offset, location) = if d < cutoff {
            state.signal_shown = true;
            let offset = band.offset(d);
            (offset, direction.locate(band.zero_point, offset))
        } else if state.border_signal.is_none() && !state.signal_shown {
            state.border_signal = Some(index);
            (2 * band.start, self.border_location(band, direction))
        } else {
            return None;
        };

        let mut op = PlacedItem::new(index, DrawPass::Items);
        if self.display_mode.shows_live_state() && aspect != SignalAspect::Stop && allowed_speed_mps > 0.0 {
            op.labels.push(TextLabel::at(
                self.layout.text_position(self.layout.speed_text_x, location, direction),
                self.units.format_speed_limit(allowed_speed_mps),
                colors::WHITE,
            ));
        }
        if (offset < first_label_position && !state.first_label_shown) || d > cutoff {
            op.labels.push(self.distance_label(location, d, direction));
            state.first_label_shown = true;
        }
        Some(op)
    }

    fn draw_switch_or_reversal(
        &self,
        index: usize,
        item: &TrackObjectItem,
        band: &PixelBand,
        direction: ItemDirection,
    ) -> Option<PlacedItem> {
        let d = item.distance_m;
        if d >= self.item_cutoff_m(band) {
            return None;
        }
        let location = direction.locate(band.zero_point, band.offset(d));

        let placed = match item.kind {
            TrackItemKind::Switch { right } => {
                if !self.display_mode.shows_live_state() {
                    return None;
                }
                let (key, anchor) = if right {
                    (SpriteKey::RightSwitch, self.layout.right_switch)
                } else {
                    (SpriteKey::LeftSwitch, self.layout.left_switch)
                };
                sprite(key, anchor.place(location, direction), colors::WHITE)
            }
            TrackItemKind::Reversal { valid: true, enabled } => {
                let tint = if enabled { colors::LIGHT_GREEN } else { colors::WHITE };
                sprite(SpriteKey::Reversal, self.layout.reversal.place(location, direction), tint)
            }
            TrackItemKind::Reversal { valid: false, .. } => sprite(
                SpriteKey::InvalidReversal,
                self.layout.invalid_reversal.place(location, direction),
                colors::WHITE,
            ),
            _ => return None,
        };

        let mut op = PlacedItem::new(index, DrawPass::SwitchesReversals);
        op.sprite = Some(placed);
        Some(op)
    }

    fn draw_signal_sprite(
        &self,
        index: usize,
        item: &TrackObjectItem,
        band: &PixelBand,
        direction: ItemDirection,
        state: &PassState,
    ) -> Option<PlacedItem> {
        let TrackItemKind::Signal { aspect, .. } = item.kind else {
            return None;
        };
        let location = if item.distance_m < self.signal_cutoff_m(band) {
            direction.locate(band.zero_point, band.offset(item.distance_m))
        } else if state.border_signal == Some(index) {
            self.border_location(band, direction)
        } else {
            return None;
        };

        let mut op = PlacedItem::new(index, DrawPass::SignalsReversed);
        op.sprite = Some(sprite(
            signal_aspect::resolve(aspect, self.display_mode),
            self.layout.signal.place(location, direction),
            colors::WHITE,
        ));
        Some(op)
    }

    fn border_location(&self, band: &PixelBand, direction: ItemDirection) -> i32 {
        if direction.is_forward() {
            band.start
        } else {
            band.end
        }
    }

    fn climb_ladder(&self, location: i32, last: i32, direction: ItemDirection) -> i32 {
        let spacing = self.layout.text_spacing;
        match direction {
            ItemDirection::Forward => location.min(last - spacing),
            ItemDirection::Backward => location.max(last + spacing),
        }
    }

    fn displayed_speed_limit(&self, allowed_mps: f32) -> f32 {
        match self.route_speed_limit_mps {
            Some(limit) if allowed_mps > UNLIMITED_SPEED_MPS && !self.timetable_mode => limit,
            _ => allowed_mps,
        }
    }

    fn distance_label(&self, row: i32, distance_m: f32, direction: ItemDirection) -> TextLabel {
        TextLabel::at(
            self.layout.text_position(self.layout.distance_text_x, row, direction),
            self.units.format_distance(distance_m),
            colors::WHITE,
        )
    }
}

fn sprite(key: SpriteKey, placement: PlacementBox, tint: Rgba) -> PlacedSprite {
    PlacedSprite { key, placement, tint }
}

/// Pixel row of the first label threshold for a marker interval.
pub fn first_label_position(first_marker_m: f32, band: &PixelBand, text_spacing: i32) -> i32 {
    band.offset(first_marker_m) - text_spacing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::DESIGN_WIDTH;

    fn projector() -> TrackProjector {
        TrackProjector::new(MonitorLayout::new(DESIGN_WIDTH, 256), 5000.0, UnitSystem::Metric)
    }

    /// Auto-mode band of a 150x256 monitor: 200 px for 5 km.
    fn auto_band() -> PixelBand {
        PixelBand {
            start: 16,
            end: 216,
            zero_point: 216,
            ladder_origin: 240,
            distance_factor: 200.0 / 5000.0,
        }
    }

    /// Band where `text_spacing / factor` is exactly 5 m.
    fn steep_band() -> PixelBand {
        PixelBand {
            distance_factor: 2.0,
            ..auto_band()
        }
    }

    fn passes_for(placed: &[PlacedItem], index: usize) -> Vec<DrawPass> {
        placed.iter().filter(|p| p.item_index == index).map(|p| p.pass).collect()
    }

    #[test]
    fn test_empty_list_places_nothing() {
        assert!(projector().project(&[], &auto_band(), ItemDirection::Forward, 30).is_empty());
    }

    #[test]
    fn test_cutoffs() {
        let p = projector();
        let band = steep_band();
        assert!((p.item_cutoff_m(&band) - 4995.0).abs() < 1e-3);
        assert!((p.signal_cutoff_m(&band) - 4997.5).abs() < 1e-3);
    }

    #[test]
    fn test_off_scale_item_is_suppressed() {
        let items = [TrackObjectItem::speed_post(4999.0, 20.0)];
        let placed = projector().project(&items, &steep_band(), ItemDirection::Forward, 30);
        assert!(placed.is_empty());
    }

    #[test]
    fn test_first_off_scale_signal_goes_to_border() {
        let items = [TrackObjectItem::signal(4999.0, SignalAspect::Clear2, 0.0)];
        let band = steep_band();
        let placed = projector().project(&items, &band, ItemDirection::Forward, 30);

        let sprite_op = placed
            .iter()
            .find(|p| p.pass == DrawPass::SignalsReversed)
            .expect("border signal sprite");
        assert_eq!(sprite_op.sprite_origin(), Some(IVec2::new(95, band.start - 16)));

        let label_op = placed.iter().find(|p| p.pass == DrawPass::Items).expect("border signal label");
        assert_eq!(label_op.labels.len(), 1);
        assert_eq!(label_op.labels[0].text, "5.0 km");
    }

    #[test]
    fn test_off_scale_signal_hidden_once_a_signal_is_shown() {
        let items = [
            TrackObjectItem::signal(100.0, SignalAspect::Stop, 0.0),
            TrackObjectItem::signal(4999.0, SignalAspect::Clear2, 0.0),
            TrackObjectItem::signal(4999.5, SignalAspect::Clear1, 0.0),
        ];
        let placed = projector().project(&items, &steep_band(), ItemDirection::Forward, 30);
        assert!(passes_for(&placed, 1).is_empty());
        assert!(passes_for(&placed, 2).is_empty());
        assert_eq!(passes_for(&placed, 0), vec![DrawPass::SignalsReversed]);
    }

    #[test]
    fn test_only_one_border_signal() {
        let items = [
            TrackObjectItem::signal(6000.0, SignalAspect::Clear2, 0.0),
            TrackObjectItem::signal(7000.0, SignalAspect::Clear1, 0.0),
        ];
        let placed = projector().project(&items, &auto_band(), ItemDirection::Backward, 30);
        let sprites: Vec<_> = placed.iter().filter(|p| p.sprite.is_some()).collect();
        assert_eq!(sprites.len(), 1);
        assert_eq!(sprites[0].item_index, 0);
        // backward border sits at the end of the band
        assert_eq!(sprites[0].sprite_origin(), Some(IVec2::new(95, 216)));
    }

    #[test]
    fn test_speed_post_ladder_is_monotonic() {
        let items = [
            TrackObjectItem::speed_post(10.0, 10.0),
            TrackObjectItem::speed_post(12.0, 20.0),
            TrackObjectItem::speed_post(14.0, 30.0),
        ];
        let p = projector();
        let placed = p.project(&items, &auto_band(), ItemDirection::Forward, 30);
        let rows: Vec<i32> = placed.iter().filter_map(|op| op.ladder_position).collect();
        assert_eq!(rows.len(), 3);
        for pair in rows.windows(2) {
            assert!(pair[0] - pair[1] >= p.layout().text_spacing, "{:?}", rows);
        }
    }

    #[test]
    fn test_backward_ladder_grows_downwards() {
        let items = [
            TrackObjectItem::speed_post(10.0, 10.0),
            TrackObjectItem::speed_post(12.0, 20.0),
        ];
        let band = PixelBand {
            start: 16,
            end: 240,
            zero_point: 140,
            ladder_origin: 116,
            distance_factor: 0.02,
        };
        let placed = projector().project(&items, &band, ItemDirection::Backward, 30);
        let rows: Vec<i32> = placed.iter().filter_map(|op| op.ladder_position).collect();
        assert_eq!(rows, vec![140, 150]);
    }

    #[test]
    fn test_switch_drawn_before_signal_at_same_position() {
        let items = [
            TrackObjectItem::signal(500.0, SignalAspect::Approach1, 0.0),
            TrackObjectItem::switch(500.0, true),
        ];
        let placed = projector().project(&items, &auto_band(), ItemDirection::Forward, 30);
        let switch_at = placed
            .iter()
            .position(|p| p.item_index == 1 && p.sprite.is_some())
            .expect("switch sprite");
        let signal_at = placed
            .iter()
            .position(|p| p.item_index == 0 && p.sprite.is_some())
            .expect("signal sprite");
        assert_eq!(placed[switch_at].pass, DrawPass::SwitchesReversals);
        assert_eq!(placed[signal_at].pass, DrawPass::SignalsReversed);
        assert!(switch_at < signal_at);
    }

    #[test]
    fn test_signals_drawn_farthest_first() {
        let items = [
            TrackObjectItem::signal(300.0, SignalAspect::Clear2, 0.0),
            TrackObjectItem::signal(900.0, SignalAspect::Stop, 0.0),
        ];
        let placed = projector().project(&items, &auto_band(), ItemDirection::Forward, 30);
        let order: Vec<usize> = placed
            .iter()
            .filter(|p| p.pass == DrawPass::SignalsReversed)
            .map(|p| p.item_index)
            .collect();
        assert_eq!(order, vec![1, 0]);
    }

    #[test]
    fn test_first_label_goes_to_nearest_item_in_window() {
        // signal and speed post both inside the first-label window; nearest wins
        let items = [
            TrackObjectItem::speed_post(300.0, 20.0),
            TrackObjectItem::signal(200.0, SignalAspect::Stop, 0.0),
        ];
        let placed = projector().project(&items, &auto_band(), ItemDirection::Forward, 30);
        let with_distance: Vec<usize> = placed
            .iter()
            .filter(|p| p.labels.iter().any(|l| l.text.ends_with(" m") || l.text.ends_with(" km")))
            .map(|p| p.item_index)
            .collect();
        assert_eq!(with_distance, vec![1]);
    }

    #[test]
    fn test_equal_distances_keep_input_order() {
        let items = [
            TrackObjectItem::speed_post(240.0, 20.0),
            TrackObjectItem::authority(240.0, AuthorityKind::EndOfPath),
        ];
        let placed = projector().project(&items, &auto_band(), ItemDirection::Forward, 30);
        let labelled: Vec<usize> = placed
            .iter()
            .filter(|p| p.labels.iter().any(|l| l.text == "0.2 km"))
            .map(|p| p.item_index)
            .collect();
        assert_eq!(labelled, vec![0]);
    }

    #[test]
    fn test_static_only_hides_switches_and_aspects() {
        let items = [
            TrackObjectItem::switch(400.0, false),
            TrackObjectItem::signal(600.0, SignalAspect::Clear1, 20.0),
        ];
        let placed = projector()
            .with_display_mode(DisplayMode::StaticOnly)
            .project(&items, &auto_band(), ItemDirection::Forward, 0);
        assert!(passes_for(&placed, 0).is_empty());
        let signal = placed.iter().find(|p| p.item_index == 1 && p.sprite.is_some()).unwrap();
        assert_eq!(signal.sprite.as_ref().unwrap().key, SpriteKey::Signal(SignalAspect::None));
        // no speed label either
        assert!(placed.iter().all(|p| p.labels.is_empty()));
    }

    #[test]
    fn test_signal_speed_label_needs_proceed_aspect() {
        let items = [
            TrackObjectItem::signal(600.0, SignalAspect::Stop, 20.0),
            TrackObjectItem::signal(900.0, SignalAspect::Approach2, 20.0),
        ];
        let placed = projector().project(&items, &auto_band(), ItemDirection::Forward, 0);
        let labelled: Vec<usize> = placed.iter().filter(|p| !p.labels.is_empty()).map(|p| p.item_index).collect();
        assert_eq!(labelled, vec![1]);
        assert_eq!(placed.iter().find(|p| p.item_index == 1).unwrap().labels[0].text, "72");
    }

    #[test]
    fn test_unlimited_speed_uses_route_limit() {
        let items = [TrackObjectItem::speed_post(100.0, 999.0)];
        let p = projector().with_route_speed_limit(Some(25.0));
        let placed = p.project(&items, &auto_band(), ItemDirection::Forward, 0);
        assert_eq!(placed[0].labels[0].text, "90");

        let placed = p.with_timetable_mode(true).project(&items, &auto_band(), ItemDirection::Forward, 0);
        assert_eq!(placed[0].labels[0].text, "3596");
    }

    #[test]
    fn test_station_height_follows_platform() {
        let items = [TrackObjectItem::new(1000.0, TrackItemKind::Station { platform_length_m: 500.0 })];
        let placed = projector().project(&items, &auto_band(), ItemDirection::Forward, 0);
        let station = placed[0].sprite.as_ref().unwrap();
        assert_eq!(station.key, SpriteKey::Station);
        assert_eq!(station.placement.size, IVec2::new(24, 20));

        let short = [TrackObjectItem::new(1000.0, TrackItemKind::Station { platform_length_m: 50.0 })];
        let placed = projector().project(&short, &auto_band(), ItemDirection::Forward, 0);
        assert_eq!(placed[0].sprite.as_ref().unwrap().placement.size.y, 12);
    }

    #[test]
    fn test_authority_sprites() {
        let items = [
            TrackObjectItem::authority(100.0, AuthorityKind::EndOfTrack),
            TrackObjectItem::authority(200.0, AuthorityKind::TrainAhead),
            TrackObjectItem::authority(300.0, AuthorityKind::MaxDistance),
        ];
        let placed = projector().project(&items, &auto_band(), ItemDirection::Backward, 0);
        let keys: Vec<SpriteKey> = placed.iter().filter_map(|p| p.sprite.as_ref().map(|s| s.key)).collect();
        assert_eq!(keys, vec![SpriteKey::EndAuthority, SpriteKey::OppositeTrainBackward]);
    }

    #[test]
    fn test_timetable_mode_suppresses_switch_distance() {
        let items = [TrackObjectItem::switch(100.0, false)];
        let placed = projector()
            .with_timetable_mode(true)
            .project(&items, &auto_band(), ItemDirection::Forward, 30);
        assert!(placed.iter().all(|p| p.labels.is_empty()));
        assert_eq!(placed.len(), 1);
    }

    #[test]
    fn test_reversal_tint() {
        let items = [
            TrackObjectItem::new(100.0, TrackItemKind::Reversal { valid: true, enabled: true }),
            TrackObjectItem::new(200.0, TrackItemKind::Reversal { valid: false, enabled: true }),
        ];
        let placed = projector().project(&items, &auto_band(), ItemDirection::Forward, 0);
        let sprites: Vec<&PlacedSprite> = placed.iter().filter_map(|p| p.sprite.as_ref()).collect();
        assert_eq!(sprites[0].key, SpriteKey::Reversal);
        assert_eq!(sprites[0].tint, colors::LIGHT_GREEN);
        assert_eq!(sprites[1].key, SpriteKey::InvalidReversal);
        assert_eq!(sprites[1].tint, colors::WHITE);
    }

    #[test]
    fn test_non_finite_distances_ignored() {
        let items = [
            TrackObjectItem::speed_post(f32::NAN, 20.0),
            TrackObjectItem::speed_post(100.0, 20.0),
        ];
        let placed = projector().project(&items, &auto_band(), ItemDirection::Forward, 0);
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].item_index, 1);
    }
}
