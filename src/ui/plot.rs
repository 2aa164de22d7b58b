use std::time::Duration;

use eframe::egui::{self, Pos2, Ui};
use egui_plot::{Line, MarkerShape, Plot, PlotBounds, PlotPoint, PlotPoints, Points};

use crate::data::model::Record;
use crate::render::{Axis, AxisBinding, RenderBinder, TickFormat};
use crate::state::AppState;

use super::anim::{Ease, SeriesTween, Tween};

/// Pointer distance (screen points) within which a marker counts as hovered.
const HIT_RADIUS: f32 = 6.0;

// ---------------------------------------------------------------------------
// PlotBinder – animated chart state behind the egui plot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct AxisState {
    lower: Tween,
    upper: Tween,
    ticks: TickFormat,
}

/// Egui-side render binder. Every bound element is a tween on the frame
/// clock; the first binding of an element snaps, later ones animate from the
/// value currently on screen.
#[derive(Debug, Clone)]
pub struct PlotBinder {
    clock: f64,
    ease: Ease,
    fade_secs: f64,
    x_axis: Option<AxisState>,
    y_axis: Option<AxisState>,
    line: Option<SeriesTween>,
    points: Option<SeriesTween>,
    hovered: Option<usize>,
    /// Index shown by the tooltip; outlives `hovered` while fading out.
    tooltip_index: Option<usize>,
    tooltip_anchor: Pos2,
    tooltip_opacity: Tween,
}

impl PlotBinder {
    pub fn new(ease: Ease, fade: Duration) -> Self {
        Self {
            clock: 0.0,
            ease,
            fade_secs: fade.as_secs_f64(),
            x_axis: None,
            y_axis: None,
            line: None,
            points: None,
            hovered: None,
            tooltip_index: None,
            tooltip_anchor: Pos2::ZERO,
            tooltip_opacity: Tween::at(0.0),
        }
    }

    /// Advance the frame clock (seconds, monotonic).
    pub fn tick(&mut self, now: f64) {
        self.clock = now;
    }

    pub fn is_animating(&self) -> bool {
        let now = self.clock;
        let axes = [&self.x_axis, &self.y_axis]
            .into_iter()
            .flatten()
            .any(|a| a.lower.is_animating(now) || a.upper.is_animating(now));
        let series = [&self.line, &self.points]
            .into_iter()
            .flatten()
            .any(|s| s.is_animating(now));
        axes || series || self.tooltip_opacity.is_animating(now)
    }

    /// Displayed `[lower, upper]` of an axis at the current clock.
    pub fn axis_range(&self, axis: Axis) -> Option<[f64; 2]> {
        let state = self.axis(axis).as_ref()?;
        Some([state.lower.value(self.clock), state.upper.value(self.clock)])
    }

    pub fn ticks(&self, axis: Axis) -> TickFormat {
        self.axis(axis)
            .as_ref()
            .map_or(TickFormat::Auto, |a| a.ticks)
    }

    pub fn line_points(&self) -> Vec<[f64; 2]> {
        self.line
            .as_ref()
            .map(|s| s.points(self.clock))
            .unwrap_or_default()
    }

    pub fn marker_points(&self) -> Vec<[f64; 2]> {
        self.points
            .as_ref()
            .map(|s| s.points(self.clock))
            .unwrap_or_default()
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Tooltip to draw this frame: record index, anchor and opacity.
    pub fn tooltip(&self) -> Option<(usize, Pos2, f32)> {
        let opacity = self.tooltip_opacity.value(self.clock) as f32;
        let index = self.tooltip_index?;
        (opacity > 0.0).then_some((index, self.tooltip_anchor, opacity))
    }

    pub fn set_tooltip_anchor(&mut self, pos: Pos2) {
        self.tooltip_anchor = pos;
    }

    fn axis(&self, axis: Axis) -> &Option<AxisState> {
        match axis {
            Axis::X => &self.x_axis,
            Axis::Y => &self.y_axis,
        }
    }

    fn baseline(&self) -> f64 {
        self.y_axis.as_ref().map_or(0.0, |a| a.lower.target())
    }

    fn bind_series(
        slot: &mut Option<SeriesTween>,
        points: &[[f64; 2]],
        baseline: f64,
        now: f64,
        duration: f64,
        ease: Ease,
    ) {
        match slot {
            Some(series) => series.retarget(points.to_vec(), baseline, now, duration, ease),
            None => *slot = Some(SeriesTween::at(points.to_vec())),
        }
    }
}

impl RenderBinder for PlotBinder {
    fn bind_axis(&mut self, binding: AxisBinding) {
        let now = self.clock;
        let ease = self.ease;
        let duration = binding.duration.as_secs_f64();
        let slot = match binding.axis {
            Axis::X => &mut self.x_axis,
            Axis::Y => &mut self.y_axis,
        };
        match slot {
            Some(state) => {
                state.lower.retarget(binding.domain.lower, now, duration, ease);
                state.upper.retarget(binding.domain.upper, now, duration, ease);
                state.ticks = binding.ticks;
            }
            None => {
                *slot = Some(AxisState {
                    lower: Tween::at(binding.domain.lower),
                    upper: Tween::at(binding.domain.upper),
                    ticks: binding.ticks,
                });
            }
        }
        log::debug!(
            "{:?} axis → [{}, {}]",
            binding.axis,
            binding.domain.lower,
            binding.domain.upper
        );
    }

    fn bind_line(&mut self, points: &[[f64; 2]], duration: Duration) {
        let baseline = self.baseline();
        let (now, ease) = (self.clock, self.ease);
        Self::bind_series(&mut self.line, points, baseline, now, duration.as_secs_f64(), ease);
    }

    fn bind_points(&mut self, points: &[[f64; 2]], duration: Duration) {
        let baseline = self.baseline();
        let (now, ease) = (self.clock, self.ease);
        Self::bind_series(&mut self.points, points, baseline, now, duration.as_secs_f64(), ease);
        // The hovered marker may no longer exist.
        if self.hovered.is_some_and(|i| i >= points.len()) {
            self.on_hover_end();
        }
    }

    fn on_hover(&mut self, index: usize) {
        self.hovered = Some(index);
        self.tooltip_index = Some(index);
        self.tooltip_opacity = Tween::at(1.0);
    }

    fn on_hover_end(&mut self) {
        if self.hovered.take().is_some() {
            let (now, fade) = (self.clock, self.fade_secs);
            self.tooltip_opacity.retarget(0.0, now, fade, Ease::Linear);
        }
    }
}

// ---------------------------------------------------------------------------
// Energy plot (central panel)
// ---------------------------------------------------------------------------

/// Render the consumption chart in the central panel.
pub fn energy_plot(ui: &mut Ui, state: &mut AppState) {
    let Some(controller) = &state.controller else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view energy data  (File → Open…)");
        });
        return;
    };

    let binder = &mut state.binder;
    binder.tick(ui.input(|i| i.time));

    let (Some([x_lo, x_hi]), Some([y_lo, y_hi])) =
        (binder.axis_range(Axis::X), binder.axis_range(Axis::Y))
    else {
        ui.label("No series selected.");
        return;
    };
    // egui_plot needs a non-empty range; an all-zero series keeps [0, 0] as
    // its domain but is drawn against [0, 1].
    let y_hi = if y_hi - y_lo < f64::EPSILON { y_lo + 1.0 } else { y_hi };

    let cfg = &state.config;
    let colors = state.colors;
    let x_ticks = binder.ticks(Axis::X);
    let y_ticks = binder.ticks(Axis::Y);
    let line = binder.line_points();
    let markers = binder.marker_points();
    let hovered = binder.hovered();

    let margin = egui::Margin {
        left: cfg.margin.left,
        right: cfg.margin.right,
        top: cfg.margin.top,
        bottom: cfg.margin.bottom,
    };

    let response = egui::Frame::default().inner_margin(margin).show(ui, |ui: &mut Ui| {
        Plot::new("energy_plot")
            .width(cfg.inner_width())
            .height(cfg.inner_height())
            .x_axis_label("Years")
            .y_axis_label("Terawatt Hours")
            .x_axis_formatter(move |mark, _range| x_ticks.format(mark.value))
            .y_axis_formatter(move |mark, _range| y_ticks.format(mark.value))
            .show_x(false)
            .show_y(false)
            .allow_boxed_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .allow_zoom(false)
            .allow_double_click_reset(false)
            .show(ui, |plot_ui| {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max([x_lo, y_lo], [x_hi, y_hi]));

                let path: PlotPoints = line.iter().copied().collect();
                plot_ui.line(Line::new(path).color(colors.line).width(cfg.line_width));

                let dots: PlotPoints = markers.iter().copied().collect();
                plot_ui.points(
                    Points::new(dots)
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(cfg.marker_radius)
                        .color(colors.marker),
                );

                // Hover-colour layer over every marker.
                let overlay: PlotPoints = markers.iter().copied().collect();
                plot_ui.points(
                    Points::new(overlay)
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(cfg.hover_radius)
                        .color(colors.hover),
                );

                if let Some(&p) = hovered.and_then(|i| markers.get(i)) {
                    plot_ui.points(
                        Points::new(vec![p])
                            .shape(MarkerShape::Circle)
                            .filled(true)
                            .radius(cfg.marker_radius * 2.0)
                            .color(colors.hover_highlight),
                    );
                }

                // Nearest marker under the pointer, in screen space.
                let pointer = plot_ui.pointer_coordinate()?;
                let pointer_screen = plot_ui.screen_from_plot(pointer);
                markers
                    .iter()
                    .enumerate()
                    .map(|(i, p)| {
                        let screen = plot_ui.screen_from_plot(PlotPoint::new(p[0], p[1]));
                        (i, screen.distance(pointer_screen))
                    })
                    .filter(|(_, d)| *d <= HIT_RADIUS)
                    .min_by(|a, b| a.1.total_cmp(&b.1))
                    .map(|(i, _)| (i, pointer_screen))
            })
    });

    let hit = response.inner.inner;
    let binder = &mut state.binder;
    match hit {
        Some((index, pointer)) => {
            binder.on_hover(index);
            binder.set_tooltip_anchor(pointer + egui::vec2(12.0, 12.0));
        }
        None => binder.on_hover_end(),
    }

    if let Some((index, anchor, opacity)) = binder.tooltip() {
        if let Some(record) = controller.hovered_record(index) {
            let text = tooltip_text(record, &cfg.unit_label);
            egui::Area::new(egui::Id::new("value_tooltip"))
                .order(egui::Order::Tooltip)
                .fixed_pos(anchor)
                .interactable(false)
                .show(ui.ctx(), |ui: &mut Ui| {
                    ui.multiply_opacity(opacity);
                    egui::Frame::popup(ui.style()).show(ui, |ui: &mut Ui| {
                        ui.set_max_width(430.0);
                        ui.label(text);
                    });
                });
        }
    }

    if binder.is_animating() {
        ui.ctx().request_repaint();
    }
}

/// Tooltip body for a hovered record.
pub fn tooltip_text(record: &Record, unit: &str) -> String {
    format!("Energy Consumption from Fossil Fuels: {} {unit}", record.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartConfig;
    use crate::data::domain::AxisDomain;

    fn y_binding(upper: f64) -> AxisBinding {
        AxisBinding {
            axis: Axis::Y,
            domain: AxisDomain::new(0.0, upper),
            ticks: TickFormat::Auto,
            duration: Duration::from_secs(1),
        }
    }

    fn binder() -> PlotBinder {
        PlotBinder::new(Ease::Linear, Duration::from_millis(200))
    }

    #[test]
    fn first_binding_snaps() {
        let mut b = binder();
        b.tick(5.0);
        b.bind_axis(y_binding(800.0));
        b.bind_line(&[[1965.0, 10.0]], Duration::from_secs(1));

        assert_eq!(b.axis_range(Axis::Y), Some([0.0, 800.0]));
        assert_eq!(b.line_points(), vec![[1965.0, 10.0]]);
        assert!(!b.is_animating());
        assert_eq!(b.axis_range(Axis::X), None);
    }

    #[test]
    fn later_bindings_animate_and_latest_wins() {
        let mut b = binder();
        b.bind_axis(y_binding(800.0));

        b.tick(1.0);
        b.bind_axis(y_binding(2000.0));
        b.tick(1.5);
        assert_eq!(b.axis_range(Axis::Y), Some([0.0, 1400.0]));
        assert!(b.is_animating());

        // Superseded mid-flight: restart from 1400 toward 60.
        b.bind_axis(y_binding(60.0));
        assert_eq!(b.axis_range(Axis::Y), Some([0.0, 1400.0]));
        b.tick(2.5);
        assert_eq!(b.axis_range(Axis::Y), Some([0.0, 60.0]));
        assert!(!b.is_animating());
    }

    #[test]
    fn tooltip_fades_after_hover_ends() {
        let mut b = binder();
        b.bind_points(&[[1965.0, 1.0], [1966.0, 2.0]], Duration::ZERO);

        b.tick(10.0);
        b.on_hover(1);
        assert_eq!(b.hovered(), Some(1));
        assert_eq!(b.tooltip().map(|t| (t.0, t.2)), Some((1, 1.0)));

        b.on_hover_end();
        assert_eq!(b.hovered(), None);
        b.tick(10.1);
        let (index, _, opacity) = b.tooltip().unwrap();
        assert_eq!(index, 1);
        assert!(opacity > 0.0 && opacity < 1.0);

        b.tick(10.5);
        assert!(b.tooltip().is_none());
    }

    #[test]
    fn shrinking_series_drops_stale_hover() {
        let mut b = binder();
        b.bind_points(&[[1965.0, 1.0], [1966.0, 2.0], [1967.0, 3.0]], Duration::ZERO);
        b.on_hover(2);
        b.bind_points(&[[1965.0, 1.0]], Duration::ZERO);
        assert_eq!(b.hovered(), None);
    }

    #[test]
    fn x_axis_keeps_plain_ticks() {
        let mut b = binder();
        b.bind_axis(AxisBinding {
            axis: Axis::X,
            domain: AxisDomain::new(1965.0, 2022.0),
            ticks: TickFormat::Plain,
            duration: Duration::from_secs(1),
        });
        assert_eq!(b.ticks(Axis::X), TickFormat::Plain);
        assert_eq!(b.ticks(Axis::Y), TickFormat::Auto);
    }

    #[test]
    fn tooltip_names_value_and_unit() {
        let unit = ChartConfig::default().unit_label;
        let record = Record::new("Africa", 1965, 734.25);
        assert_eq!(
            tooltip_text(&record, &unit),
            "Energy Consumption from Fossil Fuels: 734.25 terawatt-hours"
        );
        let whole = Record::new("Africa", 1966, 53.0);
        assert_eq!(
            tooltip_text(&whole, &unit),
            "Energy Consumption from Fossil Fuels: 53 terawatt-hours"
        );
    }
}
