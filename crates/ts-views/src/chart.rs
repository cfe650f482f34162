//! Chart viewport state machine
//!
//! A viewport owns a display window into its series plus an optional
//! highlight, consumes scalar and range updates, and re-publishes the
//! clamped window for dependents scoped to the visible range. Rendering
//! is split out into a pure model so the geometry is testable without a
//! UI.

use std::sync::Arc;

use egui::Color32;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use ts_core::{ControlUpdate, Frame, Publisher, UpdateSubscriber};
use ts_data::{resample, ColumnStats, Series, SignalKind};

const SIZE_STEP: f32 = 0.2;
const MIN_SIZE: f32 = 0.4;
const MAX_SIZE: f32 = 4.0;

const UP_COLOR: Color32 = Color32::from_rgb(50, 200, 100);
const DOWN_COLOR: Color32 = Color32::from_rgb(200, 50, 50);

/// How the visible window is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartMode {
    Line,
    Candles,
    Bars,
}

/// Static per-chart options, baked in when the layout is built.
#[derive(Debug, Clone)]
pub struct ChartConfig {
    /// File name looked up inside the active day directory.
    pub file: String,
    /// Column of that file this chart draws.
    pub column: String,
    pub mode: ChartMode,
    /// Color segments by gain/loss against the previous row.
    pub profit_coloring: bool,
    /// Column carrying trade signal codes, if any.
    pub signal_column: Option<String>,
    /// Candle bucket width in seconds.
    pub bucket_secs: i64,
    pub color: Color32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            file: "prices.csv".to_string(),
            column: "price".to_string(),
            mode: ChartMode::Line,
            profit_coloring: false,
            signal_column: None,
            bucket_secs: 300,
            color: Color32::from_rgb(100, 150, 250),
        }
    }
}

#[derive(Debug)]
struct ChartState {
    frame: Frame,
    base_width: f32,
    base_height: f32,
    size_multiplier: f32,
    series: Arc<Series>,
    window: (usize, usize),
    highlight: Option<usize>,
}

/// A chart viewport over one column of one series.
///
/// The state lock is always released before re-publishing, so a delivery
/// chain may re-enter a different method of this viewport.
pub struct ChartView {
    config: ChartConfig,
    state: RwLock<ChartState>,
    publisher: Publisher,
}

impl ChartView {
    pub fn new(frame: Frame, config: ChartConfig, series: Arc<Series>) -> Self {
        let config = ChartConfig {
            bucket_secs: config.bucket_secs.max(1),
            ..config
        };
        let window = (0, series.last_index());
        Self {
            config,
            state: RwLock::new(ChartState {
                frame,
                base_width: frame.width,
                base_height: frame.height,
                size_multiplier: 1.0,
                series,
                window,
                highlight: None,
            }),
            publisher: Publisher::new(),
        }
    }

    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn frame(&self) -> Frame {
        self.state.read().frame
    }

    pub fn window(&self) -> (usize, usize) {
        self.state.read().window
    }

    pub fn highlight(&self) -> Option<usize> {
        self.state.read().highlight
    }

    pub fn series(&self) -> Arc<Series> {
        Arc::clone(&self.state.read().series)
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.state.read().frame.contains(x, y)
    }

    pub fn update_position(&self, dx: f32, dy: f32) {
        self.state.write().frame.translate(dx, dy);
    }

    pub fn grow(&self) {
        self.scale(SIZE_STEP);
    }

    pub fn shrink(&self) {
        self.scale(-SIZE_STEP);
    }

    fn scale(&self, step: f32) {
        let mut state = self.state.write();
        state.size_multiplier = (state.size_multiplier + step).clamp(MIN_SIZE, MAX_SIZE);
        state.frame.width = state.base_width * state.size_multiplier;
        state.frame.height = state.base_height * state.size_multiplier;
    }

    /// Clamp an incoming span into the series and adopt it as the display
    /// window, then re-publish the clamped window.
    pub fn apply_range(&self, start: f64, end: f64) {
        let mut state = self.state.write();
        let last = state.series.last_index();
        let start_idx = (start.floor().max(0.0) as usize).min(last);
        let end_idx = (end.floor().max(0.0) as usize).min(last);
        let window = if start_idx <= end_idx {
            (start_idx, end_idx)
        } else {
            (end_idx, start_idx)
        };
        state.window = window;
        drop(state);
        self.publisher.publish(ControlUpdate::Range {
            start: window.0 as f64,
            end: window.1 as f64,
        });
    }

    /// Clamp an incoming scalar into the display window and highlight the
    /// row it lands on.
    pub fn apply_point(&self, value: f64) {
        let mut state = self.state.write();
        let (start, end) = state.window;
        let idx = (value.floor().max(0.0) as usize).clamp(start, end);
        state.highlight = Some(idx);
    }

    /// Atomically reset to a new day of data: full window, no highlight.
    /// Publishes nothing, so a fresh day never starts with a phantom
    /// highlight.
    pub fn switch_series(&self, series: Arc<Series>) {
        let mut state = self.state.write();
        state.window = (0, series.last_index());
        state.highlight = None;
        state.series = series;
    }

    /// Pure geometry for the widget layer. All coordinates are fractions
    /// of the frame: x runs left to right across the window, y runs from
    /// the window low (0.0) to the window high (1.0).
    pub fn render_model(&self) -> ChartRenderModel {
        let state = self.state.read();
        let (start, end) = state.window;
        let highlight = state
            .highlight
            .filter(|idx| (start..=end).contains(idx))
            .map(|idx| x_fraction(idx, start, end));

        let Some(values) = state.series.column(&self.config.column) else {
            tracing::trace!("column {} missing from series", self.config.column);
            return ChartRenderModel {
                frame: state.frame,
                title: self.config.column.clone(),
                color: self.config.color,
                window: state.window,
                ticks: Vec::new(),
                geometry: ChartGeometry::Empty,
                signals: Vec::new(),
                highlight,
            };
        };

        let (geometry, stats) = match self.config.mode {
            ChartMode::Candles => self.candle_geometry(&state, values),
            ChartMode::Line => self.line_geometry(&state, values),
            ChartMode::Bars => self.bar_geometry(&state, values),
        };

        let ticks = match &stats {
            Some(stats) => make_ticks(stats, state.size_multiplier),
            None => Vec::new(),
        };
        let signals = self.signal_markers(&state, values, stats.as_ref());

        ChartRenderModel {
            frame: state.frame,
            title: self.config.column.clone(),
            color: self.config.color,
            window: state.window,
            ticks,
            geometry,
            signals,
            highlight,
        }
    }

    fn line_geometry(
        &self,
        state: &ChartState,
        values: &[f64],
    ) -> (ChartGeometry, Option<ColumnStats>) {
        let (start, end) = state.window;
        let Some(stats) = ColumnStats::over(values, start, end) else {
            return (ChartGeometry::Empty, None);
        };
        let mut segments = Vec::new();
        for idx in (start + 1)..=end {
            let prev = values[idx - 1];
            let curr = values[idx];
            if !prev.is_finite() || !curr.is_finite() {
                continue;
            }
            let color = if self.config.profit_coloring {
                if curr >= prev {
                    UP_COLOR
                } else {
                    DOWN_COLOR
                }
            } else {
                self.config.color
            };
            segments.push(Segment {
                x0: x_fraction(idx - 1, start, end),
                y0: normalize(prev, &stats),
                x1: x_fraction(idx, start, end),
                y1: normalize(curr, &stats),
                color,
            });
        }
        (ChartGeometry::Line(segments), Some(stats))
    }

    fn bar_geometry(
        &self,
        state: &ChartState,
        values: &[f64],
    ) -> (ChartGeometry, Option<ColumnStats>) {
        let (start, end) = state.window;
        let Some(stats) = ColumnStats::over(values, start, end) else {
            return (ChartGeometry::Empty, None);
        };
        let count = end - start + 1;
        let slot = 1.0 / count as f32;
        let mut bars = Vec::new();
        for idx in start..=end {
            let value = values[idx];
            if !value.is_finite() {
                continue;
            }
            let color = if self.config.profit_coloring && idx > start && values[idx - 1].is_finite()
            {
                if value >= values[idx - 1] {
                    UP_COLOR
                } else {
                    DOWN_COLOR
                }
            } else {
                self.config.color
            };
            bars.push(BarShape {
                x: (idx - start) as f32 * slot + slot / 2.0,
                width: slot * 0.8,
                height: normalize(value, &stats),
                color,
            });
        }
        (ChartGeometry::Bars(bars), Some(stats))
    }

    fn candle_geometry(
        &self,
        state: &ChartState,
        values: &[f64],
    ) -> (ChartGeometry, Option<ColumnStats>) {
        let (start, end) = state.window;
        let timestamps = &state.series.timestamps()[start..=end];
        let window_values = &values[start..=end];
        let candles = resample(timestamps, window_values, self.config.bucket_secs)
            .unwrap_or_default();
        if candles.is_empty() {
            return (ChartGeometry::Empty, None);
        }

        let mut low = f64::INFINITY;
        let mut high = f64::NEG_INFINITY;
        for candle in &candles {
            low = low.min(candle.low);
            high = high.max(candle.high);
        }
        let mean = (low + high) / 2.0;
        let stats = ColumnStats { low, high, mean };

        let slot = 1.0 / candles.len() as f32;
        let shapes = candles
            .iter()
            .enumerate()
            .map(|(pos, candle)| {
                let (body_top, body_bottom) = if candle.is_up() {
                    (normalize(candle.close, &stats), normalize(candle.open, &stats))
                } else {
                    (normalize(candle.open, &stats), normalize(candle.close, &stats))
                };
                CandleShape {
                    x: pos as f32 * slot + slot / 2.0,
                    width: slot * 0.8,
                    body_top,
                    body_bottom,
                    wick_top: normalize(candle.high, &stats),
                    wick_bottom: normalize(candle.low, &stats),
                    color: if candle.is_up() { UP_COLOR } else { DOWN_COLOR },
                }
            })
            .collect();
        (ChartGeometry::Candles(shapes), Some(stats))
    }

    fn signal_markers(
        &self,
        state: &ChartState,
        values: &[f64],
        stats: Option<&ColumnStats>,
    ) -> Vec<SignalMarker> {
        let Some(name) = self.config.signal_column.as_deref() else {
            return Vec::new();
        };
        let Some(signals) = state.series.column(name) else {
            tracing::trace!("signal column {name} missing from series");
            return Vec::new();
        };
        let (start, end) = state.window;
        let mut markers = Vec::new();
        for idx in start..=end.min(signals.len().saturating_sub(1)) {
            let Some(kind) = SignalKind::from_value(signals[idx]) else {
                continue;
            };
            let y = match (stats, values.get(idx)) {
                (Some(stats), Some(value)) if value.is_finite() => normalize(*value, stats),
                _ => 0.5,
            };
            markers.push(SignalMarker {
                x: x_fraction(idx, start, end),
                y,
                color: signal_color(kind),
                kind,
            });
        }
        markers
    }
}

impl UpdateSubscriber for ChartView {
    fn on_update(&self, update: ControlUpdate) -> anyhow::Result<()> {
        match update {
            ControlUpdate::Point(value) => self.apply_point(value),
            ControlUpdate::Range { start, end } => self.apply_range(start, end),
        }
        Ok(())
    }
}

/// Everything the widget layer needs to draw one frame of a chart.
#[derive(Debug, Clone)]
pub struct ChartRenderModel {
    pub frame: Frame,
    pub title: String,
    pub color: Color32,
    pub window: (usize, usize),
    pub ticks: Vec<Tick>,
    pub geometry: ChartGeometry,
    pub signals: Vec<SignalMarker>,
    /// Window-relative x of the highlight rule, when inside the window.
    pub highlight: Option<f32>,
}

/// One y-axis tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub fraction: f32,
    pub label: String,
}

#[derive(Debug, Clone)]
pub enum ChartGeometry {
    Line(Vec<Segment>),
    Candles(Vec<CandleShape>),
    Bars(Vec<BarShape>),
    /// The window holds nothing drawable.
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub color: Color32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandleShape {
    pub x: f32,
    pub width: f32,
    pub body_top: f32,
    pub body_bottom: f32,
    pub wick_top: f32,
    pub wick_bottom: f32,
    pub color: Color32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarShape {
    pub x: f32,
    pub width: f32,
    pub height: f32,
    pub color: Color32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalMarker {
    pub x: f32,
    pub y: f32,
    pub color: Color32,
    pub kind: SignalKind,
}

/// Marker colors for trade signals.
pub fn signal_color(kind: SignalKind) -> Color32 {
    match kind {
        SignalKind::EnterLong => Color32::from_rgb(0, 255, 50),
        SignalKind::ExitLong => Color32::from_rgb(255, 255, 0),
        SignalKind::EnterShort => Color32::from_rgb(255, 50, 0),
        SignalKind::ExitShort => Color32::WHITE,
    }
}

/// Fraction of the window width index `idx` sits at. A single-row window
/// centers its one point.
fn x_fraction(idx: usize, start: usize, end: usize) -> f32 {
    if end <= start {
        return 0.5;
    }
    (idx - start) as f32 / (end - start) as f32
}

/// Normalize a value into the window's vertical extent; a flat window maps
/// everything to mid-height.
fn normalize(value: f64, stats: &ColumnStats) -> f32 {
    if stats.is_flat() {
        return 0.5;
    }
    (((value - stats.low) / (stats.high - stats.low)).clamp(0.0, 1.0)) as f32
}

fn make_ticks(stats: &ColumnStats, size_multiplier: f32) -> Vec<Tick> {
    if stats.is_flat() {
        return vec![Tick {
            fraction: 0.5,
            label: format!("{:.2}", stats.low),
        }];
    }
    let count = ((5.0 * size_multiplier).round() as usize).clamp(3, 7);
    (0..count)
        .map(|step| {
            let fraction = step as f32 / (count - 1) as f32;
            let value = stats.low + f64::from(fraction) * (stats.high - stats.low);
            Tick {
                fraction,
                label: format!("{value:.2}"),
            }
        })
        .collect()
}
