//! Tabular view of the rows around the scrub position
//!
//! The table keeps only a center index; rows are recomputed from the
//! charts' live series every time a model is built, so a day switch shows
//! fresh data without any publish traffic.

use std::sync::Arc;

use egui::Color32;
use parking_lot::RwLock;

use ts_core::{ControlUpdate, Frame, UpdateSubscriber};
use ts_data::ColumnStats;

use crate::chart::ChartView;

const DEFAULT_VISIBLE_ROWS: usize = 10;
const FALLBACK_GRAY: Color32 = Color32::from_rgb(100, 100, 100);
const GRADIENT_UP: Color32 = Color32::from_rgb(50, 200, 100);
const GRADIENT_DOWN: Color32 = Color32::from_rgb(200, 50, 50);

#[derive(Debug)]
struct TableState {
    frame: Frame,
    visible_rows: usize,
    center: Option<usize>,
    measured: Option<(f32, f32)>,
}

/// A windowed numeric table over the charts' columns.
///
/// One column per chart, rows centered on the last scalar update. The
/// chart list is owned by the wiring layer and replaced on rewire.
pub struct TableView {
    state: RwLock<TableState>,
    charts: RwLock<Vec<Arc<ChartView>>>,
}

impl TableView {
    pub fn new(frame: Frame, visible_rows: usize) -> Self {
        Self {
            state: RwLock::new(TableState {
                frame,
                visible_rows: visible_rows.max(1),
                center: None,
                measured: None,
            }),
            charts: RwLock::new(Vec::new()),
        }
    }

    pub fn with_default_rows(frame: Frame) -> Self {
        Self::new(frame, DEFAULT_VISIBLE_ROWS)
    }

    pub fn visible_rows(&self) -> usize {
        self.state.read().visible_rows
    }

    pub fn frame(&self) -> Frame {
        self.state.read().frame
    }

    pub fn center(&self) -> Option<usize> {
        self.state.read().center
    }

    /// Replace the chart list, called from the wiring layer.
    pub fn set_charts(&self, charts: Vec<Arc<ChartView>>) {
        *self.charts.write() = charts;
    }

    pub fn update_position(&self, dx: f32, dy: f32) {
        self.state.write().frame.translate(dx, dy);
    }

    /// Record the rect the widget actually drew, for hit testing.
    pub fn set_measured_size(&self, width: f32, height: f32) {
        self.state.write().measured = Some((width, height));
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        let state = self.state.read();
        let (width, height) = state
            .measured
            .unwrap_or((state.frame.width, state.frame.height));
        x >= state.frame.x
            && x <= state.frame.x + width
            && y >= state.frame.y
            && y <= state.frame.y + height
    }

    /// Build the drawable model from the charts' current series.
    pub fn model(&self) -> TableModel {
        let state = self.state.read();
        let charts = self.charts.read();

        let mut model = TableModel {
            frame: state.frame,
            headers: Vec::new(),
            rows: Vec::new(),
            highlighted: None,
        };
        let Some(anchor) = charts.first() else {
            return model;
        };

        for chart in charts.iter() {
            model.headers.push(ColumnHeader {
                name: chart.config().column.clone(),
                color: chart.config().color,
            });
        }

        // Rows and the window anchor to the first chart's series.
        let anchor_series = anchor.series();
        let len = anchor_series.len();
        let (start, end) = visible_window(state.center, state.visible_rows, len);

        let series: Vec<_> = charts.iter().map(|chart| chart.series()).collect();
        let stats: Vec<Option<ColumnStats>> = charts
            .iter()
            .zip(&series)
            .map(|(chart, series)| {
                series
                    .column(&chart.config().column)
                    .and_then(|values| ColumnStats::over(values, start, end.saturating_sub(1)))
            })
            .collect();

        for idx in start..end {
            let mut cells = Vec::new();
            for ((chart, series), stats) in charts.iter().zip(&series).zip(&stats) {
                let value = series.value(&chart.config().column, idx);
                cells.push(make_cell(value, stats.as_ref()));
            }
            model.rows.push(TableRow {
                index: idx,
                time_label: anchor_series
                    .timestamp(idx)
                    .map(time_label)
                    .unwrap_or_default(),
                cells,
            });
        }

        model.highlighted = state
            .center
            .filter(|center| (start..end).contains(center))
            .map(|center| center - start);
        model
    }
}

impl UpdateSubscriber for TableView {
    fn on_update(&self, update: ControlUpdate) -> anyhow::Result<()> {
        match update {
            ControlUpdate::Point(value) => {
                self.state.write().center = Some(value.floor().max(0.0) as usize);
            }
            ControlUpdate::Range { .. } => {
                tracing::trace!("table ignoring range update");
            }
        }
        Ok(())
    }
}

/// Drawable table contents for one frame.
#[derive(Debug, Clone)]
pub struct TableModel {
    pub frame: Frame,
    pub headers: Vec<ColumnHeader>,
    pub rows: Vec<TableRow>,
    /// Position within `rows` of the scrubbed row, when visible.
    pub highlighted: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct ColumnHeader {
    pub name: String,
    pub color: Color32,
}

#[derive(Debug, Clone)]
pub struct TableRow {
    pub index: usize,
    pub time_label: String,
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    pub label: String,
    pub fill: Color32,
}

/// Centered window of `visible_rows` indices, clamped into `0..len`.
/// Returns `(start, end)` with an exclusive end.
fn visible_window(center: Option<usize>, visible_rows: usize, len: usize) -> (usize, usize) {
    if len <= visible_rows {
        return (0, len);
    }
    let center = center.unwrap_or(0);
    let start = center
        .saturating_sub(visible_rows / 2)
        .min(len - visible_rows);
    (start, start + visible_rows)
}

fn make_cell(value: Option<f64>, stats: Option<&ColumnStats>) -> TableCell {
    match value {
        Some(value) if value.is_finite() => TableCell {
            label: format!("{value:.2}"),
            fill: match stats {
                Some(stats) => gradient_fill(value, stats),
                None => FALLBACK_GRAY,
            },
        },
        _ => TableCell {
            label: "-".to_string(),
            fill: FALLBACK_GRAY,
        },
    }
}

/// White at the window mean, saturating toward green at the high and red
/// at the low. Flat halves fall back to white.
fn gradient_fill(value: f64, stats: &ColumnStats) -> Color32 {
    if value >= stats.mean {
        let reach = stats.high - stats.mean;
        if reach <= 0.0 {
            return Color32::WHITE;
        }
        let t = ((value - stats.mean) / reach).clamp(0.0, 1.0) as f32;
        lerp_color(Color32::WHITE, GRADIENT_UP, t)
    } else {
        let reach = stats.mean - stats.low;
        if reach <= 0.0 {
            return Color32::WHITE;
        }
        let t = ((value - stats.low) / reach).clamp(0.0, 1.0) as f32;
        lerp_color(GRADIENT_DOWN, Color32::WHITE, t)
    }
}

fn lerp_color(from: Color32, to: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let channel = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;
    Color32::from_rgb(
        channel(from.r(), to.r()),
        channel(from.g(), to.g()),
        channel(from.b(), to.b()),
    )
}

fn time_label(ts: i64) -> String {
    if (0..86_400).contains(&ts) {
        format!("{:02}:{:02}:{:02}", ts / 3600, (ts % 3600) / 60, ts % 60)
    } else {
        chrono::DateTime::from_timestamp(ts, 0)
            .map(|dt| dt.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| ts.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartConfig;
    use indexmap::IndexMap;
    use ts_data::Series;

    fn chart_with_values(values: &[f64]) -> Arc<ChartView> {
        let timestamps: Vec<i64> = (0..values.len() as i64).map(|i| 34_200 + i * 60).collect();
        let mut columns = IndexMap::new();
        columns.insert("price".to_string(), values.to_vec());
        let series = Arc::new(Series::new(timestamps, columns).unwrap());
        Arc::new(ChartView::new(
            Frame::new(0.0, 0.0, 400.0, 200.0),
            ChartConfig::default(),
            series,
        ))
    }

    fn table_over(chart: &Arc<ChartView>, visible_rows: usize) -> TableView {
        let table = TableView::new(Frame::new(500.0, 0.0, 200.0, 180.0), visible_rows);
        table.set_charts(vec![Arc::clone(chart)]);
        table
    }

    #[test]
    fn test_window_centers_on_the_scrub_index() {
        let values: Vec<f64> = (0..500).map(|i| i as f64).collect();
        let chart = chart_with_values(&values);
        let table = table_over(&chart, 10);

        table.on_update(ControlUpdate::Point(495.0)).unwrap();
        let model = table.model();

        let indices: Vec<usize> = model.rows.iter().map(|row| row.index).collect();
        assert_eq!(indices, (490..500).collect::<Vec<_>>());
        assert_eq!(model.highlighted, Some(5));
    }

    #[test]
    fn test_window_clamps_at_the_front() {
        let values: Vec<f64> = (0..500).map(|i| i as f64).collect();
        let chart = chart_with_values(&values);
        let table = table_over(&chart, 10);

        table.on_update(ControlUpdate::Point(2.0)).unwrap();
        let model = table.model();

        let indices: Vec<usize> = model.rows.iter().map(|row| row.index).collect();
        assert_eq!(indices, (0..10).collect::<Vec<_>>());
        assert_eq!(model.highlighted, Some(2));
    }

    #[test]
    fn test_short_series_shows_every_row() {
        let chart = chart_with_values(&[1.0, 2.0, 3.0]);
        let table = table_over(&chart, 10);

        let model = table.model();
        assert_eq!(model.rows.len(), 3);
        assert_eq!(model.highlighted, None);
    }

    #[test]
    fn test_gradient_endpoints_and_midpoint() {
        // Window stats over 0..=10: low 0, mean 5, high 10.
        let values: Vec<f64> = (0..=10).map(|i| i as f64).collect();
        let chart = chart_with_values(&values);
        let table = table_over(&chart, 11);
        let model = table.model();

        assert_eq!(model.rows[10].cells[0].fill, GRADIENT_UP);
        assert_eq!(model.rows[0].cells[0].fill, GRADIENT_DOWN);
        assert_eq!(model.rows[5].cells[0].fill, Color32::WHITE);
    }

    #[test]
    fn test_nan_cells_fall_back_to_gray() {
        let chart = chart_with_values(&[1.0, f64::NAN, 3.0]);
        let table = table_over(&chart, 10);
        let model = table.model();

        assert_eq!(model.rows[1].cells[0].label, "-");
        assert_eq!(model.rows[1].cells[0].fill, FALLBACK_GRAY);
        assert_ne!(model.rows[0].cells[0].fill, FALLBACK_GRAY);
    }

    #[test]
    fn test_flat_column_renders_white_not_gray() {
        let chart = chart_with_values(&[5.0, 5.0, 5.0]);
        let table = table_over(&chart, 10);
        let model = table.model();

        for row in &model.rows {
            assert_eq!(row.cells[0].fill, Color32::WHITE);
        }
    }

    #[test]
    fn test_range_updates_are_ignored() {
        let chart = chart_with_values(&[1.0, 2.0, 3.0]);
        let table = table_over(&chart, 10);

        table
            .on_update(ControlUpdate::Range {
                start: 0.0,
                end: 2.0,
            })
            .unwrap();
        assert_eq!(table.center(), None);
    }

    #[test]
    fn test_day_switch_shows_fresh_rows_without_updates() {
        let chart = chart_with_values(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let table = table_over(&chart, 10);
        assert_eq!(table.model().rows.len(), 5);

        // Swap the chart's series; the very next model reflects it.
        let mut columns = IndexMap::new();
        columns.insert("price".to_string(), vec![9.0, 8.0]);
        let fresh = Arc::new(Series::new(vec![0, 60], columns).unwrap());
        chart.switch_series(fresh);

        let model = table.model();
        assert_eq!(model.rows.len(), 2);
        assert_eq!(model.rows[0].cells[0].label, "9.00");
    }

    #[test]
    fn test_empty_chart_list_yields_empty_model() {
        let table = TableView::new(Frame::new(0.0, 0.0, 100.0, 100.0), 10);
        let model = table.model();
        assert!(model.headers.is_empty());
        assert!(model.rows.is_empty());
    }

    #[test]
    fn test_time_labels_format_seconds_of_day() {
        let chart = chart_with_values(&[1.0]);
        let table = table_over(&chart, 10);
        // First timestamp is 34200s = 09:30:00.
        assert_eq!(table.model().rows[0].time_label, "09:30:00");
    }
}
