//! Layout persistence and wiring
//!
//! Elements serialize to an ordered list of tagged records. The tag set
//! is closed: an unknown `type` in a saved layout fails deserialization
//! instead of silently dropping the element. Restoring always ends with a
//! full rewire so saved layouts and fresh sessions share one wiring path.

use std::sync::Arc;

use anyhow::{bail, Context};
use egui::Color32;
use serde::{Deserialize, Serialize};

use ts_core::{Frame, RangeSlider, Slider};
use ts_data::Series;

use crate::chart::{ChartConfig, ChartMode, ChartView};
use crate::table::TableView;

/// Controls keep a fixed track height; only their width is saved.
const CONTROL_HEIGHT: f32 = 20.0;

/// One saved element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ElementRecord {
    Slider {
        x: f32,
        y: f32,
        width: f32,
        min_value: f64,
        max_value: f64,
        current_value: f64,
    },
    RangeSlider {
        x: f32,
        y: f32,
        width: f32,
        min_value: f64,
        max_value: f64,
        start_value: f64,
        end_value: f64,
    },
    Chart {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        file: String,
        column: String,
        mode: ChartMode,
        profit_coloring: bool,
        signal_column: Option<String>,
        bucket_secs: i64,
        color: [u8; 3],
    },
    Table {
        x: f32,
        y: f32,
        visible_rows: usize,
    },
    DaySwitch {
        x: f32,
        y: f32,
        current_day: u32,
    },
}

/// A saved canvas, in element order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDoc {
    pub elements: Vec<ElementRecord>,
}

/// Elements rebuilt from a saved layout, wired and ready.
pub struct RestoredLayout {
    pub slider: Arc<Slider>,
    pub range: Arc<RangeSlider>,
    pub charts: Vec<Arc<ChartView>>,
    pub table: Arc<TableView>,
    pub day_switch: Option<(Frame, u32)>,
}

/// Snapshot the live elements into a document.
pub fn capture(
    slider: &Slider,
    range: &RangeSlider,
    charts: &[Arc<ChartView>],
    table: &TableView,
    day_switch: Option<(Frame, u32)>,
) -> LayoutDoc {
    let mut elements = Vec::new();

    let snap = slider.snapshot();
    elements.push(ElementRecord::Slider {
        x: snap.frame.x,
        y: snap.frame.y,
        width: snap.frame.width,
        min_value: snap.min_value,
        max_value: snap.max_value,
        current_value: snap.current_value,
    });

    let snap = range.snapshot();
    elements.push(ElementRecord::RangeSlider {
        x: snap.frame.x,
        y: snap.frame.y,
        width: snap.frame.width,
        min_value: snap.min_value,
        max_value: snap.max_value,
        start_value: snap.start_value,
        end_value: snap.end_value,
    });

    for chart in charts {
        let frame = chart.frame();
        let config = chart.config();
        let color = config.color;
        elements.push(ElementRecord::Chart {
            x: frame.x,
            y: frame.y,
            width: frame.width,
            height: frame.height,
            file: config.file.clone(),
            column: config.column.clone(),
            mode: config.mode,
            profit_coloring: config.profit_coloring,
            signal_column: config.signal_column.clone(),
            bucket_secs: config.bucket_secs,
            color: [color.r(), color.g(), color.b()],
        });
    }

    let frame = table.frame();
    elements.push(ElementRecord::Table {
        x: frame.x,
        y: frame.y,
        visible_rows: table.visible_rows(),
    });

    if let Some((frame, current_day)) = day_switch {
        elements.push(ElementRecord::DaySwitch {
            x: frame.x,
            y: frame.y,
            current_day,
        });
    }

    LayoutDoc { elements }
}

/// Rebuild elements from a document and wire them.
///
/// `load_series` resolves a chart's day file name to data. Charts whose
/// file no longer loads are skipped with a warning; a canvas missing its
/// controls or every chart is unusable, so malformed control records and
/// chart-less documents fail fast instead.
pub fn restore(
    doc: &LayoutDoc,
    load_series: &dyn Fn(&str) -> Option<Arc<Series>>,
) -> anyhow::Result<RestoredLayout> {
    let mut slider = None;
    let mut range = None;
    let mut charts = Vec::new();
    let mut table = None;
    let mut day_switch = None;

    for record in &doc.elements {
        match record {
            ElementRecord::Slider {
                x,
                y,
                width,
                min_value,
                max_value,
                current_value,
            } => {
                let built = Slider::new(
                    Frame::new(*x, *y, *width, CONTROL_HEIGHT),
                    *min_value,
                    *max_value,
                    *current_value,
                )
                .context("restoring scrub control")?;
                slider = Some(Arc::new(built));
            }
            ElementRecord::RangeSlider {
                x,
                y,
                width,
                min_value,
                max_value,
                start_value,
                end_value,
            } => {
                let built = RangeSlider::with_span(
                    Frame::new(*x, *y, *width, CONTROL_HEIGHT),
                    *min_value,
                    *max_value,
                    *start_value,
                    *end_value,
                )
                .context("restoring range control")?;
                range = Some(Arc::new(built));
            }
            ElementRecord::Chart {
                x,
                y,
                width,
                height,
                file,
                column,
                mode,
                profit_coloring,
                signal_column,
                bucket_secs,
                color,
            } => {
                let config = ChartConfig {
                    file: file.clone(),
                    column: column.clone(),
                    mode: *mode,
                    profit_coloring: *profit_coloring,
                    signal_column: signal_column.clone(),
                    bucket_secs: *bucket_secs,
                    color: Color32::from_rgb(color[0], color[1], color[2]),
                };
                let Some(series) = load_series(file) else {
                    tracing::warn!("skipping saved chart, cannot load {file}");
                    continue;
                };
                charts.push(Arc::new(ChartView::new(
                    Frame::new(*x, *y, *width, *height),
                    config,
                    series,
                )));
            }
            ElementRecord::Table { x, y, visible_rows } => {
                table = Some(Arc::new(TableView::new(
                    Frame::new(*x, *y, 0.0, 0.0),
                    *visible_rows,
                )));
            }
            ElementRecord::DaySwitch { x, y, current_day } => {
                day_switch = Some((Frame::new(*x, *y, 0.0, 0.0), *current_day));
            }
        }
    }

    let Some(slider) = slider else {
        bail!("layout has no scrub control");
    };
    let Some(range) = range else {
        bail!("layout has no range control");
    };
    let Some(table) = table else {
        bail!("layout has no table");
    };
    if charts.is_empty() {
        bail!("layout has no charts");
    }

    rewire(&slider, &range, &charts, &table);

    Ok(RestoredLayout {
        slider,
        range,
        charts,
        table,
        day_switch,
    })
}

/// Re-create the construction-time subscription edges from scratch.
///
/// Order matters and matches a fresh session exactly: the table first,
/// then each chart on the scrub control; each chart on the range control;
/// the first chart's re-publication onto the scrub control for
/// window-scoped bounds. Existing edges are dropped first, so rewiring is
/// idempotent.
pub fn rewire(
    slider: &Arc<Slider>,
    range: &Arc<RangeSlider>,
    charts: &[Arc<ChartView>],
    table: &Arc<TableView>,
) {
    slider.publisher().clear();
    range.publisher().clear();
    for chart in charts {
        chart.publisher().clear();
    }

    slider.publisher().subscribe(table);
    for chart in charts {
        slider.publisher().subscribe(chart);
        range.publisher().subscribe(chart);
    }
    if let Some(first) = charts.first() {
        first.publisher().subscribe(slider);
    }
    table.set_charts(charts.to_vec());
}
