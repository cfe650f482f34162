//! Painter for chart viewports
//!
//! The render model uses fraction coordinates, x left-to-right across the
//! visible window and y bottom-to-top across the value extent. Everything
//! here is projection into screen space; the model already did the
//! windowing, normalization and coloring.

use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Rounding, Stroke};
use ts_views::{ChartGeometry, ChartRenderModel};

use super::{frame_to_rect, ControlStyle};

const PLOT_MARGIN: f32 = 8.0;
const TITLE_HEIGHT: f32 = 16.0;
const SIGNAL_RADIUS: f32 = 4.0;

const PANEL_FILL: Color32 = Color32::from_rgb(28, 28, 32);
const GRID_COLOR: Color32 = Color32::from_rgb(45, 45, 50);
const TICK_LABEL_COLOR: Color32 = Color32::from_rgb(140, 140, 145);

pub fn draw_chart(painter: &Painter, model: &ChartRenderModel, style: &ControlStyle) {
    let rect = frame_to_rect(model.frame);
    painter.rect_filled(rect, Rounding::same(4.0), PANEL_FILL);
    painter.rect_stroke(rect, Rounding::same(4.0), Stroke::new(1.0, style.track_edge));

    painter.text(
        Pos2::new(rect.left() + 6.0, rect.top() + 3.0),
        Align2::LEFT_TOP,
        &model.title,
        FontId::proportional(12.0),
        style.label,
    );

    let plot = Rect::from_min_max(
        Pos2::new(rect.left() + PLOT_MARGIN, rect.top() + TITLE_HEIGHT + PLOT_MARGIN),
        Pos2::new(rect.right() - PLOT_MARGIN, rect.bottom() - PLOT_MARGIN),
    );
    if plot.width() <= 0.0 || plot.height() <= 0.0 {
        return;
    }

    for tick in &model.ticks {
        let y = plot.bottom() - tick.fraction * plot.height();
        painter.line_segment(
            [Pos2::new(plot.left(), y), Pos2::new(plot.right(), y)],
            Stroke::new(1.0, GRID_COLOR),
        );
        painter.text(
            Pos2::new(plot.left() + 2.0, y - 2.0),
            Align2::LEFT_BOTTOM,
            &tick.label,
            FontId::proportional(9.0),
            TICK_LABEL_COLOR,
        );
    }

    let to_screen = |x: f32, y: f32| {
        Pos2::new(
            plot.left() + x * plot.width(),
            plot.bottom() - y * plot.height(),
        )
    };

    match &model.geometry {
        ChartGeometry::Line(segments) => {
            for segment in segments {
                painter.line_segment(
                    [
                        to_screen(segment.x0, segment.y0),
                        to_screen(segment.x1, segment.y1),
                    ],
                    Stroke::new(1.5, segment.color),
                );
            }
        }
        ChartGeometry::Candles(candles) => {
            for candle in candles {
                let center_x = plot.left() + candle.x * plot.width();
                let half = (candle.width * plot.width() * 0.5).max(0.5);
                painter.line_segment(
                    [
                        to_screen(candle.x, candle.wick_bottom),
                        to_screen(candle.x, candle.wick_top),
                    ],
                    Stroke::new(1.0, candle.color),
                );
                let body = Rect::from_min_max(
                    Pos2::new(center_x - half, plot.bottom() - candle.body_top * plot.height()),
                    Pos2::new(
                        center_x + half,
                        plot.bottom() - candle.body_bottom * plot.height(),
                    ),
                );
                painter.rect_filled(body, Rounding::ZERO, candle.color);
            }
        }
        ChartGeometry::Bars(bars) => {
            for bar in bars {
                let center_x = plot.left() + bar.x * plot.width();
                let half = (bar.width * plot.width() * 0.5).max(0.5);
                let top = plot.bottom() - bar.height * plot.height();
                let body = Rect::from_min_max(
                    Pos2::new(center_x - half, top),
                    Pos2::new(center_x + half, plot.bottom()),
                );
                painter.rect_filled(body, Rounding::ZERO, bar.color);
            }
        }
        ChartGeometry::Empty => {
            painter.text(
                plot.center(),
                Align2::CENTER_CENTER,
                "no data in window",
                FontId::proportional(11.0),
                TICK_LABEL_COLOR,
            );
        }
    }

    for marker in &model.signals {
        painter.circle_filled(to_screen(marker.x, marker.y), SIGNAL_RADIUS, marker.color);
    }

    if let Some(fraction) = model.highlight {
        let x = plot.left() + fraction * plot.width();
        painter.line_segment(
            [Pos2::new(x, plot.top()), Pos2::new(x, plot.bottom())],
            Stroke::new(1.5, style.highlight),
        );
    }
}
