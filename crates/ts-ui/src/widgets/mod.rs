//! Canvas widgets

mod chart_widget;
mod day_switch_widget;
mod range_slider_widget;
mod slider_widget;
mod table_widget;

pub use chart_widget::draw_chart;
pub use day_switch_widget::{day_switch_hit, day_switch_rect, draw_day_switch, DaySwitchHit};
pub use range_slider_widget::draw_range_slider;
pub use slider_widget::draw_slider;
pub use table_widget::show_table;

use egui::{Color32, Pos2, Rect, Vec2};
use ts_core::Frame;

/// Colors shared by the painter-drawn controls.
#[derive(Debug, Clone)]
pub struct ControlStyle {
    pub track: Color32,
    pub track_edge: Color32,
    pub handle: Color32,
    pub span: Color32,
    pub label: Color32,
    pub highlight: Color32,
}

impl Default for ControlStyle {
    fn default() -> Self {
        Self {
            track: Color32::from_rgb(40, 40, 40),
            track_edge: Color32::from_rgb(70, 70, 70),
            handle: Color32::from_rgb(100, 150, 250),
            span: Color32::from_rgba_unmultiplied(100, 150, 250, 60),
            label: Color32::from_rgb(220, 220, 220),
            highlight: Color32::from_rgb(255, 180, 60),
        }
    }
}

pub fn frame_to_rect(frame: Frame) -> Rect {
    Rect::from_min_size(
        Pos2::new(frame.x, frame.y),
        Vec2::new(frame.width, frame.height),
    )
}
