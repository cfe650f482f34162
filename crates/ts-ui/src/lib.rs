//! Widget layer for tickscope
//!
//! Painter-drawn controls and charts on a free canvas, plus the retained
//! table widget. Widgets only draw from snapshots and render models; input
//! is translated by the app shell and routed to the elements directly.

pub mod theme;
pub mod widgets;

pub use theme::{accent_color, apply_theme, error_color};
pub use widgets::{
    day_switch_hit, day_switch_rect, draw_chart, draw_day_switch, draw_range_slider, draw_slider,
    frame_to_rect, show_table, ControlStyle, DaySwitchHit,
};
