//! Painter for the two-handle range control

use egui::{Align2, FontId, Painter, Pos2, Rect, Rounding, Stroke};
use ts_core::{fraction_of, RangeSnapshot};

use super::{frame_to_rect, ControlStyle};

const HANDLE_RADIUS: f32 = 6.0;

pub fn draw_range_slider(painter: &Painter, snapshot: &RangeSnapshot, style: &ControlStyle) {
    let rect = frame_to_rect(snapshot.frame);
    painter.rect_filled(rect, Rounding::same(2.0), style.track);
    painter.rect_stroke(rect, Rounding::same(2.0), Stroke::new(1.0, style.track_edge));

    let track_y = rect.center().y;
    let start_fraction = fraction_of(snapshot.start_value, snapshot.min_value, snapshot.max_value);
    let end_fraction = fraction_of(snapshot.end_value, snapshot.min_value, snapshot.max_value);
    let start_x = rect.left() + start_fraction * rect.width();
    let end_x = rect.left() + end_fraction * rect.width();

    let span = Rect::from_min_max(
        Pos2::new(start_x, rect.top() + 3.0),
        Pos2::new(end_x, rect.bottom() - 3.0),
    );
    painter.rect_filled(span, Rounding::same(2.0), style.span);

    painter.circle_filled(Pos2::new(start_x, track_y), HANDLE_RADIUS, style.handle);
    painter.circle_filled(Pos2::new(end_x, track_y), HANDLE_RADIUS, style.handle);

    painter.text(
        Pos2::new(rect.right() + 8.0, track_y),
        Align2::LEFT_CENTER,
        format!("{:.0} - {:.0}", snapshot.start_value, snapshot.end_value),
        FontId::proportional(11.0),
        style.label,
    );
}
