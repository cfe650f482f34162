//! Painter for the scalar scrub control

use egui::{Align2, FontId, Painter, Pos2, Rounding, Stroke};
use ts_core::{fraction_of, SliderSnapshot};

use super::{frame_to_rect, ControlStyle};

const HANDLE_RADIUS: f32 = 6.0;

pub fn draw_slider(painter: &Painter, snapshot: &SliderSnapshot, style: &ControlStyle) {
    let rect = frame_to_rect(snapshot.frame);
    painter.rect_filled(rect, Rounding::same(2.0), style.track);
    painter.rect_stroke(rect, Rounding::same(2.0), Stroke::new(1.0, style.track_edge));

    let track_y = rect.center().y;
    painter.line_segment(
        [
            Pos2::new(rect.left(), track_y),
            Pos2::new(rect.right(), track_y),
        ],
        Stroke::new(2.0, style.track_edge),
    );

    let fraction = fraction_of(snapshot.current_value, snapshot.min_value, snapshot.max_value);
    let handle_x = rect.left() + fraction * rect.width();
    painter.circle_filled(Pos2::new(handle_x, track_y), HANDLE_RADIUS, style.handle);

    painter.text(
        Pos2::new(rect.right() + 8.0, track_y),
        Align2::LEFT_CENTER,
        format!("{:.0}", snapshot.current_value),
        FontId::proportional(11.0),
        style.label,
    );
}
