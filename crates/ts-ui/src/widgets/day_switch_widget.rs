//! Day stepper control

use egui::{Align2, FontId, Painter, Pos2, Rect, Rounding, Stroke, Vec2};
use ts_core::Frame;

use super::ControlStyle;

const ARROW_WIDTH: f32 = 24.0;
const LABEL_WIDTH: f32 = 72.0;
const HEIGHT: f32 = 24.0;

/// Region of the day stepper under a pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaySwitchHit {
    Prev,
    Next,
    /// Anywhere else on the control, used for moving it.
    Body,
}

/// Full rect of the stepper. The element only stores an origin; the size
/// is fixed.
pub fn day_switch_rect(frame: Frame) -> Rect {
    Rect::from_min_size(
        Pos2::new(frame.x, frame.y),
        Vec2::new(ARROW_WIDTH + LABEL_WIDTH + ARROW_WIDTH, HEIGHT),
    )
}

pub fn day_switch_hit(frame: Frame, x: f32, y: f32) -> Option<DaySwitchHit> {
    let rect = day_switch_rect(frame);
    if !rect.contains(Pos2::new(x, y)) {
        return None;
    }
    if x <= rect.left() + ARROW_WIDTH {
        Some(DaySwitchHit::Prev)
    } else if x >= rect.right() - ARROW_WIDTH {
        Some(DaySwitchHit::Next)
    } else {
        Some(DaySwitchHit::Body)
    }
}

pub fn draw_day_switch(painter: &Painter, frame: Frame, day: u32, style: &ControlStyle) {
    let rect = day_switch_rect(frame);
    painter.rect_filled(rect, Rounding::same(2.0), style.track);
    painter.rect_stroke(rect, Rounding::same(2.0), Stroke::new(1.0, style.track_edge));

    let prev = Rect::from_min_size(rect.min, Vec2::new(ARROW_WIDTH, HEIGHT));
    let next = Rect::from_min_size(
        Pos2::new(rect.right() - ARROW_WIDTH, rect.top()),
        Vec2::new(ARROW_WIDTH, HEIGHT),
    );
    painter.rect_filled(prev, Rounding::same(2.0), style.track_edge);
    painter.rect_filled(next, Rounding::same(2.0), style.track_edge);
    painter.text(
        prev.center(),
        Align2::CENTER_CENTER,
        "◀",
        FontId::proportional(12.0),
        style.label,
    );
    painter.text(
        next.center(),
        Align2::CENTER_CENTER,
        "▶",
        FontId::proportional(12.0),
        style.label,
    );
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        format!("Day {day}"),
        FontId::proportional(12.0),
        style.label,
    );
}
