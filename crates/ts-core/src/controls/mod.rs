//! Draggable scrub and range controls

mod range_slider;
mod slider;

pub use range_slider::{RangeDragMode, RangeSlider, RangeSnapshot};
pub use slider::{DragMode, Slider, SliderSnapshot};

/// Map an absolute pointer x onto a control value.
///
/// The pointer is normalized against the track, clamped to `[0, 1]` and
/// scaled into `[min, max]`. A zero-width track maps to the midpoint so a
/// collapsed control never produces out-of-range values.
pub(crate) fn value_at(track_x: f32, track_width: f32, pointer_x: f32, min: f64, max: f64) -> f64 {
    if track_width <= 0.0 {
        return min + (max - min) / 2.0;
    }
    let normalized = ((pointer_x - track_x) / track_width).clamp(0.0, 1.0);
    min + normalized as f64 * (max - min)
}

/// Fraction of the track a value sits at, for handle placement.
pub fn fraction_of(value: f64, min: f64, max: f64) -> f32 {
    if max <= min {
        return 0.5;
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0) as f32
}
