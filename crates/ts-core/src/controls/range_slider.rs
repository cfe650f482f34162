//! Range selection control with two handles

use parking_lot::RwLock;

use super::{fraction_of, value_at};
use crate::geometry::Frame;
use crate::input::{InputEvent, PointerButton};
use crate::observer::{ControlUpdate, Publisher};
use crate::ControlError;

const HANDLE_RADIUS: f32 = 9.0;
const DEFAULT_MIN_GAP: f64 = 1.0;

/// Drag state of a range control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeDragMode {
    #[default]
    Idle,
    StartHandle,
    EndHandle,
    /// Pointer is moving the whole control across the canvas.
    Track,
}

#[derive(Debug, Clone)]
struct RangeState {
    frame: Frame,
    min_value: f64,
    max_value: f64,
    start_value: f64,
    end_value: f64,
    min_gap: f64,
    drag: RangeDragMode,
}

/// Copy of the visible state, taken under the lock for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeSnapshot {
    pub frame: Frame,
    pub min_value: f64,
    pub max_value: f64,
    pub start_value: f64,
    pub end_value: f64,
    pub drag: RangeDragMode,
}

/// A two-handle range control publishing `start <= end` pairs.
///
/// Handles are clamped before every publish, so subscribers can never
/// observe an inverted span. The gap between handles never shrinks below
/// `min_gap` (one index, capped by the overall span).
pub struct RangeSlider {
    state: RwLock<RangeState>,
    publisher: Publisher,
}

impl RangeSlider {
    /// New control with the handles spanning the full range.
    pub fn new(frame: Frame, min_value: f64, max_value: f64) -> Result<Self, ControlError> {
        Self::with_span(frame, min_value, max_value, min_value, max_value)
    }

    /// New control with an explicit handle span, used when restoring a
    /// saved layout. The span is clamped into the bounds and the gap
    /// re-established rather than rejected.
    pub fn with_span(
        frame: Frame,
        min_value: f64,
        max_value: f64,
        start_value: f64,
        end_value: f64,
    ) -> Result<Self, ControlError> {
        if max_value <= min_value {
            return Err(ControlError::InvalidRange {
                min: min_value,
                max: max_value,
            });
        }
        let min_gap = DEFAULT_MIN_GAP.min(max_value - min_value);
        let start = start_value.clamp(min_value, max_value);
        let end = end_value.clamp(min_value, max_value);
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        let end = end.max((start + min_gap).min(max_value));
        let start = start.min(end - min_gap);
        let state = RangeState {
            frame,
            min_value,
            max_value,
            start_value: start,
            end_value: end,
            min_gap,
            drag: RangeDragMode::Idle,
        };
        Ok(Self {
            state: RwLock::new(state),
            publisher: Publisher::new(),
        })
    }

    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    pub fn snapshot(&self) -> RangeSnapshot {
        let state = self.state.read();
        RangeSnapshot {
            frame: state.frame,
            min_value: state.min_value,
            max_value: state.max_value,
            start_value: state.start_value,
            end_value: state.end_value,
            drag: state.drag,
        }
    }

    pub fn span(&self) -> (f64, f64) {
        let state = self.state.read();
        (state.start_value, state.end_value)
    }

    pub fn bounds(&self) -> (f64, f64) {
        let state = self.state.read();
        (state.min_value, state.max_value)
    }

    pub fn frame(&self) -> Frame {
        self.state.read().frame
    }

    /// Feed one translated input event.
    ///
    /// Returns true when the event was consumed by this control.
    pub fn handle_event(&self, event: InputEvent, layout_locked: bool) -> bool {
        match event {
            InputEvent::ButtonDown { x, y, button } => {
                self.on_button_down(x, y, button, layout_locked)
            }
            InputEvent::ButtonUp => self.on_button_up(),
            InputEvent::Motion { x, dx, dy, .. } => self.on_motion(x, dx, dy),
            InputEvent::KeyDown(_) => false,
        }
    }

    fn on_button_down(&self, x: f32, y: f32, button: PointerButton, layout_locked: bool) -> bool {
        let mut state = self.state.write();
        match button {
            PointerButton::Primary => {
                // First hit wins; the start handle shadows the end handle
                // when the two overlap.
                if handle_contains(&state, state.start_value, x, y) {
                    state.drag = RangeDragMode::StartHandle;
                    true
                } else if handle_contains(&state, state.end_value, x, y) {
                    state.drag = RangeDragMode::EndHandle;
                    true
                } else {
                    false
                }
            }
            PointerButton::Secondary => {
                if layout_locked || !state.frame.contains(x, y) {
                    return false;
                }
                state.drag = RangeDragMode::Track;
                true
            }
        }
    }

    fn on_motion(&self, x: f32, dx: f32, dy: f32) -> bool {
        let mut state = self.state.write();
        match state.drag {
            RangeDragMode::Idle => false,
            RangeDragMode::StartHandle => {
                let candidate = value_at(
                    state.frame.x,
                    state.frame.width,
                    x,
                    state.min_value,
                    state.max_value,
                );
                state.start_value = candidate.min(state.end_value - state.min_gap);
                let (start, end) = (state.start_value, state.end_value);
                drop(state);
                self.publisher.publish(ControlUpdate::Range { start, end });
                true
            }
            RangeDragMode::EndHandle => {
                let candidate = value_at(
                    state.frame.x,
                    state.frame.width,
                    x,
                    state.min_value,
                    state.max_value,
                );
                state.end_value = candidate.max(state.start_value + state.min_gap);
                let (start, end) = (state.start_value, state.end_value);
                drop(state);
                self.publisher.publish(ControlUpdate::Range { start, end });
                true
            }
            RangeDragMode::Track => {
                state.frame.translate(dx, dy);
                true
            }
        }
    }

    fn on_button_up(&self) -> bool {
        let mut state = self.state.write();
        let was_dragging = state.drag != RangeDragMode::Idle;
        state.drag = RangeDragMode::Idle;
        was_dragging
    }
}

fn handle_contains(state: &RangeState, value: f64, x: f32, y: f32) -> bool {
    let fraction = fraction_of(value, state.min_value, state.max_value);
    let handle_x = state.frame.x + fraction * state.frame.width;
    let handle_y = state.frame.center_y();
    (x - handle_x).abs() <= HANDLE_RADIUS && (y - handle_y).abs() <= HANDLE_RADIUS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::UpdateSubscriber;
    use parking_lot::Mutex;
    use std::sync::Arc;

    struct Sink(Mutex<Vec<ControlUpdate>>);

    impl Sink {
        fn new() -> Arc<Self> {
            Arc::new(Self(Mutex::new(Vec::new())))
        }

        fn updates(&self) -> Vec<ControlUpdate> {
            self.0.lock().clone()
        }
    }

    impl UpdateSubscriber for Sink {
        fn on_update(&self, update: ControlUpdate) -> anyhow::Result<()> {
            self.0.lock().push(update);
            Ok(())
        }
    }

    fn test_range() -> RangeSlider {
        RangeSlider::new(Frame::new(0.0, 100.0, 500.0, 20.0), 0.0, 500.0).unwrap()
    }

    #[test]
    fn test_invalid_range_rejected_at_construction() {
        let frame = Frame::new(0.0, 0.0, 100.0, 20.0);
        assert!(RangeSlider::new(frame, 10.0, 10.0).is_err());
        assert!(RangeSlider::new(frame, 10.0, 2.0).is_err());
    }

    #[test]
    fn test_new_control_spans_full_range() {
        let range = test_range();
        assert_eq!(range.span(), (0.0, 500.0));
    }

    #[test]
    fn test_start_handle_stops_one_gap_short_of_end() {
        // Dragging the start handle all the way past the right edge leaves
        // it pinned one index under the end handle.
        let range = test_range();
        let sink = Sink::new();
        range.publisher().subscribe(&sink);

        // Start handle sits at x = 0 (value 0).
        range.handle_event(
            InputEvent::ButtonDown {
                x: 0.0,
                y: 110.0,
                button: PointerButton::Primary,
            },
            false,
        );
        range.handle_event(
            InputEvent::Motion {
                x: 600.0,
                y: 110.0,
                dx: 600.0,
                dy: 0.0,
            },
            false,
        );

        assert_eq!(
            sink.updates(),
            vec![ControlUpdate::Range {
                start: 499.0,
                end: 500.0,
            }]
        );
        assert_eq!(range.span(), (499.0, 500.0));
    }

    #[test]
    fn test_end_handle_stops_one_gap_above_start() {
        let range = test_range();
        let sink = Sink::new();
        range.publisher().subscribe(&sink);

        // End handle sits at x = 500 (value 500).
        range.handle_event(
            InputEvent::ButtonDown {
                x: 500.0,
                y: 110.0,
                button: PointerButton::Primary,
            },
            false,
        );
        range.handle_event(
            InputEvent::Motion {
                x: -50.0,
                y: 110.0,
                dx: -550.0,
                dy: 0.0,
            },
            false,
        );

        assert_eq!(
            sink.updates(),
            vec![ControlUpdate::Range {
                start: 0.0,
                end: 1.0,
            }]
        );
    }

    #[test]
    fn test_no_inversion_under_adversarial_drags() {
        let range = test_range();
        let sink = Sink::new();
        range.publisher().subscribe(&sink);

        // Shove the start handle around, release, then shove the end handle
        // through it from the other side.
        range.handle_event(
            InputEvent::ButtonDown {
                x: 0.0,
                y: 110.0,
                button: PointerButton::Primary,
            },
            false,
        );
        for x in [125.0, 375.0, 600.0, 250.0] {
            range.handle_event(
                InputEvent::Motion {
                    x,
                    y: 110.0,
                    dx: 0.0,
                    dy: 0.0,
                },
                false,
            );
        }
        range.handle_event(InputEvent::ButtonUp, false);

        let (_, end) = range.span();
        let end_x = 500.0 * (end / 500.0) as f32;
        range.handle_event(
            InputEvent::ButtonDown {
                x: end_x,
                y: 110.0,
                button: PointerButton::Primary,
            },
            false,
        );
        for x in [400.0, 100.0, -100.0, 300.0] {
            range.handle_event(
                InputEvent::Motion {
                    x,
                    y: 110.0,
                    dx: 0.0,
                    dy: 0.0,
                },
                false,
            );
        }

        for update in sink.updates() {
            match update {
                ControlUpdate::Range { start, end } => assert!(start <= end, "inverted span"),
                other => panic!("unexpected update {other:?}"),
            }
        }
    }

    #[test]
    fn test_overlapping_handles_start_wins() {
        let range = RangeSlider::with_span(
            Frame::new(0.0, 100.0, 500.0, 20.0),
            0.0,
            500.0,
            250.0,
            251.0,
        )
        .unwrap();

        // Both handles are within hit range of this click.
        range.handle_event(
            InputEvent::ButtonDown {
                x: 250.5,
                y: 110.0,
                button: PointerButton::Primary,
            },
            false,
        );
        assert_eq!(range.snapshot().drag, RangeDragMode::StartHandle);
    }

    #[test]
    fn test_with_span_clamps_restored_values() {
        let range = RangeSlider::with_span(
            Frame::new(0.0, 100.0, 500.0, 20.0),
            0.0,
            500.0,
            600.0,
            700.0,
        )
        .unwrap();
        assert_eq!(range.span(), (499.0, 500.0));

        let collapsed =
            RangeSlider::with_span(Frame::new(0.0, 0.0, 500.0, 20.0), 0.0, 500.0, 200.0, 200.0)
                .unwrap();
        assert_eq!(collapsed.span(), (200.0, 201.0));
    }

    #[test]
    fn test_track_drag_moves_frame_and_respects_lock() {
        let range = test_range();
        range.handle_event(
            InputEvent::ButtonDown {
                x: 250.0,
                y: 110.0,
                button: PointerButton::Secondary,
            },
            false,
        );
        range.handle_event(
            InputEvent::Motion {
                x: 260.0,
                y: 100.0,
                dx: 10.0,
                dy: -10.0,
            },
            false,
        );
        range.handle_event(InputEvent::ButtonUp, false);
        assert_eq!(range.frame(), Frame::new(10.0, 90.0, 500.0, 20.0));

        let locked = test_range();
        let consumed = locked.handle_event(
            InputEvent::ButtonDown {
                x: 250.0,
                y: 110.0,
                button: PointerButton::Secondary,
            },
            true,
        );
        assert!(!consumed);
        assert_eq!(locked.snapshot().drag, RangeDragMode::Idle);
    }
}
