//! Scalar scrub control

use parking_lot::RwLock;

use super::{fraction_of, value_at};
use crate::geometry::Frame;
use crate::input::{InputEvent, PointerButton};
use crate::observer::{ControlUpdate, Publisher, UpdateSubscriber};
use crate::ControlError;

const HANDLE_RADIUS: f32 = 9.0;

/// Drag state of a scalar control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragMode {
    #[default]
    Idle,
    /// Pointer is moving the value handle.
    Handle,
    /// Pointer is moving the whole control across the canvas.
    Track,
}

#[derive(Debug, Clone)]
struct SliderState {
    frame: Frame,
    min_value: f64,
    max_value: f64,
    current_value: f64,
    drag: DragMode,
}

/// Copy of the visible state, taken under the lock for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderSnapshot {
    pub frame: Frame,
    pub min_value: f64,
    pub max_value: f64,
    pub current_value: f64,
    pub drag: DragMode,
}

/// A horizontal scrub control publishing a scalar value.
///
/// The state lock is always released before publishing, so depth-first
/// delivery may re-enter a different method of this control without
/// deadlocking.
pub struct Slider {
    state: RwLock<SliderState>,
    publisher: Publisher,
}

impl Slider {
    pub fn new(
        frame: Frame,
        min_value: f64,
        max_value: f64,
        current_value: f64,
    ) -> Result<Self, ControlError> {
        if max_value <= min_value {
            return Err(ControlError::InvalidRange {
                min: min_value,
                max: max_value,
            });
        }
        let state = SliderState {
            frame,
            min_value,
            max_value,
            current_value: current_value.clamp(min_value, max_value),
            drag: DragMode::Idle,
        };
        Ok(Self {
            state: RwLock::new(state),
            publisher: Publisher::new(),
        })
    }

    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    pub fn snapshot(&self) -> SliderSnapshot {
        let state = self.state.read();
        SliderSnapshot {
            frame: state.frame,
            min_value: state.min_value,
            max_value: state.max_value,
            current_value: state.current_value,
            drag: state.drag,
        }
    }

    pub fn current_value(&self) -> f64 {
        self.state.read().current_value
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
        let on_handle = handle_contains(&state, x, y);
        if !on_handle && !state.frame.contains(x, y) {
            return false;
        }
        match button {
            PointerButton::Primary => {
                state.drag = DragMode::Handle;
                if on_handle {
                    // Grabbing the handle does not jump the value.
                    return true;
                }
                let value = value_at(
                    state.frame.x,
                    state.frame.width,
                    x,
                    state.min_value,
                    state.max_value,
                );
                state.current_value = value;
                drop(state);
                self.publisher.publish(ControlUpdate::Point(value));
                true
            }
            PointerButton::Secondary => {
                if layout_locked {
                    return false;
                }
                state.drag = DragMode::Track;
                true
            }
        }
    }

    fn on_motion(&self, x: f32, dx: f32, dy: f32) -> bool {
        let mut state = self.state.write();
        match state.drag {
            DragMode::Idle => false,
            DragMode::Handle => {
                let value = value_at(
                    state.frame.x,
                    state.frame.width,
                    x,
                    state.min_value,
                    state.max_value,
                );
                state.current_value = value;
                drop(state);
                self.publisher.publish(ControlUpdate::Point(value));
                true
            }
            DragMode::Track => {
                state.frame.translate(dx, dy);
                true
            }
        }
    }

    fn on_button_up(&self) -> bool {
        let mut state = self.state.write();
        let was_dragging = state.drag != DragMode::Idle;
        state.drag = DragMode::Idle;
        was_dragging
    }

    /// External push of a new value, clamped into the current bounds.
    pub fn set(&self, value: f64) {
        let mut state = self.state.write();
        let value = value.clamp(state.min_value, state.max_value);
        state.current_value = value;
        drop(state);
        self.publisher.publish(ControlUpdate::Point(value));
    }

    /// Step the value, typically by one whole index.
    pub fn step(&self, delta: f64) {
        let current = self.state.read().current_value;
        self.set(current + delta);
    }

    /// Rebind the control to new bounds, typically the visible window of a
    /// viewport this control is scoped to.
    ///
    /// Inverted bounds are swapped and degenerate bounds widened by one
    /// index so a one-row window cannot wedge the control. The current
    /// value is re-clamped and re-published either way.
    pub fn set_bounds(&self, start: f64, end: f64) {
        let (min, max) = if start <= end { (start, end) } else { (end, start) };
        let max = if max > min { max } else { min + 1.0 };
        let mut state = self.state.write();
        state.min_value = min;
        state.max_value = max;
        let value = state.current_value.clamp(min, max);
        state.current_value = value;
        drop(state);
        self.publisher.publish(ControlUpdate::Point(value));
    }
}

impl UpdateSubscriber for Slider {
    fn on_update(&self, update: ControlUpdate) -> anyhow::Result<()> {
        match update {
            ControlUpdate::Range { start, end } => {
                self.set_bounds(start, end);
            }
            ControlUpdate::Point(value) => {
                tracing::trace!("scrub control ignoring point update {value}");
            }
        }
        Ok(())
    }
}

fn handle_contains(state: &SliderState, x: f32, y: f32) -> bool {
    let fraction = fraction_of(state.current_value, state.min_value, state.max_value);
    let handle_x = state.frame.x + fraction * state.frame.width;
    let handle_y = state.frame.center_y();
    (x - handle_x).abs() <= HANDLE_RADIUS && (y - handle_y).abs() <= HANDLE_RADIUS
}

#[cfg(test)]
mod tests {
    use super::*;
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

    fn test_slider() -> Slider {
        Slider::new(Frame::new(100.0, 50.0, 200.0, 20.0), 0.0, 99.0, 0.0).unwrap()
    }

    #[test]
    fn test_invalid_range_rejected_at_construction() {
        let frame = Frame::new(0.0, 0.0, 100.0, 20.0);
        assert!(Slider::new(frame, 5.0, 5.0, 0.0).is_err());
        assert!(Slider::new(frame, 9.0, 3.0, 0.0).is_err());
    }

    #[test]
    fn test_track_click_jumps_to_clicked_value() {
        // Track spans x 100..300 over values 0..99; the midpoint maps to 49.5
        // and consumers floor that to row 49.
        let slider = test_slider();
        let sink = Sink::new();
        slider.publisher().subscribe(&sink);

        let consumed = slider.handle_event(
            InputEvent::ButtonDown {
                x: 200.0,
                y: 60.0,
                button: PointerButton::Primary,
            },
            false,
        );

        assert!(consumed);
        assert_eq!(sink.updates(), vec![ControlUpdate::Point(49.5)]);
        assert_eq!(slider.current_value(), 49.5);
    }

    #[test]
    fn test_handle_drag_publishes_every_motion() {
        let slider = test_slider();
        let sink = Sink::new();
        slider.publisher().subscribe(&sink);

        // Grab the handle where it sits (value 0 puts it at x = 100).
        slider.handle_event(
            InputEvent::ButtonDown {
                x: 100.0,
                y: 60.0,
                button: PointerButton::Primary,
            },
            false,
        );
        assert!(sink.updates().is_empty());

        slider.handle_event(
            InputEvent::Motion {
                x: 150.0,
                y: 60.0,
                dx: 50.0,
                dy: 0.0,
            },
            false,
        );
        slider.handle_event(
            InputEvent::Motion {
                x: 400.0,
                y: 60.0,
                dx: 250.0,
                dy: 0.0,
            },
            false,
        );

        assert_eq!(
            sink.updates(),
            vec![ControlUpdate::Point(24.75), ControlUpdate::Point(99.0)]
        );

        slider.handle_event(InputEvent::ButtonUp, false);
        assert_eq!(slider.snapshot().drag, DragMode::Idle);
    }

    #[test]
    fn test_track_drag_moves_frame_without_publishing() {
        let slider = test_slider();
        let sink = Sink::new();
        slider.publisher().subscribe(&sink);

        slider.handle_event(
            InputEvent::ButtonDown {
                x: 150.0,
                y: 60.0,
                button: PointerButton::Secondary,
            },
            false,
        );
        slider.handle_event(
            InputEvent::Motion {
                x: 160.0,
                y: 65.0,
                dx: 10.0,
                dy: 5.0,
            },
            false,
        );

        assert_eq!(slider.frame(), Frame::new(110.0, 55.0, 200.0, 20.0));
        assert!(sink.updates().is_empty());
    }

    #[test]
    fn test_locked_layout_refuses_track_drag() {
        let slider = test_slider();
        let consumed = slider.handle_event(
            InputEvent::ButtonDown {
                x: 150.0,
                y: 60.0,
                button: PointerButton::Secondary,
            },
            true,
        );
        assert!(!consumed);
        assert_eq!(slider.snapshot().drag, DragMode::Idle);
        assert_eq!(slider.frame(), Frame::new(100.0, 50.0, 200.0, 20.0));
    }

    #[test]
    fn test_events_outside_frame_not_consumed() {
        let slider = test_slider();
        assert!(!slider.handle_event(
            InputEvent::ButtonDown {
                x: 0.0,
                y: 0.0,
                button: PointerButton::Primary,
            },
            false,
        ));
        assert!(!slider.handle_event(
            InputEvent::Motion {
                x: 0.0,
                y: 0.0,
                dx: 1.0,
                dy: 1.0,
            },
            false,
        ));
        assert!(!slider.handle_event(InputEvent::ButtonUp, false));
    }

    #[test]
    fn test_set_clamps_into_bounds() {
        let slider = test_slider();
        let sink = Sink::new();
        slider.publisher().subscribe(&sink);

        slider.set(150.0);
        slider.set(-4.0);

        assert_eq!(
            sink.updates(),
            vec![ControlUpdate::Point(99.0), ControlUpdate::Point(0.0)]
        );
    }

    #[test]
    fn test_set_bounds_reclamps_and_republishes() {
        let slider = test_slider();
        slider.set(80.0);
        let sink = Sink::new();
        slider.publisher().subscribe(&sink);

        slider.set_bounds(10.0, 60.0);

        assert_eq!(slider.bounds(), (10.0, 60.0));
        assert_eq!(sink.updates(), vec![ControlUpdate::Point(60.0)]);
    }

    #[test]
    fn test_degenerate_bounds_widen_one_index() {
        let slider = test_slider();
        slider.set_bounds(7.0, 7.0);
        assert_eq!(slider.bounds(), (7.0, 8.0));

        slider.set_bounds(30.0, 12.0);
        assert_eq!(slider.bounds(), (12.0, 30.0));
    }

    #[test]
    fn test_range_update_rebinds_bounds() {
        let slider = Arc::new(test_slider());
        slider.set(90.0);

        slider
            .on_update(ControlUpdate::Range {
                start: 20.0,
                end: 40.0,
            })
            .unwrap();

        assert_eq!(slider.bounds(), (20.0, 40.0));
        assert_eq!(slider.current_value(), 40.0);

        // Point updates are ignored rather than echoed.
        slider.on_update(ControlUpdate::Point(25.0)).unwrap();
        assert_eq!(slider.current_value(), 40.0);
    }
}
