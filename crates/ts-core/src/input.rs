//! Input events consumed by controls and the app shell

/// Pointer buttons the engine distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Keyboard commands with engine-level meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// Grow the element under the pointer.
    Grow,
    /// Shrink the element under the pointer.
    Shrink,
    /// Nudge the scrub control one index left.
    StepLeft,
    /// Nudge the scrub control one index right.
    StepRight,
}

/// The event shapes the engine consumes, already translated from the
/// windowing layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    ButtonDown {
        x: f32,
        y: f32,
        button: PointerButton,
    },
    ButtonUp,
    Motion {
        x: f32,
        y: f32,
        dx: f32,
        dy: f32,
    },
    KeyDown(KeyCommand),
}
