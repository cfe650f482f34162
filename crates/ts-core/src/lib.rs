//! Core functionality for the tickscope workbench
//!
//! This crate provides the observer engine, the input primitives and the
//! two draggable controls that drive every other element on the canvas.

pub mod controls;
pub mod geometry;
pub mod input;
pub mod observer;

// Re-export commonly used types
pub use controls::{
    fraction_of, DragMode, RangeDragMode, RangeSlider, RangeSnapshot, Slider, SliderSnapshot,
};
pub use geometry::Frame;
pub use input::{InputEvent, KeyCommand, PointerButton};
pub use observer::{ControlUpdate, Publisher, UpdateSubscriber};

use thiserror::Error;

/// Errors from control construction and configuration.
#[derive(Error, Debug)]
pub enum ControlError {
    #[error("invalid control range: min {min} must be below max {max}")]
    InvalidRange { min: f64, max: f64 },
}
