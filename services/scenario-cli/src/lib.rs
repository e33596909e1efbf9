//! Scenario CLI library.
//!
//! Input parsing shared by the `scenario-cli` binary and its tests.

pub mod drawing;

pub use drawing::{load_drawing, parse_drawing, DrawingError};
