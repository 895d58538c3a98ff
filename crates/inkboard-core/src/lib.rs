//! # inkboard-core
//!
//! Core types and primitives for the Inkboard scene rendering engine.
//! This crate contains the foundational value types shared across all
//! Inkboard crates: raster frames, colors, 2D math, easing curves, and
//! error types.

pub mod color;
pub mod easing;
pub mod error;
pub mod frame;
pub mod math;

pub use color::Color;
pub use easing::{interpolate, interpolate_position, Easing};
pub use error::{InkboardError, InkboardResult};
pub use frame::{FrameBuffer, PixelFormat};
pub use math::{Point2D, Size2D};
