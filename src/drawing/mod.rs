//! Geometry shared by layout, hit testing, and the compositor

pub mod geometry;

pub use geometry::{Point, Rect};
