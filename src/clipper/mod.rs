//! Primitive clipping against the canonical view volume.
//!
//! Clipping happens in homogeneous clip space, after the vertex stage and
//! before the perspective divide, using the Sutherland-Hodgman algorithm
//! for triangles and parametric clipping for lines.

pub mod clip_space;

pub use clip_space::{is_visible, ClipPlane, ClipSpaceClipper, ClipSpacePolygon, ClipSpaceVertex};
