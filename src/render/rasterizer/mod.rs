//! Conversion of screen-space primitives into shaded fragments.
//!
//! Available primitives:
//! - [`rasterize_point`]: square stamp around the point center
//! - [`rasterize_line`]: integer Bresenham walk along the major axis
//! - [`rasterize_triangle`]: bounding box iteration with edge function tests
//!
//! All three funnel every covered pixel through [`write_fragment`], which
//! owns the depth test, the fragment stage call and the framebuffer write.

mod edgefunction;
mod line;
mod point;

pub use edgefunction::{edge_function, rasterize_triangle};
pub use line::rasterize_line;
pub use point::rasterize_point;

use std::ops::AddAssign;

use super::framebuffer::Framebuffer;
use super::shader::{FragmentShader, ShaderProgram, Varyings, VertexShader};
use crate::colors::to_rgb8;
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;

/// A vertex after the viewport transform.
///
/// `position.x`/`position.y` are pixel coordinates, `position.z` depth in
/// `[0, 1]` with smaller values nearer.
#[derive(Clone, Debug, PartialEq)]
pub struct ScreenVertex {
    pub position: Vec3,
    pub varyings: Varyings,
}

impl ScreenVertex {
    pub fn new(position: Vec3, varyings: Varyings) -> Self {
        Self { position, varyings }
    }
}

/// What happened to a single fragment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FragmentOutcome {
    /// Stored depth was nearer or equal; the fragment stage never ran.
    DepthRejected,
    /// The fragment stage discarded it.
    Discarded,
    /// Color and depth were written.
    Written,
    /// The pixel lies outside the framebuffer, or its buffers were released.
    OutOfBounds,
}

/// Fragment counters for one or more rasterized primitives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FragmentStats {
    /// Fragments that passed the depth test and reached the fragment stage.
    pub shaded: usize,
    /// Fragments that ended up in the framebuffer.
    pub written: usize,
}

impl FragmentStats {
    fn record(&mut self, outcome: FragmentOutcome) {
        match outcome {
            FragmentOutcome::DepthRejected | FragmentOutcome::OutOfBounds => {}
            FragmentOutcome::Discarded => self.shaded += 1,
            FragmentOutcome::Written => {
                self.shaded += 1;
                self.written += 1;
            }
        }
    }
}

impl AddAssign for FragmentStats {
    fn add_assign(&mut self, rhs: Self) {
        self.shaded += rhs.shaded;
        self.written += rhs.written;
    }
}

/// Depth-tests, shades and stores one fragment at pixel `(x, y)`.
///
/// The fragment wins only if `depth` is strictly less than the stored
/// depth. On a win the fragment stage runs; unless it discards, the color is
/// quantized to 8 bits per channel and written together with `depth`.
/// Pixels outside the framebuffer, and any pixel of a released one, come
/// back as [`FragmentOutcome::OutOfBounds`].
pub fn write_fragment<V, F>(
    x: u32,
    y: u32,
    depth: f32,
    varyings: &Varyings,
    program: &ShaderProgram<V, F>,
    fb: &mut Framebuffer,
) -> FragmentOutcome
where
    V: VertexShader,
    F: FragmentShader,
{
    let Some(index) = fb.index(x, y) else {
        return FragmentOutcome::OutOfBounds;
    };
    match fb.stored_depth(index) {
        Some(stored) if depth < stored => {}
        Some(_) => return FragmentOutcome::DepthRejected,
        None => return FragmentOutcome::OutOfBounds,
    }

    let frag_coord = Vec2::new(x as f32, y as f32);
    match program
        .fragment_shader
        .shade(varyings, &program.uniforms, frag_coord)
    {
        Some(color) => {
            fb.store(index, to_rgb8(color), depth);
            FragmentOutcome::Written
        }
        None => FragmentOutcome::Discarded,
    }
}
