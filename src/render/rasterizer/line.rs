//! Bresenham line traversal.
//!
//! Bresenham's algorithm decides which pixels to light using only integer
//! arithmetic. It steps one pixel at a time along the major axis (the one
//! with the larger extent) and keeps an error term measuring how far the
//! current pixel has drifted from the ideal line. Whenever the accumulated
//! error turns positive, it also steps one pixel along the minor axis.

use std::mem;

use super::{write_fragment, FragmentStats, ScreenVertex};
use crate::math::utils::lerp;
use crate::render::framebuffer::Framebuffer;
use crate::render::shader::{FragmentShader, ShaderProgram, VertexShader};

/// Draws the segment `a`-`b`, one fragment per major-axis step.
///
/// Endpoints snap to the pixel grid with `floor` and are clamped into the
/// framebuffer, so a segment on the right or bottom border still covers the
/// last column or row. Lines that are more horizontal walk left-to-right;
/// lines that are more vertical walk bottom-to-top (decreasing row). The
/// endpoints are swapped together with their varyings when needed. The
/// traversal is half-open: the pixel of the far endpoint is not drawn, so
/// coincident endpoints draw nothing.
///
/// Depth and varyings are interpolated by the fractional progress along the
/// major axis.
pub fn rasterize_line<V, F>(
    a: &ScreenVertex,
    b: &ScreenVertex,
    program: &ShaderProgram<V, F>,
    fb: &mut Framebuffer,
) -> FragmentStats
where
    V: VertexShader,
    F: FragmentShader,
{
    let max_x = fb.width() as i64 - 1;
    let max_y = fb.height() as i64 - 1;
    let snap = |v: &ScreenVertex| {
        (
            (v.position.x.floor() as i64).clamp(0, max_x),
            (v.position.y.floor() as i64).clamp(0, max_y),
        )
    };
    let (ax, ay) = snap(a);
    let (bx, by) = snap(b);

    let x_major = (bx - ax).abs() >= (by - ay).abs();

    // Work in (major, minor) coordinates so both cases share one walk.
    let (mut start, mut end, mut p0, mut p1) = if x_major {
        (a, b, (ax, ay), (bx, by))
    } else {
        (a, b, (ay, ax), (by, bx))
    };
    let major_step = if x_major { 1 } else { -1 };
    if (p1.0 - p0.0) * major_step < 0 {
        mem::swap(&mut start, &mut end);
        mem::swap(&mut p0, &mut p1);
    }

    let d_major = (p1.0 - p0.0).abs();
    let d_minor = (p1.1 - p0.1).abs();
    let minor_step = if p1.1 >= p0.1 { 1 } else { -1 };

    let mut stats = FragmentStats::default();
    let mut minor = p0.1;
    let mut error = 2 * d_minor - d_major;

    for step in 0..d_major {
        let major = p0.0 + step * major_step;
        let (x, y) = if x_major { (major, minor) } else { (minor, major) };

        let t = step as f32 / d_major as f32;
        let depth = lerp(start.position.z, end.position.z, t);
        let varyings = start.varyings.lerp(&end.varyings, t);
        stats.record(write_fragment(
            x as u32, y as u32, depth, &varyings, program, fb,
        ));

        if error > 0 {
            minor += minor_step;
            error -= 2 * d_major;
        }
        error += 2 * d_minor;
    }

    stats
}
