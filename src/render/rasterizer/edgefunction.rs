//! Edge function-based triangle rasterization.
//!
//! This module implements triangle rasterization using the edge function
//! algorithm, which is the foundation of modern GPU rasterization.
//!
//! # Algorithm Overview
//!
//! 1. Compute the triangle's bounding box and clamp it to the framebuffer
//! 2. For each pixel center in the box, evaluate three edge functions
//! 3. A pixel is inside if it is on the inner side of all three edges
//!
//! # Edge Function
//!
//! For an edge from point A to point B, the edge function at point P is the
//! 2D cross product (B - A) x (P - A):
//!
//! ```text
//! E(P) = (B.x - A.x) * (P.y - A.y) - (B.y - A.y) * (P.x - A.x)
//! ```
//!
//! Evaluated for the edge opposite each vertex and divided by the total
//! (twice the signed area), these are the barycentric weights used to
//! interpolate depth and varyings.
//!
//! # Fill Rule
//!
//! A pixel center exactly on an edge belongs to the triangle only if that
//! edge is a top or left edge. Two triangles sharing an edge therefore
//! never both draw, nor both skip, a pixel along it.
//!
//! # References
//!
//! - Juan Pineda, "A Parallel Algorithm for Polygon Rasterization" (1988)
//! - Scratchapixel: <https://www.scratchapixel.com/lessons/3d-basic-rendering/rasterization-practical-implementation>

use std::mem;

use super::{write_fragment, FragmentStats, ScreenVertex};
use crate::math::vec2::Vec2;
use crate::render::framebuffer::Framebuffer;
use crate::render::shader::{FragmentShader, ShaderProgram, Varyings, VertexShader};

/// Computes `(b - a) x (p - a)`.
///
/// The sign tells which side of the directed edge `a -> b` the point lies
/// on; zero means it lies exactly on the edge.
#[inline]
pub fn edge_function(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b - a).cross(p - a)
}

/// True for a top or left edge of a triangle whose interior gives positive
/// edge function values.
///
/// The gradient of `E` with respect to P is `(-dy, dx)`. A left edge has the
/// interior towards +x (`dy < 0`); a top edge is horizontal with the interior
/// towards +y, down the screen (`dx > 0`).
#[inline]
fn is_top_left(from: Vec2, to: Vec2) -> bool {
    let d = to - from;
    d.y < 0.0 || (d.y == 0.0 && d.x > 0.0)
}

#[inline]
fn covers(value: f32, top_left: bool) -> bool {
    value > 0.0 || (value == 0.0 && top_left)
}

/// Fills a screen-space triangle, sampling at pixel centers.
///
/// Depth and varyings are interpolated with the barycentric weights of each
/// covered pixel center. Either winding is accepted; zero-area triangles
/// produce no fragments.
pub fn rasterize_triangle<V, F>(
    vertices: [&ScreenVertex; 3],
    program: &ShaderProgram<V, F>,
    fb: &mut Framebuffer,
) -> FragmentStats
where
    V: VertexShader,
    F: FragmentShader,
{
    let mut stats = FragmentStats::default();
    let [a, mut b, mut c] = vertices;

    let mut area = edge_function(a.position.xy(), b.position.xy(), c.position.xy());
    if area == 0.0 || !area.is_finite() {
        return stats;
    }
    // Normalize to positive winding; the first vertex keeps its place.
    if area < 0.0 {
        mem::swap(&mut b, &mut c);
        area = -area;
    }
    let inv_area = 1.0 / area;

    let (pa, pb, pc) = (a.position.xy(), b.position.xy(), c.position.xy());
    let top_left = [is_top_left(pb, pc), is_top_left(pc, pa), is_top_left(pa, pb)];

    // ─────────────────────────────────────────────────────────────────────
    // Bounding box, clamped to the framebuffer
    // ─────────────────────────────────────────────────────────────────────
    let min_x = (pa.x.min(pb.x).min(pc.x).floor() as i64).max(0);
    let max_x = (pa.x.max(pb.x).max(pc.x).ceil() as i64).min(fb.width() as i64 - 1);
    let min_y = (pa.y.min(pb.y).min(pc.y).floor() as i64).max(0);
    let max_y = (pa.y.max(pb.y).max(pc.y).ceil() as i64).min(fb.height() as i64 - 1);

    let (za, zb, zc) = (a.position.z, b.position.z, c.position.z);

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);

            let w0 = edge_function(pb, pc, p);
            let w1 = edge_function(pc, pa, p);
            let w2 = edge_function(pa, pb, p);

            if !(covers(w0, top_left[0]) && covers(w1, top_left[1]) && covers(w2, top_left[2])) {
                continue;
            }

            let (lb, lc) = (w1 * inv_area, w2 * inv_area);
            let la = 1.0 - lb - lc;

            // Offsets from the first vertex stay exact for flat depth.
            let depth = za + lb * (zb - za) + lc * (zc - za);
            let varyings =
                Varyings::interpolate([&a.varyings, &b.varyings, &c.varyings], [la, lb, lc]);

            stats.record(write_fragment(
                x as u32, y as u32, depth, &varyings, program, fb,
            ));
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::math::vec4::Vec4;
    use approx::assert_relative_eq;

    #[test]
    fn edge_function_sign() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(4.0, 0.0);
        assert!(edge_function(a, b, Vec2::new(1.0, 1.0)) > 0.0);
        assert!(edge_function(a, b, Vec2::new(1.0, -1.0)) < 0.0);
        assert_eq!(edge_function(a, b, Vec2::new(2.0, 0.0)), 0.0);
    }

    #[test]
    fn small_triangle_fill() {
        let mut fb = cleared(4, 4);
        let stats = rasterize_triangle(
            [
                &vertex(0.0, 0.0, 0.5),
                &vertex(3.0, 0.0, 0.5),
                &vertex(0.0, 3.0, 0.5),
            ],
            &solid_red(),
            &mut fb,
        );

        // Centers on the hypotenuse x + y = 3 belong to a bottom-right edge.
        let covered = vec![(0, 0), (1, 0), (0, 1)];
        assert_eq!(stats.written, covered.len());
        assert_eq!(lit_pixels(&fb), covered);

        for y in 0..4 {
            for x in 0..4 {
                if covered.contains(&(x, y)) {
                    assert_eq!(fb.pixel(x, y), Some([255, 0, 0]));
                    assert_eq!(fb.depth(x, y), Some(0.5));
                } else {
                    assert_eq!(fb.pixel(x, y), Some([0, 0, 0]));
                    assert_eq!(fb.depth(x, y), Some(Framebuffer::FAR_DEPTH));
                }
            }
        }
    }

    #[test]
    fn winding_does_not_matter() {
        let mut cw = cleared(8, 8);
        let mut ccw = cleared(8, 8);
        let (a, b, c) = (
            vertex(0.5, 0.5, 0.5),
            vertex(7.0, 1.0, 0.5),
            vertex(2.0, 7.5, 0.5),
        );
        rasterize_triangle([&a, &b, &c], &solid_red(), &mut cw);
        rasterize_triangle([&a, &c, &b], &solid_red(), &mut ccw);
        assert_eq!(cw.color_buffer(), ccw.color_buffer());
        assert!(!lit_pixels(&cw).is_empty());
    }

    #[test]
    fn shared_edge_is_drawn_exactly_once() {
        // A 4x4 square split along its diagonal into two triangles.
        let mut fb = cleared(4, 4);
        let program = solid_red();
        let (a, b, c, d) = (
            vertex(0.0, 0.0, 0.5),
            vertex(4.0, 0.0, 0.5),
            vertex(4.0, 4.0, 0.5),
            vertex(0.0, 4.0, 0.5),
        );
        let first = rasterize_triangle([&a, &b, &c], &program, &mut fb);
        fb.clear_depth(Framebuffer::FAR_DEPTH);
        let second = rasterize_triangle([&a, &c, &d], &program, &mut fb);

        assert_eq!(first.written + second.written, 16);
        assert_eq!(lit_pixels(&fb).len(), 16);
    }

    #[test]
    fn degenerate_triangle_draws_nothing() {
        let mut fb = cleared(4, 4);
        let stats = rasterize_triangle(
            [
                &vertex(0.0, 0.0, 0.5),
                &vertex(2.0, 2.0, 0.5),
                &vertex(3.0, 3.0, 0.5),
            ],
            &solid_red(),
            &mut fb,
        );
        assert_eq!(stats, FragmentStats::default());
    }

    #[test]
    fn depth_interpolates_across_triangle() {
        let mut fb = cleared(4, 4);
        rasterize_triangle(
            [
                &vertex(0.0, 0.0, 0.0),
                &vertex(4.0, 0.0, 0.8),
                &vertex(0.0, 4.0, 0.0),
            ],
            &solid_red(),
            &mut fb,
        );
        // Depth grows with x only: z = 0.2 * x at the pixel center.
        assert_relative_eq!(fb.depth(0, 0).unwrap(), 0.1, epsilon = 1e-6);
        assert_relative_eq!(fb.depth(2, 0).unwrap(), 0.5, epsilon = 1e-6);
        assert_relative_eq!(fb.depth(0, 2).unwrap(), 0.1, epsilon = 1e-6);
    }

    #[test]
    fn varyings_interpolate_across_triangle() {
        let mut fb = cleared(4, 4);
        rasterize_triangle(
            [
                &colored(0.0, 0.0, 0.5, Vec4::rgb(0.0, 0.0, 0.0)),
                &colored(4.0, 0.0, 0.5, Vec4::rgb(1.0, 0.0, 0.0)),
                &colored(0.0, 4.0, 0.5, Vec4::rgb(0.0, 0.0, 1.0)),
            ],
            &varying_color(),
            &mut fb,
        );
        // Center (1.5, 0.5): red weight 1.5 / 4, blue weight 0.5 / 4.
        assert_eq!(fb.pixel(1, 0), Some([96, 0, 32]));
    }

    #[test]
    fn bounding_box_is_clamped() {
        let mut fb = cleared(4, 4);
        let stats = rasterize_triangle(
            [
                &vertex(-10.0, -10.0, 0.5),
                &vertex(20.0, -10.0, 0.5),
                &vertex(-10.0, 20.0, 0.5),
            ],
            &solid_red(),
            &mut fb,
        );
        assert_eq!(stats.written, 16);
    }
}
