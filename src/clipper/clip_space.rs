//! Clip-space clipping against the homogeneous clip cube.
//!
//! The clip volume is defined by:
//!
//! ```text
//! -w <= x <= w
//! -w <= y <= w
//! -w <= z <= w   ([-1, 1] depth range, OpenGL-style)
//! ```
//!
//! plus a guard plane `w >= W_EPSILON` so the perspective divide never sees
//! a zero or negative `w`. A vertex inside all seven planes survives the
//! divide with every NDC component in `[-1, 1]`.

use crate::math::vec4::Vec4;
use crate::render::shader::Varyings;

/// Smallest `w` a clipped vertex may carry into the perspective divide.
pub const W_EPSILON: f32 = 1e-5;

/// Returns true when a clip-space position lies inside the view volume:
/// `max(|x|, |y|, |z|) <= w`.
#[inline]
pub fn is_visible(p: Vec4) -> bool {
    p.x.abs() <= p.w && p.y.abs() <= p.w && p.z.abs() <= p.w
}

/// A vertex in homogeneous clip space with interpolatable attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipSpaceVertex {
    /// Position in clip space (x, y, z, w) - before perspective divide
    pub position: Vec4,
    pub varyings: Varyings,
}

impl ClipSpaceVertex {
    pub fn new(position: Vec4, varyings: Varyings) -> Self {
        Self { position, varyings }
    }

    /// Linearly interpolate position and varyings between two vertices.
    /// Used when an edge crosses a clipping plane.
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            position: self.position.lerp(other.position, t),
            varyings: self.varyings.lerp(&other.varyings, t),
        }
    }
}

/// The planes bounding the clip volume.
///
/// Each plane is defined implicitly by a linear inequality on (x, y, z, w).
/// The signed distance is positive when inside the clip volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClipPlane {
    /// w >= W_EPSILON
    W,
    /// x >= -w
    Left,
    /// x <= w
    Right,
    /// y >= -w
    Bottom,
    /// y <= w
    Top,
    /// z >= -w
    Near,
    /// z <= w
    Far,
}

impl ClipPlane {
    pub const ALL: [ClipPlane; 7] = [
        ClipPlane::W,
        ClipPlane::Left,
        ClipPlane::Right,
        ClipPlane::Bottom,
        ClipPlane::Top,
        ClipPlane::Near,
        ClipPlane::Far,
    ];

    /// Returns the signed distance from a position to this plane.
    /// Positive = inside the clip volume, Negative = outside.
    #[inline]
    pub fn signed_distance(&self, p: Vec4) -> f32 {
        match self {
            Self::W => p.w - W_EPSILON,
            Self::Left => p.w + p.x,
            Self::Right => p.w - p.x,
            Self::Bottom => p.w + p.y,
            Self::Top => p.w - p.y,
            Self::Near => p.w + p.z,
            Self::Far => p.w - p.z,
        }
    }
}

/// A convex polygon in clip space.
///
/// Intermediate representation while clipping a triangle; triangulated back
/// into a fan once every plane has been applied.
#[derive(Clone, Debug, Default)]
pub struct ClipSpacePolygon {
    pub vertices: Vec<ClipSpaceVertex>,
}

impl ClipSpacePolygon {
    pub fn from_triangle(v0: ClipSpaceVertex, v1: ClipSpaceVertex, v2: ClipSpaceVertex) -> Self {
        Self {
            vertices: vec![v0, v1, v2],
        }
    }

    /// Returns true if the polygon has been completely clipped away.
    pub fn is_empty(&self) -> bool {
        self.vertices.len() < 3
    }

    /// Clip this polygon against a single plane using the Sutherland-Hodgman algorithm.
    pub fn clip_against_plane(&self, plane: ClipPlane) -> Self {
        if self.is_empty() {
            return Self::default();
        }

        let mut output = Vec::with_capacity(self.vertices.len() + 1);

        for (i, current) in self.vertices.iter().enumerate() {
            let next = &self.vertices[(i + 1) % self.vertices.len()];

            let d1 = plane.signed_distance(current.position);
            let d2 = plane.signed_distance(next.position);

            let current_inside = d1 >= 0.0;
            let next_inside = d2 >= 0.0;

            if current_inside {
                output.push(current.clone());
            }

            // Edge crosses the plane: emit the intersection.
            if current_inside != next_inside {
                let t = d1 / (d1 - d2);
                output.push(current.lerp(next, t));
            }
        }

        Self { vertices: output }
    }

    /// Fan triangulation of this convex polygon, first vertex as the hub.
    pub fn triangulate(&self) -> impl Iterator<Item = [&ClipSpaceVertex; 3]> {
        (1..self.vertices.len().saturating_sub(1))
            .map(move |i| [&self.vertices[0], &self.vertices[i], &self.vertices[i + 1]])
    }
}

/// Clips primitives against every [`ClipPlane`].
///
/// Stateless: the clip volume is fixed in clip space, so nothing needs
/// rebuilding when the caller's projection changes.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClipSpaceClipper;

impl ClipSpaceClipper {
    pub fn new() -> Self {
        Self
    }

    /// Clip a polygon against all planes of the clip volume.
    ///
    /// Returns the clipped polygon, which may be empty if the original
    /// polygon was entirely outside the clip volume.
    pub fn clip_polygon(&self, polygon: ClipSpacePolygon) -> ClipSpacePolygon {
        let fully_inside = polygon.vertices.iter().all(|v| {
            ClipPlane::ALL
                .iter()
                .all(|plane| plane.signed_distance(v.position) >= 0.0)
        });
        if fully_inside {
            return polygon;
        }

        let mut result = polygon;
        for plane in ClipPlane::ALL {
            if result.is_empty() {
                break;
            }
            result = result.clip_against_plane(plane);
        }
        result
    }

    /// Clip a segment against all planes of the clip volume.
    ///
    /// Returns `None` if no part of the segment is inside; otherwise the
    /// visible sub-segment, in the original direction.
    pub fn clip_line(
        &self,
        a: &ClipSpaceVertex,
        b: &ClipSpaceVertex,
    ) -> Option<(ClipSpaceVertex, ClipSpaceVertex)> {
        let mut t_enter = 0.0f32;
        let mut t_exit = 1.0f32;

        for plane in ClipPlane::ALL {
            let da = plane.signed_distance(a.position);
            let db = plane.signed_distance(b.position);

            if da < 0.0 && db < 0.0 {
                return None;
            }
            if da < 0.0 {
                t_enter = t_enter.max(da / (da - db));
            } else if db < 0.0 {
                t_exit = t_exit.min(da / (da - db));
            }
            if t_enter > t_exit {
                return None;
            }
        }

        let start = if t_enter > 0.0 { a.lerp(b, t_enter) } else { a.clone() };
        let end = if t_exit < 1.0 { a.lerp(b, t_exit) } else { b.clone() };
        Some((start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn vertex(x: f32, y: f32, z: f32, w: f32) -> ClipSpaceVertex {
        ClipSpaceVertex::new(Vec4::new(x, y, z, w), Varyings::new())
    }

    fn tagged(x: f32, y: f32, tag: f32) -> ClipSpaceVertex {
        let mut varyings = Varyings::new();
        varyings.set(0, tag);
        ClipSpaceVertex::new(Vec4::new(x, y, 0.0, 1.0), varyings)
    }

    fn assert_inside(v: &ClipSpaceVertex) {
        let p = v.position;
        let tolerance = 1e-5;
        assert!(p.x.abs() <= p.w + tolerance, "{p:?}");
        assert!(p.y.abs() <= p.w + tolerance, "{p:?}");
        assert!(p.z.abs() <= p.w + tolerance, "{p:?}");
    }

    #[test]
    fn visibility_test() {
        assert!(is_visible(Vec4::new(0.0, 0.0, 0.0, 1.0)));
        assert!(is_visible(Vec4::new(1.0, 0.0, 0.0, 1.0)));
        assert!(is_visible(Vec4::new(-2.0, 2.0, 2.0, 2.0)));
        assert!(!is_visible(Vec4::new(1.01, 0.0, 0.0, 1.0)));
        assert!(!is_visible(Vec4::new(0.0, 0.0, -1.5, 1.0)));
    }

    #[test]
    fn inside_triangle_is_untouched() {
        let clipper = ClipSpaceClipper::new();
        let tri = ClipSpacePolygon::from_triangle(
            vertex(-0.5, -0.5, 0.0, 1.0),
            vertex(0.5, -0.5, 0.0, 1.0),
            vertex(0.0, 0.5, 0.0, 1.0),
        );
        let out = clipper.clip_polygon(tri);
        assert_eq!(out.vertices.len(), 3);
        assert_eq!(out.triangulate().count(), 1);
    }

    #[test]
    fn outside_triangle_is_rejected() {
        let clipper = ClipSpaceClipper::new();
        let tri = ClipSpacePolygon::from_triangle(
            vertex(2.0, 2.0, 0.0, 1.0),
            vertex(3.0, 2.0, 0.0, 1.0),
            vertex(2.0, 3.0, 0.0, 1.0),
        );
        assert!(clipper.clip_polygon(tri).is_empty());
    }

    #[test]
    fn one_vertex_outside_yields_quad() {
        let clipper = ClipSpaceClipper::new();
        let tri = ClipSpacePolygon::from_triangle(
            vertex(-0.5, -0.5, 0.0, 1.0),
            vertex(2.0, -0.5, 0.0, 1.0),
            vertex(-0.5, 0.5, 0.0, 1.0),
        );
        let out = clipper.clip_polygon(tri);
        assert_eq!(out.vertices.len(), 4);
        assert_eq!(out.triangulate().count(), 2);
        out.vertices.iter().for_each(assert_inside);
    }

    #[test]
    fn two_vertices_outside_yields_triangle() {
        let clipper = ClipSpaceClipper::new();
        let tri = ClipSpacePolygon::from_triangle(
            vertex(0.0, 0.0, 0.0, 1.0),
            vertex(3.0, 0.0, 0.0, 1.0),
            vertex(0.0, 3.0, 0.0, 1.0),
        );
        let out = clipper.clip_polygon(tri);
        // The hypotenuse x + y = 3 leaves the square through its right and
        // top edges, cutting off the (1, 1) corner entirely.
        out.vertices.iter().for_each(assert_inside);
        assert!(!out.is_empty());
    }

    #[test]
    fn clipping_interpolates_varyings() {
        let clipper = ClipSpaceClipper::new();
        let tri = ClipSpacePolygon::from_triangle(
            tagged(0.0, 0.0, 0.0),
            tagged(2.0, 0.0, 1.0),
            tagged(0.0, 0.5, 0.0),
        );
        let out = clipper.clip_polygon(tri);
        let on_edge = out
            .vertices
            .iter()
            .find(|v| v.position.y == 0.0 && v.position.x == 1.0)
            .expect("intersection with x = w");
        assert_relative_eq!(on_edge.varyings[0].as_float().unwrap(), 0.5);
    }

    #[test]
    fn behind_camera_is_rejected() {
        let clipper = ClipSpaceClipper::new();
        let tri = ClipSpacePolygon::from_triangle(
            vertex(0.0, 0.0, 0.0, -1.0),
            vertex(0.1, 0.0, 0.0, -1.0),
            vertex(0.0, 0.1, 0.0, -1.0),
        );
        assert!(clipper.clip_polygon(tri).is_empty());
    }

    #[test]
    fn line_inside_is_unchanged() {
        let clipper = ClipSpaceClipper::new();
        let a = vertex(-0.5, 0.0, 0.0, 1.0);
        let b = vertex(0.5, 0.2, 0.0, 1.0);
        let (ca, cb) = clipper.clip_line(&a, &b).unwrap();
        assert_eq!(ca, a);
        assert_eq!(cb, b);
    }

    #[test]
    fn line_crossing_right_plane_is_shortened() {
        let clipper = ClipSpaceClipper::new();
        let a = tagged(0.0, 0.0, 0.0);
        let b = tagged(2.0, 0.0, 1.0);
        let (ca, cb) = clipper.clip_line(&a, &b).unwrap();
        assert_eq!(ca, a);
        assert_relative_eq!(cb.position.x, 1.0);
        assert_relative_eq!(cb.varyings[0].as_float().unwrap(), 0.5);
    }

    #[test]
    fn line_outside_is_rejected() {
        let clipper = ClipSpaceClipper::new();
        let a = vertex(1.5, 0.0, 0.0, 1.0);
        let b = vertex(3.0, 0.5, 0.0, 1.0);
        assert!(clipper.clip_line(&a, &b).is_none());

        // Each endpoint passes a different plane, but the segment misses the cube.
        let a = vertex(-2.0, 0.5, 0.0, 1.0);
        let b = vertex(0.5, 3.0, 0.0, 1.0);
        assert!(clipper.clip_line(&a, &b).is_none());
    }
}
