//! Scalar and small geometric helpers shared by the pipeline stages.

use super::vec2::Vec2;

/// Clamps `value` to `[min, max]`.
///
/// Unlike [`f32::clamp`] this never panics on `min > max`; `min` wins.
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    let value = if value > max { max } else { value };
    if value < min {
        min
    } else {
        value
    }
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Returns true if `(x, y)` lies inside the rectangle or on its border.
pub fn point_intersect_rect(x: f32, y: f32, min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> bool {
    (min_x..=max_x).contains(&x) && (min_y..=max_y).contains(&y)
}

/// Barycentric coordinates `(u, v, w)` of `p` with respect to triangle `abc`.
///
/// `u` weights `a`, `v` weights `b` and `w` weights `c`; the three sum to 1.
/// Returns `None` for a zero-area triangle.
///
/// ```text
/// v = ((P-A) x (C-A)) / ((B-A) x (C-A))
/// w = ((B-A) x (P-A)) / ((B-A) x (C-A))
/// u = 1 - v - w
/// ```
pub fn barycentric(a: Vec2, b: Vec2, c: Vec2, p: Vec2) -> Option<(f32, f32, f32)> {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    let denom = ab.cross(ac);
    if denom == 0.0 {
        return None;
    }

    let v = ap.cross(ac) / denom;
    let w = ab.cross(ap) / denom;
    Some((1.0 - v - w, v, w))
}
