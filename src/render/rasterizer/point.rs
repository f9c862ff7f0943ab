//! Square point stamping.

use super::{write_fragment, FragmentStats, ScreenVertex};
use crate::render::framebuffer::Framebuffer;
use crate::render::shader::{FragmentShader, ShaderProgram, VertexShader};

/// Stamps every pixel of `[x - s, x + s] x [y - s, y + s]`, `s = half_size`,
/// with the point's depth and varyings.
///
/// Both corners are clamped into the framebuffer, so a point centered on
/// the right or bottom border still covers the last column or row.
pub fn rasterize_point<V, F>(
    point: &ScreenVertex,
    half_size: u32,
    program: &ShaderProgram<V, F>,
    fb: &mut Framebuffer,
) -> FragmentStats
where
    V: VertexShader,
    F: FragmentShader,
{
    let mut stats = FragmentStats::default();

    let center_x = point.position.x.floor() as i64;
    let center_y = point.position.y.floor() as i64;
    let s = half_size as i64;
    let max_x = fb.width() as i64 - 1;
    let max_y = fb.height() as i64 - 1;

    let (start_x, end_x) = ((center_x - s).clamp(0, max_x), (center_x + s).clamp(0, max_x));
    let (start_y, end_y) = ((center_y - s).clamp(0, max_y), (center_y + s).clamp(0, max_y));

    for y in start_y..=end_y {
        for x in start_x..=end_x {
            stats.record(write_fragment(
                x as u32,
                y as u32,
                point.position.z,
                &point.varyings,
                program,
                fb,
            ));
        }
    }

    stats
}
