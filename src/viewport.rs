//! Mapping between normalized device coordinates and screen space.
//!
//! ```text
//! screen_x = (ndc_x + 1) / 2 * width
//! screen_y = (1 - ndc_y) / 2 * height   (rows grow downward, NDC y grows upward)
//! screen_z = (ndc_z + 1) / 2            ([-1, 1] depth remapped to [0, 1])
//! ```

use crate::math::vec3::Vec3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    #[inline]
    pub fn to_screen(&self, ndc: Vec3) -> Vec3 {
        Vec3::new(
            (ndc.x + 1.0) * 0.5 * self.width,
            (1.0 - ndc.y) * 0.5 * self.height,
            (ndc.z + 1.0) * 0.5,
        )
    }

    /// Inverse of [`to_screen`](Self::to_screen).
    #[inline]
    pub fn to_ndc(&self, screen: Vec3) -> Vec3 {
        Vec3::new(
            screen.x / self.width * 2.0 - 1.0,
            1.0 - screen.y / self.height * 2.0,
            screen.z * 2.0 - 1.0,
        )
    }
}
