//! Owned color and depth targets for a draw call.
//!
//! The color buffer stores one RGB triple per pixel and the depth buffer one
//! `f32` per pixel, both row-major with the origin at the top-left corner:
//! pixel `(x, y)` lives at `index = y * width + x`, its color at
//! `index * 3 .. index * 3 + 3`.
//!
//! # Depth Convention
//!
//! Depth is the screen-space z in `[0, 1]`. Smaller values are nearer, the
//! depth test passes on a strict `<`, and [`Framebuffer::FAR_DEPTH`] (`1.0`)
//! is the value to clear with at the start of a frame.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FramebufferError {
    #[error("framebuffer dimensions must be non-zero, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("failed to allocate {what} buffer for a {width}x{height} framebuffer")]
    Allocation {
        what: &'static str,
        width: u32,
        height: u32,
    },
}

/// A render target owning a color image and a parallel depth image.
///
/// Both buffers are always `width * height` pixels long until
/// [`release`](Framebuffer::release) frees them together; a released
/// framebuffer ignores clears and fragment writes.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    color_buffer: Vec<u8>,
    depth_buffer: Vec<f32>,
    width: u32,
    height: u32,
}

impl Framebuffer {
    pub const FAR_DEPTH: f32 = 1.0;

    /// Allocates both buffers, color cleared to black and depth to
    /// [`FAR_DEPTH`](Self::FAR_DEPTH).
    ///
    /// On failure nothing stays allocated: a color buffer reserved before
    /// the depth allocation failed is dropped with the error.
    pub fn new(width: u32, height: u32) -> Result<Self, FramebufferError> {
        if width == 0 || height == 0 {
            return Err(FramebufferError::InvalidDimensions { width, height });
        }

        let alloc_error = |what| FramebufferError::Allocation {
            what,
            width,
            height,
        };

        let pixels = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| alloc_error("color"))?;
        let color_len = pixels.checked_mul(3).ok_or_else(|| alloc_error("color"))?;

        let mut color_buffer = Vec::new();
        color_buffer
            .try_reserve_exact(color_len)
            .map_err(|_| alloc_error("color"))?;

        let mut depth_buffer = Vec::new();
        depth_buffer
            .try_reserve_exact(pixels)
            .map_err(|_| alloc_error("depth"))?;

        color_buffer.resize(color_len, 0);
        depth_buffer.resize(pixels, Self::FAR_DEPTH);

        log::debug!("allocated {}x{} framebuffer", width, height);

        Ok(Self {
            color_buffer,
            depth_buffer,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Sets every pixel's color to `(r, g, b)`.
    pub fn clear_color(&mut self, r: u8, g: u8, b: u8) {
        for pixel in self.color_buffer.chunks_exact_mut(3) {
            pixel.copy_from_slice(&[r, g, b]);
        }
    }

    /// Sets every pixel's depth to `depth`.
    pub fn clear_depth(&mut self, depth: f32) {
        self.depth_buffer.fill(depth);
    }

    /// Frees both buffers. Calling it again is a no-op.
    pub fn release(&mut self) {
        if self.is_released() {
            return;
        }
        self.color_buffer = Vec::new();
        self.depth_buffer = Vec::new();
        log::debug!("released {}x{} framebuffer", self.width, self.height);
    }

    pub fn is_released(&self) -> bool {
        self.depth_buffer.is_empty()
    }

    /// Row-major RGB bytes, three per pixel.
    pub fn color_buffer(&self) -> &[u8] {
        &self.color_buffer
    }

    /// Row-major depth values, one per pixel.
    pub fn depth_buffer(&self) -> &[f32] {
        &self.depth_buffer
    }

    /// Get the color at (x, y), or None if out of bounds or released.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        let idx = self.index(x, y)? * 3;
        let rgb = self.color_buffer.get(idx..idx + 3)?;
        Some([rgb[0], rgb[1], rgb[2]])
    }

    /// Get the depth at (x, y), or None if out of bounds or released.
    pub fn depth(&self, x: u32, y: u32) -> Option<f32> {
        self.depth_buffer.get(self.index(x, y)?).copied()
    }

    /// Copies the color buffer into an [`image::RgbImage`] for export.
    ///
    /// A released framebuffer yields a black image of the original size.
    pub fn to_image(&self) -> image::RgbImage {
        if self.is_released() {
            return image::RgbImage::new(self.width, self.height);
        }
        image::RgbImage::from_fn(self.width, self.height, |x, y| {
            let idx = (y as usize * self.width as usize + x as usize) * 3;
            image::Rgb([
                self.color_buffer[idx],
                self.color_buffer[idx + 1],
                self.color_buffer[idx + 2],
            ])
        })
    }

    #[inline]
    pub(crate) fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Depth currently stored at a linear pixel index.
    #[inline]
    pub(crate) fn stored_depth(&self, index: usize) -> Option<f32> {
        self.depth_buffer.get(index).copied()
    }

    /// Writes color and depth at a linear pixel index, without testing.
    #[inline]
    pub(crate) fn store(&mut self, index: usize, rgb: [u8; 3], depth: f32) {
        if let Some(slot) = self.depth_buffer.get_mut(index) {
            *slot = depth;
            self.color_buffer[index * 3..index * 3 + 3].copy_from_slice(&rgb);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sizes_both_buffers() {
        let fb = Framebuffer::new(5, 3).unwrap();
        assert_eq!(fb.color_buffer().len(), 5 * 3 * 3);
        assert_eq!(fb.depth_buffer().len(), 5 * 3);
        assert!(fb.depth_buffer().iter().all(|&d| d == Framebuffer::FAR_DEPTH));
    }

    #[test]
    fn new_rejects_zero_dimensions() {
        assert_eq!(
            Framebuffer::new(0, 4).unwrap_err(),
            FramebufferError::InvalidDimensions {
                width: 0,
                height: 4
            }
        );
    }

    #[test]
    fn new_reports_allocation_failure() {
        let err = Framebuffer::new(u32::MAX, u32::MAX).unwrap_err();
        assert!(matches!(err, FramebufferError::Allocation { .. }));
    }

    #[test]
    fn clear_color_sets_every_pixel() {
        let mut fb = Framebuffer::new(4, 4).unwrap();
        fb.clear_color(10, 20, 30);
        assert!(fb.color_buffer().chunks(3).all(|p| p == [10, 20, 30]));
        assert_eq!(fb.pixel(3, 3), Some([10, 20, 30]));
    }

    #[test]
    fn clear_depth_sets_every_pixel() {
        let mut fb = Framebuffer::new(4, 2).unwrap();
        fb.clear_depth(0.25);
        assert!(fb.depth_buffer().iter().all(|&d| d == 0.25));
    }

    #[test]
    fn out_of_bounds_access_is_none() {
        let fb = Framebuffer::new(2, 2).unwrap();
        assert_eq!(fb.pixel(2, 0), None);
        assert_eq!(fb.depth(0, 2), None);
    }

    #[test]
    fn store_uses_row_major_indexing() {
        let mut fb = Framebuffer::new(3, 2).unwrap();
        let idx = fb.index(2, 1).unwrap();
        assert_eq!(idx, 5);
        fb.store(idx, [1, 2, 3], 0.5);
        assert_eq!(&fb.color_buffer()[15..18], &[1, 2, 3]);
        assert_eq!(fb.depth(2, 1), Some(0.5));
    }

    #[test]
    fn release_is_idempotent() {
        let mut fb = Framebuffer::new(2, 2).unwrap();
        fb.release();
        assert!(fb.is_released());
        fb.release();
        assert!(fb.color_buffer().is_empty());
        assert_eq!(fb.pixel(0, 0), None);

        fb.clear_color(1, 1, 1);
        fb.clear_depth(0.0);
        assert!(fb.depth_buffer().is_empty());
    }

    #[test]
    fn to_image_matches_color_buffer() {
        let mut fb = Framebuffer::new(2, 1).unwrap();
        fb.clear_color(9, 8, 7);
        let img = fb.to_image();
        assert_eq!(img.dimensions(), (2, 1));
        assert_eq!(img.get_pixel(1, 0).0, [9, 8, 7]);
    }

    #[test]
    fn to_image_keeps_row_major_layout() {
        let mut fb = Framebuffer::new(3, 2).unwrap();
        let index = fb.index(2, 1).unwrap();
        fb.store(index, [40, 50, 60], 0.5);

        let img = fb.to_image();
        assert_eq!(img.get_pixel(2, 1).0, [40, 50, 60]);
        assert_eq!(img.get_pixel(2, 0).0, [0, 0, 0]);
        assert_eq!(img.get_pixel(0, 1).0, [0, 0, 0]);
    }
}
