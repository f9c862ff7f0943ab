use std::path::Path;

use thiserror::Error;

use crate::colors::to_float;
use crate::math::vec4::Vec4;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to decode texture: {0}")]
    Decode(#[from] image::ImageError),

    #[error("texture data holds {actual} bytes, {width}x{height} RGBA needs {expected}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("texture dimensions must be non-zero")]
    Empty,
}

/// An RGBA image that fragment stages can sample through
/// [`ShaderParameter::Texture`](crate::render::shader::ShaderParameter::Texture).
#[derive(Debug, Clone)]
pub struct Texture {
    data: Vec<[u8; 4]>, // Row-major, top-left origin.
    width: u32,
    height: u32,
}

impl Texture {
    /// Load a texture from an image file (PNG, JPG, etc.)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let img = image::open(path)?.to_rgba8();
        let (width, height) = img.dimensions();
        Self::from_rgba8(width, height, img.into_raw())
    }

    /// Build a texture from tightly packed RGBA8 bytes.
    pub fn from_rgba8(width: u32, height: u32, bytes: Vec<u8>) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::Empty);
        }
        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            return Err(TextureError::SizeMismatch {
                width,
                height,
                expected,
                actual: bytes.len(),
            });
        }

        let data = bytes
            .chunks_exact(4)
            .map(|p| [p[0], p[1], p[2], p[3]])
            .collect();

        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Sample the texture at UV coordinates using nearest-neighbor lookup.
    ///
    /// `(0, 0)` is the bottom-left corner, so V is flipped against the
    /// top-left storage order. Coordinates outside `[0, 1)` wrap.
    #[inline]
    pub fn sample(&self, u: f32, v: f32) -> Vec4 {
        // rem_euclid keeps negative coordinates in range, unlike %
        let u = u.rem_euclid(1.0);
        let v = (1.0 - v).rem_euclid(1.0);

        let x = ((u * self.width as f32) as u32).min(self.width - 1);
        let y = ((v * self.height as f32) as u32).min(self.height - 1);

        let [r, g, b, a] = self.data[y as usize * self.width as usize + x as usize];
        Vec4::new(to_float(r), to_float(g), to_float(b), to_float(a))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}
