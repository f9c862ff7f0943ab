//! 4x4 transformation matrix using column-vector convention.
//!
//! # Convention
//! - Vectors are **column vectors** on the right: `Mat4 * Vec`
//! - Translation is stored in the **last column**
//! - Transforms chain **right-to-left**: `A * B * v` applies B first, then A
//!
//! Vertex stages use it to produce clip-space positions; the pipeline
//! itself never touches matrices.

use std::ops::Mul;

use super::vec4::Vec4;

/// 4x4 matrix stored as `data[row][col]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    data: [[f32; 4]; 4],
}

impl Mat4 {
    pub const fn new(data: [[f32; 4]; 4]) -> Self {
        Mat4 { data }
    }

    pub const fn identity() -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub const fn translation(x: f32, y: f32, z: f32) -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, x],
            [0.0, 1.0, 0.0, y],
            [0.0, 0.0, 1.0, z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Mat4::new([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Right-handed perspective projection mapping view depth `[near, far]`
    /// to NDC z `[-1, 1]` (camera looks down -Z, `w = -z_view`).
    pub fn perspective(fov_y: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fov_y / 2.0).tan();
        let a = (far + near) / (near - far);
        let b = 2.0 * far * near / (near - far);
        Mat4::new([
            [f / aspect_ratio, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, a, b],
            [0.0, 0.0, -1.0, 0.0],
        ])
    }

    /// Access element at [row][col].
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row][col]
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

/// Matrix multiplication: Mat4 * Mat4.
impl Mul<Mat4> for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Self::Output {
        let mut result = [[0.0f32; 4]; 4];

        for (row, out) in result.iter_mut().enumerate() {
            for (col, cell) in out.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.data[row][k] * rhs.data[k][col]).sum();
            }
        }

        Mat4::new(result)
    }
}

/// Transform a Vec4 by a matrix: Mat4 * Vec4 (column vector).
impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    fn mul(self, v: Vec4) -> Self::Output {
        let row = |r: [f32; 4]| r[0] * v.x + r[1] * v.y + r[2] * v.z + r[3] * v.w;
        Vec4::new(
            row(self.data[0]),
            row(self.data[1]),
            row(self.data[2]),
            row(self.data[3]),
        )
    }
}
