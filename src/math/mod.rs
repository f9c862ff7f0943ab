//! Fixed-size float vectors, a 4x4 matrix, and scalar helpers.

pub mod mat4;
pub mod utils;
pub mod vec2;
pub mod vec3;
pub mod vec4;
