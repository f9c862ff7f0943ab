//! A software 3D rasterization pipeline.
//!
//! Primitives described by a raw vertex buffer are run through a
//! user-supplied vertex stage, clipped in homogeneous clip space, mapped to
//! the viewport and rasterized into an 8-bit RGB color buffer with a
//! per-pixel `f32` depth buffer. Everything runs on the CPU, synchronously,
//! one draw call at a time.
//!
//! # Quick Start
//!
//! ```
//! use softpipe::prelude::*;
//!
//! let layout = VertexLayout::new().with_attribute(4);
//! let vertex = move |record: &[u8], _: &mut Varyings, _: &Uniforms| {
//!     layout.read(record, 0).unwrap_or(Vec4::ZERO)
//! };
//! let fragment = |_: &Varyings, _: &Uniforms, _: Vec2| Some(Vec4::rgb(1.0, 0.0, 0.0));
//! let program = ShaderProgram::new(vertex, fragment, 16);
//!
//! let vertices = encode_floats(&[
//!     -1.0, -1.0, 0.0, 1.0,
//!      1.0, -1.0, 0.0, 1.0,
//!      0.0,  1.0, 0.0, 1.0,
//! ]);
//! let mut fb = Framebuffer::new(64, 64)?;
//! let stats = draw(PrimitiveKind::Triangle, &vertices, 3, &program, &mut fb);
//! assert!(stats.fragments.written > 0);
//! # Ok::<(), softpipe::render::FramebufferError>(())
//! ```

pub mod clipper;
pub mod colors;
pub mod math;
pub mod pipeline;
pub mod render;
pub mod texture;
pub mod viewport;

pub use pipeline::{
    draw, CullMode, DrawStats, FrontFace, Pipeline, PipelineConfig, PrimitiveKind,
};
pub use render::{
    FragmentShader, Framebuffer, FramebufferError, ShaderParameter, ShaderProgram, Uniforms,
    Varyings, VertexShader,
};
pub use texture::{Texture, TextureError};
pub use viewport::Viewport;

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use softpipe::prelude::*;
/// ```
pub mod prelude {
    // Pipeline
    pub use crate::pipeline::{
        draw, CullMode, DrawStats, FrontFace, Pipeline, PipelineConfig, PrimitiveKind,
    };

    // Rendering
    pub use crate::render::{
        encode_floats, FragmentShader, Framebuffer, ShaderParameter, ShaderProgram, Uniforms,
        Varyings, VertexLayout, VertexShader,
    };
    pub use crate::texture::Texture;

    // Math
    pub use crate::math::mat4::Mat4;
    pub use crate::math::vec2::Vec2;
    pub use crate::math::vec3::Vec3;
    pub use crate::math::vec4::Vec4;
}
