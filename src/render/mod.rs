//! Framebuffer, shader interfaces and primitive rasterizers.

pub mod framebuffer;
pub mod rasterizer;
pub mod shader;
pub mod vertex;

pub use framebuffer::{Framebuffer, FramebufferError};
pub use rasterizer::{FragmentOutcome, FragmentStats, ScreenVertex};
pub use shader::{
    FragmentShader, ShaderParameter, ShaderProgram, Uniforms, Varyings, VertexShader,
};
pub use vertex::{encode_floats, VertexAttribute, VertexLayout};
