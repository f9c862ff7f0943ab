//! The programmable stages a caller plugs into the pipeline.
//!
//! Similar to how GPUs separate fixed-function work from programmable
//! shaders, the pipeline handles:
//! - Invoking the vertex stage once per vertex record
//! - Clipping, perspective division and the viewport transform
//! - Rasterization, varying interpolation and depth testing
//!
//! The caller supplies:
//! - A [`VertexShader`] that turns one raw vertex record into a clip-space
//!   position and fills per-vertex [`Varyings`]
//! - A [`FragmentShader`] that turns interpolated varyings into a color or
//!   discards the fragment
//!
//! Both stages see the same read-only [`Uniforms`]. Which
//! [`ShaderParameter`] variant sits in which slot is a contract between the
//! two stages; the pipeline never inspects it beyond interpolation.

use std::any::Any;
use std::fmt;
use std::ops::{Index, IndexMut};
use std::sync::Arc;

use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;
use crate::math::vec4::Vec4;
use crate::texture::Texture;

/// Maximum number of values a vertex stage can hand to the fragment stage.
pub const MAX_VARYING_PARAMS: usize = 8;

/// Maximum number of uniform values a shader program carries.
pub const MAX_UNIFORM_PARAMS: usize = 8;

/// A value passed into or between shader stages.
#[derive(Clone)]
pub enum ShaderParameter {
    Int(i32),
    UInt(u32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Texture(Arc<Texture>),
    User(Arc<dyn Any + Send + Sync>),
}

impl ShaderParameter {
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u32> {
        match self {
            Self::UInt(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vec2(&self) -> Option<Vec2> {
        match self {
            Self::Vec2(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vec3(&self) -> Option<Vec3> {
        match self {
            Self::Vec3(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vec4(&self) -> Option<Vec4> {
        match self {
            Self::Vec4(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_texture(&self) -> Option<&Texture> {
        match self {
            Self::Texture(t) => Some(t.as_ref()),
            _ => None,
        }
    }

    /// Downcasts a [`ShaderParameter::User`] payload.
    pub fn as_user<T: Any>(&self) -> Option<&T> {
        match self {
            Self::User(data) => data.downcast_ref(),
            _ => None,
        }
    }

    /// Weighted blend of up to three parameters.
    ///
    /// Float and vector variants are blended component-wise. Every other
    /// variant, and any pair whose tags disagree, keeps the first value.
    fn blend(params: &[&ShaderParameter], weights: &[f32]) -> ShaderParameter {
        let first = params[0];
        let pairs = params.iter().zip(weights);
        let blended = match first {
            Self::Float(_) => pairs
                .map(|(p, &k)| p.as_float().map(|v| v * k))
                .sum::<Option<f32>>()
                .map(Self::Float),
            Self::Vec2(_) => pairs
                .map(|(p, &k)| p.as_vec2().map(|v| v * k))
                .try_fold(Vec2::ZERO, |acc, v| v.map(|v| acc + v))
                .map(Self::Vec2),
            Self::Vec3(_) => pairs
                .map(|(p, &k)| p.as_vec3().map(|v| v * k))
                .try_fold(Vec3::ZERO, |acc, v| v.map(|v| acc + v))
                .map(Self::Vec3),
            Self::Vec4(_) => pairs
                .map(|(p, &k)| p.as_vec4().map(|v| v * k))
                .try_fold(Vec4::ZERO, |acc, v| v.map(|v| acc + v))
                .map(Self::Vec4),
            _ => None,
        };
        blended.unwrap_or_else(|| first.clone())
    }
}

impl Default for ShaderParameter {
    fn default() -> Self {
        Self::Float(0.0)
    }
}

impl fmt::Debug for ShaderParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Self::UInt(v) => f.debug_tuple("UInt").field(v).finish(),
            Self::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Self::Vec2(v) => f.debug_tuple("Vec2").field(v).finish(),
            Self::Vec3(v) => f.debug_tuple("Vec3").field(v).finish(),
            Self::Vec4(v) => f.debug_tuple("Vec4").field(v).finish(),
            Self::Texture(t) => write!(f, "Texture({}x{})", t.width(), t.height()),
            Self::User(_) => f.write_str("User(..)"),
        }
    }
}

impl PartialEq for ShaderParameter {
    /// Value equality for plain data, identity for shared references.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::UInt(a), Self::UInt(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Vec2(a), Self::Vec2(b)) => a == b,
            (Self::Vec3(a), Self::Vec3(b)) => a == b,
            (Self::Vec4(a), Self::Vec4(b)) => a == b,
            (Self::Texture(a), Self::Texture(b)) => Arc::ptr_eq(a, b),
            (Self::User(a), Self::User(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

macro_rules! impl_from_param {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for ShaderParameter {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_from_param! {
    i32 => Int,
    u32 => UInt,
    f32 => Float,
    Vec2 => Vec2,
    Vec3 => Vec3,
    Vec4 => Vec4,
    Arc<Texture> => Texture,
}

/// Fixed-capacity slot array of shader parameters.
///
/// Every slot starts as `Float(0.0)`, the "empty" output a vertex stage
/// receives before writing its varyings.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterSlots<const N: usize> {
    slots: [ShaderParameter; N],
}

/// Per-vertex outputs of the vertex stage, interpolated per fragment.
pub type Varyings = ParameterSlots<MAX_VARYING_PARAMS>;

/// Per-draw-call constants shared by both stages.
pub type Uniforms = ParameterSlots<MAX_UNIFORM_PARAMS>;

impl<const N: usize> ParameterSlots<N> {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| ShaderParameter::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        N
    }

    pub fn get(&self, slot: usize) -> Option<&ShaderParameter> {
        self.slots.get(slot)
    }

    /// Stores `value` in `slot`; out-of-range slots are ignored.
    pub fn set(&mut self, slot: usize, value: impl Into<ShaderParameter>) -> &mut Self {
        match self.slots.get_mut(slot) {
            Some(s) => *s = value.into(),
            None => log::warn!("shader parameter slot {} out of range (capacity {})", slot, N),
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShaderParameter> {
        self.slots.iter()
    }

    /// Linear interpolation between two vertices' slots, `t` in `[0, 1]`.
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            slots: std::array::from_fn(|i| {
                ShaderParameter::blend(&[&self.slots[i], &other.slots[i]], &[1.0 - t, t])
            }),
        }
    }

    /// Barycentric interpolation across a triangle's three vertices.
    pub fn interpolate(vertices: [&Self; 3], weights: [f32; 3]) -> Self {
        Self {
            slots: std::array::from_fn(|i| {
                ShaderParameter::blend(
                    &[
                        &vertices[0].slots[i],
                        &vertices[1].slots[i],
                        &vertices[2].slots[i],
                    ],
                    &weights,
                )
            }),
        }
    }
}

impl<const N: usize> Default for ParameterSlots<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Index<usize> for ParameterSlots<N> {
    type Output = ShaderParameter;

    fn index(&self, slot: usize) -> &Self::Output {
        &self.slots[slot]
    }
}

impl<const N: usize> IndexMut<usize> for ParameterSlots<N> {
    fn index_mut(&mut self, slot: usize) -> &mut Self::Output {
        &mut self.slots[slot]
    }
}

/// Vertex stage: maps one raw vertex record to a clip-space position.
///
/// `vertex` is exactly `vertex_stride` bytes. Anything the fragment stage
/// needs goes into `varyings`.
pub trait VertexShader {
    fn shade(&self, vertex: &[u8], varyings: &mut Varyings, uniforms: &Uniforms) -> Vec4;
}

impl<F> VertexShader for F
where
    F: Fn(&[u8], &mut Varyings, &Uniforms) -> Vec4,
{
    #[inline]
    fn shade(&self, vertex: &[u8], varyings: &mut Varyings, uniforms: &Uniforms) -> Vec4 {
        self(vertex, varyings, uniforms)
    }
}

/// Fragment stage: computes a color for one fragment.
///
/// `frag_coord` holds the pixel coordinates. Returning `None` discards the
/// fragment, leaving color and depth untouched.
pub trait FragmentShader {
    fn shade(&self, varyings: &Varyings, uniforms: &Uniforms, frag_coord: Vec2) -> Option<Vec4>;
}

impl<F> FragmentShader for F
where
    F: Fn(&Varyings, &Uniforms, Vec2) -> Option<Vec4>,
{
    #[inline]
    fn shade(&self, varyings: &Varyings, uniforms: &Uniforms, frag_coord: Vec2) -> Option<Vec4> {
        self(varyings, uniforms, frag_coord)
    }
}

/// A vertex stage, a fragment stage, the vertex record size and the
/// uniforms of one draw call.
pub struct ShaderProgram<V, F> {
    pub vertex_shader: V,
    pub fragment_shader: F,
    /// Size in bytes of one vertex record in the raw buffer.
    pub vertex_stride: usize,
    pub uniforms: Uniforms,
}

impl<V: VertexShader, F: FragmentShader> ShaderProgram<V, F> {
    pub fn new(vertex_shader: V, fragment_shader: F, vertex_stride: usize) -> Self {
        Self {
            vertex_shader,
            fragment_shader,
            vertex_stride,
            uniforms: Uniforms::new(),
        }
    }

    pub fn with_uniform(mut self, slot: usize, value: impl Into<ShaderParameter>) -> Self {
        self.uniforms.set(slot, value);
        self
    }
}
