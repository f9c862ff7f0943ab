//! Decoding vertex records out of the caller's raw byte buffer.
//!
//! The pipeline treats the vertex buffer as an opaque arena: record `i`
//! starts at `i * vertex_stride`. Vertex stages that store plain `f32`
//! attributes can describe the record with a [`VertexLayout`] instead of
//! slicing bytes by hand.

use crate::math::vec4::Vec4;

const FLOAT_SIZE: usize = std::mem::size_of::<f32>();

/// One float attribute inside a vertex record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Byte offset from the start of the record.
    pub offset: usize,
    /// Number of `f32` components, 1 to 4.
    pub components: usize,
}

/// Ordered list of tightly packed little-endian `f32` attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VertexLayout {
    attributes: Vec<VertexAttribute>,
    stride: usize,
}

impl VertexLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an attribute of `components` floats after the previous one.
    ///
    /// The component count is clamped to `1..=4`.
    pub fn with_attribute(mut self, components: usize) -> Self {
        let components = components.clamp(1, 4);
        self.attributes.push(VertexAttribute {
            offset: self.stride,
            components,
        });
        self.stride += components * FLOAT_SIZE;
        self
    }

    /// Size in bytes of one record.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    /// Reads attribute `index` from `record`.
    ///
    /// Missing components default to `(0, 0, 0, 1)`, so a two-component
    /// position decodes as a point on the z = 0 plane. Returns `None` when
    /// the attribute does not exist or the record is too short.
    pub fn read(&self, record: &[u8], index: usize) -> Option<Vec4> {
        let attr = self.attributes.get(index)?;
        let bytes = record.get(attr.offset..attr.offset + attr.components * FLOAT_SIZE)?;

        let mut out = [0.0, 0.0, 0.0, 1.0];
        for (slot, chunk) in out.iter_mut().zip(bytes.chunks_exact(FLOAT_SIZE)) {
            *slot = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Some(Vec4::new(out[0], out[1], out[2], out[3]))
    }
}

/// Encodes floats as the little-endian bytes [`VertexLayout::read`] expects.
pub fn encode_floats(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}
