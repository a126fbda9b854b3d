//! Byte encoding for glyph instances, shared by every text block upload.

use crate::layout::GlyphQuad;

use super::pipeline::INSTANCE_STRIDE;

/// Create a vertex buffer holding `data`.
///
/// The buffer is never smaller than one instance so empty blocks still own a
/// valid binding; draws of zero instances are skipped by the renderer.
pub(super) fn create_instance_buffer(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    data: &[u8],
    label: &str,
) -> wgpu::Buffer {
    let needed = (data.len() as u64).max(INSTANCE_STRIDE);
    let buf = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: needed,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    if !data.is_empty() {
        queue.write_buffer(&buf, 0, data);
    }
    buf
}

/// Writes glyph instance data to a byte buffer without unsafe code.
pub(super) struct InstanceWriter {
    data: Vec<u8>,
}

impl InstanceWriter {
    pub(super) fn with_capacity(quads: usize) -> Self {
        Self {
            data: Vec::with_capacity(quads * INSTANCE_STRIDE as usize),
        }
    }

    /// Write a full 32-byte instance record.
    pub(super) fn push_quad(&mut self, quad: &GlyphQuad) {
        for v in quad
            .position
            .iter()
            .chain(&quad.size)
            .chain(&quad.uv_min)
            .chain(&quad.uv_max)
        {
            self.data.extend_from_slice(&v.to_ne_bytes());
        }
    }

    pub(super) fn count(&self) -> u32 {
        (self.data.len() / INSTANCE_STRIDE as usize) as u32
    }

    pub(super) fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Append a column-major matrix to `out`.
pub(super) fn push_mat4(out: &mut Vec<u8>, m: &glam::Mat4) {
    for v in m.to_cols_array() {
        out.extend_from_slice(&v.to_ne_bytes());
    }
}

pub(super) fn push_f32s(out: &mut Vec<u8>, values: &[f32]) {
    for v in values {
        out.extend_from_slice(&v.to_ne_bytes());
    }
}
