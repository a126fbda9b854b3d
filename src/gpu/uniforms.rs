//! CPU mirrors of the shader's uniform blocks.

use glam::Mat4;

use super::instance_writer::{push_f32s, push_mat4};
use super::pipeline::{BLOCK_UNIFORM_SIZE, CAMERA_UNIFORM_SIZE};

/// Shared camera matrices, group(0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraUniform {
    pub projection: Mat4,
    pub view: Mat4,
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
        }
    }
}

impl CameraUniform {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(CAMERA_UNIFORM_SIZE as usize);
        push_mat4(&mut out, &self.projection);
        push_mat4(&mut out, &self.view);
        out
    }
}

/// Per-block state the shader reads, group(2).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockUniform {
    pub transform: Mat4,
    /// Straight (non-premultiplied) RGBA; the shader premultiplies.
    pub color: [f32; 4],
    /// Multiplier applied to the baked quad geometry.
    pub scale: f32,
    /// Atlas distance range in texels.
    pub distance_range: f32,
}

impl BlockUniform {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(BLOCK_UNIFORM_SIZE as usize);
        push_mat4(&mut out, &self.transform);
        push_f32s(&mut out, &self.color);
        push_f32s(&mut out, &[self.scale, self.distance_range, 0.0, 0.0]);
        out
    }
}
