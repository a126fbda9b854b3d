//! A formatted, independently transformable run of text.

use std::cell::Cell;

use glam::Mat4;

use crate::layout::GlyphQuad;

use super::uniforms::BlockUniform;

/// Draw-time parameters of a block and whether the GPU copy is stale.
///
/// Setters only mark the state dirty; the renderer uploads at most once per
/// `render` call, and only when something changed.
#[derive(Debug)]
pub(crate) struct BlockState {
    /// Pixel scale baked into the quads at layout time.
    layout_scale: f32,
    pixel_scale: f32,
    transform: Mat4,
    color: [f32; 4],
    distance_range: f32,
    dirty: Cell<bool>,
}

impl BlockState {
    pub(crate) fn new(layout_scale: f32, color: [f32; 4], distance_range: f32) -> Self {
        Self {
            layout_scale,
            pixel_scale: layout_scale,
            transform: Mat4::IDENTITY,
            color,
            distance_range,
            dirty: Cell::new(true),
        }
    }

    pub(crate) fn set_pixel_scale(&mut self, scale: f32) {
        if !scale.is_finite() {
            log::warn!("non-finite pixel scale {scale} applied to text block");
        }
        self.pixel_scale = scale;
        self.dirty.set(true);
    }

    pub(crate) fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
        self.dirty.set(true);
    }

    pub(crate) fn set_color(&mut self, color: [f32; 4]) {
        self.color = color;
        self.dirty.set(true);
    }

    /// False when the baked geometry is degenerate, so no later
    /// `set_pixel_scale` can make the block visible.
    pub(crate) fn is_rescalable(&self) -> bool {
        self.layout_scale.is_finite() && self.layout_scale != 0.0
    }

    /// Factor applied to baked geometry so the block renders at `pixel_scale`.
    pub(crate) fn draw_scale(&self) -> f32 {
        if self.layout_scale == 0.0 {
            0.0
        } else {
            self.pixel_scale / self.layout_scale
        }
    }

    pub(crate) fn uniform(&self) -> BlockUniform {
        BlockUniform {
            transform: self.transform,
            color: self.color,
            scale: self.draw_scale(),
            distance_range: self.distance_range,
        }
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// The uniform to upload, if it changed since the last call.
    pub(crate) fn take_dirty(&self) -> Option<BlockUniform> {
        self.dirty.replace(false).then(|| self.uniform())
    }
}

/// Text laid out once and drawn any number of times.
///
/// Geometry, source text and centering are fixed at creation. Pixel scale,
/// transform and color can change every frame. Dropping the block releases
/// its GPU buffers.
pub struct TextBlock {
    text: String,
    quads: Vec<GlyphQuad>,
    centered: bool,
    pub(super) state: BlockState,
    pub(super) instances: wgpu::Buffer,
    pub(super) uniform_buffer: wgpu::Buffer,
    pub(super) uniform_bind_group: wgpu::BindGroup,
    pub(super) atlas_bind_group: wgpu::BindGroup,
}

impl TextBlock {
    pub(super) fn new(
        text: String,
        quads: Vec<GlyphQuad>,
        centered: bool,
        state: BlockState,
        instances: wgpu::Buffer,
        uniform_buffer: wgpu::Buffer,
        uniform_bind_group: wgpu::BindGroup,
        atlas_bind_group: wgpu::BindGroup,
    ) -> Self {
        Self {
            text,
            quads,
            centered,
            state,
            instances,
            uniform_buffer,
            uniform_bind_group,
            atlas_bind_group,
        }
    }

    pub fn source_text(&self) -> &str {
        &self.text
    }

    pub fn quads(&self) -> &[GlyphQuad] {
        &self.quads
    }

    pub fn quad_count(&self) -> u32 {
        self.quads.len() as u32
    }

    pub fn is_centered(&self) -> bool {
        self.centered
    }

    pub fn pixel_scale(&self) -> f32 {
        self.state.pixel_scale
    }

    pub fn transform(&self) -> Mat4 {
        self.state.transform
    }

    pub fn color(&self) -> [f32; 4] {
        self.state.color
    }

    /// Rescale at draw time. Geometry is not recomputed; last value wins.
    pub fn set_pixel_scale(&mut self, scale: f32) {
        self.state.set_pixel_scale(scale);
    }

    /// Replace the world transform. Degenerate matrices are accepted as-is.
    pub fn set_transform(&mut self, transform: Mat4) {
        self.state.set_transform(transform);
    }

    pub fn set_color(&mut self, color: [f32; 4]) {
        self.state.set_color(color);
    }

    /// The uniform contents the next draw will use.
    pub fn uniform(&self) -> BlockUniform {
        self.state.uniform()
    }

    /// Whether the next `render` will re-upload this block's uniform.
    pub fn needs_upload(&self) -> bool {
        self.state.is_dirty()
    }
}
