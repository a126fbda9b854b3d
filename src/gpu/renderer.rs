use glam::Mat4;

use crate::config::Config;
use crate::error::{FontError, GpuResourceError, RenderTargetError};
use crate::font::{FontSource, load_font_source};
use crate::layout::{self, LayoutOptions};

use super::atlas::{FontAsset, check_buffer_size};
use super::instance_writer::{InstanceWriter, create_instance_buffer};
use super::pipeline::{self, BLOCK_UNIFORM_SIZE, CAMERA_UNIFORM_SIZE};
use super::text_block::{BlockState, TextBlock};
use super::uniforms::CameraUniform;

/// A render pass plus the formats of the attachments it was begun with.
///
/// wgpu does not expose attachment formats on a pass, so the host states
/// them and [`TextRenderer::render`] checks them against the pipeline.
pub struct RenderTarget<'a, 'p> {
    pass: &'a mut wgpu::RenderPass<'p>,
    color_format: wgpu::TextureFormat,
    depth_format: Option<wgpu::TextureFormat>,
}

impl<'a, 'p> RenderTarget<'a, 'p> {
    pub fn new(pass: &'a mut wgpu::RenderPass<'p>, color_format: wgpu::TextureFormat) -> Self {
        Self {
            pass,
            color_format,
            depth_format: None,
        }
    }

    #[must_use]
    pub fn with_depth(mut self, format: wgpu::TextureFormat) -> Self {
        self.depth_format = Some(format);
        self
    }
}

/// Counters for one [`TextRenderer::render`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Blocks that issued a draw call.
    pub blocks_drawn: u32,
    pub quads_drawn: u32,
    /// Block uniforms written because a setter ran since the last render.
    pub uniforms_uploaded: u32,
}

/// MSDF text pipeline for one device and one set of output formats.
pub struct TextRenderer {
    pipeline: wgpu::RenderPipeline,
    color_format: wgpu::TextureFormat,
    depth_format: Option<wgpu::TextureFormat>,
    camera: CameraUniform,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    atlas_layout: wgpu::BindGroupLayout,
    block_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    config: Config,
}

impl TextRenderer {
    /// Build the pipeline. Output formats are fixed for the renderer's lifetime.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        color_format: wgpu::TextureFormat,
        depth_format: Option<wgpu::TextureFormat>,
        config: Config,
    ) -> Self {
        let camera_layout = pipeline::create_camera_bind_group_layout(device);
        let atlas_layout = pipeline::create_atlas_bind_group_layout(device);
        let block_layout = pipeline::create_block_bind_group_layout(device);

        let depth_stencil = depth_format.map(|format| {
            pipeline::depth_stencil_state(
                format,
                config.pipeline.depth_compare.to_wgpu(),
                config.pipeline.depth_write,
            )
        });
        let pipeline = pipeline::create_text_pipeline(
            device,
            color_format,
            depth_stencil,
            &camera_layout,
            &atlas_layout,
            &block_layout,
        );

        let camera = CameraUniform::default();
        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("camera_uniform_buffer"),
            size: CAMERA_UNIFORM_SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        queue.write_buffer(&camera_buffer, 0, &camera.to_bytes());

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera_bind_group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("msdf_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        log::debug!("text renderer created: color={color_format:?}, depth={depth_format:?}");

        Self {
            pipeline,
            color_format,
            depth_format,
            camera,
            camera_buffer,
            camera_bind_group,
            atlas_layout,
            block_layout,
            sampler,
            config,
        }
    }

    pub fn color_format(&self) -> wgpu::TextureFormat {
        self.color_format
    }

    pub fn depth_format(&self) -> Option<wgpu::TextureFormat> {
        self.depth_format
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current camera as last written by [`update_camera`](Self::update_camera).
    pub fn camera(&self) -> CameraUniform {
        self.camera
    }

    /// Load a font document and its atlas from `url`, then upload the atlas.
    ///
    /// No caching: every call reads and uploads again.
    pub fn create_font(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        url: &str,
    ) -> Result<FontAsset, FontError> {
        let source = load_font_source(url)?;
        Ok(self.upload_font(device, queue, source)?)
    }

    /// Upload an already decoded font. The configured fallback advance, if
    /// any, replaces the font's own.
    pub fn upload_font(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        source: FontSource,
    ) -> Result<FontAsset, GpuResourceError> {
        let FontSource { font, atlas, path } = source;
        let font = match self.config.font.fallback_advance {
            Some(advance) => font.with_fallback_advance(advance),
            None => font,
        };
        log::debug!("uploading font atlas from {}", path.display());
        FontAsset::upload(device, queue, &self.atlas_layout, &self.sampler, font, &atlas)
    }

    /// Lay out `text` with `font` and upload it as a new block.
    pub fn format_text(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        font: &FontAsset,
        text: &str,
        options: &LayoutOptions,
    ) -> Result<TextBlock, GpuResourceError> {
        if text.trim().is_empty() {
            log::warn!("formatting text block with no visible characters");
        }

        let quads = layout::layout(font.font(), text, options);
        let mut writer = InstanceWriter::with_capacity(quads.len());
        for quad in &quads {
            writer.push_quad(quad);
        }
        check_buffer_size(
            writer.as_bytes().len() as u64,
            device.limits().max_buffer_size,
        )?;

        let instances = create_instance_buffer(device, queue, writer.as_bytes(), "text_instances");
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("text_block_uniform_buffer"),
            size: BLOCK_UNIFORM_SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("text_block_bind_group"),
            layout: &self.block_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        log::debug!(
            "text block created: {} chars, {} quads, centered={}",
            text.chars().count(),
            writer.count(),
            options.centered
        );

        let state = BlockState::new(
            options.pixel_scale,
            options.color,
            font.font().distance_range(),
        );
        if !state.is_rescalable() {
            log::warn!(
                "text block formatted with pixel scale {}; it cannot be rescaled later",
                options.pixel_scale
            );
        }
        Ok(TextBlock::new(
            text.to_owned(),
            quads,
            options.centered,
            state,
            instances,
            uniform_buffer,
            uniform_bind_group,
            font.bind_group().clone(),
        ))
    }

    /// [`format_text`](Self::format_text) with the configured `[text]` options.
    pub fn format_text_default(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        font: &FontAsset,
        text: &str,
    ) -> Result<TextBlock, GpuResourceError> {
        let options = self.config.text.layout_options();
        self.format_text(device, queue, font, text, &options)
    }

    /// Write the shared camera. Every block drawn afterwards sees these matrices.
    pub fn update_camera(&mut self, queue: &wgpu::Queue, projection: Mat4, view: Mat4) {
        self.camera = CameraUniform { projection, view };
        queue.write_buffer(&self.camera_buffer, 0, &self.camera.to_bytes());
    }

    /// Record draws for `blocks`, in order, into the target's pass.
    ///
    /// Dirty block uniforms are uploaded first; blocks without quads upload
    /// but issue no draw.
    pub fn render(
        &self,
        queue: &wgpu::Queue,
        target: &mut RenderTarget<'_, '_>,
        blocks: &[&TextBlock],
    ) -> Result<RenderStats, RenderTargetError> {
        check_target_formats(
            (self.color_format, self.depth_format),
            (target.color_format, target.depth_format),
        )?;

        let mut stats = RenderStats::default();
        let rpass = &mut *target.pass;
        for block in blocks {
            if let Some(uniform) = block.state.take_dirty() {
                queue.write_buffer(&block.uniform_buffer, 0, &uniform.to_bytes());
                stats.uniforms_uploaded += 1;
            }

            let count = block.quad_count();
            if count == 0 {
                continue;
            }
            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.camera_bind_group, &[]);
            rpass.set_bind_group(1, &block.atlas_bind_group, &[]);
            rpass.set_bind_group(2, &block.uniform_bind_group, &[]);
            rpass.set_vertex_buffer(0, block.instances.slice(..));
            rpass.draw(0..4, 0..count);

            stats.blocks_drawn += 1;
            stats.quads_drawn += count;
        }

        log::trace!(
            "text render: blocks={} quads={} uploads={}",
            stats.blocks_drawn,
            stats.quads_drawn,
            stats.uniforms_uploaded
        );
        Ok(stats)
    }
}

/// Compare pipeline formats `(color, depth)` with the target's.
pub(super) fn check_target_formats(
    expected: (wgpu::TextureFormat, Option<wgpu::TextureFormat>),
    actual: (wgpu::TextureFormat, Option<wgpu::TextureFormat>),
) -> Result<(), RenderTargetError> {
    if expected.0 != actual.0 {
        return Err(RenderTargetError::ColorFormat {
            expected: expected.0,
            actual: actual.0,
        });
    }
    if expected.1 != actual.1 {
        return Err(RenderTargetError::DepthFormat {
            expected: expected.1,
            actual: actual.1,
        });
    }
    Ok(())
}
